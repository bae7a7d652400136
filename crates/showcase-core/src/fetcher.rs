//! Remote project-list fetcher.
//!
//! One `GET {base}/projects` per call, no retry loop, no persistence. Retrying
//! is a user action owned by the view, and writing the cache is the caller's
//! job.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::StatusCode;

use crate::config::ShowcaseConfig;
use crate::domain::{validate_projects, FetchError, Project, Result, ShowcaseError};
use crate::obs::{emit_fetch_failed, emit_fetch_started, emit_fetch_succeeded};

/// Lifecycle of a single fetch invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Not started yet.
    #[default]
    Idle,
    /// Request in flight.
    Pending,
    Succeeded(Vec<Project>),
    Failed(FetchError),
}

impl FetchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// `true` once the fetch has resolved either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The fetched list, only for `Succeeded`.
    pub fn projects(&self) -> Option<&[Project]> {
        match self {
            Self::Succeeded(projects) => Some(projects),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::result::Result<Vec<Project>, FetchError>> for FetchState {
    fn from(result: std::result::Result<Vec<Project>, FetchError>) -> Self {
        match result {
            Ok(projects) => Self::Succeeded(projects),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Anything that can produce the project list with a single attempt.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn fetch(&self) -> std::result::Result<Vec<Project>, FetchError>;
}

/// HTTP implementation against the project API.
#[derive(Debug, Clone)]
pub struct HttpProjectFetcher {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpProjectFetcher {
    pub fn new(config: &ShowcaseConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("showcase-core/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ShowcaseError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(HttpProjectFetcher {
            endpoint: config.projects_endpoint(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport(&self, err: reqwest::Error) -> FetchError {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        FetchError::Transport {
            url: self.endpoint.clone(),
            message,
        }
    }
}

#[async_trait]
impl ProjectSource for HttpProjectFetcher {
    async fn fetch(&self) -> std::result::Result<Vec<Project>, FetchError> {
        emit_fetch_started(&self.endpoint);
        let started = Instant::now();

        let result = self.fetch_once().await;
        match &result {
            Ok(projects) => emit_fetch_succeeded(&self.endpoint, projects.len(), elapsed_ms(started)),
            Err(err) => emit_fetch_failed(&self.endpoint, err),
        }
        result
    }
}

impl HttpProjectFetcher {
    async fn fetch_once(&self) -> std::result::Result<Vec<Project>, FetchError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.transport(e))?;
        let projects: Vec<Project> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode {
                url: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        validate_projects(&projects).map_err(|reason| FetchError::InvalidPayload {
            url: self.endpoint.clone(),
            reason,
        })?;

        Ok(projects)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
