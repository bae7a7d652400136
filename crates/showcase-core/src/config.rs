//! Client configuration.
//!
//! Values come from the environment (`SHOWCASE_*`) with defaults suitable for
//! a local API, and can be overridden builder-style.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Result, ShowcaseError};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_CACHE_DIR: &str = ".showcase/cache";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_BASE_URL: &str = "SHOWCASE_API_BASE_URL";
pub const ENV_CACHE_DIR: &str = "SHOWCASE_CACHE_DIR";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SHOWCASE_REQUEST_TIMEOUT_SECS";

/// Showcase client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// API base URL, without a trailing slash
    pub api_base_url: String,
    /// Directory holding the persistent cache
    pub cache_dir: PathBuf,
    /// Upper bound on a single list fetch
    pub request_timeout: Duration,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        ShowcaseConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ShowcaseConfig {
    /// Create a config for a specific API.
    pub fn new(api_base_url: &str) -> Result<Self> {
        Self::default().with_api_base_url(api_base_url)
    }

    /// Create a config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            config = config.with_api_base_url(&url)?;
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            config = config.with_cache_dir(dir);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ShowcaseError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: &str) -> Result<Self> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(ShowcaseError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    /// `GET` target for the project list.
    pub fn projects_endpoint(&self) -> String {
        format!("{}/projects", self.api_base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| {
            ShowcaseError::Config(format!("API base URL must start with http:// or https://, got {raw:?}"))
        })?;
    if host.is_empty() || host.starts_with('/') {
        return Err(ShowcaseError::Config(format!(
            "API base URL has no host: {raw:?}"
        )));
    }
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| ShowcaseError::Config(format!("invalid API base URL {raw:?}: {e}")))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ShowcaseError::Config(format!(
            "API base URL has no host: {raw:?}"
        )));
    }
    Ok(trimmed.to_string())
}
