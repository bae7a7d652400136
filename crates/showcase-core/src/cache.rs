//! Persistent project-list cache.
//!
//! A single entry under [`CACHE_KEY`] holding the JSON of the most recent
//! successfully fetched list. No timestamp, no TTL: an entry is only ever
//! replaced by a newer successful fetch.
//!
//! [`ProjectCache::read`] and [`ProjectCache::write`] never fail: storage
//! errors and corrupt entries degrade to "no cache". The `try_*` variants
//! expose the underlying error for diagnostics.

use std::sync::Arc;

use showcase_state::KeyValueStore;
use tokio::task::JoinHandle;

use crate::domain::{validate_projects, Project, Result, ShowcaseError};
use crate::metrics::METRICS;
use crate::obs::{emit_cache_read, emit_cache_write_failed, CacheReadOutcome};

/// Storage key of the cached list.
pub const CACHE_KEY: &str = "projects-cache";

/// Typed view over a [`KeyValueStore`] holding the cached project list.
#[derive(Clone)]
pub struct ProjectCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProjectCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: CACHE_KEY.to_string(),
        }
    }

    /// Use a key other than [`CACHE_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the cached list, surfacing storage and parse errors.
    pub fn try_read(&self) -> Result<Option<Vec<Project>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let projects: Vec<Project> = serde_json::from_str(&raw)
            .map_err(|e| ShowcaseError::MalformedCacheData(e.to_string()))?;
        validate_projects(&projects)
            .map_err(|e| ShowcaseError::MalformedCacheData(e.to_string()))?;
        Ok(Some(projects))
    }

    /// Read the cached list. Absent, unreadable or corrupt entries are `None`.
    pub fn read(&self) -> Option<Vec<Project>> {
        match self.try_read() {
            Ok(Some(projects)) => {
                emit_cache_read(&self.key, CacheReadOutcome::Hit(projects.len()));
                Some(projects)
            }
            Ok(None) => {
                emit_cache_read(&self.key, CacheReadOutcome::Miss);
                None
            }
            Err(err) => {
                emit_cache_read(&self.key, CacheReadOutcome::Discarded(&err));
                None
            }
        }
    }

    /// Persist `projects`, surfacing errors.
    pub fn try_write(&self, projects: &[Project]) -> Result<()> {
        let raw = serde_json::to_string(projects)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    /// Persist `projects`, best-effort. Failures are logged and counted.
    pub fn write(&self, projects: &[Project]) {
        match self.try_write(projects) {
            Ok(()) => METRICS.inc_cache_writes(),
            Err(err) => {
                METRICS.inc_cache_write_failures();
                emit_cache_write_failed(&self.key, &err);
            }
        }
    }

    /// Fire-and-forget [`write`](Self::write) on the blocking pool.
    ///
    /// Must be called from within a tokio runtime. The handle may be awaited
    /// to observe completion but nothing requires it.
    pub fn write_in_background(&self, projects: Vec<Project>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.write(&projects))
    }
}

impl std::fmt::Debug for ProjectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCache").field("key", &self.key).finish()
    }
}
