//! Structured observability hooks for the project-list lifecycle.
//!
//! Every function emits one event with a stable `event = "..."` field so log
//! pipelines can filter without parsing messages. Verbosity is controlled by
//! `SHOWCASE_LOG` (see [`crate::telemetry`]).

use tracing::{debug, info, warn};

use crate::domain::{FetchError, ShowcaseError};

/// Span covering one mounted portfolio view. Fetch tasks and screen
/// publications for that view are recorded inside it.
pub fn view_span(view_id: u64) -> tracing::Span {
    tracing::info_span!("showcase.view", view_id = view_id)
}

/// Result of a cache read, for [`emit_cache_read`].
#[derive(Debug)]
pub enum CacheReadOutcome<'a> {
    Hit(usize),
    Miss,
    /// Entry existed but was unusable and has been ignored.
    Discarded(&'a ShowcaseError),
}

pub fn emit_fetch_started(endpoint: &str) {
    info!(event = "fetch.started", endpoint = %endpoint);
}

pub fn emit_fetch_succeeded(endpoint: &str, count: usize, elapsed_ms: u64) {
    info!(
        event = "fetch.succeeded",
        endpoint = %endpoint,
        count = count,
        elapsed_ms = elapsed_ms,
    );
}

/// Emit event: fetch failed (warning level).
pub fn emit_fetch_failed(endpoint: &str, error: &FetchError) {
    warn!(event = "fetch.failed", endpoint = %endpoint, error = %error);
}

/// Emit event: a fetch resolved after its view was torn down.
pub fn emit_fetch_discarded(succeeded: bool) {
    debug!(event = "fetch.discarded", succeeded = succeeded);
}

pub fn emit_cache_read(key: &str, outcome: CacheReadOutcome<'_>) {
    match outcome {
        CacheReadOutcome::Hit(count) => {
            info!(event = "cache.read", key = %key, hit = true, count = count)
        }
        CacheReadOutcome::Miss => info!(event = "cache.read", key = %key, hit = false),
        CacheReadOutcome::Discarded(error) => warn!(
            event = "cache.read",
            key = %key,
            hit = false,
            discarded = true,
            error = %error,
        ),
    }
}

/// Emit event: cache write failed and was dropped (warning level).
pub fn emit_cache_write_failed(key: &str, error: &ShowcaseError) {
    warn!(event = "cache.write_failed", key = %key, error = %error);
}

pub fn emit_view_resolved(source: &str, degraded: bool, count: usize) {
    info!(
        event = "view.resolved",
        source = %source,
        degraded = degraded,
        count = count,
    );
}

pub fn emit_connectivity_changed(online: bool) {
    info!(event = "connectivity.changed", online = online);
}
