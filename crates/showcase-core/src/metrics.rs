//! Global atomic counters for project-list observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. when the CLI exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    fetches_succeeded: AtomicU64,
    fetches_failed: AtomicU64,
    fetches_discarded: AtomicU64,
    cache_writes: AtomicU64,
    cache_write_failures: AtomicU64,
    degraded_renders: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            fetches_succeeded: AtomicU64::new(0),
            fetches_failed: AtomicU64::new(0),
            fetches_discarded: AtomicU64::new(0),
            cache_writes: AtomicU64::new(0),
            cache_write_failures: AtomicU64::new(0),
            degraded_renders: AtomicU64::new(0),
        }
    }

    pub fn inc_fetches_succeeded(&self) {
        self.fetches_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fetches_succeeded", "counter incremented");
    }

    pub fn inc_fetches_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fetches_failed", "counter incremented");
    }

    /// A fetch resolved after its view was gone.
    pub fn inc_fetches_discarded(&self) {
        self.fetches_discarded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fetches_discarded", "counter incremented");
    }

    pub fn inc_cache_writes(&self) {
        self.cache_writes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "cache_writes", "counter incremented");
    }

    pub fn inc_cache_write_failures(&self) {
        self.cache_write_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "cache_write_failures", "counter incremented");
    }

    /// A screen was published with the degraded banner condition set.
    pub fn inc_degraded_renders(&self) {
        self.degraded_renders.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "degraded_renders", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            fetches_succeeded = self.fetches_succeeded(),
            fetches_failed = self.fetches_failed(),
            fetches_discarded = self.fetches_discarded(),
            cache_writes = self.cache_writes(),
            cache_write_failures = self.cache_write_failures(),
            degraded_renders = self.degraded_renders(),
        );
    }

    pub fn fetches_succeeded(&self) -> u64 {
        self.fetches_succeeded.load(Ordering::Relaxed)
    }

    pub fn fetches_failed(&self) -> u64 {
        self.fetches_failed.load(Ordering::Relaxed)
    }

    pub fn fetches_discarded(&self) -> u64 {
        self.fetches_discarded.load(Ordering::Relaxed)
    }

    pub fn cache_writes(&self) -> u64 {
        self.cache_writes.load(Ordering::Relaxed)
    }

    pub fn cache_write_failures(&self) -> u64 {
        self.cache_write_failures.load(Ordering::Relaxed)
    }

    pub fn degraded_renders(&self) -> u64 {
        self.degraded_renders.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.fetches_succeeded.store(0, Ordering::Relaxed);
        self.fetches_failed.store(0, Ordering::Relaxed);
        self.fetches_discarded.store(0, Ordering::Relaxed);
        self.cache_writes.store(0, Ordering::Relaxed);
        self.cache_write_failures.store(0, Ordering::Relaxed);
        self.degraded_renders.store(0, Ordering::Relaxed);
    }
}
