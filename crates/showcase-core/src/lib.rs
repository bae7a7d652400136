//! Showcase Core Library
//!
//! Resolves the portfolio project list from three tiers (live API, persisted
//! cache, bundled fallback) and binds the result to a presentation state that
//! never fails to render.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod domain;
pub mod fakes;
pub mod fallback;
pub mod fetcher;
pub mod metrics;
pub mod obs;
pub mod resolution;
pub mod telemetry;
pub mod view;

pub use cache::{ProjectCache, CACHE_KEY};
pub use config::ShowcaseConfig;
pub use connectivity::{ConnectivityMonitor, Headless, ReachabilitySignal, Subscription};
pub use domain::{
    validate_projects, FetchError, Project, ProjectListError, Result, ShowcaseError,
};
pub use fallback::fallback_projects;
pub use fetcher::{FetchState, HttpProjectFetcher, ProjectSource};
pub use resolution::{resolve, resolve_with_fallback, ResolvedView, Source};
pub use view::{screen_for, Banner, PortfolioView, Screen, LOADING_TEXT};

pub use showcase_state::{DisabledStore, FsStore, KeyValueStore, StorageError};

pub use metrics::METRICS;
pub use telemetry::init_tracing;

/// Showcase version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
