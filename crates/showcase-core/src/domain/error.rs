//! Domain-level error taxonomy for Showcase.

use showcase_state::StorageError;

use crate::domain::project::ProjectListError;

/// Why a single project-list fetch failed.
///
/// The `Display` text is the human-readable message carried by
/// `FetchState::Failed`. Fields are plain strings so the error can be cloned
/// into every observer of the fetch state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not a project list: {message}")]
    Decode { url: String, message: String },

    #[error("response from {url} has an invalid project list: {reason}")]
    InvalidPayload {
        url: String,
        reason: ProjectListError,
    },
}

/// Showcase domain errors.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    #[error("network failure: {0}")]
    NetworkFailure(#[from] FetchError),

    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] StorageError),

    #[error("malformed cache data: {0}")]
    MalformedCacheData(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Showcase domain operations.
pub type Result<T> = std::result::Result<T, ShowcaseError>;
