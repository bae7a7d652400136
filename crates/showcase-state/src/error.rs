//! Error types for showcase-state

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage is disabled or could not be opened
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// Key is empty or contains characters the backend cannot store
    #[error("invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Write rejected because it would exceed the backend's quota
    #[error("quota exceeded writing {key}: {size} bytes exceeds limit of {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// Stored bytes are not valid UTF-8 text
    #[error("value under {key} is not valid UTF-8")]
    NotText { key: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
