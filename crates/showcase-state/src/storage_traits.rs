//! Storage trait definitions for Showcase
//!
//! `KeyValueStore` is the single storage abstraction: a durable map from
//! string keys to string values. Implementations:
//! - `FsStore`: filesystem-backed, survives process restarts
//! - `DisabledStore`: every operation fails with `Unavailable`
//! - `fakes::MemoryStore`: in-memory, for tests
//!
//! The trait is synchronous. Callers that must not block their render path
//! are expected to move writes onto a blocking task themselves.

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Durable key-value store.
///
/// Guarantees:
/// - `get(key)` returns the exact value of the last successful `set(key, _)`.
/// - `get` on a key that was never written returns `Ok(None)`.
/// - `set` overwrites atomically: a concurrent or crashed writer never leaves
///   a partially written value behind.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Check that `key` is usable by every backend.
///
/// Keys are non-empty, at most 128 bytes, made of ASCII alphanumerics,
/// `-`, `_` and `.`, and do not start with `.`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

/// Store used when durable storage is disabled or could not be opened.
///
/// Every read and write fails with [`StorageError::Unavailable`], which lets
/// callers exercise the same "storage inaccessible" path a browser with
/// storage turned off would take.
#[derive(Debug, Clone)]
pub struct DisabledStore {
    reason: String,
}

impl DisabledStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for DisabledStore {
    fn default() -> Self {
        Self::new("storage disabled")
    }
}

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable {
            reason: self.reason.clone(),
        })
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_plain_names() {
        assert!(validate_key("projects-cache").is_ok());
        assert!(validate_key("projects_cache.v1").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_bad_names() {
        for key in ["", ".hidden", "../escape", "a/b", "with space", "ünïcode"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey { .. })),
                "key {key:?} should be rejected"
            );
        }
        assert!(validate_key(&"k".repeat(129)).is_err());
    }

    #[test]
    fn test_disabled_store_fails_everything() {
        let store = DisabledStore::new("private browsing");
        assert!(matches!(
            store.get("projects-cache"),
            Err(StorageError::Unavailable { .. })
        ));
        let err = store.set("projects-cache", "[]").unwrap_err();
        assert!(err.to_string().contains("private browsing"));
    }
}
