//! Showcase-State: durable key-value storage for the Showcase client
//!
//! This crate provides the persistence layer the project-list cache sits on.
//! It knows nothing about projects: values are opaque strings stored under
//! named keys, the same contract a browser's `localStorage` offers.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: durability across restarts and atomic overwrites.
//!
//! ## Key Components
//!
//! - `KeyValueStore`: backend-agnostic storage trait
//! - `FsStore`: one file per key, atomic temp-file + rename writes
//! - `DisabledStore`: stands in when durable storage is unavailable
//! - `fakes::MemoryStore`: in-memory store with an optional quota (testing)

mod error;
pub mod fakes;
mod fs_store;
pub mod storage_traits;

pub use error::StorageError;
pub use fs_store::FsStore;
pub use storage_traits::{validate_key, DisabledStore, KeyValueStore, StorageResult};
