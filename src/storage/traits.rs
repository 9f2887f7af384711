//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot cache backends and
//! associated error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during store operations
///
/// Callers on the read path treat every variant as a cache miss.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid TTL: {0}s")]
    InvalidTtl(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for key-value cache backends with time-based expiry
///
/// Values are opaque strings; the coordinator stores JSON snapshots. Backends
/// keep expired entries around until they are overwritten so that
/// [`Store::get_stale`] can serve them as a last resort.
pub trait Store: Send + Sync {
    /// Looks up a live value
    ///
    /// Returns `None` if the key was never set or its TTL has elapsed.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value with a time-to-live, replacing any previous value
    fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Looks up the last written value regardless of expiry
    fn get_stale(&self, key: &str) -> StoreResult<Option<String>>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
