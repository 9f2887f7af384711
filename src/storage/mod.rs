//! Storage module for the snapshot cache
//!
//! This module provides the key-value cache that holds the latest
//! [`DomainSnapshot`](crate::record::DomainSnapshot), including:
//! - In-memory, SQLite and JSON-file backends behind one [`Store`] trait
//! - Per-entry expiry with stale reads for degraded operation
//! - An optional local file layered behind the primary backend

mod file;
mod memory;
mod schema;
mod sqlite;
mod tiered;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use tiered::TieredStore;
pub use traits::{Store, StoreError, StoreResult};

use crate::config::{StoreBackend, StoreConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Opens the store described by the configuration
///
/// When `fallback-path` is set, the configured backend becomes the primary
/// tier of a [`TieredStore`] backed by a [`FileStore`] at that path.
///
/// # Returns
///
/// * `Ok(Arc<dyn Store>)` - Ready-to-use store
/// * `Err(StoreError)` - Failed to open the backend
pub fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn Store>> {
    let primary: Arc<dyn Store> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::new(Path::new(required_path(config)?))?),
        StoreBackend::File => Arc::new(FileStore::new(required_path(config)?)),
    };

    match &config.fallback_path {
        Some(path) => {
            tracing::info!(
                "Using {} store with local fallback file {}",
                primary.backend_name(),
                path
            );
            Ok(Arc::new(TieredStore::new(primary, Arc::new(FileStore::new(path)))))
        }
        None => {
            tracing::info!("Using {} store", primary.backend_name());
            Ok(primary)
        }
    }
}

fn required_path(config: &StoreConfig) -> StoreResult<&str> {
    config
        .path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            StoreError::Unavailable(format!("{:?} backend configured without a path", config.backend))
        })
}

/// A stored value with its write time and expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredEntry {
    /// Creates an entry written at `now` that expires after `ttl`
    pub fn new(value: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> StoreResult<Self> {
        let ttl_secs = ttl.as_secs();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(StoreError::InvalidTtl(ttl_secs))?;

        Ok(Self {
            value: value.into(),
            stored_at: now,
            expires_at,
        })
    }

    /// An entry is expired once `now` reaches its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
