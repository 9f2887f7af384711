//! In-process store implementation

use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::StoredEntry;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a prepared entry, bypassing TTL computation
    pub fn insert_entry(&self, key: &str, entry: StoredEntry) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, StoredEntry>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.lock()?;
        let now = Utc::now();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let entry = StoredEntry::new(value, ttl, Utc::now())?;
        self.insert_entry(key, entry)
    }

    fn get_stale(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).map(|entry| entry.value.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
