//! SQLite storage implementation
//!
//! This module provides a SQLite-backed implementation of the Store trait,
//! standing in for an external key-value service.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::StoredEntry;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite store backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StoreError)` - Failed to open database
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Writes a prepared entry, bypassing TTL computation
    pub fn put_entry(&self, key: &str, entry: &StoredEntry) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_entries (key, value, stored_at, expires_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                stored_at = excluded.stored_at,
                expires_at = excluded.expires_at",
            params![
                key,
                entry.value,
                entry.stored_at.to_rfc3339(),
                entry.expires_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Reads the raw entry for a key, expired or not
    pub fn get_entry(&self, key: &str) -> StoreResult<Option<StoredEntry>> {
        let conn = self.lock()?;
        let row: Option<(String, String, String)> = conn
            .query_row(
                "SELECT value, stored_at, expires_at FROM kv_entries WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(value, stored_at, expires_at)| -> StoreResult<StoredEntry> {
            Ok(StoredEntry {
                value,
                stored_at: parse_timestamp(&stored_at)?,
                expires_at: parse_timestamp(&expires_at)?,
            })
        })
        .transpose()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("Invalid timestamp '{}': {}", s, e)))
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Utc::now();
        Ok(self
            .get_entry(key)?
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let entry = StoredEntry::new(value, ttl, Utc::now())?;
        self.put_entry(key, &entry)
    }

    fn get_stale(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get_entry(key)?.map(|entry| entry.value))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
