//! JSON file store implementation
//!
//! All keys live in one JSON document. The document is re-read on every
//! operation so a file left by a previous process is picked up after restart.

use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::StoredEntry;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileDocument {
    entries: BTreeMap<String, StoredEntry>,
}

/// Store persisted as a single JSON file on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<FileDocument> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(FileDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &FileDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so readers never see a half-written document
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Writes a prepared entry, bypassing TTL computation
    pub fn put_entry(&self, key: &str, entry: StoredEntry) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;

        // A corrupt document is replaced rather than blocking every future write
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(
                    "Replacing unreadable store file {}: {}",
                    self.path.display(),
                    e
                );
                FileDocument::default()
            }
            Err(e) => return Err(e),
        };

        document.entries.insert(key.to_string(), entry);
        self.write_document(&document)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Utc::now();
        Ok(self
            .read_document()?
            .entries
            .remove(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let entry = StoredEntry::new(value, ttl, Utc::now())?;
        self.put_entry(key, entry)
    }

    fn get_stale(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .read_document()?
            .entries
            .remove(key)
            .map(|entry| entry.value))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("domains.json"));

        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get_stale("k").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_from_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.json");

        FileStore::new(&path)
            .set("k", "v", Duration::from_secs(60))
            .unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("domains.json"));

        store.set("a", "1", Duration::from_secs(60)).unwrap();
        store.set("b", "2", Duration::from_secs(60)).unwrap();
        store.set("a", "3", Duration::from_secs(60)).unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_expired_entry_is_stale_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("domains.json"));
        let past = Utc::now() - chrono::Duration::days(2);
        store
            .put_entry("k", StoredEntry::new("old", Duration::from_secs(3600), past).unwrap())
            .unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get_stale("k").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn test_corrupt_file_read_is_error_and_write_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(store.get("k"), Err(StoreError::Serialization(_))));

        store.set("k", "fresh", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data").join("domains.json"));
        store.set("k", "v", Duration::from_secs(60)).unwrap();
        assert!(store.path().exists());
    }
}
