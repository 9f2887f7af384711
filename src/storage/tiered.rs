//! Two-tier store: a primary cache backed by a local fallback

use crate::storage::traits::{Store, StoreResult};
use std::sync::Arc;
use std::time::Duration;

/// Layers a fallback store (usually a [`FileStore`](super::FileStore)) behind
/// a primary one
///
/// Writes go to both tiers. Reads consult the primary first and fall back to
/// the second tier when the primary misses or is unavailable, so a restarted
/// process or an unreachable cache still has the last snapshot to serve.
pub struct TieredStore {
    primary: Arc<dyn Store>,
    fallback: Arc<dyn Store>,
}

impl TieredStore {
    pub fn new(primary: Arc<dyn Store>, fallback: Arc<dyn Store>) -> Self {
        Self { primary, fallback }
    }

    fn read(
        &self,
        key: &str,
        op: impl Fn(&dyn Store, &str) -> StoreResult<Option<String>>,
    ) -> StoreResult<Option<String>> {
        match op(self.primary.as_ref(), key) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "Primary {} store read failed for {}, trying fallback: {}",
                    self.primary.backend_name(),
                    key,
                    e
                );
            }
        }
        op(self.fallback.as_ref(), key)
    }
}

impl Store for TieredStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.read(key, |store, key| store.get(key))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let primary = self.primary.set(key, value, ttl);
        let fallback = self.fallback.set(key, value, ttl);

        match (primary, fallback) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => {
                tracing::warn!(
                    "Primary {} store write failed for {}, kept fallback copy: {}",
                    self.primary.backend_name(),
                    key,
                    e
                );
                Ok(())
            }
            (Ok(()), Err(e)) => {
                tracing::warn!(
                    "Fallback {} store write failed for {}: {}",
                    self.fallback.backend_name(),
                    key,
                    e
                );
                Ok(())
            }
            (Err(e), Err(_)) => Err(e),
        }
    }

    fn get_stale(&self, key: &str) -> StoreResult<Option<String>> {
        self.read(key, |store, key| store.get_stale(key))
    }

    fn backend_name(&self) -> &'static str {
        "tiered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};

    /// A store whose backing service is down
    struct DownStore;

    impl Store for DownStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        fn get_stale(&self, key: &str) -> StoreResult<Option<String>> {
            self.get(key)
        }

        fn backend_name(&self) -> &'static str {
            "down"
        }
    }

    #[test]
    fn test_write_reaches_both_tiers() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        let store = TieredStore::new(primary.clone(), fallback.clone());

        store.set("k", "v", Duration::from_secs(60)).unwrap();

        assert_eq!(primary.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(fallback.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_primary_miss_reads_fallback() {
        let fallback = Arc::new(MemoryStore::new());
        fallback.set("k", "from-file", Duration::from_secs(60)).unwrap();
        let store = TieredStore::new(Arc::new(MemoryStore::new()), fallback);

        assert_eq!(store.get("k").unwrap().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_primary_down_reads_and_writes_fallback() {
        let fallback = Arc::new(MemoryStore::new());
        let store = TieredStore::new(Arc::new(DownStore), fallback.clone());

        store.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get_stale("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_both_down_is_error() {
        let store = TieredStore::new(Arc::new(DownStore), Arc::new(DownStore));
        assert!(store.set("k", "v", Duration::from_secs(60)).is_err());
        assert!(store.get("k").is_err());
    }
}
