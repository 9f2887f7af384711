//! Refresh coordinator - the read path and its fallback chain
//!
//! This module ties the fetcher, extractor and store together:
//! - Serving the cached snapshot while it is live
//! - Scraping the source page on a cache miss
//! - Persisting fresh snapshots with a TTL (best effort)
//! - Degrading to the last known snapshot, or nothing, when scraping fails

use crate::config::Config;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::record::{AccessPointRecord, DomainSnapshot};
use crate::storage::{open_store, Store};
use crate::ScoutError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Main refresh coordinator
///
/// Shared as `Arc<Coordinator>` between the HTTP API and the scheduler. Two
/// refreshes may race; the later write wins.
pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    store: Arc<dyn Store>,
    source_url: String,
    cache_key: String,
    ttl: Duration,
}

impl Coordinator {
    /// Creates a coordinator from its parts
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Where page HTML comes from
    /// * `extractor` - Turns page HTML into records
    /// * `store` - Snapshot cache
    /// * `source_url` - The page to scrape
    /// * `cache_key` - Key the snapshot is stored under
    /// * `ttl` - Expiry applied to every successful write
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Extractor,
        store: Arc<dyn Store>,
        source_url: impl Into<String>,
        cache_key: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            source_url: source_url.into(),
            cache_key: cache_key.into(),
            ttl,
        }
    }

    /// Builds the HTTP fetcher, extractor and configured store
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to serve
    /// * `Err(ScoutError)` - Client, rules or store could not be set up
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let fetcher = HttpFetcher::from_config(&config.source, &config.user_agent)?;
        let extractor = Extractor::new(config.extraction.clone())?;
        let store = open_store(&config.store)?;

        Ok(Self::new(
            Arc::new(fetcher),
            extractor,
            store,
            config.source.url.clone(),
            config.store.cache_key.clone(),
            Duration::from_secs(config.store.ttl_secs),
        ))
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current access point, or None if nothing is known
    ///
    /// Never fails: cache problems count as a miss and scrape problems fall
    /// back to the last stored snapshot.
    pub async fn current_access_point(&self) -> Option<AccessPointRecord> {
        self.snapshot().await.into_current()
    }

    /// Returns the best available snapshot
    ///
    /// # Fallback chain
    ///
    /// 1. Live cached snapshot
    /// 2. Fresh scrape (written back to the cache)
    /// 3. Last stored snapshot regardless of expiry
    /// 4. Empty snapshot
    pub async fn snapshot(&self) -> DomainSnapshot {
        if let Some(cached) = self.read_cached() {
            return cached;
        }

        tracing::info!("No cached snapshot for {}, scraping {}", self.cache_key, self.source_url);
        match self.refresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Scrape of {} failed, using fallback: {}", self.source_url, e);
                self.fallback_snapshot()
            }
        }
    }

    /// Scrapes the source page and stores the result, ignoring the cache
    ///
    /// A failed store write is logged and does not fail the refresh.
    ///
    /// # Returns
    ///
    /// * `Ok(DomainSnapshot)` - Freshly extracted snapshot (possibly empty)
    /// * `Err(ScoutError)` - The source page could not be fetched
    pub async fn refresh(&self) -> Result<DomainSnapshot, ScoutError> {
        let html = self.fetcher.fetch(&self.source_url).await?;

        let now = Utc::now();
        let records = self.extractor.extract(&html, now);
        let snapshot = DomainSnapshot::new(records, now);

        tracing::info!(
            "Extracted {} access point(s) from {}",
            snapshot.len(),
            self.source_url
        );

        self.persist(&snapshot);
        Ok(snapshot)
    }

    /// The last stored snapshot regardless of expiry, or an empty one
    pub fn fallback_snapshot(&self) -> DomainSnapshot {
        match self.store.get_stale(&self.cache_key) {
            Ok(Some(json)) => match DomainSnapshot::from_json(&json) {
                Ok(snapshot) => {
                    tracing::info!(
                        "Serving fallback snapshot from {} ({} record(s))",
                        snapshot.updated_at,
                        snapshot.len()
                    );
                    return snapshot;
                }
                Err(e) => tracing::error!("Fallback snapshot is unreadable: {}", e),
            },
            Ok(None) => tracing::info!("No fallback snapshot stored"),
            Err(e) => tracing::error!("Fallback read failed: {}", e),
        }
        DomainSnapshot::empty()
    }

    /// Reads the live cached snapshot; every failure is a miss
    fn read_cached(&self) -> Option<DomainSnapshot> {
        match self.store.get(&self.cache_key) {
            Ok(Some(json)) => match DomainSnapshot::from_json(&json) {
                Ok(snapshot) => {
                    tracing::debug!("Cache hit for {}", self.cache_key);
                    Some(snapshot)
                }
                Err(e) => {
                    tracing::error!("Cached snapshot for {} is unreadable: {}", self.cache_key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    "{} store read failed, treating as miss: {}",
                    self.store.backend_name(),
                    e
                );
                None
            }
        }
    }

    fn persist(&self, snapshot: &DomainSnapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize snapshot: {}", e);
                return;
            }
        };

        match self.store.set(&self.cache_key, &json, self.ttl) {
            Ok(()) => tracing::debug!(
                "Stored snapshot under {} for {}s",
                self.cache_key,
                self.ttl.as_secs()
            ),
            Err(e) => tracing::error!("Failed to store snapshot under {}: {}", self.cache_key, e),
        }
    }
}
