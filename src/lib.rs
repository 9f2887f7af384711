//! Domain-Scout: tracks the currently working access domain of a mirrored service
//!
//! This crate scrapes a third-party aggregator page for announced access URLs,
//! caches the resulting snapshot with an expiry, and serves the current domain
//! through a small HTTP API that degrades to stale or empty data instead of
//! failing.

pub mod config;
pub mod crawler;
pub mod record;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Domain-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status_code} from {url}")]
    HttpStatus { url: String, status_code: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    /// Returns true if the error comes from reaching the source page
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Timeout { .. } | Self::Reqwest(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Domain-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Extractor, Scheduler};
pub use record::{AccessPointRecord, DomainSnapshot, RecordStatus};
pub use storage::{open_store, Store, StoreError};
