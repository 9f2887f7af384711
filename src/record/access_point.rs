//! Access point records and their status
//!
//! Field names on the wire follow the JSON consumed by the front end:
//! `{url, status, lastChecked, source, note}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance tag for records produced by the scraper
pub const ORIGIN_CRAWLER: &str = "crawler";

/// Whether an access point is believed to work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    /// Converts the status to its stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a status from its stored string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One candidate access URL discovered on the source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointRecord {
    /// Absolute http(s) URL, unique within a snapshot
    pub url: String,

    pub status: RecordStatus,

    /// When the extraction run that produced this record happened
    #[serde(rename = "lastChecked")]
    pub discovered_at: DateTime<Utc>,

    /// Provenance tag, `crawler` for scraped records
    #[serde(rename = "source")]
    pub origin: String,

    /// Label text from the source markup with punctuation removed
    #[serde(rename = "note")]
    pub label: String,
}

impl AccessPointRecord {
    /// Creates a scraped record; scraped records always start out active
    pub fn crawled(url: impl Into<String>, label: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            status: RecordStatus::Active,
            discovered_at: at,
            origin: ORIGIN_CRAWLER.to_string(),
            label: label.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}
