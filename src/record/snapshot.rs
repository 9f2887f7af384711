use crate::record::AccessPointRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The full result of one extraction run
///
/// Serialized as `{domains: [...], lastUpdated: ...}`, the value stored under
/// the cache key and in the local fallback file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    /// Records in discovery order
    #[serde(rename = "domains")]
    pub records: Vec<AccessPointRecord>,

    #[serde(rename = "lastUpdated")]
    pub updated_at: DateTime<Utc>,
}

impl DomainSnapshot {
    pub fn new(records: Vec<AccessPointRecord>, updated_at: DateTime<Utc>) -> Self {
        Self {
            records,
            updated_at,
        }
    }

    /// A snapshot with no records, used when nothing better is available
    pub fn empty() -> Self {
        Self::new(Vec::new(), Utc::now())
    }

    /// The externally exposed "current" access point
    pub fn current(&self) -> Option<&AccessPointRecord> {
        self.records.first()
    }

    pub fn into_current(self) -> Option<AccessPointRecord> {
        self.records.into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
