//! Record module for discovered access points
//!
//! # Components
//!
//! - `AccessPointRecord`: one candidate access URL found on the source page
//! - `RecordStatus`: whether a record is considered usable
//! - `DomainSnapshot`: the full result of one extraction run, cached as a unit

mod access_point;
mod snapshot;

// Re-export main types
pub use access_point::{AccessPointRecord, RecordStatus, ORIGIN_CRAWLER};
pub use snapshot::DomainSnapshot;
