//! Crawler module for discovering the current access point
//!
//! This module contains the core refresh logic, including:
//! - HTTP fetching of the source page
//! - Extraction of labelled access point URLs from the page
//! - The cache, scrape and fallback chain behind every read
//! - Periodic refreshes on a cron schedule

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::Coordinator;
pub use extractor::Extractor;
pub use fetcher::{build_http_client, fetch_page, user_agent_string, HttpFetcher, PageFetcher};
pub use scheduler::{run_refresh, Scheduler};
