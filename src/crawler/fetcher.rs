//! HTTP fetcher implementation
//!
//! This module handles the single outbound request of a refresh:
//! - Building the HTTP client with a descriptive user agent string
//! - One GET per refresh, no retries
//! - Classifying failures as network errors

use crate::config::{SourceConfig, UserAgentConfig};
use crate::ScoutError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Source of raw HTML for the extractor
///
/// The HTTP implementation is [`HttpFetcher`]; tests substitute their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page body, failing on connection errors, timeouts and
    /// non-success statuses
    async fn fetch(&self, url: &str) -> Result<String, ScoutError>;
}

/// Formats the user agent string: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Total request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use domain_scout::config::UserAgentConfig;
/// use domain_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "DomainScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the source page over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the fetcher from the source and user agent sections of the config
    pub fn from_config(
        source: &SourceConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, ScoutError> {
        let client = build_http_client(user_agent, Duration::from_secs(source.timeout_secs))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScoutError> {
        fetch_page(&self.client, url).await
    }
}

/// Fetches a page body with a single GET
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | body text |
/// | other status | `HttpStatus` |
/// | timeout | `Timeout` |
/// | connection refused, DNS, TLS | `Network` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, ScoutError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScoutError::HttpStatus {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    tracing::debug!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}

fn classify_error(url: &str, e: reqwest::Error) -> ScoutError {
    if e.is_timeout() {
        ScoutError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        ScoutError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        ScoutError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
