use serde::Deserialize;

/// Main configuration structure for Domain-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionRules,
    pub store: StoreConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The aggregator page that announces access domains
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Page scraped on every refresh
    pub url: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Matching rules for locating access points on the source page
///
/// Kept as data so a markup change on the source page only needs a config
/// edit, not a code change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractionRules {
    /// Text contained in the heading that opens the relevant section
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Inline tags that wrap a labelled address
    #[serde(default = "default_emphasis_tags")]
    pub emphasis_tags: Vec<String>,

    /// Style declaration carried by the label span (whitespace and case insensitive)
    #[serde(default = "default_label_style")]
    pub label_style: String,

    /// A label must contain one of these to be accepted
    #[serde(default = "default_label_keywords")]
    pub label_keywords: Vec<String>,

    /// Characters removed from the label before it is stored
    #[serde(default = "default_label_strip")]
    pub label_strip: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            emphasis_tags: default_emphasis_tags(),
            label_style: default_label_style(),
            label_keywords: default_label_keywords(),
            label_strip: default_label_strip(),
        }
    }
}

/// Which key-value backend holds the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
    File,
}

/// Snapshot cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Database or JSON file path (unused by the memory backend)
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Expiry applied on every successful write
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Local JSON file layered behind the primary backend
    #[serde(default)]
    pub fallback_path: Option<String>,
}

/// Refresh cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduleConfig {
    /// Six-field cron expression evaluated in server-local time
    #[serde(default = "default_cron")]
    pub cron: String,

    /// Refresh once as soon as the scheduler starts
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            run_on_start: true,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_marker() -> String {
    "最新官网地址".to_string()
}

fn default_emphasis_tags() -> Vec<String> {
    vec!["strong".to_string(), "b".to_string()]
}

fn default_label_style() -> String {
    "color: #0000ff".to_string()
}

fn default_label_keywords() -> Vec<String> {
    vec!["第三方".to_string(), "官方地址".to_string()]
}

fn default_label_strip() -> Vec<String> {
    vec![":".to_string(), "：".to_string()]
}

fn default_cache_key() -> String {
    "zlib:domains".to_string()
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_cron() -> String {
    "0 0 2 * * *".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}
