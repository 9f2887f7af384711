use crate::config::types::{
    Config, ExtractionRules, ScheduleConfig, ServerConfig, SourceConfig, StoreBackend,
    StoreConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extraction_rules(&config.extraction)?;
    validate_store_config(&config.store)?;
    validate_schedule_config(&config.schedule)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates the scraped source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Source url '{}' must use HTTP or HTTPS",
            config.url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the extraction rules
fn validate_extraction_rules(rules: &ExtractionRules) -> Result<(), ConfigError> {
    if rules.marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "extraction marker cannot be empty".to_string(),
        ));
    }

    if rules.emphasis_tags.is_empty() {
        return Err(ConfigError::Validation(
            "extraction emphasis_tags cannot be empty".to_string(),
        ));
    }

    // Tags are spliced into a CSS selector
    for tag in &rules.emphasis_tags {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Validation(format!(
                "emphasis tag '{}' must be a plain tag name",
                tag
            )));
        }
    }

    if rules.label_style.trim().is_empty() {
        return Err(ConfigError::Validation(
            "extraction label_style cannot be empty".to_string(),
        ));
    }

    if rules.label_keywords.is_empty() || rules.label_keywords.iter().any(|k| k.is_empty()) {
        return Err(ConfigError::Validation(
            "extraction label_keywords must contain at least one non-empty keyword".to_string(),
        ));
    }

    Ok(())
}

/// Validates the snapshot store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    let needs_path = matches!(config.backend, StoreBackend::Sqlite | StoreBackend::File);
    let has_path = config.path.as_deref().is_some_and(|p| !p.is_empty());

    if needs_path && !has_path {
        return Err(ConfigError::Validation(format!(
            "store backend {:?} requires a path",
            config.backend
        )));
    }

    if config.cache_key.is_empty() {
        return Err(ConfigError::Validation(
            "cache_key cannot be empty".to_string(),
        ));
    }

    if config.ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "ttl_secs must be >= 1".to_string(),
        ));
    }

    if let Some(fallback) = &config.fallback_path {
        if fallback.is_empty() {
            return Err(ConfigError::Validation(
                "fallback_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the refresh schedule
///
/// Only the field count is checked here; the expression itself is parsed
/// when the job is registered.
fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    let fields = config.cron.split_whitespace().count();
    if !(6..=7).contains(&fields) {
        return Err(ConfigError::Validation(format!(
            "cron expression '{}' must have 6 or 7 fields (seconds first), got {}",
            config.cron, fields
        )));
    }
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
