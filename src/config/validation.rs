use crate::config::types::{Config, IdentityEntry, OutputConfig, SearchConfig, SelectorConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    validate_identities(&config.identity)?;
    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_locale(&config.locale)?;

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "base_url '{}' must use http or https",
                base_url
            )));
        }
    }

    Ok(())
}

/// Validates a locale: it becomes a subdomain, so only ASCII letters and digits
fn validate_locale(locale: &str) -> Result<(), ConfigError> {
    if locale.is_empty() {
        return Err(ConfigError::Validation("locale cannot be empty".to_string()));
    }

    if !locale.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "locale must contain only ASCII letters and digits, got '{}'",
            locale
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.log_file.is_empty() {
        return Err(ConfigError::Validation(
            "log_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every field selector parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let fields = [
        ("title", &config.title),
        ("company", &config.company),
        ("salary", &config.salary),
        ("summary", &config.summary),
        ("location-container", &config.location_container),
        ("location-node", &config.location_node),
    ];

    for (field, selector) in fields {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", field, selector, e))
        })?;
    }

    Ok(())
}

/// Validates the identity pool
fn validate_identities(identities: &[IdentityEntry]) -> Result<(), ConfigError> {
    if identities.is_empty() {
        return Err(ConfigError::Validation(
            "at least one identity is required".to_string(),
        ));
    }

    for identity in identities {
        for (name, value) in &identity.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ConfigError::Validation(format!("Invalid header name '{}'", name))
            })?;
            HeaderValue::from_str(value).map_err(|_| {
                ConfigError::Validation(format!("Invalid value for header '{}'", name))
            })?;
        }
    }

    Ok(())
}
