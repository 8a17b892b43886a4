use crate::config::types::{ApiConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_api_config(&config.api)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.rate_limit < 1 || config.rate_limit > 6000 {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be between 1 and 6000 requests/minute, got {}",
            config.rate_limit
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.max_empty_responses < 1 {
        return Err(ConfigError::Validation(format!(
            "max_empty_responses must be >= 1, got {}",
            config.max_empty_responses
        )));
    }

    if config.batch_size < 1 || config.batch_size > 50 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 50, got {}",
            config.batch_size
        )));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    validate_seeds(&config.seeds)?;

    Ok(())
}

/// Validates the initial frontier
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "seeds must contain at least one prefix".to_string(),
        ));
    }

    if seeds.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "seeds cannot contain empty prefixes".to_string(),
        ));
    }

    Ok(())
}

/// Validates the autocomplete endpoint configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.endpoint.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "endpoint must start with '/', got '{}'",
            config.endpoint
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.names_path.is_empty() {
        return Err(ConfigError::Validation(
            "names_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
