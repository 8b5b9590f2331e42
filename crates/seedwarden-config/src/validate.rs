//! Validation helpers for configuration documents.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, ClientSettings, SeedingPolicy};

/// Validate a parsed configuration document.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidField`] or
/// [`ConfigError::DuplicateClient`] encountered.
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    if config.poll_interval_secs == 0 {
        return Err(ConfigError::invalid(
            "root",
            "poll_interval_secs",
            Some("0".to_string()),
            "must be greater than zero",
        ));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::invalid(
            "logging",
            "level",
            None,
            "must not be empty",
        ));
    }
    validate_seeding(&config.seeding)?;

    let mut names = HashSet::new();
    for (index, client) in config.clients.iter().enumerate() {
        validate_client(index, client)?;
        if !names.insert(client.name.trim()) {
            return Err(ConfigError::DuplicateClient {
                name: client.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_seeding(policy: &SeedingPolicy) -> ConfigResult<()> {
    if let Some(ratio) = policy.ratio_limit
        && (!ratio.is_finite() || ratio < 0.0)
    {
        return Err(ConfigError::invalid(
            "seeding",
            "ratio_limit",
            Some(ratio.to_string()),
            "must be a non-negative number",
        ));
    }
    Ok(())
}

fn validate_client(index: usize, client: &ClientSettings) -> ConfigResult<()> {
    let section = format!("clients[{index}]");
    if client.name.trim().is_empty() {
        return Err(ConfigError::invalid(
            section,
            "name",
            None,
            "must not be empty",
        ));
    }
    if client.host.trim().is_empty() {
        return Err(ConfigError::invalid(
            section,
            "host",
            None,
            "must not be empty",
        ));
    }
    if client.port == 0 {
        return Err(ConfigError::invalid(
            section,
            "port",
            Some("0".to_string()),
            "must be between 1 and 65535",
        ));
    }
    if !client.url_base.starts_with('/') {
        return Err(ConfigError::invalid(
            section,
            "url_base",
            Some(client.url_base.clone()),
            "must start with '/'",
        ));
    }
    Ok(())
}
