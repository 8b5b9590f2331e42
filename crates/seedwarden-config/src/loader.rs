//! File and environment loading for the configuration document.
//!
//! # Design
//! - The document path comes from `SEEDWARDEN_CONFIG`, defaulting to `seedwarden.json`.
//! - Environment overrides are applied after parsing and before validation.
//! - Environment access goes through a lookup closure so callers and tests can
//!   supply their own source.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;
use crate::validate::validate;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "SEEDWARDEN_CONFIG";
/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "seedwarden.json";
/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "SEEDWARDEN_LOG_LEVEL";

/// Load configuration using the process environment.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub async fn load_from_env() -> ConfigResult<AppConfig> {
    load_with_env(|name| std::env::var(name).ok()).await
}

/// Load configuration with an explicit environment lookup.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub async fn load_with_env<F>(lookup: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = lookup(CONFIG_PATH_ENV)
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let mut config = read_document(&path).await?;
    apply_env_overrides(&mut config, &lookup);
    validate(&config)?;
    info!(
        path = %path.display(),
        clients = config.clients.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Load and validate configuration from `path` without environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub async fn load_from_path(path: &Path) -> ConfigResult<AppConfig> {
    let config = read_document(path).await?;
    validate(&config)?;
    Ok(config)
}

/// Parse a configuration document held in memory.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed documents; `origin` is only
/// used for error context.
pub fn parse_document(raw: &str, origin: &Path) -> ConfigResult<AppConfig> {
    serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Apply supported environment overrides to a parsed document.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
        debug!(level = %level, "log level overridden from environment");
        config.logging.level = level;
    }
}

async fn read_document(path: &Path) -> ConfigResult<AppConfig> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            operation: "config.read",
            path: path.to_path_buf(),
            source,
        })?;
    parse_document(&raw, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_document_reports_origin() {
        match parse_document("{not json", Path::new("broken.json")) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, Path::new("broken.json")),
            other => panic!("expected parse error: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = parse_document(r#"{"pollInterval": 5}"#, Path::new("inline"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, &|_: &str| Some("  ".to_string()));
        assert_eq!(config.logging.level, "info");

        apply_env_overrides(&mut config, &|name: &str| {
            (name == LOG_LEVEL_ENV).then(|| "debug".to_string())
        });
        assert_eq!(config.logging.level, "debug");
    }
}
