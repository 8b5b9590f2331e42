//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers deserialized from the configuration document.
//! - Conversions into core types live beside the models; IO lives in `loader.rs`.

use std::fmt;
use std::time::Duration;

use seedwarden_core::{ScopeConfig, SeedingLimits};
use serde::{Deserialize, Serialize};

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
/// Default Transmission RPC port.
pub const DEFAULT_RPC_PORT: u16 = 9091;
/// Default Transmission RPC URL base.
pub const DEFAULT_URL_BASE: &str = "/transmission/";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Logging output settings.
    pub logging: LoggingSettings,
    /// Seconds between polls of each client.
    pub poll_interval_secs: u64,
    /// Process-wide seeding policy.
    pub seeding: SeedingPolicy,
    /// Download clients to reconcile.
    pub clients: Vec<ClientSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            seeding: SeedingPolicy::default(),
            clients: Vec::new(),
        }
    }
}

impl AppConfig {
    #[must_use]
    /// Poll interval as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Level or filter directive.
    pub level: String,
    /// `json` or `pretty`; inferred from the build profile when unset.
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Process-wide seeding thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedingPolicy {
    /// Ratio at which completed items may be reclaimed.
    pub ratio_limit: Option<f64>,
    /// Seeding minutes after which completed items may be reclaimed.
    pub idle_limit_minutes: Option<u64>,
}

impl SeedingPolicy {
    #[must_use]
    /// Convert into the core limit type.
    pub fn limits(&self) -> SeedingLimits {
        SeedingLimits {
            ratio_limit: self.ratio_limit,
            idle_limit: self
                .idle_limit_minutes
                .map(|minutes| Duration::from_secs(minutes.saturating_mul(60))),
        }
    }
}

/// Connection and scope settings for one Transmission daemon.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// Unique name used in logs and metric labels.
    pub name: String,
    /// Daemon host name or address.
    pub host: String,
    /// RPC port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect over HTTPS.
    #[serde(default)]
    pub use_ssl: bool,
    /// Path prefix the RPC endpoint lives under.
    #[serde(default = "default_url_base")]
    pub url_base: String,
    /// Basic-auth user; authentication is skipped when unset.
    #[serde(default)]
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(default)]
    pub password: Option<String>,
    /// Explicit destination directory.
    #[serde(default)]
    pub directory: Option<String>,
    /// Category subdirectory under the daemon's download root.
    #[serde(default)]
    pub category: Option<String>,
}

impl ClientSettings {
    #[must_use]
    /// Scope the client's queue is restricted to.
    pub fn scope(&self) -> ScopeConfig {
        ScopeConfig {
            directory: self.directory.clone(),
            category: self.category.clone(),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientSettings")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("url_base", &self.url_base)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("directory", &self.directory)
            .field("category", &self.category)
            .finish()
    }
}

const fn default_port() -> u16 {
    DEFAULT_RPC_PORT
}

fn default_url_base() -> String {
    DEFAULT_URL_BASE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_defaults_fill_missing_fields() -> serde_json::Result<()> {
        let client: ClientSettings =
            serde_json::from_value(json!({"name": "seedbox", "host": "10.0.0.5"}))?;
        assert_eq!(client.port, DEFAULT_RPC_PORT);
        assert_eq!(client.url_base, DEFAULT_URL_BASE);
        assert!(!client.use_ssl);
        assert_eq!(client.scope(), ScopeConfig::default());
        Ok(())
    }

    #[test]
    fn empty_document_uses_defaults() -> serde_json::Result<()> {
        let config: AppConfig = serde_json::from_value(json!({}))?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn seeding_policy_converts_minutes() {
        let policy = SeedingPolicy {
            ratio_limit: Some(1.5),
            idle_limit_minutes: Some(20),
        };
        let limits = policy.limits();
        assert_eq!(limits.ratio_limit, Some(1.5));
        assert_eq!(limits.idle_limit, Some(Duration::from_secs(1_200)));
    }

    #[test]
    fn debug_output_redacts_password() {
        let client = ClientSettings {
            name: "seedbox".to_string(),
            host: "localhost".to_string(),
            port: 9091,
            use_ssl: false,
            url_base: DEFAULT_URL_BASE.to_string(),
            username: Some("admin".to_string()),
            password: Some("hunter2".to_string()),
            directory: None,
            category: None,
        };
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
