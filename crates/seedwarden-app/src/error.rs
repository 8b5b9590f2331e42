//! # Design
//!
//! - Centralize bootstrap and polling errors for the binary.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: seedwarden_config::ConfigError,
    },
    /// Telemetry could not be initialised.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: seedwarden_telemetry::TelemetryError,
    },
    /// A Transmission proxy could not be constructed.
    #[error("transmission client setup failed")]
    Transmission {
        /// Configured client name.
        client: String,
        /// Source adapter error.
        source: seedwarden_transmission::TransmissionError,
    },
    /// A download client rejected a queue operation.
    #[error("download client operation failed")]
    Client {
        /// Operation identifier.
        operation: &'static str,
        /// Configured client name.
        client: String,
        /// Source queue error.
        source: seedwarden_core::QueueError,
    },
    /// No download clients were configured.
    #[error("no download clients configured")]
    NoClients,
    /// Waiting for the shutdown signal failed.
    #[error("shutdown signal listener failed")]
    Signal {
        /// Source IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: seedwarden_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: seedwarden_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) fn transmission(
        client: &str,
        source: seedwarden_transmission::TransmissionError,
    ) -> Self {
        Self::Transmission {
            client: client.to_string(),
            source,
        }
    }

    pub(crate) fn client(
        operation: &'static str,
        client: &str,
        source: seedwarden_core::QueueError,
    ) -> Self {
        Self::Client {
            operation,
            client: client.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            seedwarden_config::ConfigError::DuplicateClient {
                name: "seedbox".to_string(),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let client = AppError::client(
            "engine.verify",
            "seedbox",
            seedwarden_core::QueueError::UnparsableClientVersion {
                version: "nightly".to_string(),
            },
        );
        match &client {
            AppError::Client {
                operation, client, ..
            } => {
                assert_eq!(*operation, "engine.verify");
                assert_eq!(client, "seedbox");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let transmission = AppError::transmission(
            "seedbox",
            seedwarden_transmission::TransmissionError::Unauthorized {
                method: "session-get",
            },
        );
        assert_eq!(transmission.to_string(), "transmission client setup failed");
        assert!(AppError::NoClients.source().is_none());
    }
}
