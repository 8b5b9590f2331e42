//! Per-client settings consumed by the engine.

use seedwarden_core::version::ClientVersion;
use seedwarden_core::{ScopeConfig, SeedingLimits};

/// Oldest Transmission release whose RPC surface the engine relies on.
pub const MINIMUM_TRANSMISSION_VERSION: ClientVersion = ClientVersion::new(2, 40, 0);

/// Knobs for one configured download client.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Client name used as the metrics label and log field.
    pub client: String,
    /// Host the daemon is reached on.
    pub host: String,
    /// Directory or category the reported queue is restricted to.
    pub scope: ScopeConfig,
    /// Process-wide seeding policy; unset dimensions fall back to the daemon session.
    pub seeding: SeedingLimits,
    /// Versions older than this are rejected by [`crate::ReconciliationEngine::verify`].
    pub minimum_version: ClientVersion,
}

impl EngineSettings {
    /// Settings for `client` on `host` with no scope and no seeding policy.
    #[must_use]
    pub fn new(client: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            host: host.into(),
            scope: ScopeConfig::default(),
            seeding: SeedingLimits::default(),
            minimum_version: MINIMUM_TRANSMISSION_VERSION,
        }
    }

    /// Restrict the queue to `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeConfig) -> Self {
        self.scope = scope;
        self
    }

    /// Apply a process-wide seeding policy.
    #[must_use]
    pub const fn with_seeding(mut self, seeding: SeedingLimits) -> Self {
        self.seeding = seeding;
        self
    }
}
