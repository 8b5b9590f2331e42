//! Async operations over one download client.
//!
//! # Design
//! - Stateless per call: every poll starts from a fresh `list_torrents`.
//! - Proxy failures propagate unchanged; a failed poll reports nothing.
//! - The daemon session is queried only when a decision needs it.

use seedwarden_core::magnet::{info_hash_from_magnet, is_magnet, normalize_hash};
use seedwarden_core::status::matched_rule;
use seedwarden_core::version::{ClientVersion, ensure_supported};
use seedwarden_core::{
    CanonicalQueueItem, ClientStatus, QueueResult, RawTorrentRecord, SeedingLimits,
    TorrentClientProxy, TorrentSubmission,
};
use seedwarden_telemetry::Metrics;
use tracing::{debug, info, instrument};

use crate::host::{is_localhost, output_root};
use crate::settings::EngineSettings;
use crate::snapshot::{Reconciled, reconcile, requires_seeding_limits};

/// Reconciles one daemon's queue into canonical items.
pub struct ReconciliationEngine<P> {
    proxy: P,
    settings: EngineSettings,
    metrics: Metrics,
}

impl<P> ReconciliationEngine<P>
where
    P: TorrentClientProxy,
{
    /// Build an engine over `proxy`.
    #[must_use]
    pub const fn new(proxy: P, settings: EngineSettings, metrics: Metrics) -> Self {
        Self {
            proxy,
            settings,
            metrics,
        }
    }

    /// Settings this engine was built with.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Underlying proxy.
    #[must_use]
    pub const fn proxy(&self) -> &P {
        &self.proxy
    }

    /// Metrics handle shared with the other engines of the process.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Poll the daemon and return the in-scope queue in daemon order.
    ///
    /// # Errors
    ///
    /// Returns the proxy error when listing torrents or reading session
    /// limits fails; no partial snapshot is produced.
    #[instrument(name = "engine.get_items", skip(self), fields(client = %self.settings.client))]
    pub async fn get_items(&self) -> QueueResult<Vec<CanonicalQueueItem>> {
        let client = self.settings.client.as_str();
        let snapshot = self.poll().await;
        match &snapshot {
            Ok(items) => self.metrics.record_poll(client, items.len()),
            Err(_) => self.metrics.record_poll_failure(client),
        }
        snapshot
    }

    async fn poll(&self) -> QueueResult<Vec<CanonicalQueueItem>> {
        let records = self.proxy.list_torrents().await?;
        let global = self.global_limits(&records).await?;
        let client = self.settings.client.as_str();

        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            match reconcile(record, &self.settings.scope, &global) {
                Reconciled::Item(item) => {
                    debug!(
                        client,
                        torrent_id = %item.download_id,
                        status = ?item.status,
                        rule = matched_rule(record.status, record.finished),
                        fault = ?record.error.as_ref().map(|fault| fault.kind),
                        "queue item reconciled"
                    );
                    items.push(item);
                }
                Reconciled::Skipped(reason) => {
                    debug!(
                        client,
                        torrent_id = %record.hash,
                        reason = reason.as_str(),
                        "queue item skipped"
                    );
                    self.metrics.inc_skipped(client, reason);
                }
            }
        }
        debug!(client, count = items.len(), "queue snapshot built");
        Ok(items)
    }

    async fn global_limits(&self, records: &[RawTorrentRecord]) -> QueueResult<SeedingLimits> {
        let policy = self.settings.seeding;
        if policy.is_complete() || !requires_seeding_limits(records) {
            return Ok(policy);
        }
        let session = self.proxy.get_session_limits().await?;
        Ok(policy.layered_over(session))
    }

    /// Submit a torrent and return its identifier.
    ///
    /// Magnet identifiers are derived locally from the info hash, including
    /// magnet links passed as release URLs. Payload and plain release URL
    /// identifiers are the ones assigned by the daemon.
    ///
    /// # Errors
    ///
    /// Returns [`seedwarden_core::QueueError::InvalidReleaseUrl`] for magnets
    /// without a usable info hash, or the proxy error when the daemon call
    /// fails.
    pub async fn download(&self, submission: &TorrentSubmission) -> QueueResult<String> {
        let client = self.settings.client.as_str();
        let hash = match submission {
            TorrentSubmission::Magnet { uri } => self.submit_magnet(uri).await?,
            TorrentSubmission::ReleaseUrl { url } if is_magnet(url) => {
                self.submit_magnet(url.trim()).await?
            }
            TorrentSubmission::ReleaseUrl { url } => {
                let target = self.target_directory().await?;
                let assigned = self
                    .proxy
                    .add_torrent_from_url(url.trim(), target.as_deref())
                    .await?;
                normalize_hash(&assigned)
            }
            TorrentSubmission::Metainfo { bytes } => {
                let target = self.target_directory().await?;
                let assigned = self
                    .proxy
                    .add_torrent_from_data(bytes, target.as_deref())
                    .await?;
                normalize_hash(&assigned)
            }
        };
        self.metrics.inc_submission(client);
        info!(client, torrent_id = %hash, "torrent submitted");
        Ok(hash)
    }

    async fn submit_magnet(&self, uri: &str) -> QueueResult<String> {
        let hash = info_hash_from_magnet(uri)?;
        let target = self.target_directory().await?;
        self.proxy
            .add_torrent_from_url(uri, target.as_deref())
            .await?;
        Ok(hash)
    }

    async fn target_directory(&self) -> QueueResult<Option<String>> {
        let scope = &self.settings.scope;
        if scope.directory().is_none() && scope.category().is_none() {
            return Ok(None);
        }
        let default_dir = if scope.directory().is_some() {
            None
        } else {
            self.proxy.get_default_download_dir().await?
        };
        Ok(seedwarden_core::scope::target_directory(
            scope,
            default_dir.as_deref(),
        ))
    }

    /// Report whether the daemon is local and where it writes downloads.
    ///
    /// # Errors
    ///
    /// Returns the proxy error when the default directory cannot be read.
    pub async fn get_status(&self) -> QueueResult<ClientStatus> {
        let default_dir = if self.settings.scope.directory().is_some() {
            None
        } else {
            self.proxy.get_default_download_dir().await?
        };
        Ok(ClientStatus {
            is_localhost: is_localhost(&self.settings.host),
            output_root_folders: output_root(&self.settings.scope, default_dir.as_deref())
                .into_iter()
                .collect(),
        })
    }

    /// Check that the daemon is new enough to be driven by this engine.
    ///
    /// # Errors
    ///
    /// Returns [`seedwarden_core::QueueError::IncompatibleClientVersion`] for
    /// old daemons, [`seedwarden_core::QueueError::UnparsableClientVersion`]
    /// for unrecognisable version strings, or the proxy error.
    pub async fn verify(&self) -> QueueResult<ClientVersion> {
        let raw = self.proxy.get_client_version().await?;
        let version = ensure_supported(&raw, self.settings.minimum_version)?;
        info!(
            client = %self.settings.client,
            version = %version,
            raw = %raw,
            "download client version accepted"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use seedwarden_core::{QueueError, RawTorrentStatus};
    use seedwarden_test_support::{RecordBuilder, StaticProxy};

    fn engine(proxy: StaticProxy) -> anyhow::Result<ReconciliationEngine<StaticProxy>> {
        Ok(ReconciliationEngine::new(
            proxy,
            EngineSettings::new("seedbox", "nas.lan"),
            Metrics::new()?,
        ))
    }

    #[tokio::test]
    async fn complete_policy_skips_the_session_query() -> anyhow::Result<()> {
        let proxy = StaticProxy::new(vec![RecordBuilder::completed().build()]);
        let engine = ReconciliationEngine::new(
            proxy.clone(),
            EngineSettings::new("seedbox", "nas.lan").with_seeding(SeedingLimits {
                ratio_limit: Some(1.0),
                idle_limit: Some(Duration::from_secs(600)),
            }),
            Metrics::new()?,
        );
        engine.get_items().await?;
        assert_eq!(proxy.session_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn session_is_not_queried_without_completed_items() -> anyhow::Result<()> {
        let proxy = StaticProxy::new(vec![RecordBuilder::downloading().build()]);
        engine(proxy.clone())?.get_items().await?;
        assert_eq!(proxy.session_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn session_limits_fill_an_empty_policy() -> anyhow::Result<()> {
        let proxy = StaticProxy::new(vec![
            RecordBuilder::completed()
                .status(RawTorrentStatus::Stopped)
                .ratio(2.5)
                .build(),
        ])
        .with_session_limits(SeedingLimits {
            ratio_limit: Some(2.0),
            idle_limit: None,
        });
        let items = engine(proxy.clone())?.get_items().await?;
        assert_eq!(proxy.session_calls(), 1);
        assert!(items[0].can_be_removed);
        assert!(items[0].can_move_files);
        Ok(())
    }

    #[tokio::test]
    async fn version_gate_uses_the_configured_minimum() -> anyhow::Result<()> {
        let engine = engine(StaticProxy::new(Vec::new()).with_version("2.33 (14101)"))?;
        assert!(matches!(
            engine.verify().await,
            Err(QueueError::IncompatibleClientVersion { .. })
        ));
        Ok(())
    }
}
