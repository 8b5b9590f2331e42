//! Capability trait implemented by download-client adapters.

use async_trait::async_trait;

use crate::error::QueueResult;
use crate::model::{RawTorrentRecord, SeedingLimits};

/// RPC surface of a download-client daemon.
///
/// Implementations translate daemon-specific payloads into
/// [`RawTorrentRecord`] snapshots and map transport or protocol failures onto
/// [`crate::QueueError::ClientUnavailable`]. They must not retry internally.
#[async_trait]
pub trait TorrentClientProxy: Send + Sync {
    /// Snapshot every torrent currently known to the daemon, in daemon order.
    async fn list_torrents(&self) -> QueueResult<Vec<RawTorrentRecord>>;

    /// Submit raw metainfo bytes; returns the identifier assigned by the daemon.
    async fn add_torrent_from_data(
        &self,
        metainfo: &[u8],
        download_dir: Option<&str>,
    ) -> QueueResult<String>;

    /// Submit a magnet (or other URL) the daemon fetches itself; returns the
    /// identifier echoed by the daemon.
    async fn add_torrent_from_url(
        &self,
        url: &str,
        download_dir: Option<&str>,
    ) -> QueueResult<String>;

    /// Raw version string advertised by the daemon.
    async fn get_client_version(&self) -> QueueResult<String>;

    /// Directory the daemon stores new torrents under by default.
    async fn get_default_download_dir(&self) -> QueueResult<Option<String>>;

    /// Session-wide seeding limits configured on the daemon itself.
    ///
    /// Defaults to no limits for daemons that cannot report them.
    async fn get_session_limits(&self) -> QueueResult<SeedingLimits> {
        Ok(SeedingLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueError;
    use std::io;

    struct OfflineProxy;

    #[async_trait]
    impl TorrentClientProxy for OfflineProxy {
        async fn list_torrents(&self) -> QueueResult<Vec<RawTorrentRecord>> {
            Err(QueueError::client_unavailable(
                "list_torrents",
                io::Error::other("connection refused"),
            ))
        }

        async fn add_torrent_from_data(
            &self,
            _metainfo: &[u8],
            _download_dir: Option<&str>,
        ) -> QueueResult<String> {
            Ok("ABC".to_string())
        }

        async fn add_torrent_from_url(
            &self,
            _url: &str,
            _download_dir: Option<&str>,
        ) -> QueueResult<String> {
            Ok("ABC".to_string())
        }

        async fn get_client_version(&self) -> QueueResult<String> {
            Ok("4.0.5 (a6fe2a64aa)".to_string())
        }

        async fn get_default_download_dir(&self) -> QueueResult<Option<String>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn session_limits_default_to_unset() -> anyhow::Result<()> {
        let limits = OfflineProxy.get_session_limits().await?;
        assert_eq!(limits, SeedingLimits::default());
        Ok(())
    }

    #[tokio::test]
    async fn proxy_is_object_safe() {
        let proxy: Box<dyn TorrentClientProxy> = Box::new(OfflineProxy);
        let err = proxy
            .list_torrents()
            .await
            .expect_err("offline proxy should fail");
        assert!(matches!(err, QueueError::ClientUnavailable { .. }));
    }
}
