//! [`TorrentClientProxy`] implementation backed by the Transmission RPC.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use seedwarden_core::magnet::normalize_hash;
use seedwarden_core::{QueueResult, RawTorrentRecord, SeedingLimits, TorrentClientProxy};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::convert::{session_limits, to_record};
use crate::error::{TransmissionError, unavailable};
use crate::rpc::{Endpoint, RpcClient};
use crate::wire::{SESSION_FIELDS, SessionInfo, TORRENT_FIELDS, TorrentAdded, TorrentList};

const TORRENT_GET: &str = "torrent-get";
const TORRENT_ADD: &str = "torrent-add";
const SESSION_GET: &str = "session-get";

/// Transmission daemon reached over JSON-RPC.
pub struct TransmissionProxy {
    rpc: RpcClient,
}

impl TransmissionProxy {
    /// Build a proxy for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: &Endpoint) -> Result<Self, TransmissionError> {
        Ok(Self {
            rpc: RpcClient::new(endpoint)?,
        })
    }

    /// Underlying RPC client.
    #[must_use]
    pub const fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    async fn session(&self, operation: &'static str, fields: &[&str]) -> QueueResult<SessionInfo> {
        self.rpc
            .call(SESSION_GET, json!({ "fields": fields }))
            .await
            .map_err(|err| unavailable(operation, err))
    }

    async fn add(
        &self,
        operation: &'static str,
        source: (&'static str, String),
        download_dir: Option<&str>,
    ) -> QueueResult<String> {
        let mut arguments = Map::new();
        arguments.insert(source.0.to_string(), Value::String(source.1));
        if let Some(dir) = download_dir {
            arguments.insert("download-dir".to_string(), Value::String(dir.to_string()));
        }

        let response: TorrentAdded = self
            .rpc
            .call(TORRENT_ADD, Value::Object(arguments))
            .await
            .map_err(|err| unavailable(operation, err))?;
        let duplicate = response.added.is_none() && response.duplicate.is_some();
        let torrent = response.added.or(response.duplicate).ok_or_else(|| {
            unavailable(
                operation,
                TransmissionError::MissingField {
                    method: TORRENT_ADD,
                    field: "torrent-added",
                },
            )
        })?;
        let hash = normalize_hash(&torrent.hash_string);
        debug!(torrent_id = %hash, duplicate, "torrent submitted to transmission");
        Ok(hash)
    }
}

#[async_trait]
impl TorrentClientProxy for TransmissionProxy {
    #[instrument(name = "transmission.list_torrents", skip(self), fields(url = %self.rpc.url()))]
    async fn list_torrents(&self) -> QueueResult<Vec<RawTorrentRecord>> {
        let list: TorrentList = self
            .rpc
            .call(TORRENT_GET, json!({ "fields": TORRENT_FIELDS }))
            .await
            .map_err(|err| unavailable("list_torrents", err))?;
        Ok(list.torrents.into_iter().map(to_record).collect())
    }

    async fn add_torrent_from_data(
        &self,
        metainfo: &[u8],
        download_dir: Option<&str>,
    ) -> QueueResult<String> {
        self.add(
            "add_torrent_from_data",
            ("metainfo", STANDARD.encode(metainfo)),
            download_dir,
        )
        .await
    }

    async fn add_torrent_from_url(
        &self,
        url: &str,
        download_dir: Option<&str>,
    ) -> QueueResult<String> {
        self.add(
            "add_torrent_from_url",
            ("filename", url.to_string()),
            download_dir,
        )
        .await
    }

    async fn get_client_version(&self) -> QueueResult<String> {
        let session = self.session("get_client_version", &["version"]).await?;
        session.version.ok_or_else(|| {
            unavailable(
                "get_client_version",
                TransmissionError::MissingField {
                    method: SESSION_GET,
                    field: "version",
                },
            )
        })
    }

    async fn get_default_download_dir(&self) -> QueueResult<Option<String>> {
        let session = self
            .session("get_default_download_dir", &["download-dir"])
            .await?;
        Ok(session
            .download_dir
            .filter(|dir| !dir.trim().is_empty()))
    }

    async fn get_session_limits(&self) -> QueueResult<SeedingLimits> {
        let session = self.session("get_session_limits", &SESSION_FIELDS).await?;
        Ok(session_limits(&session))
    }
}
