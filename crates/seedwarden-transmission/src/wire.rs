//! JSON payloads exchanged with the Transmission RPC endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields requested from `torrent-get`.
pub const TORRENT_FIELDS: [&str; 17] = [
    "hashString",
    "name",
    "downloadDir",
    "totalSize",
    "leftUntilDone",
    "isFinished",
    "eta",
    "status",
    "secondsSeeding",
    "errorString",
    "error",
    "uploadedEver",
    "downloadedEver",
    "seedRatioLimit",
    "seedRatioMode",
    "seedIdleLimit",
    "seedIdleMode",
];

/// Fields requested from `session-get`.
pub const SESSION_FIELDS: [&str; 6] = [
    "version",
    "download-dir",
    "seedRatioLimited",
    "seedRatioLimit",
    "idle-seeding-limit-enabled",
    "idle-seeding-limit",
];

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub(crate) method: &'a str,
    pub(crate) arguments: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub(crate) result: String,
    pub(crate) arguments: Option<T>,
}

/// `torrent-get` response arguments.
#[derive(Debug, Deserialize)]
pub(crate) struct TorrentList {
    #[serde(default)]
    pub(crate) torrents: Vec<WireTorrent>,
}

/// One torrent as reported by `torrent-get`.
///
/// Every field is optional on the wire; absent values take neutral defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTorrent {
    /// Info hash in hex.
    pub hash_string: String,
    /// Display name.
    pub name: String,
    /// Download directory.
    pub download_dir: String,
    /// Total payload size in bytes.
    pub total_size: i64,
    /// Bytes still to be downloaded.
    pub left_until_done: i64,
    /// Whether the torrent stopped after reaching its seed limit.
    pub is_finished: bool,
    /// Estimated seconds remaining; negative sentinels for unknown.
    pub eta: i64,
    /// Numeric status code (0-6).
    pub status: i64,
    /// Seconds spent seeding.
    pub seconds_seeding: i64,
    /// Daemon error text.
    pub error_string: String,
    /// Daemon error class (0 none, 1 tracker warning, 2 tracker error, 3 local).
    pub error: i64,
    /// Bytes uploaded.
    pub uploaded_ever: i64,
    /// Bytes downloaded.
    pub downloaded_ever: i64,
    /// Per-torrent ratio limit.
    pub seed_ratio_limit: f64,
    /// Ratio limit mode (0 global, 1 single, 2 unlimited).
    pub seed_ratio_mode: i64,
    /// Per-torrent idle limit in minutes.
    pub seed_idle_limit: i64,
    /// Idle limit mode (0 global, 1 single, 2 unlimited).
    pub seed_idle_mode: i64,
}

/// `session-get` response arguments.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    /// Daemon version string.
    pub version: Option<String>,
    /// Default download directory.
    #[serde(rename = "download-dir")]
    pub download_dir: Option<String>,
    /// Whether the session ratio limit is enabled.
    #[serde(rename = "seedRatioLimited")]
    pub seed_ratio_limited: bool,
    /// Session ratio limit.
    #[serde(rename = "seedRatioLimit")]
    pub seed_ratio_limit: f64,
    /// Whether the session idle limit is enabled.
    #[serde(rename = "idle-seeding-limit-enabled")]
    pub idle_seeding_limit_enabled: bool,
    /// Session idle limit in minutes.
    #[serde(rename = "idle-seeding-limit")]
    pub idle_seeding_limit: i64,
}

/// `torrent-add` response arguments.
#[derive(Debug, Deserialize)]
pub(crate) struct TorrentAdded {
    #[serde(rename = "torrent-added")]
    pub(crate) added: Option<AddedTorrent>,
    #[serde(rename = "torrent-duplicate")]
    pub(crate) duplicate: Option<AddedTorrent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddedTorrent {
    pub(crate) hash_string: String,
}
