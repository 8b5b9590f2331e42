//! Core queue domain types shared across the workspace.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Source describing how a release should be handed to the download client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentSubmission {
    /// Magnet URI; the identifier is derived locally from its info hash.
    Magnet {
        /// Magnet URI to hand to the daemon.
        uri: String,
    },
    /// Raw `.torrent` metainfo bytes; the daemon assigns the identifier.
    Metainfo {
        /// Bencoded metainfo payload.
        bytes: Vec<u8>,
    },
    /// Release URL as published by an indexer. Magnet links are handled like
    /// [`TorrentSubmission::Magnet`]; anything else is fetched by the daemon.
    ReleaseUrl {
        /// Link to the release.
        url: String,
    },
}

impl TorrentSubmission {
    #[must_use]
    /// Convenience constructor for magnet-based submissions.
    pub fn magnet(uri: impl Into<String>) -> Self {
        Self::Magnet { uri: uri.into() }
    }

    #[must_use]
    /// Convenience constructor for metainfo-based submissions.
    pub fn metainfo(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Metainfo {
            bytes: bytes.into(),
        }
    }

    #[must_use]
    /// Convenience constructor for indexer release links.
    pub fn release_url(url: impl Into<String>) -> Self {
        Self::ReleaseUrl { url: url.into() }
    }
}

/// Native status vocabulary reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawTorrentStatus {
    /// Torrent is paused or stopped.
    Stopped,
    /// Waiting for a local data verification slot.
    CheckWait,
    /// Local data verification in progress.
    Check,
    /// Waiting for a download slot.
    Queued,
    /// Actively downloading.
    Downloading,
    /// Waiting for a seeding slot.
    SeedingWait,
    /// Actively seeding.
    Seeding,
}

impl RawTorrentStatus {
    /// Every raw status, in daemon code order.
    pub const ALL: [Self; 7] = [
        Self::Stopped,
        Self::CheckWait,
        Self::Check,
        Self::Queued,
        Self::Downloading,
        Self::SeedingWait,
        Self::Seeding,
    ];

    #[must_use]
    /// Whether the daemon is verifying (or about to verify) local data.
    pub const fn is_verifying(self) -> bool {
        matches!(self, Self::Check | Self::CheckWait)
    }
}

/// Per-item limit selection as reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum LimitMode<T> {
    /// Defer to the global limit.
    #[default]
    Global,
    /// Per-item value that supersedes the global limit.
    Override(T),
    /// Seed forever regardless of the global limit.
    Unlimited,
}

/// Error class reported by the daemon for a single torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentErrorKind {
    /// Tracker returned a warning; transfer continues.
    TrackerWarning,
    /// Tracker returned an error.
    TrackerError,
    /// Local failure such as a full disk or missing permissions.
    LocalError,
}

/// Daemon-reported error attached to a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFault {
    /// Error class.
    pub kind: TorrentErrorKind,
    /// Daemon error text.
    pub message: String,
}

/// Snapshot of one download task as returned by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTorrentRecord {
    /// Info hash as reported by the daemon.
    pub hash: String,
    /// Display name; empty until metadata has been resolved.
    pub name: String,
    /// Native status.
    pub status: RawTorrentStatus,
    /// Directory the daemon stores the payload under.
    pub download_dir: String,
    /// Whether the daemon considers the payload fully downloaded.
    pub finished: bool,
    /// Total payload size in bytes; zero while metadata is pending.
    pub total_size: u64,
    /// Bytes still to be downloaded.
    pub left_until_done: u64,
    /// Share ratio (uploaded/downloaded).
    pub ratio: f64,
    /// Time spent seeding.
    pub seeding_time: Duration,
    /// Raw estimated time remaining; unit ambiguous, negative values are sentinels.
    pub eta: i64,
    /// Per-item ratio limit selection.
    #[serde(default)]
    pub ratio_limit: LimitMode<f64>,
    /// Per-item idle limit selection.
    #[serde(default)]
    pub idle_limit: LimitMode<Duration>,
    /// Daemon-reported error, if any.
    #[serde(default)]
    pub error: Option<TorrentFault>,
}

impl RawTorrentRecord {
    #[must_use]
    /// Whether the torrent is paused/stopped at the daemon.
    pub fn is_paused(&self) -> bool {
        self.status == RawTorrentStatus::Stopped
    }

    #[must_use]
    /// Whether the torrent is actively seeding.
    pub fn is_seeding(&self) -> bool {
        self.status == RawTorrentStatus::Seeding
    }

    #[must_use]
    /// Magnet submissions that have not resolved name and size yet.
    pub fn is_metadata_pending(&self) -> bool {
        self.total_size == 0 || self.name.trim().is_empty()
    }
}

/// Canonical status vocabulary exposed to downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueItemStatus {
    /// Waiting for the daemon to start it.
    Queued,
    /// Transferring, verifying, or paused before completion.
    Downloading,
    /// Payload fully downloaded.
    Completed,
    /// Daemon reported a local failure.
    Failed,
    /// Daemon reported a tracker problem.
    Warning,
}

/// Normalized, client-agnostic view of one download task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalQueueItem {
    /// Uppercase info hash.
    pub download_id: String,
    /// Display name.
    pub title: String,
    /// Category configured for the client, if any.
    pub category: Option<String>,
    /// Canonical status.
    pub status: QueueItemStatus,
    /// Daemon error text for warning and failed items.
    pub message: Option<String>,
    /// Location of the payload (download directory joined with the title).
    pub output_path: String,
    /// Total payload size in bytes.
    pub total_size: u64,
    /// Bytes still to be downloaded.
    pub remaining_size: u64,
    /// Estimated time remaining.
    pub remaining_time: Option<Duration>,
    /// Share ratio.
    pub seed_ratio: f64,
    /// Whether the item may be purged from the daemon.
    pub can_be_removed: bool,
    /// Whether the payload may be moved for import.
    pub can_move_files: bool,
}

/// Ratio and idle-time thresholds that gate reclaiming a finished download.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeedingLimits {
    /// Ratio at which seeding is considered done.
    pub ratio_limit: Option<f64>,
    /// Seeding time after which the item is considered idle.
    pub idle_limit: Option<Duration>,
}

impl SeedingLimits {
    #[must_use]
    /// Fill each unset dimension from `fallback`.
    pub fn layered_over(self, fallback: Self) -> Self {
        Self {
            ratio_limit: self.ratio_limit.or(fallback.ratio_limit),
            idle_limit: self.idle_limit.or(fallback.idle_limit),
        }
    }

    #[must_use]
    /// Whether both dimensions already carry a value.
    pub const fn is_complete(&self) -> bool {
        self.ratio_limit.is_some() && self.idle_limit.is_some()
    }
}

/// Restricts the reported queue to a destination directory or category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Explicit destination directory; matches the directory and its subtree.
    pub directory: Option<String>,
    /// Category appended by the daemon to its own download root.
    pub category: Option<String>,
}

impl ScopeConfig {
    #[must_use]
    /// Configured directory, ignoring blank values.
    pub fn directory(&self) -> Option<&str> {
        non_blank(self.directory.as_deref())
    }

    #[must_use]
    /// Configured category, ignoring blank values.
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Client facts used downstream to decide import-path permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatus {
    /// Whether the daemon runs on this host.
    pub is_localhost: bool,
    /// Output roots currently in use.
    pub output_root_folders: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, total_size: u64) -> RawTorrentRecord {
        RawTorrentRecord {
            hash: "HASH".to_string(),
            name: name.to_string(),
            status: RawTorrentStatus::Downloading,
            download_dir: "/downloads".to_string(),
            finished: false,
            total_size,
            left_until_done: total_size,
            ratio: 0.0,
            seeding_time: Duration::ZERO,
            eta: -1,
            ratio_limit: LimitMode::Global,
            idle_limit: LimitMode::Global,
            error: None,
        }
    }

    #[test]
    fn submission_helpers_construct_variants() {
        match TorrentSubmission::magnet("magnet:?xt=urn:btih:demo") {
            TorrentSubmission::Magnet { uri } => assert!(uri.contains("demo")),
            other => panic!("expected magnet variant, got {other:?}"),
        }

        let data = vec![1_u8, 2, 3];
        match TorrentSubmission::metainfo(data.clone()) {
            TorrentSubmission::Metainfo { bytes } => assert_eq!(bytes, data),
            other => panic!("expected metainfo variant, got {other:?}"),
        }

        match TorrentSubmission::release_url("https://indexer.example/get/42") {
            TorrentSubmission::ReleaseUrl { url } => assert!(url.ends_with("/42")),
            other => panic!("expected release url variant, got {other:?}"),
        }
    }

    #[test]
    fn metadata_pending_requires_name_and_size() {
        assert!(record("", 1_000).is_metadata_pending());
        assert!(record("Movie.2024", 0).is_metadata_pending());
        assert!(!record("Movie.2024", 1_000).is_metadata_pending());
    }

    #[test]
    fn verifying_covers_check_states_only() {
        let verifying: Vec<_> = RawTorrentStatus::ALL
            .into_iter()
            .filter(|status| status.is_verifying())
            .collect();
        assert_eq!(
            verifying,
            vec![RawTorrentStatus::CheckWait, RawTorrentStatus::Check]
        );
    }

    #[test]
    fn limits_layer_per_dimension() {
        let policy = SeedingLimits {
            ratio_limit: Some(1.5),
            idle_limit: None,
        };
        let session = SeedingLimits {
            ratio_limit: Some(3.0),
            idle_limit: Some(Duration::from_secs(600)),
        };
        let layered = policy.layered_over(session);
        assert_eq!(layered.ratio_limit, Some(1.5));
        assert_eq!(layered.idle_limit, Some(Duration::from_secs(600)));
        assert!(layered.is_complete());
        assert!(!policy.is_complete());
    }

    #[test]
    fn scope_ignores_blank_values() {
        let scope = ScopeConfig {
            directory: Some("   ".to_string()),
            category: Some(" radarr ".to_string()),
        };
        assert_eq!(scope.directory(), None);
        assert_eq!(scope.category(), Some("radarr"));
    }
}
