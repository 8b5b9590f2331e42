//! Conversions between Transmission payloads and core records.

use std::time::Duration;

use seedwarden_core::magnet::normalize_hash;
use seedwarden_core::{
    LimitMode, RawTorrentRecord, RawTorrentStatus, SeedingLimits, TorrentErrorKind, TorrentFault,
};
use tracing::debug;

use crate::wire::{SessionInfo, WireTorrent};

const MODE_SINGLE: i64 = 1;
const MODE_UNLIMITED: i64 = 2;

/// Map a numeric `torrent-get` status onto the core vocabulary.
///
/// Unknown codes are treated as stopped.
#[must_use]
pub fn map_status(code: i64) -> RawTorrentStatus {
    match code {
        1 => RawTorrentStatus::CheckWait,
        2 => RawTorrentStatus::Check,
        3 => RawTorrentStatus::Queued,
        4 => RawTorrentStatus::Downloading,
        5 => RawTorrentStatus::SeedingWait,
        6 => RawTorrentStatus::Seeding,
        0 => RawTorrentStatus::Stopped,
        other => {
            debug!(code = other, "unknown transmission status code");
            RawTorrentStatus::Stopped
        }
    }
}

/// Convert one wire torrent into a raw record.
#[must_use]
pub fn to_record(torrent: WireTorrent) -> RawTorrentRecord {
    let error = map_fault(torrent.error, &torrent.error_string);
    let finished = download_complete(&torrent);
    RawTorrentRecord {
        hash: normalize_hash(&torrent.hash_string),
        status: map_status(torrent.status),
        download_dir: torrent.download_dir,
        finished,
        total_size: non_negative(torrent.total_size),
        left_until_done: non_negative(torrent.left_until_done),
        ratio: share_ratio(torrent.uploaded_ever, torrent.downloaded_ever),
        seeding_time: Duration::from_secs(non_negative(torrent.seconds_seeding)),
        eta: torrent.eta,
        ratio_limit: ratio_mode(torrent.seed_ratio_mode, torrent.seed_ratio_limit),
        idle_limit: idle_mode(torrent.seed_idle_mode, torrent.seed_idle_limit),
        error,
        name: torrent.name,
    }
}

// `isFinished` only flips once seeding stops; a payload with nothing left is
// complete even while it is still seeding.
const fn download_complete(torrent: &WireTorrent) -> bool {
    torrent.is_finished || (torrent.total_size > 0 && torrent.left_until_done == 0)
}

/// Session-wide seeding limits reported by `session-get`.
#[must_use]
pub fn session_limits(session: &SessionInfo) -> SeedingLimits {
    SeedingLimits {
        ratio_limit: session
            .seed_ratio_limited
            .then_some(session.seed_ratio_limit),
        idle_limit: session
            .idle_seeding_limit_enabled
            .then(|| minutes(session.idle_seeding_limit)),
    }
}

fn map_fault(code: i64, message: &str) -> Option<TorrentFault> {
    let kind = match code {
        3 => TorrentErrorKind::LocalError,
        2 => TorrentErrorKind::TrackerError,
        1 => TorrentErrorKind::TrackerWarning,
        _ if !message.trim().is_empty() => TorrentErrorKind::TrackerWarning,
        _ => return None,
    };
    Some(TorrentFault {
        kind,
        message: message.trim().to_string(),
    })
}

// Mode 0 and unknown modes defer to the session limit.
const fn ratio_mode(mode: i64, limit: f64) -> LimitMode<f64> {
    match mode {
        MODE_SINGLE => LimitMode::Override(limit),
        MODE_UNLIMITED => LimitMode::Unlimited,
        _ => LimitMode::Global,
    }
}

fn idle_mode(mode: i64, limit_minutes: i64) -> LimitMode<Duration> {
    match mode {
        MODE_SINGLE => LimitMode::Override(minutes(limit_minutes)),
        MODE_UNLIMITED => LimitMode::Unlimited,
        _ => LimitMode::Global,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "byte counters only need ratio precision"
)]
fn share_ratio(uploaded: i64, downloaded: i64) -> f64 {
    let downloaded = non_negative(downloaded);
    if downloaded == 0 {
        return 0.0;
    }
    non_negative(uploaded) as f64 / downloaded as f64
}

fn minutes(value: i64) -> Duration {
    Duration::from_secs(non_negative(value).saturating_mul(60))
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
