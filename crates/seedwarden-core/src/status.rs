//! Mapping from the daemon's status vocabulary onto the canonical queue status.
//!
//! The mapping is an ordered rule table: the first rule whose predicate
//! matches wins. Daemon errors are resolved ahead of the table.

use crate::model::{QueueItemStatus, RawTorrentStatus, TorrentErrorKind, TorrentFault};

struct Rule {
    name: &'static str,
    applies: fn(RawTorrentStatus, bool) -> bool,
    status: QueueItemStatus,
}

const RULES: [Rule; 4] = [
    Rule {
        name: "verifying",
        applies: |raw, _| raw.is_verifying(),
        status: QueueItemStatus::Downloading,
    },
    Rule {
        name: "finished",
        applies: |_, finished| finished,
        status: QueueItemStatus::Completed,
    },
    Rule {
        name: "queued",
        applies: |raw, _| matches!(raw, RawTorrentStatus::Queued),
        status: QueueItemStatus::Queued,
    },
    Rule {
        name: "active",
        applies: |_, _| true,
        status: QueueItemStatus::Downloading,
    },
];

/// Normalize a raw status and finished signal into the canonical status.
#[must_use]
pub fn normalize(raw: RawTorrentStatus, finished: bool) -> QueueItemStatus {
    RULES
        .iter()
        .find(|rule| (rule.applies)(raw, finished))
        .map_or(QueueItemStatus::Downloading, |rule| rule.status)
}

/// Name of the rule that decided the status, for diagnostics.
#[must_use]
pub fn matched_rule(raw: RawTorrentStatus, finished: bool) -> &'static str {
    RULES
        .iter()
        .find(|rule| (rule.applies)(raw, finished))
        .map_or("active", |rule| rule.name)
}

/// Normalize with daemon errors taking precedence over the status table.
///
/// Tracker problems surface as [`QueueItemStatus::Warning`]; local failures
/// (disk, permissions) as [`QueueItemStatus::Failed`].
#[must_use]
pub fn normalize_with_fault(
    raw: RawTorrentStatus,
    finished: bool,
    fault: Option<&TorrentFault>,
) -> QueueItemStatus {
    match fault.map(|fault| fault.kind) {
        Some(TorrentErrorKind::LocalError) => QueueItemStatus::Failed,
        Some(TorrentErrorKind::TrackerWarning | TorrentErrorKind::TrackerError) => {
            QueueItemStatus::Warning
        }
        None => normalize(raw, finished),
    }
}
