//! Pure reconciliation of one raw record into a canonical item.
//!
//! # Design
//! - Each record is reconciled independently; nothing here performs IO.
//! - Skips are reported as values so the caller decides how to count them.

use seedwarden_core::eta::parse_eta;
use seedwarden_core::magnet::normalize_hash;
use seedwarden_core::scope::{in_scope, output_path};
use seedwarden_core::seeding::{SeedingDecision, evaluate};
use seedwarden_core::status::normalize_with_fault;
use seedwarden_core::{
    CanonicalQueueItem, QueueItemStatus, RawTorrentRecord, ScopeConfig, SeedingLimits,
};
use seedwarden_telemetry::SkipReason;

/// Outcome of reconciling one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// Record maps to a reported item.
    Item(CanonicalQueueItem),
    /// Record is left out of the snapshot.
    Skipped(SkipReason),
}

/// Reconcile `record` against `scope` using `global` as the seeding fallback.
#[must_use]
pub fn reconcile(
    record: &RawTorrentRecord,
    scope: &ScopeConfig,
    global: &SeedingLimits,
) -> Reconciled {
    if record.is_metadata_pending() {
        return Reconciled::Skipped(SkipReason::MetadataPending);
    }

    let status = status_of(record);
    let decision = if status == QueueItemStatus::Completed {
        evaluate(record, global)
    } else {
        SeedingDecision::KEEP
    };

    if !in_scope(&record.download_dir, scope) {
        return Reconciled::Skipped(SkipReason::OutOfScope);
    }

    Reconciled::Item(CanonicalQueueItem {
        download_id: normalize_hash(&record.hash),
        title: record.name.clone(),
        category: scope.category().map(str::to_string),
        status,
        message: record
            .error
            .as_ref()
            .map(|fault| fault.message.clone())
            .filter(|message| !message.is_empty()),
        output_path: output_path(&record.download_dir, &record.name),
        total_size: record.total_size,
        remaining_size: record.left_until_done,
        remaining_time: parse_eta(record.eta),
        seed_ratio: record.ratio,
        can_be_removed: decision.can_be_removed,
        can_move_files: decision.can_move_files,
    })
}

/// Whether any record in `records` will need the seeding policy evaluated.
#[must_use]
pub fn requires_seeding_limits(records: &[RawTorrentRecord]) -> bool {
    records.iter().any(|record| {
        !record.is_metadata_pending() && status_of(record) == QueueItemStatus::Completed
    })
}

fn status_of(record: &RawTorrentRecord) -> QueueItemStatus {
    normalize_with_fault(record.status, record.finished, record.error.as_ref())
}
