//! Seeding policy evaluation for completed downloads.
//!
//! # Design
//! - Limits are resolved per dimension first (`resolve_*`), recording whether
//!   the effective value came from a per-item override or the global policy.
//! - [`decide`] is a pure function of the resolved limits and live measurements.
//! - Malformed limits (negative, non-finite) resolve to unset; nothing here fails.

use std::time::Duration;

use crate::model::{LimitMode, RawTorrentRecord, SeedingLimits};

/// Where an effective limit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSource {
    /// Process-wide (or daemon session) policy.
    Global,
    /// Per-item directive set on the torrent itself.
    Override,
}

/// Limit value together with its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveLimit<T> {
    /// Threshold value.
    pub value: T,
    /// Layer that supplied the value.
    pub source: LimitSource,
}

/// Limits in force for a single item after precedence resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveLimits {
    /// Effective ratio limit, if any.
    pub ratio: Option<EffectiveLimit<f64>>,
    /// Effective idle limit, if any.
    pub idle: Option<EffectiveLimit<Duration>>,
}

/// Live measurements that feed the decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedingActivity {
    /// Paused/stopped at the daemon.
    pub paused: bool,
    /// Actively seeding (not paused, not waiting for a slot).
    pub seeding: bool,
    /// Current share ratio.
    pub ratio: f64,
    /// Time spent seeding.
    pub seeding_time: Duration,
}

impl SeedingActivity {
    #[must_use]
    /// Capture the activity fields of a raw record.
    pub fn from_record(record: &RawTorrentRecord) -> Self {
        Self {
            paused: record.is_paused(),
            seeding: record.is_seeding(),
            ratio: record.ratio,
            seeding_time: record.seeding_time,
        }
    }
}

/// Outcome of the policy for one completed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedingDecision {
    /// Item may be purged from the daemon.
    pub can_be_removed: bool,
    /// Payload may be moved for import.
    pub can_move_files: bool,
}

impl SeedingDecision {
    /// Keep seeding; neither removable nor movable.
    pub const KEEP: Self = Self {
        can_be_removed: false,
        can_move_files: false,
    };
    /// Seeding done; removable and movable.
    pub const RECLAIM: Self = Self {
        can_be_removed: true,
        can_move_files: true,
    };
    /// Removable while the payload stays in place.
    pub const REMOVE_ONLY: Self = Self {
        can_be_removed: true,
        can_move_files: false,
    };
}

/// Resolve the effective ratio limit: override, else global, else unset.
#[must_use]
pub fn resolve_ratio_limit(
    item: LimitMode<f64>,
    global: Option<f64>,
) -> Option<EffectiveLimit<f64>> {
    let valid = |value: f64| value.is_finite() && value >= 0.0;
    match item {
        LimitMode::Override(value) => valid(value).then_some(EffectiveLimit {
            value,
            source: LimitSource::Override,
        }),
        LimitMode::Global => global
            .filter(|value| valid(*value))
            .map(|value| EffectiveLimit {
                value,
                source: LimitSource::Global,
            }),
        LimitMode::Unlimited => None,
    }
}

/// Resolve the effective idle limit: override, else global, else unset.
#[must_use]
pub fn resolve_idle_limit(
    item: LimitMode<Duration>,
    global: Option<Duration>,
) -> Option<EffectiveLimit<Duration>> {
    match item {
        LimitMode::Override(value) => Some(EffectiveLimit {
            value,
            source: LimitSource::Override,
        }),
        LimitMode::Global => global.map(|value| EffectiveLimit {
            value,
            source: LimitSource::Global,
        }),
        LimitMode::Unlimited => None,
    }
}

/// Resolve both dimensions for one record against the global limits.
#[must_use]
pub fn resolve_limits(record: &RawTorrentRecord, global: &SeedingLimits) -> EffectiveLimits {
    EffectiveLimits {
        ratio: resolve_ratio_limit(record.ratio_limit, global.ratio_limit),
        idle: resolve_idle_limit(record.idle_limit, global.idle_limit),
    }
}

/// Decide removability and move-eligibility from resolved limits.
///
/// - Paused with any dimension reached: removable and movable.
/// - Not paused: never movable. A per-item idle override reached while the
///   item is actively seeding makes it removable; a reached ratio or a
///   reached global idle limit does not.
#[must_use]
pub fn decide(limits: &EffectiveLimits, activity: &SeedingActivity) -> SeedingDecision {
    let ratio_reached = limits
        .ratio
        .is_some_and(|limit| activity.ratio >= limit.value);
    let idle_reached = limits
        .idle
        .is_some_and(|limit| activity.seeding_time >= limit.value);

    if activity.paused {
        return if ratio_reached || idle_reached {
            SeedingDecision::RECLAIM
        } else {
            SeedingDecision::KEEP
        };
    }

    let idle_override = limits
        .idle
        .is_some_and(|limit| limit.source == LimitSource::Override);
    if activity.seeding && idle_reached && idle_override {
        SeedingDecision::REMOVE_ONLY
    } else {
        SeedingDecision::KEEP
    }
}

/// Resolve and decide in one step for a completed record.
#[must_use]
pub fn evaluate(record: &RawTorrentRecord, global: &SeedingLimits) -> SeedingDecision {
    decide(
        &resolve_limits(record, global),
        &SeedingActivity::from_record(record),
    )
}
