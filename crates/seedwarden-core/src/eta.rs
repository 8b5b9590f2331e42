//! Interpretation of the daemon's estimated-time-remaining field.
//!
//! Daemons report the ETA as a signed 64-bit value whose unit is not fixed:
//! most emit seconds, some builds emit milliseconds. Values larger than a
//! 32-bit seconds counter can hold are taken as milliseconds. This is a
//! heuristic, not a protocol guarantee.

use std::time::Duration;

/// Largest value still read as seconds.
pub const MAX_PLAUSIBLE_SECONDS: i64 = 4_294_967_295;

/// Parse a raw ETA into a remaining-time duration.
///
/// Negative values are sentinels ("unknown", "fetching metadata") and yield
/// `None`.
#[must_use]
pub fn parse_eta(raw: i64) -> Option<Duration> {
    let value = u64::try_from(raw).ok()?;
    if raw > MAX_PLAUSIBLE_SECONDS {
        Some(Duration::from_millis(value))
    } else {
        Some(Duration::from_secs(value))
    }
}
