//! Daemon version parsing and minimum-version gate.

use std::fmt::{self, Display, Formatter};

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::{QueueError, QueueResult};

static LEADING_VERSION: OnceCell<Regex> = OnceCell::new();

/// Numeric daemon version (`major.minor.patch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component; zero when absent.
    pub patch: u32,
}

impl ClientVersion {
    #[must_use]
    /// Construct a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the leading numeric component of a daemon version string.
    ///
    /// Trailing annotations such as `+`, build hashes or parenthesised notes
    /// are ignored: `"2.84+ (14307)"` parses as `2.84`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::UnparsableClientVersion`] when the string does not
    /// start with a number.
    pub fn parse(raw: &str) -> QueueResult<Self> {
        let unparsable = || QueueError::UnparsableClientVersion {
            version: raw.to_string(),
        };
        let pattern = LEADING_VERSION
            .get_or_try_init(|| Regex::new(r"^\s*(\d+)(?:\.(\d+))?(?:\.(\d+))?"))
            .map_err(|_| unparsable())?;
        let captures = pattern.captures(raw).ok_or_else(unparsable)?;
        let component = |index: usize| -> QueueResult<u32> {
            captures
                .get(index)
                .map_or(Ok(0), |value| value.as_str().parse().map_err(|_| unparsable()))
        };
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl Display for ClientVersion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Validate a daemon version string against `minimum`.
///
/// # Errors
///
/// Returns [`QueueError::UnparsableClientVersion`] for strings without a
/// leading number and [`QueueError::IncompatibleClientVersion`] when the
/// version is older than `minimum`.
pub fn ensure_supported(raw: &str, minimum: ClientVersion) -> QueueResult<ClientVersion> {
    let version = ClientVersion::parse(raw)?;
    if version < minimum {
        return Err(QueueError::IncompatibleClientVersion {
            version: raw.to_string(),
            minimum: minimum.to_string(),
        });
    }
    Ok(version)
}
