//! Error types surfaced by queue operations.

use std::error::Error;

use thiserror::Error;

/// Primary error type for download-client queue operations.
///
/// Only proxy-boundary failures and explicit user actions produce these;
/// normalization, policy evaluation and scope filtering never fail.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Submission carried no extractable identifier.
    #[error("release url has no usable info hash")]
    InvalidReleaseUrl {
        /// URL supplied by the caller.
        url: String,
    },
    /// The download client could not service the request.
    #[error("download client unavailable")]
    ClientUnavailable {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure (network, authentication, protocol).
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The daemon advertised a version below the supported minimum.
    #[error("download client version is not supported")]
    IncompatibleClientVersion {
        /// Version string reported by the daemon.
        version: String,
        /// Minimum supported version.
        minimum: String,
    },
    /// The daemon advertised a version string without a leading number.
    #[error("download client version could not be parsed")]
    UnparsableClientVersion {
        /// Version string reported by the daemon.
        version: String,
    },
}

impl QueueError {
    /// Wrap a proxy failure with the operation that triggered it.
    pub fn client_unavailable(
        operation: &'static str,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::ClientUnavailable {
            operation,
            source: Box::new(source),
        }
    }
}

/// Convenience alias for queue operation results.
pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn messages_are_constant_and_sources_preserved() {
        let err = QueueError::client_unavailable("list_torrents", io::Error::other("refused"));
        assert_eq!(err.to_string(), "download client unavailable");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("refused"));

        let invalid = QueueError::InvalidReleaseUrl {
            url: "magnet:?dn=nothing".to_string(),
        };
        assert_eq!(invalid.to_string(), "release url has no usable info hash");
        assert!(invalid.source().is_none());
    }

    #[test]
    fn client_unavailable_records_operation() {
        match QueueError::client_unavailable("add_torrent", io::Error::other("timeout")) {
            QueueError::ClientUnavailable { operation, .. } => assert_eq!(operation, "add_torrent"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
