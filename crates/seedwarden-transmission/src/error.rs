//! # Design
//!
//! - Adapter-local failures with constant messages; context lives in fields.
//! - Every adapter failure reaches callers as `QueueError::ClientUnavailable`.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use seedwarden_core::QueueError;

#[derive(Debug)]
/// Failures raised while talking to a Transmission daemon.
pub enum TransmissionError {
    /// Configured host, port and URL base did not form a valid endpoint.
    InvalidEndpoint {
        /// Endpoint string that failed to parse.
        endpoint: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The request could not be delivered or the response body read.
    Transport {
        /// RPC method being invoked.
        method: &'static str,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The daemon rejected the configured credentials.
    Unauthorized {
        /// RPC method being invoked.
        method: &'static str,
    },
    /// The daemon kept demanding a new session identifier.
    SessionHandshake {
        /// RPC method being invoked.
        method: &'static str,
    },
    /// The daemon answered with an unexpected HTTP status.
    HttpStatus {
        /// RPC method being invoked.
        method: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not the expected JSON shape.
    Decode {
        /// RPC method being invoked.
        method: &'static str,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The daemon reported a non-success RPC result.
    RpcFailure {
        /// RPC method being invoked.
        method: &'static str,
        /// Result string returned by the daemon.
        result: String,
    },
    /// A response omitted a field the adapter relies on.
    MissingField {
        /// RPC method being invoked.
        method: &'static str,
        /// Field name that was missing.
        field: &'static str,
    },
}

impl Display for TransmissionError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint { endpoint, .. } => {
                let _ = endpoint;
                formatter.write_str("invalid transmission rpc endpoint")
            }
            Self::ClientBuild { .. } => formatter.write_str("failed to build http client"),
            Self::Transport { method, .. } => {
                let _ = method;
                formatter.write_str("transmission rpc transport failure")
            }
            Self::Unauthorized { method } => {
                let _ = method;
                formatter.write_str("transmission rejected credentials")
            }
            Self::SessionHandshake { method } => {
                let _ = method;
                formatter.write_str("transmission session handshake failed")
            }
            Self::HttpStatus { method, status } => {
                let _ = (method, status);
                formatter.write_str("unexpected transmission http status")
            }
            Self::Decode { method, .. } => {
                let _ = method;
                formatter.write_str("failed to decode transmission response")
            }
            Self::RpcFailure { method, result } => {
                let _ = (method, result);
                formatter.write_str("transmission rpc call failed")
            }
            Self::MissingField { method, field } => {
                let _ = (method, field);
                formatter.write_str("transmission response missing field")
            }
        }
    }
}

impl Error for TransmissionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEndpoint { source, .. } => Some(source),
            Self::ClientBuild { source } | Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Wrap an adapter failure as a queue-level client outage.
#[must_use]
pub fn unavailable(operation: &'static str, source: TransmissionError) -> QueueError {
    QueueError::client_unavailable(operation, source)
}
