//! JSON-RPC transport with the Transmission session-id handshake.
//!
//! # Design
//! - The daemon answers `409 Conflict` with a fresh `X-Transmission-Session-Id`
//!   whenever the cached id is missing or stale; the request is retried once.
//! - The session id is cached per client and shared across calls.
//! - No other retries happen here; callers decide how to react to failures.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::TransmissionError;
use crate::wire::{RpcRequest, RpcResponse};

/// Header carrying the CSRF session identifier.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";
/// Per-request timeout applied to every RPC call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUCCESS: &str = "success";

/// Connection parameters for one daemon.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or address.
    pub host: String,
    /// RPC port.
    pub port: u16,
    /// Connect over HTTPS.
    pub use_ssl: bool,
    /// Path prefix the `rpc` endpoint lives under.
    pub url_base: String,
    /// Basic-auth user.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

impl Endpoint {
    /// Build the full RPC URL: `{scheme}://{host}:{port}{url_base}rpc`.
    ///
    /// # Errors
    ///
    /// Returns [`TransmissionError::InvalidEndpoint`] when the parts do not form
    /// a valid URL.
    pub fn rpc_url(&self) -> Result<Url, TransmissionError> {
        let scheme = if self.use_ssl { "https" } else { "http" };
        let host = self.host.trim();
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        let base = self.url_base.trim().trim_matches('/');
        let path = if base.is_empty() {
            "/rpc".to_string()
        } else {
            format!("/{base}/rpc")
        };
        let endpoint = format!("{scheme}://{host}:{}{path}", self.port);
        Url::parse(&endpoint)
            .map_err(|source| TransmissionError::InvalidEndpoint { endpoint, source })
    }
}

/// Low-level RPC client for one daemon.
pub struct RpcClient {
    http: Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
    session_id: Mutex<Option<HeaderValue>>,
}

impl RpcClient {
    /// Construct a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(endpoint: &Endpoint) -> Result<Self, TransmissionError> {
        let url = endpoint.rpc_url()?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| TransmissionError::ClientBuild { source })?;
        Ok(Self {
            http,
            url,
            username: endpoint
                .username
                .clone()
                .filter(|user| !user.trim().is_empty()),
            password: endpoint.password.clone(),
            session_id: Mutex::new(None),
        })
    }

    /// Fully-qualified RPC URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Invoke `method` and decode its `arguments` object.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, authentication failures, a
    /// failed handshake, undecodable responses, or a non-success result.
    pub async fn call<T>(
        &self,
        method: &'static str,
        arguments: Value,
    ) -> Result<T, TransmissionError>
    where
        T: DeserializeOwned,
    {
        let request = RpcRequest { method, arguments };
        let mut response = self.send(method, &request).await?;

        if response.status() == StatusCode::CONFLICT {
            let fresh = response
                .headers()
                .get(SESSION_ID_HEADER)
                .cloned()
                .ok_or(TransmissionError::SessionHandshake { method })?;
            debug!(method, "transmission session id refreshed");
            *self.lock_session() = Some(fresh);
            response = self.send(method, &request).await?;
            if response.status() == StatusCode::CONFLICT {
                return Err(TransmissionError::SessionHandshake { method });
            }
        }

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(TransmissionError::Unauthorized { method });
            }
            status if !status.is_success() => {
                return Err(TransmissionError::HttpStatus {
                    method,
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TransmissionError::Transport { method, source })?;
        let decoded: RpcResponse<T> = serde_json::from_slice(&body)
            .map_err(|source| TransmissionError::Decode { method, source })?;
        if decoded.result != SUCCESS {
            return Err(TransmissionError::RpcFailure {
                method,
                result: decoded.result,
            });
        }
        decoded.arguments.ok_or(TransmissionError::MissingField {
            method,
            field: "arguments",
        })
    }

    async fn send(
        &self,
        method: &'static str,
        request: &RpcRequest<'_>,
    ) -> Result<reqwest::Response, TransmissionError> {
        let mut builder = self
            .http
            .post(self.url.clone())
            .json(request);
        let session_id = self.lock_session().clone();
        if let Some(session_id) = session_id {
            builder = builder.header(SESSION_ID_HEADER, session_id);
        }
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_deref());
        }
        trace!(method, url = %self.url, "sending transmission rpc request");
        builder
            .send()
            .await
            .map_err(|source| TransmissionError::Transport { method, source })
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<HeaderValue>> {
        match self.session_id.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(host: &str, url_base: &str, use_ssl: bool) -> Endpoint {
        Endpoint {
            host: host.to_string(),
            port: 9091,
            use_ssl,
            url_base: url_base.to_string(),
            username: None,
            password: None,
        }
    }

    #[test]
    fn rpc_url_joins_base_without_duplicate_slashes() -> Result<(), TransmissionError> {
        assert_eq!(
            endpoint("localhost", "/transmission/", false).rpc_url()?.as_str(),
            "http://localhost:9091/transmission/rpc"
        );
        assert_eq!(
            endpoint("nas.lan", "/custom", true).rpc_url()?.as_str(),
            "https://nas.lan:9091/custom/rpc"
        );
        assert_eq!(
            endpoint("10.0.0.5", "/", false).rpc_url()?.as_str(),
            "http://10.0.0.5:9091/rpc"
        );
        Ok(())
    }

    #[test]
    fn ipv6_hosts_are_bracketed() -> Result<(), TransmissionError> {
        assert_eq!(
            endpoint("::1", "/transmission/", false).rpc_url()?.as_str(),
            "http://[::1]:9091/transmission/rpc"
        );
        Ok(())
    }

    #[test]
    fn invalid_host_is_rejected() {
        let result = endpoint("bad host", "/transmission/", false).rpc_url();
        assert!(matches!(
            result,
            Err(TransmissionError::InvalidEndpoint { .. })
        ));
    }
}
