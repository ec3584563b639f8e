//! License proxy client.
//!
//! Forwards an opaque license request payload to the configured proxy endpoint
//! with a bearer token and hands back the raw `(status, body)` pair. Each call
//! opens its own connection and releases it before returning, so one client can
//! be shared across threads.

mod read;

pub use read::{read_fully, READ_CHUNK};

use crate::transport::{
    Connection, ConnectionGuard, CurlTransport, RequestSpec, Transport, DEFAULT_CONNECT_TIMEOUT,
};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::time::Duration;

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// Status code and raw body of one exchange. The body comes from the normal
/// response stream or, when that is unreadable, from the error stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Posts license requests to a fixed endpoint.
pub struct ProxyClient<T = CurlTransport> {
    endpoint: String,
    auth_token: String,
    connect_timeout: Duration,
    transport: T,
}

impl ProxyClient<CurlTransport> {
    /// Client over libcurl with the default 10 s connect timeout.
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self::with_transport(endpoint, auth_token, CurlTransport::new())
    }
}

impl<T: Transport> ProxyClient<T> {
    pub fn with_transport(
        endpoint: impl Into<String>,
        auth_token: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            transport,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Posts `payload` to the endpoint with `Authorization: bearer <token>`.
    ///
    /// Non-2xx statuses are not errors: the status is returned together with
    /// the error body. Connection failures and a response that cannot be read
    /// at all surface as `io::Error`.
    pub fn post_with_payload(&self, payload: &[u8]) -> io::Result<ProxyResponse> {
        tracing::debug!(
            endpoint = %self.endpoint,
            payload_len = payload.len(),
            "posting license request"
        );
        let spec = RequestSpec::post(self.connect_timeout).with_headers(self.auth_headers());
        let mut conn = ConnectionGuard::new(self.transport.open(&self.endpoint, &spec)?);
        conn.write_body(payload)?;
        let response = read::read_response(&mut *conn)?;
        tracing::debug!(
            status = response.status,
            body_len = response.body.len(),
            "license proxy answered"
        );
        Ok(response)
    }

    /// Posts an empty body without the authorization header.
    ///
    /// The request always goes to the client's configured endpoint; `url` is
    /// accepted for call-site compatibility but not used as the target.
    pub fn post_empty(&self, url: &str) -> io::Result<ProxyResponse> {
        if url != self.endpoint {
            tracing::warn!(
                requested = %url,
                endpoint = %self.endpoint,
                "empty POST targets the configured endpoint, not the requested url"
            );
        }
        tracing::debug!(endpoint = %self.endpoint, "posting empty request");
        let spec = RequestSpec::post(self.connect_timeout);
        let mut conn = ConnectionGuard::new(self.transport.open(&self.endpoint, &spec)?);
        let response = read::read_response(&mut *conn)?;
        tracing::debug!(
            status = response.status,
            body_len = response.body.len(),
            "empty POST answered"
        );
        Ok(response)
    }

    fn auth_headers(&self) -> HashMap<String, String> {
        HashMap::from([(
            AUTHORIZATION.to_string(),
            format!("bearer {}", self.auth_token),
        )])
    }
}

impl<T> fmt::Debug for ProxyClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClient")
            .field("endpoint", &self.endpoint)
            .field("auth_token", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
