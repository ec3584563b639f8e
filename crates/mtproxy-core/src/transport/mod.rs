//! Connection seam between `ProxyClient` and the HTTP stack.
//!
//! A `Transport` opens one `Connection` per request. The connection exposes the
//! request body sink and the two response streams (normal body and error body)
//! so the client can fall back from one to the other. `CurlTransport` is the
//! libcurl-backed implementation used outside of tests.

mod easy;
mod guard;

pub use easy::{CurlConnection, CurlTransport};
pub use guard::ConnectionGuard;

use std::collections::HashMap;
use std::io::{self, Read};
use std::time::Duration;

/// Connect timeout applied to every request unless configured otherwise.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings for one POST, fixed before any bytes move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub connect_timeout: Duration,
    /// Extra request headers (name -> value). Must not contain CR or LF.
    pub headers: HashMap<String, String>,
}

impl RequestSpec {
    /// POST with no extra headers.
    pub fn post(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            headers: HashMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// A single POST request/response exchange.
///
/// The request is sent lazily: body writes are buffered until the status code
/// or one of the response streams is first asked for.
pub trait Connection {
    /// Appends `body` to the request body. Fails once the request has been sent.
    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;

    /// Sends the request if needed and returns the HTTP status code.
    fn response_code(&mut self) -> io::Result<u32>;

    /// Normal response body. Fails when the server answered with an error status.
    fn input_stream(&mut self) -> io::Result<Box<dyn Read + '_>>;

    /// Error response body. Fails when there is no error body to read.
    fn error_stream(&mut self) -> io::Result<Box<dyn Read + '_>>;

    /// Releases the underlying handle. Calling it more than once is harmless.
    fn disconnect(&mut self);
}

/// Opens connections to an endpoint.
pub trait Transport {
    type Conn: Connection;

    fn open(&self, endpoint: &str, request: &RequestSpec) -> io::Result<Self::Conn>;
}
