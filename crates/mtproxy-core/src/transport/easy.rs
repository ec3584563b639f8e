//! libcurl-backed transport: one `Easy` handle per request.
//!
//! The request body is buffered and handed to libcurl when the exchange is
//! performed. The whole response body is collected in memory; it is served as
//! the input stream for statuses below 400 and as the error stream otherwise.

use super::{Connection, RequestSpec, Transport};
use curl::easy::{Easy, List};
use std::io::{self, Cursor, Read};

/// First status code treated as an error response.
const ERROR_STATUS_MIN: u32 = 400;

/// Opens a fresh libcurl handle for every request. No pooling, no redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl CurlTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for CurlTransport {
    type Conn = CurlConnection;

    fn open(&self, endpoint: &str, request: &RequestSpec) -> io::Result<CurlConnection> {
        let parsed = url::Url::parse(endpoint).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid endpoint {endpoint:?}: {e}"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported scheme {:?} in {endpoint}", parsed.scheme()),
            ));
        }

        let mut list = List::new();
        for (name, value) in &request.headers {
            list.append(&header_line(name, value)?)?;
        }
        // Suppress `Expect: 100-continue` so larger payloads go out in one round trip.
        list.append("Expect:")?;

        let mut easy = Easy::new();
        easy.url(parsed.as_str())?;
        easy.post(true)?;
        easy.connect_timeout(request.connect_timeout)?;
        easy.http_headers(list)?;

        tracing::trace!(endpoint = %parsed, "opened curl handle");

        Ok(CurlConnection {
            easy: Some(easy),
            body: Vec::new(),
            exchange: None,
        })
    }
}

/// Formats `name: value`. The value is sent as given; only the name is trimmed.
/// Neither part may contain CR or LF.
fn header_line(name: &str, value: &str) -> io::Result<String> {
    let name = name.trim();
    if name.is_empty() || name.contains(':') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid header name {name:?}"),
        ));
    }
    if [name, value]
        .iter()
        .any(|s| s.contains(|c: char| c == '\r' || c == '\n'))
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("header {name} contains a line break"),
        ));
    }
    Ok(format!("{name}: {value}"))
}

/// Status and body of a completed exchange.
#[derive(Debug)]
struct Exchange {
    status: u32,
    body: Vec<u8>,
}

impl Exchange {
    fn is_error(&self) -> bool {
        self.status >= ERROR_STATUS_MIN
    }
}

/// One request over a libcurl `Easy` handle.
pub struct CurlConnection {
    /// `None` once disconnected.
    easy: Option<Easy>,
    body: Vec<u8>,
    exchange: Option<Exchange>,
}

impl CurlConnection {
    fn perform(&mut self) -> io::Result<Exchange> {
        let easy = self
            .easy
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))?;
        easy.post_fields_copy(&self.body)?;

        let mut received = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                received.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::trace!(status, bytes = received.len(), "curl exchange finished");
        Ok(Exchange {
            status,
            body: received,
        })
    }

    /// Performs the exchange on first use and returns it.
    fn exchange(&mut self) -> io::Result<&Exchange> {
        let exchange = match self.exchange.take() {
            Some(ex) => ex,
            None => self.perform()?,
        };
        Ok(&*self.exchange.insert(exchange))
    }
}

impl Connection for CurlConnection {
    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        if self.exchange.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "cannot write request body after the response was read",
            ));
        }
        self.body.extend_from_slice(body);
        Ok(())
    }

    fn response_code(&mut self) -> io::Result<u32> {
        Ok(self.exchange()?.status)
    }

    fn input_stream(&mut self) -> io::Result<Box<dyn Read + '_>> {
        let exchange = self.exchange()?;
        if exchange.is_error() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("server returned HTTP {}", exchange.status),
            ));
        }
        Ok(Box::new(Cursor::new(exchange.body.as_slice())))
    }

    fn error_stream(&mut self) -> io::Result<Box<dyn Read + '_>> {
        let exchange = self.exchange()?;
        if !exchange.is_error() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no error body for HTTP {}", exchange.status),
            ));
        }
        Ok(Box::new(Cursor::new(exchange.body.as_slice())))
    }

    fn disconnect(&mut self) {
        if self.easy.take().is_some() {
            tracing::trace!("curl handle released");
        }
    }
}
