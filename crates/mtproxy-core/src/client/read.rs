//! Response reading: success stream first, error stream as fallback.

use super::ProxyResponse;
use crate::transport::Connection;
use std::io::{self, Read};

/// Chunk size used when draining a response stream.
pub const READ_CHUNK: usize = 1024;

/// Reads `reader` to end-of-stream in `READ_CHUNK`-sized reads.
pub fn read_fully(reader: &mut dyn Read) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// Obtains the status code, then the body from the input stream or, if that
/// cannot be read, from the error stream.
pub(super) fn read_response<C: Connection + ?Sized>(conn: &mut C) -> io::Result<ProxyResponse> {
    let status = conn.response_code()?;

    let from_input = conn.input_stream().and_then(|mut r| read_fully(&mut *r));
    let body = match from_input {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(status, error = %e, "input stream unreadable, reading error stream");
            let mut err_stream = conn.error_stream()?;
            read_fully(&mut *err_stream)?
        }
    };

    Ok(ProxyResponse { status, body })
}
