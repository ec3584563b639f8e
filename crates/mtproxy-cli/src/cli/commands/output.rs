//! Shared response output: body to a file or stdout, status line to stderr.

use anyhow::{Context, Result};
use mtproxy_core::client::ProxyResponse;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes the body (even for error statuses, so the server's detail is kept),
/// then fails if the status is not 2xx so the process exits non-zero.
pub fn write_response(response: &ProxyResponse, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => fs::write(path, &response.body)
            .with_context(|| format!("write response body to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.body).context("write response body to stdout")?;
            stdout.flush()?;
        }
    }
    eprintln!("HTTP {} ({} bytes)", response.status, response.body.len());
    if !response.is_success() {
        anyhow::bail!("license proxy answered HTTP {}", response.status);
    }
    Ok(())
}
