//! `mtproxy post` – forward a license request payload.

use super::output::write_response;
use anyhow::{Context, Result};
use mtproxy_core::client::ProxyClient;
use std::io::{self, Read};
use std::path::Path;

/// Reads the payload from `source` (`-` for stdin) and posts it with the bearer token.
pub fn run_post(client: &ProxyClient, source: &str, out: Option<&Path>) -> Result<()> {
    let payload = read_payload(source)?;
    tracing::info!(
        "posting {} byte license request to {}",
        payload.len(),
        client.endpoint()
    );
    let response = client
        .post_with_payload(&payload)
        .with_context(|| format!("license request to {} failed", client.endpoint()))?;
    write_response(&response, out)
}

pub(super) fn read_payload(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read(source).with_context(|| format!("read payload from {}", source))
}
