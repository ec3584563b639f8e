//! `mtproxy post-empty <url>` – empty-body POST without authorization.

use super::output::write_response;
use anyhow::{Context, Result};
use mtproxy_core::client::ProxyClient;
use std::path::Path;

pub fn run_post_empty(client: &ProxyClient, url: &str, out: Option<&Path>) -> Result<()> {
    let response = client
        .post_empty(url)
        .with_context(|| format!("empty POST to {} failed", client.endpoint()))?;
    write_response(&response, out)
}
