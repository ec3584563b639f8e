//! `mtproxy config` – show where the config lives and what is in effect.

use mtproxy_core::config::MtproxyConfig;
use std::path::Path;

pub fn run_show_config(path: &Path, cfg: &MtproxyConfig) {
    println!("config file: {}", path.display());
    println!("endpoint:    {}", cfg.endpoint.as_deref().unwrap_or("<unset>"));
    println!(
        "auth_token:  {}",
        cfg.auth_token.as_deref().map(mask_token).unwrap_or_else(|| "<unset>".into())
    );
    println!("connect_timeout_ms: {}", cfg.connect_timeout_ms);
}

/// Keeps the last four characters of a token visible.
pub(super) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
