//! Tracing setup for the CLI: an append-only log file in the XDG state dir,
//! with stderr as the fallback sink.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Directives used when `MTPROXY_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,mtproxy=debug,mtproxy_core=debug";
const LOG_ENV: &str = "MTPROXY_LOG";
const LOG_FILE_NAME: &str = "mtproxy.log";

fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn filter() -> EnvFilter {
    build_filter(std::env::var(LOG_ENV).ok().as_deref())
}

/// `~/.local/state/mtproxy/mtproxy.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("mtproxy")?;
    dirs.place_state_file(LOG_FILE_NAME)
        .context("cannot create mtproxy state directory")
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Sends all events to `path` (appending). Fails if the file cannot be
/// opened or a global subscriber is already set.
pub fn init_logging_to(path: &Path) -> Result<()> {
    let file = open_log_file(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    tracing::debug!(path = %path.display(), "file logging enabled");
    Ok(())
}

/// File logging at [`log_file_path`]. On `Err` the caller should use
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    init_logging_to(&log_file_path()?)
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
