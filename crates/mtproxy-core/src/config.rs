use crate::client::ProxyClient;
use crate::transport::DEFAULT_CONNECT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from loading configuration or building a client from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("cannot locate XDG directories: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("no {0} configured; set it in config.toml or pass it on the command line")]
    Missing(&'static str),
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
}

/// Client configuration loaded from `~/.config/mtproxy/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtproxyConfig {
    /// License proxy URL every request is posted to.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token sent with license requests.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for MtproxyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            auth_token: None,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl MtproxyConfig {
    /// Replaces file values with the ones given (e.g. from CLI flags).
    pub fn with_overrides(mut self, endpoint: Option<String>, auth_token: Option<String>) -> Self {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        if auth_token.is_some() {
            self.auth_token = auth_token;
        }
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Builds a libcurl-backed client. Endpoint and token must both be set.
    pub fn client(&self) -> Result<ProxyClient, ConfigError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("endpoint"))?;
        let token = self
            .auth_token
            .as_deref()
            .ok_or(ConfigError::Missing("auth_token"))?;
        Ok(ProxyClient::new(endpoint, token).with_connect_timeout(self.connect_timeout()))
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mtproxy")?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|source| ConfigError::Io {
            path: xdg_dirs.get_config_home(),
            source,
        })
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MtproxyConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MtproxyConfig::default();
        write_to(&path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<MtproxyConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_to(path: &Path, cfg: &MtproxyConfig) -> Result<(), ConfigError> {
    let toml = toml::to_string_pretty(cfg)?;
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, toml).map_err(io_err)
}
