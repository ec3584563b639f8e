//! CLI for the mtproxy license request client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mtproxy_core::config::{self, MtproxyConfig};
use std::path::PathBuf;

use commands::{run_completions, run_post, run_post_empty, run_show_config};

/// Top-level CLI for mtproxy.
#[derive(Debug, Parser)]
#[command(name = "mtproxy")]
#[command(about = "mtproxy: forward DRM license requests to a license proxy", long_about = None)]
pub struct Cli {
    /// License proxy URL (overrides `endpoint` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bearer token (overrides `auth_token` in config.toml).
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Read configuration from this file instead of the XDG config path.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Post a license request payload with the bearer token.
    Post {
        /// File holding the raw payload; `-` reads stdin.
        #[arg(long, default_value = "-", value_name = "FILE")]
        payload: String,
        /// Write the response body here instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Post an empty body (no authorization header).
    PostEmpty {
        /// Request URL. The configured endpoint is what actually gets contacted.
        url: String,
        /// Write the response body here instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Show the config file path and effective settings.
    Config,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let Cli {
            endpoint,
            token,
            config,
            command,
        } = Cli::parse();
        let overrides = Overrides {
            config,
            endpoint,
            token,
        };

        match command {
            CliCommand::Post { payload, out } => {
                let (cfg, _) = overrides.load()?;
                run_post(&cfg.client()?, &payload, out.as_deref())?;
            }
            CliCommand::PostEmpty { url, out } => {
                let (cfg, _) = overrides.load()?;
                run_post_empty(&cfg.client()?, &url, out.as_deref())?;
            }
            CliCommand::Config => {
                let (cfg, path) = overrides.load()?;
                run_show_config(&path, &cfg);
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

/// Global flags that shape the effective configuration.
struct Overrides {
    config: Option<PathBuf>,
    endpoint: Option<String>,
    token: Option<String>,
}

impl Overrides {
    /// Loads the config file (explicit or XDG default) and applies flag overrides.
    fn load(self) -> Result<(MtproxyConfig, PathBuf)> {
        let (cfg, path) = match self.config {
            Some(path) => (config::load_from(&path)?, path),
            None => (config::load_or_init()?, config::config_path()?),
        };
        let cfg = cfg.with_overrides(self.endpoint, self.token);
        tracing::debug!(
            endpoint = ?cfg.endpoint,
            connect_timeout_ms = cfg.connect_timeout_ms,
            "loaded config from {}",
            path.display()
        );
        Ok((cfg, path))
    }
}

#[cfg(test)]
mod tests;
