mod file_config;

pub use file_config::{AttentionConfig, FileConfig};

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::notifications::DEFAULT_ATTENTION_DURATION;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub stream_url: Option<String>,
    pub reconnect_delay_secs: u64,
    pub attention_duration_ms: Option<u64>,
    pub prefers_dark: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite store location; `None` keeps state in memory only.
    pub db_path: Option<PathBuf>,
    pub stream_url: Option<String>,
    pub reconnect_delay: Duration,
    pub attention_duration: Duration,
    /// Initial ambient color-scheme signal.
    pub prefers_dark: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone());
        if let Some(parent) = db_path.as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Store directory does not exist: {:?}", parent);
            }
        }

        let stream_url = file.stream_url.or_else(|| cli.stream_url.clone());
        if let Some(url) = &stream_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("stream_url must be an http(s) URL, got {}", url);
            }
        }

        let reconnect_delay_secs = file
            .reconnect_delay_secs
            .unwrap_or(cli.reconnect_delay_secs);
        if reconnect_delay_secs == 0 {
            bail!("reconnect_delay_secs must be greater than 0");
        }

        let attention_duration = file
            .attention
            .and_then(|a| a.duration_ms)
            .or(cli.attention_duration_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_ATTENTION_DURATION);

        let prefers_dark = file.prefers_dark.unwrap_or(cli.prefers_dark);

        Ok(Self {
            db_path,
            stream_url,
            reconnect_delay: Duration::from_secs(reconnect_delay_secs),
            attention_duration,
            prefers_dark,
        })
    }
}
