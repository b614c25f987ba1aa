//! Daemon configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Local data directory to keep in sync
    pub path: PathBuf,
    /// Host or address of the backup server
    pub server: String,
    /// Minimum delay between remote polls when no notification arrives
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Suppress logging to stderr (the log file still receives
    /// everything)
    #[serde(default)]
    pub quiet: bool,
    /// Lock file preventing concurrent instances
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,
}

impl DaemonConfig {
    pub fn new(path: PathBuf, server: String) -> Self {
        Self {
            path,
            server,
            poll_interval: default_poll_interval(),
            log_file: default_log_file(),
            log_level: default_log_level(),
            quiet: false,
            lock_file: default_lock_file(),
        }
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading configuration file {}", path.display()))?;
        let config: DaemonConfig = toml::from_str(&content)
            .with_context(|| format!("parsing configuration file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            anyhow::bail!("server address cannot be empty");
        }
        if self.path.file_name().is_none() {
            anyhow::bail!(
                "cannot derive a repository name from path: {}",
                self.path.display()
            );
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll interval must be positive");
        }
        let level = self.log_level.to_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            anyhow::bail!("unknown log level: {}", self.log_level);
        }
        Ok(())
    }
}

// Default value functions
fn default_poll_interval() -> Duration {
    tether_sync::DEFAULT_POLL_INTERVAL
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tether-daemon.log")
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_lock_file() -> PathBuf {
    std::env::temp_dir().join("tether-daemon.lock")
}
