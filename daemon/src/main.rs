use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod daemon;
mod lock;
mod logging;

use config::DaemonConfig;
use daemon::SyncDaemon;
use lock::InstanceLock;

#[derive(Parser)]
#[command(name = "tether-daemon")]
#[command(about = "Continuous bidirectional git-backed directory sync daemon")]
#[command(version)]
struct Cli {
    /// Path to the data directory
    path: Option<PathBuf>,

    /// Host or address of the backup server
    server: Option<String>,

    /// Configuration file (TOML); command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Suppress logging to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Lock file preventing concurrent instances
    #[arg(long)]
    lock_file: Option<PathBuf>,

    /// Seconds between remote polls when no notification arrives
    #[arg(long)]
    poll_interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(cli).await?;
    config.validate()?;

    // refuse to start a second instance before touching the repository
    let _lock = InstanceLock::acquire(&config.lock_file)?;
    let _log_guard = logging::init(&config)?;

    info!(
        path = %config.path.display(),
        server = %config.server,
        "starting tether daemon"
    );

    let daemon = SyncDaemon::new(&config)?;
    if let Err(err) = daemon.run().await {
        // steady-state errors stay in the log; whatever ends the daemon
        // is also reported on stderr by the error return
        error!(error = %err, "daemon stopped");
        return Err(err);
    }

    Ok(())
}

/// Merge the optional configuration file with command-line arguments;
/// arguments win.
async fn resolve_config(cli: Cli) -> Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::load(path).await?,
        None => {
            let path = cli
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("a data directory path is required"))?;
            let server = cli
                .server
                .clone()
                .ok_or_else(|| anyhow::anyhow!("a server address is required"))?;
            DaemonConfig::new(path, server)
        }
    };

    if let Some(path) = cli.path {
        config.path = path;
    }
    if let Some(server) = cli.server {
        config.server = server;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if cli.quiet {
        config.quiet = true;
    }
    if let Some(lock_file) = cli.lock_file {
        config.lock_file = lock_file;
    }
    if let Some(secs) = cli.poll_interval_secs {
        config.poll_interval = Duration::from_secs(secs);
    }

    Ok(config)
}
