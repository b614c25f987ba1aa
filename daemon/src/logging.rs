//! Logging bootstrap: stderr plus a rolling file
//!
//! The daemon is unattended, so the rolling file is the durable record;
//! stderr is a convenience that `--quiet` turns off.

use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DaemonConfig;

/// Install the global subscriber. The returned guard flushes the file
/// writer; it must live until process exit.
pub fn init(config: &DaemonConfig) -> Result<WorkerGuard> {
    // notify's debug output drowns everything else at low levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},notify=warn", config.log_level)));

    let log_dir = config.log_file.parent().filter(|p| !p.as_os_str().is_empty());
    let log_name = config
        .log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("tether-daemon.log"));
    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
    }

    let file_appender = rolling::daily(log_dir.unwrap_or_else(|| Path::new(".")), log_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);

    let stderr_layer = (!config.quiet).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(guard)
}
