//! Uniform resilience wrapper around the perpetual sync loops

use std::future::Future;
use std::time::Duration;

use tracing::{error, info};

use crate::error::{Result, SyncError};

/// Run `op` forever, isolating its failures from the rest of the daemon.
///
/// - `Interrupted` propagates immediately; it is the only way out.
/// - Any other error is logged with full context and followed by
///   `failure_delay` before the next attempt, so one failed network call
///   never takes the loop down.
/// - A successful iteration is followed by `success_delay`.
///
/// Returns the fatal error that ended the loop.
pub async fn keep_running<F, Fut>(
    task: &str,
    mut op: F,
    success_delay: Duration,
    failure_delay: Duration,
) -> SyncError
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
{
    loop {
        match op().await {
            Ok(()) => tokio::time::sleep(success_delay).await,
            Err(SyncError::Interrupted) => {
                info!(task, "interrupted, stopping loop");
                return SyncError::Interrupted;
            }
            Err(err) => {
                error!(task, error = %err, "sync loop iteration failed, retrying");
                tokio::time::sleep(failure_delay).await;
            }
        }
    }
}
