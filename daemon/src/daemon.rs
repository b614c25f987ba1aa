//! Daemon orchestration: preconditions, initial sync, and the three loops

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use tether_sync::{
    keep_running, preflight, tracker, CommandRunner, LocalWatcher, ProcessRunner, PullEngine,
    PushEngine, SyncError, SyncState, SyncTarget,
};

use crate::config::DaemonConfig;

/// Cycle delay of the pull and push loops; combined with the sticky
/// dirty flag this is all the debouncing the watcher needs.
const PULL_PUSH_CADENCE: Duration = Duration::from_millis(100);

/// Pause after a failed loop iteration before retrying.
const FAILURE_BACKOFF: Duration = Duration::from_secs(1);

pub struct SyncDaemon {
    target: Arc<SyncTarget>,
    state: Arc<SyncState>,
    runner: Arc<dyn CommandRunner>,
    poll_interval: Duration,
}

impl SyncDaemon {
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let target = SyncTarget::new(&config.path, config.server.clone())?;
        info!(
            path = %target.local_path().display(),
            remote = %target.remote_url(),
            "initializing sync daemon"
        );

        Ok(Self {
            target: Arc::new(target),
            state: Arc::new(SyncState::new()),
            runner: Arc::new(ProcessRunner::new()),
            poll_interval: config.poll_interval,
        })
    }

    /// Run until interrupted. Startup failures (missing binaries,
    /// unreachable server, failed initial sync) return immediately; once
    /// the loops are up, only an interruption ends them.
    pub async fn run(&self) -> Result<()> {
        preflight::check_local_binaries(preflight::LOCAL_BINARIES)?;
        preflight::check_remote_binaries(
            self.runner.as_ref(),
            &self.target,
            preflight::REMOTE_BINARIES,
        )
        .await?;
        preflight::ensure_remote_repo(self.runner.as_ref(), &self.target).await?;

        let pull = Arc::new(PullEngine::new(
            self.runner.clone(),
            self.target.clone(),
            self.state.clone(),
            self.poll_interval,
        ));
        let push = Arc::new(PushEngine::new(
            self.runner.clone(),
            self.target.clone(),
            self.state.clone(),
        ));

        // the local directory must reflect the remote before we start
        // watching it, or the clone itself would register as local edits
        pull.pull_changes().await?;

        let _watcher = LocalWatcher::start(self.target.local_path(), self.state.clone())?;

        let mut track_loop = self.spawn_track_loop();
        let mut pull_loop = Self::spawn_pull_loop(pull);
        let mut push_loop = Self::spawn_push_loop(push);

        info!("sync loops started");

        // the loops never finish on their own; whichever branch wins,
        // the daemon is done for
        let fatal = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt signal received, shutting down");
                SyncError::Interrupted
            }
            joined = &mut track_loop => Self::join_outcome("track-remote", joined),
            joined = &mut pull_loop => Self::join_outcome("pull", joined),
            joined = &mut push_loop => Self::join_outcome("push", joined),
        };

        track_loop.abort();
        pull_loop.abort();
        push_loop.abort();

        Err(fatal.into())
    }

    fn spawn_track_loop(&self) -> JoinHandle<SyncError> {
        let runner = self.runner.clone();
        let target = self.target.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            keep_running(
                "track-remote",
                move || {
                    let runner = runner.clone();
                    let target = target.clone();
                    let state = state.clone();
                    async move {
                        tracker::track_remote_changes(runner.as_ref(), &target, &state).await
                    }
                },
                // the watch command itself blocks until something
                // changes; re-issue it immediately
                Duration::ZERO,
                FAILURE_BACKOFF,
            )
            .await
        })
    }

    fn spawn_pull_loop(pull: Arc<PullEngine>) -> JoinHandle<SyncError> {
        tokio::spawn(async move {
            keep_running(
                "pull",
                move || {
                    let pull = pull.clone();
                    async move { pull.pull_changes().await }
                },
                PULL_PUSH_CADENCE,
                FAILURE_BACKOFF,
            )
            .await
        })
    }

    fn spawn_push_loop(push: Arc<PushEngine>) -> JoinHandle<SyncError> {
        tokio::spawn(async move {
            keep_running(
                "push",
                move || {
                    let push = push.clone();
                    async move { push.push_changes().await }
                },
                PULL_PUSH_CADENCE,
                FAILURE_BACKOFF,
            )
            .await
        })
    }

    fn join_outcome(task: &str, joined: Result<SyncError, tokio::task::JoinError>) -> SyncError {
        match joined {
            Ok(fatal) => fatal,
            Err(join_error) => {
                error!(task, %join_error, "sync loop task died");
                SyncError::Config(format!("{task} loop task died: {join_error}"))
            }
        }
    }
}
