//! Pull engine: brings the local directory up to date with the remote

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::process::{CommandRunner, Invocation};
use crate::state::SyncState;
use crate::target::SyncTarget;

/// How often the remote is polled when no change notification arrives.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Placeholder committed when seeding a brand-new remote repository.
const PLACEHOLDER_FILE: &str = "README.md";

/// Downloads remote changes into the local directory, bootstrapping the
/// directory from the remote when it does not exist yet.
///
/// `pull_changes` runs on a 0.1s cadence but is gated by the shared
/// deadline, so an actual `git pull` happens at most once per poll
/// interval unless a remote notification resets the deadline.
pub struct PullEngine {
    runner: Arc<dyn CommandRunner>,
    target: Arc<SyncTarget>,
    state: Arc<SyncState>,
    poll_interval: Duration,
}

impl PullEngine {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        target: Arc<SyncTarget>,
        state: Arc<SyncState>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            runner,
            target,
            state,
            poll_interval,
        }
    }

    pub async fn pull_changes(&self) -> Result<()> {
        if !self.state.pull_due() {
            return Ok(());
        }

        if self.target.local_path().exists() {
            debug!(path = %self.target.local_path().display(), "pulling remote changes");
            let pull = Invocation::new("git")
                .arg("pull")
                .current_dir(self.target.local_path());
            self.runner.run(&pull).await?;
        } else {
            self.bootstrap().await?;
        }

        self.state.schedule_next_pull(self.poll_interval);
        Ok(())
    }

    /// One-time sequence creating the local directory from scratch: clone
    /// the remote into place, then commit and push a placeholder so a
    /// brand-new remote ends up with an initial commit for later pulls
    /// and pushes to operate against.
    async fn bootstrap(&self) -> Result<()> {
        let local = self.target.local_path();
        info!(path = %local.display(), "local directory missing, bootstrapping from remote");

        let parent = local.parent().ok_or_else(|| {
            SyncError::path_error(local, "local path has no parent directory")
        })?;
        tokio::fs::create_dir_all(parent).await?;

        let clone = Invocation::new("git")
            .arg("clone")
            .arg(self.target.remote_url())
            .current_dir(parent);
        self.runner.run(&clone).await?;

        // touch semantics: never truncate a placeholder the remote
        // already carries
        let placeholder = local.join(PLACEHOLDER_FILE);
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&placeholder)
            .await?;

        let add = Invocation::new("git")
            .args(["add", PLACEHOLDER_FILE])
            .current_dir(local);
        self.runner.run(&add).await?;

        // cloning an established remote leaves nothing to commit; code 1
        // keeps the bootstrap idempotent
        let commit = Invocation::new("git")
            .args(["commit", "-m", "initial"])
            .current_dir(local)
            .ignore_exit_code(1);
        self.runner.run(&commit).await?;

        let push = Invocation::new("git")
            .args(["push", "origin", "HEAD"])
            .current_dir(local)
            .ignore_exit_code(1);
        self.runner.run(&push).await?;

        info!(path = %local.display(), "bootstrap complete");
        Ok(())
    }
}
