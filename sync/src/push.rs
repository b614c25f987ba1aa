//! Push engine: commits and uploads local dirty state

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::process::{CommandRunner, Invocation};
use crate::state::SyncState;
use crate::target::SyncTarget;

/// Uploads local changes whenever the watcher has marked the directory
/// dirty. Runs on a 0.1s cadence; the sticky flag collapses any number
/// of filesystem events within a cycle into one push.
pub struct PushEngine {
    runner: Arc<dyn CommandRunner>,
    target: Arc<SyncTarget>,
    state: Arc<SyncState>,
}

impl PushEngine {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        target: Arc<SyncTarget>,
        state: Arc<SyncState>,
    ) -> Self {
        Self {
            runner,
            target,
            state,
        }
    }

    pub async fn push_changes(&self) -> Result<()> {
        if !self.state.is_dirty() {
            return Ok(());
        }

        let local = self.target.local_path();
        debug!(path = %local.display(), "pushing local changes");

        let add = Invocation::new("git").args(["add", "-A"]).current_dir(local);
        self.runner.run(&add).await?;

        // the dirty flag and the index can disagree (e.g. only dotfiles
        // changed); "nothing to commit" exits 1 and is not an error
        let message = format!("auto commit at {}", Utc::now().format("%Y%m%dT%H%M%S"));
        let commit = Invocation::new("git")
            .args(["commit", "-m"])
            .arg(message)
            .current_dir(local)
            .ignore_exit_code(1);
        self.runner.run(&commit).await?;

        // a push rejected by a concurrently advanced remote is swallowed
        // here; it self-heals after the next pull-then-push cycle
        let push = Invocation::new("git")
            .args(["push", "origin", "HEAD"])
            .current_dir(local)
            .ignore_exit_code(1);
        self.runner.run(&push).await?;

        self.state.clear_dirty();
        Ok(())
    }
}
