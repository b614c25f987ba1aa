//! Remote change tracking via a long-poll watch command

use tracing::debug;

use crate::error::Result;
use crate::process::{CommandRunner, Invocation};
use crate::state::SyncState;
use crate::target::SyncTarget;

/// Block on a remote `inotifywait` until the remote repository tree
/// changes, then schedule an immediate pull. The call is expected to
/// block for long, variable periods; its supervising loop re-issues it
/// with no delay after every return.
pub async fn track_remote_changes(
    runner: &dyn CommandRunner,
    target: &SyncTarget,
    state: &SyncState,
) -> Result<()> {
    let watch = Invocation::new("ssh")
        .arg(target.server())
        .arg("inotifywait")
        .arg("-rqq")
        .args(["-e", "modify", "-e", "move", "-e", "create", "-e", "delete"])
        .arg(target.repo_name());

    runner.run(&watch).await?;

    debug!("remote change reported, scheduling immediate pull");
    state.request_pull_now();
    Ok(())
}
