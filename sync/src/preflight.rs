//! Startup checks for required local and remote tooling

use tracing::debug;

use crate::error::{Result, SyncError};
use crate::process::{CommandRunner, Invocation};
use crate::target::SyncTarget;

/// Executables the daemon itself spawns.
pub const LOCAL_BINARIES: &[&str] = &["git", "ssh"];

/// Executables the remote side must provide.
pub const REMOTE_BINARIES: &[&str] = &["git", "inotifywait"];

/// Probe the local PATH for each required executable.
pub fn check_local_binaries(names: &[&str]) -> Result<()> {
    for name in names {
        debug!(binary = name, "checking local binary");
        which::which(name).map_err(|_| SyncError::MissingLocalBinary((*name).to_owned()))?;
    }
    Ok(())
}

/// Probe the remote host for each required executable via `which` over
/// the ssh transport. A failed probe cannot be told apart from a failed
/// connection through the exit code alone; both surface as the same
/// error.
pub async fn check_remote_binaries(
    runner: &dyn CommandRunner,
    target: &SyncTarget,
    names: &[&str],
) -> Result<()> {
    for name in names {
        debug!(binary = name, server = target.server(), "checking remote binary");
        let probe = Invocation::new("ssh")
            .arg(target.server())
            .arg("which")
            .arg(*name);

        match runner.run(&probe).await {
            Ok(()) => {}
            Err(SyncError::CommandFailed { .. }) => {
                return Err(SyncError::MissingRemoteBinary((*name).to_owned()));
            }
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

/// Create the remote repository if it does not exist. `git init --bare`
/// on an existing repository reinitializes it, which is a no-op for our
/// purposes, so this is safe to run on every startup.
pub async fn ensure_remote_repo(runner: &dyn CommandRunner, target: &SyncTarget) -> Result<()> {
    let init = Invocation::new("ssh")
        .arg(target.server())
        .arg("git")
        .arg("init")
        .arg("--bare")
        .arg(target.repo_name());
    runner.run(&init).await
}
