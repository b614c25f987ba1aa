//! Single-instance lock file
//!
//! Two daemons syncing the same directory would fight over commits, so
//! startup takes an exclusive advisory lock and holds it for the whole
//! process lifetime. The lock is released by the OS on exit, however the
//! process ends.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Held for the daemon's entire lifetime; dropping the file releases the
/// lock.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
}

impl InstanceLock {
    #[cfg(unix)]
    pub fn acquire(path: &Path) -> Result<Self> {
        use std::os::fd::AsRawFd;

        use nix::errno::Errno;
        use nix::fcntl::{flock, FlockArg};

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("opening lock file {}", path.display()))?;

        flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock).map_err(|errno| {
            if errno == Errno::EWOULDBLOCK {
                anyhow::anyhow!(
                    "another instance is already running (lock file {})",
                    path.display()
                )
            } else {
                anyhow::anyhow!("locking {} failed: {}", path.display(), errno)
            }
        })?;

        Ok(Self { _file: file })
    }

    #[cfg(not(unix))]
    pub fn acquire(path: &Path) -> Result<Self> {
        // no advisory locking here; the open file at least marks the
        // instance
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("opening lock file {}", path.display()))?;
        Ok(Self { _file: file })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn second_acquisition_fails_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("daemon.lock");

        let held = InstanceLock::acquire(&lock_path).unwrap();
        let err = InstanceLock::acquire(&lock_path).unwrap_err();
        assert!(err.to_string().contains("another instance"));

        drop(held);
        InstanceLock::acquire(&lock_path).unwrap();
    }
}
