//! Identity of one local-directory-to-remote-repository relationship

use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// One synchronization relationship: a local directory mirrored into a
/// repository on a remote server.
///
/// The repository name is derived from the final segment of the local
/// path and stays fixed for the lifetime of the daemon.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    local_path: PathBuf,
    server: String,
    repo_name: String,
}

impl SyncTarget {
    /// Build a target from a (possibly relative) local path and a server
    /// address. The path is resolved to an absolute path immediately; no
    /// later operation works with relative paths.
    pub fn new(path: impl AsRef<Path>, server: impl Into<String>) -> Result<Self> {
        let server = server.into();
        if server.is_empty() {
            return Err(SyncError::config("server address must not be empty"));
        }

        let path = path.as_ref();
        let local_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let repo_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                SyncError::path_error(&local_path, "cannot derive a repository name")
            })?;

        Ok(Self {
            local_path,
            server,
            repo_name,
        })
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Address of the remote repository in `<server>:<repo>` form, as
    /// understood by clone.
    pub fn remote_url(&self) -> String {
        format!("{}:{}", self.server, self.repo_name)
    }
}
