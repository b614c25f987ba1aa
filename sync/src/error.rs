//! Error types for the tether engine library

use std::path::PathBuf;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type covering every failure the sync engine can produce.
///
/// `Interrupted` is the one fatal variant: it is never retried and unwinds
/// every loop it passes through. Everything else is either a startup
/// configuration problem or a transient failure the loop supervisor
/// absorbs.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Invalid configuration detected before the daemon starts
    #[error("configuration error: {0}")]
    Config(String),

    /// A required executable is not on the local PATH
    #[error("required binary \"{0}\" not found on local PATH")]
    MissingLocalBinary(String),

    /// A required executable is missing on the remote host. The probe
    /// cannot tell a missing binary from an unreachable server, so both
    /// are reported here.
    #[error("required binary \"{0}\" missing on remote (or could not connect to server)")]
    MissingRemoteBinary(String),

    /// An invoked command exited nonzero with a code not in its
    /// ignorable set
    #[error("external command failed (code={code}, cmd=\"{command}\")")]
    CommandFailed { command: String, code: i32 },

    /// The process (or a child) was interrupted; always fatal
    #[error("interrupted")]
    Interrupted,

    /// Local path could not be resolved or created
    #[error("path error at '{path}': {message}")]
    Path { path: PathBuf, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem watcher errors
    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl SyncError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new path error
    pub fn path_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error must terminate the daemon rather than be
    /// retried by a loop supervisor.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
