//! tether-sync: engine library for the tether synchronization daemon
//!
//! Continuous bidirectional sync between one local directory and one
//! remote directory, with git over ssh as the transport and a remote
//! `inotifywait` long-poll as the change-notification mechanism. The
//! pieces:
//!
//! - [`process`]: narrow subprocess interface every external command
//!   goes through
//! - [`preflight`]: local/remote binary checks and remote repo creation
//! - [`watch`]: local filesystem watcher feeding the shared dirty flag
//! - [`tracker`]: remote long-poll that gates pull frequency
//! - [`pull`] / [`push`]: the two sync engines
//! - [`supervisor`]: the retry wrapper every perpetual loop runs under

pub mod error;
pub mod preflight;
pub mod process;
pub mod pull;
pub mod push;
pub mod state;
pub mod supervisor;
pub mod target;
pub mod tracker;
pub mod watch;

pub use error::{Result, SyncError};
pub use process::{
    classify_exit, CommandRunner, ExitDisposition, Invocation, ProcessRunner, SIGINT_EXIT_CODE,
};
pub use pull::{PullEngine, DEFAULT_POLL_INTERVAL};
pub use push::PushEngine;
pub use state::SyncState;
pub use supervisor::keep_running;
pub use target::SyncTarget;
pub use watch::{should_mark_dirty, LocalWatcher, GIT_DIR};

// Test modules
#[cfg(test)]
mod testing;

#[cfg(test)]
mod process_tests;
#[cfg(test)]
mod watch_tests;
