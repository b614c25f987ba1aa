//! External command execution
//!
//! Every interaction with git, ssh and the remote watch tool goes through
//! one narrow interface: build an [`Invocation`], hand it to a
//! [`CommandRunner`]. The working directory travels inside the invocation
//! instead of being set on the process, so concurrent loops never race on
//! shared chdir state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SyncError};

/// Exit status shells use to report death by SIGINT.
pub const SIGINT_EXIT_CODE: i32 = 130;

/// One external command with its full execution context spelled out.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    ignorable: Vec<i32>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            ignorable: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the directory the command runs in. Commands that omit this
    /// inherit the daemon's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Treat `code` as a non-error outcome for this invocation.
    pub fn ignore_exit_code(mut self, code: i32) -> Self {
        self.ignorable.push(code);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn ignorable(&self) -> &[i32] {
        &self.ignorable
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished process's exit status means to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Exit code 0
    Success,
    /// Nonzero code listed in the invocation's ignorable set
    Ignored(i32),
    /// Nonzero, non-ignorable code
    Failed(i32),
    /// SIGINT exit status or death by signal; overrides the ignorable set
    Interrupted,
}

/// Classify a raw exit code against an invocation's ignorable set.
///
/// A `None` code means the process was killed by a signal; while the
/// daemon is being torn down its children die the same way, so that is
/// folded into `Interrupted` as well.
pub fn classify_exit(code: Option<i32>, ignorable: &[i32]) -> ExitDisposition {
    match code {
        None => ExitDisposition::Interrupted,
        Some(SIGINT_EXIT_CODE) => ExitDisposition::Interrupted,
        Some(0) => ExitDisposition::Success,
        Some(c) if ignorable.contains(&c) => ExitDisposition::Ignored(c),
        Some(c) => ExitDisposition::Failed(c),
    }
}

/// Executes invocations. The seam exists so the engines can be exercised
/// against a recording fake in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real subprocesses with output discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!(command = %invocation, "invoking external command");

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if let Some(dir) = invocation.cwd() {
            command.current_dir(dir);
        }

        let status = command.status().await?;

        match classify_exit(status.code(), invocation.ignorable()) {
            ExitDisposition::Success => Ok(()),
            ExitDisposition::Ignored(code) => {
                debug!(command = %invocation, code, "ignoring exit code");
                Ok(())
            }
            ExitDisposition::Interrupted => Err(SyncError::Interrupted),
            ExitDisposition::Failed(code) => Err(SyncError::CommandFailed {
                command: invocation.to_string(),
                code,
            }),
        }
    }
}
