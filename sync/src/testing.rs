//! Shared test doubles for the engine tests

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, SyncError};
use crate::process::{classify_exit, CommandRunner, ExitDisposition, Invocation};

type Responder = Box<dyn Fn(&Invocation) -> i32 + Send + Sync>;

/// [`CommandRunner`] fake: records every invocation as its rendered
/// command line and answers with a scripted exit code, classified through
/// the same rules as the real runner. Responders may carry side effects
/// (e.g. creating the directory a clone would have created).
pub struct ScriptedRunner {
    calls: Mutex<Vec<String>>,
    responder: Responder,
}

impl ScriptedRunner {
    /// Every command exits 0.
    pub fn succeeding() -> Self {
        Self::with_responder(|_| 0)
    }

    pub fn with_responder(responder: impl Fn(&Invocation) -> i32 + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Rendered command lines, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn command_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.lock().push(invocation.to_string());

        let code = (self.responder)(invocation);
        match classify_exit(Some(code), invocation.ignorable()) {
            ExitDisposition::Success | ExitDisposition::Ignored(_) => Ok(()),
            ExitDisposition::Interrupted => Err(SyncError::Interrupted),
            ExitDisposition::Failed(code) => Err(SyncError::CommandFailed {
                command: invocation.to_string(),
                code,
            }),
        }
    }
}
