use autosnap_core::error::{Result, SnapError};
use autosnap_core::CommandRunner;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<std::result::Result<String, String>>,
    last: Option<std::result::Result<String, String>>,
    calls: Vec<String>,
}

/// Scripted [`CommandRunner`]. Replies are handed out in order and the last
/// one repeats; clones share the script and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    script: Arc<Mutex<Script>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a successful reply with `stdout`.
    pub fn respond(self, stdout: impl Into<String>) -> Self {
        self.script().replies.push_back(Ok(stdout.into()));
        self
    }

    /// Queue a failing reply, reported as a command error.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.script().replies.push_back(Err(message.into()));
        self
    }

    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.script().calls.clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let mut script = self.script();
        script.calls.push(format!("{} {}", program, args.join(" ")));

        if let Some(next) = script.replies.pop_front() {
            script.last = Some(next);
        }
        match &script.last {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(message)) => Err(SnapError::Command(message.clone())),
            None => Ok(String::new()),
        }
    }
}
