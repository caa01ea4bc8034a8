//! Scripted executor shared by the unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use driftwatch_exec::{CommandResult, ExecError, RemoteExecutor};

enum Reply {
    Ok(String),
    Fail(String),
    Transport(String),
}

/// Answers commands by the first rule whose needle the command contains
pub struct ScriptedExecutor {
    host: String,
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, needle: &str, stdout: &str) -> Self {
        self.rules.push((needle.to_string(), Reply::Ok(stdout.to_string())));
        self
    }

    pub fn fail(mut self, needle: &str, stderr: &str) -> Self {
        self.rules.push((needle.to_string(), Reply::Fail(stderr.to_string())));
        self
    }

    pub fn unreachable(mut self, needle: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Transport("connection refused".to_string())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }
}

fn result(status: i32, stdout: &str, stderr: &str) -> CommandResult {
    CommandResult {
        status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        duration: std::time::Duration::from_millis(1),
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        self.calls.lock().unwrap().push(cmd.to_string());

        match self.rules.iter().find(|(needle, _)| cmd.contains(needle.as_str())) {
            Some((_, Reply::Ok(stdout))) => Ok(result(0, stdout, "")),
            Some((_, Reply::Fail(stderr))) => Ok(result(128, "", stderr)),
            Some((_, Reply::Transport(message))) => {
                Err(ExecError::ConnectionFailed(message.clone()))
            }
            None => Ok(result(0, "", "")),
        }
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn executor_type(&self) -> &'static str {
        "scripted"
    }
}
