//! Local command execution using `tokio::process`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::RemoteExecutor;

/// Local command executor
///
/// Used when the audited working copy lives on the machine running the
/// audit. Commands go through the platform shell so `cd ... && git ...`
/// chains behave as they would over SSH.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    host: String,
    timeout: Duration,
}

impl LocalExecutor {
    /// Create a new local executor reporting itself as `host`
    #[must_use]
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }

    fn shell_command(cmd: &str) -> Command {
        if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(cmd);
            command
        } else {
            let mut command = Command::new("sh");
            command.arg("-c").arg(cmd);
            command
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn execute_local(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        debug!(command = %cmd, "executing local command");

        let child = Self::shell_command(cmd)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError(e.to_string()))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let duration = start.elapsed();
        let status = output.status.code().unwrap_or(-1);

        debug!(
            command = %cmd,
            status = status,
            duration = ?duration,
            "command completed"
        );

        Ok(CommandResult {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration,
        })
    }
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        match timeout(self.timeout, self.execute_local(cmd)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    command = %cmd,
                    timeout = ?self.timeout,
                    elapsed = ?start.elapsed(),
                    "command timed out"
                );
                Err(ExecError::Timeout {
                    stage: "command",
                    timeout: self.timeout,
                })
            }
        }
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn executor_type(&self) -> &'static str {
        "local"
    }
}
