//! Result types for command execution

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// Result of a command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit status code (0 for success)
    pub status: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Collapse into the success flag and the text callers should look at
    ///
    /// A failed command reports its stderr, falling back to stdout when the
    /// command wrote nothing there.
    #[must_use]
    pub fn into_outcome(self) -> CommandOutcome {
        if self.success() {
            CommandOutcome::ok(self.stdout)
        } else if self.stderr.trim().is_empty() {
            CommandOutcome::failed(self.stdout)
        } else {
            CommandOutcome::failed(self.stderr)
        }
    }
}

/// Data-only view of one remote command
///
/// Transport errors end up here as `success == false` with the error text
/// as output, so callers never have to handle them as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub output: String,
}

impl CommandOutcome {
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    #[must_use]
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

impl From<Result<CommandResult, ExecError>> for CommandOutcome {
    fn from(result: Result<CommandResult, ExecError>) -> Self {
        match result {
            Ok(cmd_result) => cmd_result.into_outcome(),
            Err(e) => CommandOutcome::failed(e.to_string()),
        }
    }
}

/// Username/password pair handed to the SSH layer
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection information for SSH
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Host address
    pub host: String,
    /// Port (default 22)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for connect, authenticate and each command
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl ConnectionInfo {
    /// Create new connection info
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            timeout: default_timeout(),
        }
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: i32, stdout: &str, stderr: &str) -> CommandResult {
        CommandResult {
            status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_success_outcome_keeps_stdout() {
        let outcome = result(0, "M file.txt\n", "warning: LF will be replaced").into_outcome();
        assert!(outcome.success);
        assert_eq!(outcome.output, "M file.txt\n");
    }

    #[test]
    fn test_failed_outcome_prefers_stderr() {
        let outcome = result(128, "", "fatal: not a git repository").into_outcome();
        assert!(!outcome.success);
        assert_eq!(outcome.output, "fatal: not a git repository");

        let outcome = result(1, "partial", "  ").into_outcome();
        assert_eq!(outcome.output, "partial");
    }

    #[test]
    fn test_transport_error_becomes_failed_outcome() {
        let outcome: CommandOutcome =
            Err(ExecError::ConnectionFailed("no route to host".to_string())).into();
        assert!(!outcome.success);
        assert_eq!(outcome.output, "connection failed: no route to host");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("spudulike", "hunter2");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("spudulike"));
        assert!(!dbg.contains("hunter2"));
    }
}
