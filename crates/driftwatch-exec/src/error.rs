//! Error types for driftwatch-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during remote execution
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Failed to connect to remote host
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Connect, authentication or command did not finish in time
    #[error("{stage} timed out after {timeout:?}")]
    Timeout {
        /// Which step ran out of time
        stage: &'static str,
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error on an established channel
    #[error("I/O error: {0}")]
    IoError(String),
}
