//! Core error types for driftwatch-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the tri-state checks themselves
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Required configuration missing or malformed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Unknown shell flavor name
    #[error("unknown remote shell '{0}' (expected cmd or posix)")]
    UnknownShell(String),

    /// No executor could be built for a host
    #[error("cannot create executor for {host}: {message}")]
    ExecutorError {
        /// Host the executor was for
        host: String,
        /// Underlying cause
        message: String,
    },

    /// Writing a status artifact failed
    #[error("failed to archive {path}: {message}")]
    ArchiveError {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        message: String,
    },
}
