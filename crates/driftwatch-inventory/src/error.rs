//! Error types for driftwatch-inventory

use thiserror::Error;

/// Errors that can occur while working out the audit targets
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// HTTP request failed or returned a non-success status
    #[error("request to {url} failed: {message}")]
    RequestFailed {
        /// Requested URL
        url: String,
        /// Transport error or status line
        message: String,
    },

    /// Response body could not be understood
    #[error("parse error: {0}")]
    ParseError(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Nothing left to audit
    #[error("no hosts to audit: {0}")]
    NoHosts(String),
}
