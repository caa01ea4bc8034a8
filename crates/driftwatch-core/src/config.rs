//! Configuration types for a fleet audit

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use driftwatch_exec::Credentials;

use crate::error::CoreError;

/// How the upstream branch of a host is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamMode {
    /// `origin/<hostname>`, one branch per instrument
    Hostname,
    /// `origin/galil-old` if the local log mentions it, otherwise `origin/main`
    Epics,
    /// `origin/main`
    Main,
    /// `origin/master`
    Master,
    /// Any other ref, used verbatim
    Literal(String),
}

impl FromStr for UpstreamMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err(CoreError::ConfigError(
                "upstream branch mode must not be empty".to_string(),
            )),
            "hostname" => Ok(UpstreamMode::Hostname),
            "epics" => Ok(UpstreamMode::Epics),
            "main" => Ok(UpstreamMode::Main),
            "master" => Ok(UpstreamMode::Master),
            other => Ok(UpstreamMode::Literal(other.to_string())),
        }
    }
}

impl fmt::Display for UpstreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamMode::Hostname => f.write_str("hostname"),
            UpstreamMode::Epics => f.write_str("epics"),
            UpstreamMode::Main => f.write_str("main"),
            UpstreamMode::Master => f.write_str("master"),
            UpstreamMode::Literal(branch) => f.write_str(branch),
        }
    }
}

/// Shell dialect spoken by the audited hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellFlavor {
    /// Windows `cmd.exe`
    #[default]
    Cmd,
    /// POSIX `sh`
    Posix,
}

impl FromStr for ShellFlavor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cmd" | "windows" => Ok(ShellFlavor::Cmd),
            "posix" | "sh" | "unix" => Ok(ShellFlavor::Posix),
            other => Err(CoreError::UnknownShell(other.to_string())),
        }
    }
}

impl fmt::Display for ShellFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellFlavor::Cmd => f.write_str("cmd"),
            ShellFlavor::Posix => f.write_str("posix"),
        }
    }
}

/// Everything the drift checker and auditor need to know
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Working copy location on every audited host
    pub repo_dir: String,
    /// SSH credentials shared by the fleet
    pub credentials: Credentials,
    /// Upstream branch selection
    pub upstream: UpstreamMode,
    /// Shell dialect on the hosts
    pub shell: ShellFlavor,
    /// List porcelain status lines next to each dirty host in the summary
    pub show_uncommitted_messages: bool,
    /// Also archive `git diff` next to the status
    pub capture_diff: bool,
    /// Only report commits whose subject starts with this
    pub commit_prefix: Option<String>,
    /// SSH port
    pub ssh_port: u16,
    /// Bound for every connect/authenticate/command step
    pub timeout: Duration,
    /// Number of hosts checked at the same time
    pub concurrency: usize,
    /// Root of the results directory
    pub results_dir: PathBuf,
    /// Log at debug level unless `RUST_LOG` says otherwise
    pub debug: bool,
}

impl AuditConfig {
    /// Config with defaults for everything but the required fields
    pub fn new(
        repo_dir: impl Into<String>,
        credentials: Credentials,
        upstream: UpstreamMode,
    ) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            credentials,
            upstream,
            shell: ShellFlavor::default(),
            show_uncommitted_messages: false,
            capture_diff: true,
            commit_prefix: None,
            ssh_port: 22,
            timeout: Duration::from_secs(10),
            concurrency: 1,
            results_dir: PathBuf::from("."),
            debug: false,
        }
    }

    /// Reject configurations that cannot produce a meaningful audit
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` naming the first offending setting
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.repo_dir.trim().is_empty() {
            return Err(CoreError::ConfigError("repository directory is empty".to_string()));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(CoreError::ConfigError("SSH username is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(CoreError::ConfigError("timeout must be positive".to_string()));
        }
        if self.concurrency == 0 {
            return Err(CoreError::ConfigError("concurrency must be at least 1".to_string()));
        }
        if self.shell == ShellFlavor::Cmd && self.repo_dir.contains('"') {
            return Err(CoreError::ConfigError(
                "repository directory must not contain '\"' for the cmd shell".to_string(),
            ));
        }
        Ok(())
    }
}
