//! Git command construction for one host's working copy

use std::sync::Arc;

use driftwatch_exec::{CommandOutcome, RemoteExecutor};
use tracing::{debug, warn};

use crate::config::ShellFlavor;

impl ShellFlavor {
    /// Quote a path for this shell
    #[must_use]
    pub fn quote(self, path: &str) -> String {
        match self {
            ShellFlavor::Cmd => format!("\"{path}\""),
            ShellFlavor::Posix => format!("'{}'", path.replace('\'', r"'\''")),
        }
    }

    /// Change into `dir`, switching drives where the shell needs it
    #[must_use]
    pub fn cd(self, dir: &str) -> String {
        match self {
            ShellFlavor::Cmd => format!("cd /d {}", self.quote(dir)),
            ShellFlavor::Posix => format!("cd {}", self.quote(dir)),
        }
    }

    /// `git log` pretty format yielding `<short-hash> <subject>` lines
    #[must_use]
    pub fn log_format(self) -> &'static str {
        match self {
            ShellFlavor::Cmd => "--format=\"%h %s\"",
            ShellFlavor::Posix => "--format='%h %s'",
        }
    }
}

/// Runs git subcommands inside the audited repository on one host
#[derive(Clone)]
pub struct RepoShell {
    executor: Arc<dyn RemoteExecutor>,
    flavor: ShellFlavor,
    repo_dir: String,
}

impl std::fmt::Debug for RepoShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoShell")
            .field("host", &self.executor.host())
            .field("executor", &self.executor.executor_type())
            .field("flavor", &self.flavor)
            .field("repo_dir", &self.repo_dir)
            .finish()
    }
}

impl RepoShell {
    pub fn new(
        executor: Arc<dyn RemoteExecutor>,
        flavor: ShellFlavor,
        repo_dir: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            flavor,
            repo_dir: repo_dir.into(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.executor.host()
    }

    #[must_use]
    pub fn flavor(&self) -> ShellFlavor {
        self.flavor
    }

    /// Full command line for `git <args>` in the repository
    #[must_use]
    pub fn git_command(&self, args: &str) -> String {
        format!("{} && git {}", self.flavor.cd(&self.repo_dir), args.trim())
    }

    /// Run `git <args>` in the repository
    pub async fn git(&self, args: &str) -> CommandOutcome {
        let command = self.git_command(args);
        debug!(host = %self.host(), command = %command, "running command");

        let outcome = self.executor.execute(&command).await;
        if !outcome.success {
            warn!(
                host = %self.host(),
                command = %command,
                output = %outcome.output.trim(),
                "remote command failed"
            );
        }
        outcome
    }
}
