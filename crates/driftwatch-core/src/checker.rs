//! Per-host drift check
//!
//! Runs the uncommitted-changes check, resolves the upstream reference and
//! compares history in both directions. Only read-only git commands are ever
//! sent to the host (`status`, `diff`, `log`, and `fetch`, which touches
//! remote-tracking refs but never the working tree).

use std::sync::Arc;

use async_trait::async_trait;
use driftwatch_exec::RemoteExecutor;
use tracing::{debug, info, instrument, warn};

use crate::archive::ResultArchiver;
use crate::config::AuditConfig;
use crate::differ;
use crate::error::CoreError;
use crate::record::{HostRecord, UncommittedChanges};
use crate::shell::RepoShell;
use crate::upstream::resolve_upstream;

const HEAD: &str = "HEAD";

/// Creates the executor used to reach one host
#[async_trait]
pub trait ExecutorFactory: Send + Sync {
    /// Build an executor for `hostname`
    async fn create_executor(&self, hostname: &str) -> Result<Arc<dyn RemoteExecutor>, CoreError>;
}

/// Classifies one host along the three drift axes
pub struct HostDriftChecker {
    config: Arc<AuditConfig>,
    factory: Arc<dyn ExecutorFactory>,
    archiver: Arc<dyn ResultArchiver>,
}

impl HostDriftChecker {
    pub fn new(
        config: Arc<AuditConfig>,
        factory: Arc<dyn ExecutorFactory>,
        archiver: Arc<dyn ResultArchiver>,
    ) -> Self {
        Self {
            config,
            factory,
            archiver,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Check one host
    ///
    /// Remote failures never surface here; they show up as `Undeterminable`
    /// axes in the record.
    ///
    /// # Errors
    /// Returns `CoreError` when the host cannot be set up for checking at all
    #[instrument(skip(self))]
    pub async fn check_host(&self, hostname: &str) -> Result<HostRecord, CoreError> {
        let executor = self.factory.create_executor(hostname).await?;
        let shell = RepoShell::new(executor, self.config.shell, self.config.repo_dir.clone());
        let mut record = HostRecord::new(hostname);

        record.uncommitted = self.check_uncommitted(&shell).await;

        let prefix = self.config.commit_prefix.as_deref();
        match resolve_upstream(&self.config.upstream, &shell).await {
            Some(upstream) => {
                record.local_not_upstream =
                    differ::compare(&shell, Some(HEAD), Some(&upstream), prefix).await;
                record.upstream_not_local =
                    differ::compare(&shell, Some(&upstream), Some(HEAD), prefix).await;
            }
            None => {
                warn!(
                    host = %hostname,
                    mode = %self.config.upstream,
                    "upstream reference unresolved, skipping history comparison"
                );
            }
        }

        debug!("{record}");
        info!(host = %hostname, "host checked");

        Ok(record)
    }

    /// `git status --porcelain`, archived together with the diff
    async fn check_uncommitted(&self, shell: &RepoShell) -> UncommittedChanges {
        let status = shell.git("status --porcelain").await;
        if !status.success {
            return UncommittedChanges::undeterminable();
        }

        let mut archived = status.output.clone();
        if self.config.capture_diff {
            let diff = shell.git("--no-pager diff --ignore-cr-at-eol").await;
            if diff.success {
                archived.push_str("\n\n");
                archived.push_str(&diff.output);
            }
        }

        if let Err(e) = self.archiver.archive(shell.host(), &archived).await {
            warn!(host = %shell.host(), error = %e, "could not archive git status");
        }

        let trimmed = status.output.trim();
        if trimmed.is_empty() {
            UncommittedChanges::clear()
        } else if self.config.show_uncommitted_messages {
            UncommittedChanges::detected(
                trimmed
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        } else {
            UncommittedChanges::detected(Vec::new())
        }
    }
}
