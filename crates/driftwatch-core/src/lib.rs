//! driftwatch-core: Repository drift checks and fleet triage
//!
//! Compares the working copy on each audited host against its upstream
//! branch without changing anything on that host, then folds the per-host
//! results into one fleet verdict.

pub mod archive;
pub mod auditor;
pub mod check;
pub mod checker;
pub mod config;
pub mod differ;
pub mod error;
pub mod record;
pub mod shell;
pub mod summary;
pub mod upstream;

#[cfg(test)]
mod testing;

pub use archive::{FsArchiver, ResultArchiver};
pub use auditor::{CancelHandle, FleetAuditor};
pub use check::CheckResult;
pub use checker::{ExecutorFactory, HostDriftChecker};
pub use config::{AuditConfig, ShellFlavor, UpstreamMode};
pub use error::CoreError;
pub use record::{CommitDrift, CommitMessages, HostRecord, UncommittedChanges};
pub use shell::RepoShell;
pub use summary::{CommitEntry, FleetSummary, UncommittedEntry, Verdict};
