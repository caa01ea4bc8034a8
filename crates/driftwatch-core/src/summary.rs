//! Fleet-wide triage buckets and verdict

use std::fmt;

use crate::check::CheckResult;
use crate::record::{CommitDrift, CommitMessages, HostRecord};

/// A host with uncommitted changes, plus its status lines when kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncommittedEntry {
    pub hostname: String,
    pub lines: Vec<String>,
}

impl fmt::Display for UncommittedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            write!(f, "{}", self.hostname)
        } else {
            write!(f, "{} [{}]", self.hostname, self.lines.join(", "))
        }
    }
}

/// A host listed in one of the commit buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub hostname: String,
    pub commits: CommitMessages,
}

impl fmt::Display for CommitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hostname, self.commits)
    }
}

/// Pass/fail outcome of the whole audit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Process exit code for the pipeline
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

/// Hosts grouped by what went wrong on them
///
/// A host can sit in several buckets; within the undeterminable bucket it
/// appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetSummary {
    uncommitted: Vec<UncommittedEntry>,
    local_not_upstream: Vec<CommitEntry>,
    upstream_not_local: Vec<CommitEntry>,
    undeterminable: Vec<String>,
}

impl FleetSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished host check into the buckets
    pub fn record(&mut self, record: &HostRecord) {
        let hostname = record.hostname();

        match record.uncommitted.result {
            CheckResult::Detected => self.uncommitted.push(UncommittedEntry {
                hostname: hostname.to_string(),
                lines: record.uncommitted.lines.clone(),
            }),
            CheckResult::Undeterminable => self.record_undeterminable(hostname),
            CheckResult::Clear => {}
        }

        if let Some(entry) = self.triage_commits(hostname, &record.local_not_upstream) {
            self.local_not_upstream.push(entry);
        }
        if let Some(entry) = self.triage_commits(hostname, &record.upstream_not_local) {
            self.upstream_not_local.push(entry);
        }
    }

    fn triage_commits(&mut self, hostname: &str, drift: &CommitDrift) -> Option<CommitEntry> {
        match drift.result {
            CheckResult::Detected => Some(CommitEntry {
                hostname: hostname.to_string(),
                commits: drift.commits.clone(),
            }),
            CheckResult::Undeterminable => {
                self.record_undeterminable(hostname);
                None
            }
            CheckResult::Clear => None,
        }
    }

    /// Mark a host as not fully checked
    pub fn record_undeterminable(&mut self, hostname: &str) {
        if !self.undeterminable.iter().any(|h| h == hostname) {
            self.undeterminable.push(hostname.to_string());
        }
    }

    #[must_use]
    pub fn uncommitted(&self) -> &[UncommittedEntry] {
        &self.uncommitted
    }

    #[must_use]
    pub fn uncommitted_hosts(&self) -> Vec<&str> {
        self.uncommitted.iter().map(|e| e.hostname.as_str()).collect()
    }

    #[must_use]
    pub fn local_not_upstream(&self) -> &[CommitEntry] {
        &self.local_not_upstream
    }

    #[must_use]
    pub fn upstream_not_local(&self) -> &[CommitEntry] {
        &self.upstream_not_local
    }

    #[must_use]
    pub fn undeterminable(&self) -> &[String] {
        &self.undeterminable
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.uncommitted.is_empty()
            && self.local_not_upstream.is_empty()
            && self.upstream_not_local.is_empty()
            && self.undeterminable.is_empty()
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.is_clean() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// One line per bucket, `ERROR: ` prefixed when the bucket is non-empty
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            bucket_line("Uncommitted changes", &self.uncommitted),
            bucket_line("Commits on local not upstream", &self.local_not_upstream),
            bucket_line("Commits on upstream not on local", &self.upstream_not_local),
            bucket_line("Undeterminable at some point", &self.undeterminable),
        ]
    }
}

fn bucket_line<T: fmt::Display>(label: &str, items: &[T]) -> String {
    let listed = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let prefix = if items.is_empty() { "" } else { "ERROR: " };
    format!("{prefix}{label}: [{listed}]")
}

impl fmt::Display for FleetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
