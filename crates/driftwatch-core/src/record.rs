//! Per-host drift record

use std::fmt;

use tracing::warn;

use crate::check::CheckResult;

/// Commit hash -> subject, in the order the log query returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessages {
    entries: Vec<(String, String)>,
}

impl CommitMessages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a commit, replacing the message of an already seen hash in place
    pub fn insert(&mut self, hash: impl Into<String>, message: impl Into<String>) {
        let hash = hash.into();
        let message = message.into();

        if let Some(slot) = self.entries.iter_mut().find(|(h, _)| *h == hash) {
            // Abbreviated hashes should be unique within one query; keep the later line
            warn!(hash = %hash, "duplicate commit hash in git log output, overwriting");
            slot.1 = message;
        } else {
            self.entries.push((hash, message));
        }
    }

    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(h, _)| h == hash)
            .map(|(_, m)| m.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, m)| (h.as_str(), m.as_str()))
    }

    #[must_use]
    pub fn hashes(&self) -> Vec<&str> {
        self.entries.iter().map(|(h, _)| h.as_str()).collect()
    }
}

impl fmt::Display for CommitMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (hash, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{hash}: {message}")?;
        }
        f.write_str("}")
    }
}

/// Outcome of the uncommitted-changes axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncommittedChanges {
    pub result: CheckResult,
    /// `git status --porcelain` lines, only kept when detail is enabled
    pub lines: Vec<String>,
}

impl UncommittedChanges {
    #[must_use]
    pub fn undeterminable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clear() -> Self {
        Self {
            result: CheckResult::Clear,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn detected(lines: Vec<String>) -> Self {
        Self {
            result: CheckResult::Detected,
            lines,
        }
    }
}

/// Outcome of one commit comparison axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDrift {
    pub result: CheckResult,
    /// Non-empty only when `result` is `Detected`
    pub commits: CommitMessages,
}

impl CommitDrift {
    #[must_use]
    pub fn undeterminable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clear() -> Self {
        Self {
            result: CheckResult::Clear,
            commits: CommitMessages::new(),
        }
    }

    /// `Detected` with the given commits, or `Clear` when there are none
    #[must_use]
    pub fn from_commits(commits: CommitMessages) -> Self {
        if commits.is_empty() {
            Self::clear()
        } else {
            Self {
                result: CheckResult::Detected,
                commits,
            }
        }
    }
}

/// Everything learned about one host during an audit
///
/// Every axis starts out `Undeterminable`; the checker overwrites an axis
/// only once it has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    hostname: String,
    pub uncommitted: UncommittedChanges,
    pub local_not_upstream: CommitDrift,
    pub upstream_not_local: CommitDrift,
}

impl HostRecord {
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            uncommitted: UncommittedChanges::undeterminable(),
            local_not_upstream: CommitDrift::undeterminable(),
            upstream_not_local: CommitDrift::undeterminable(),
        }
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// All three axis results, uncommitted first
    #[must_use]
    pub fn results(&self) -> [CheckResult; 3] {
        [
            self.uncommitted.result,
            self.local_not_upstream.result,
            self.upstream_not_local.result,
        ]
    }
}

impl fmt::Display for HostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hostname: {} - Uncommitted changes: {} - Commits on local not on upstream: {} - Commits on upstream not on local: {}",
            self.hostname,
            self.uncommitted.result,
            self.local_not_upstream.result,
            self.upstream_not_local.result
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_undeterminable_on_every_axis() {
        let record = HostRecord::new("NDXA");

        assert_eq!(record.hostname(), "NDXA");
        assert_eq!(record.results(), [CheckResult::Undeterminable; 3]);
    }

    #[test]
    fn test_duplicate_hash_overwrites_in_place() {
        let mut commits = CommitMessages::new();
        commits.insert("a1", "first");
        commits.insert("b2", "second");
        commits.insert("a1", "third");

        assert_eq!(commits.len(), 2);
        assert_eq!(commits.hashes(), vec!["a1", "b2"]);
        assert_eq!(commits.get("a1"), Some("third"));
    }

    #[test]
    fn test_from_commits_empty_is_clear() {
        let drift = CommitDrift::from_commits(CommitMessages::new());
        assert_eq!(drift.result, CheckResult::Clear);
        assert!(drift.commits.is_empty());
    }

    #[test]
    fn test_display_formats() {
        let mut commits = CommitMessages::new();
        commits.insert("a1", "Fix: bug");
        commits.insert("b2", "Other change");
        assert_eq!(commits.to_string(), "{a1: Fix: bug, b2: Other change}");

        let mut record = HostRecord::new("NDXB");
        record.uncommitted = UncommittedChanges::clear();
        assert_eq!(
            record.to_string(),
            "Hostname: NDXB - Uncommitted changes: clear - Commits on local not on upstream: undeterminable - Commits on upstream not on local: undeterminable"
        );
    }
}
