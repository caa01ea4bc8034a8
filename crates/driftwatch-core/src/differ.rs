//! Commit range comparison via `git fetch` + `git log`

use tracing::{debug, instrument, warn};

use crate::record::{CommitDrift, CommitMessages};
use crate::shell::RepoShell;

/// `<subtracted_against>..<changes_on>`, or empty when either side is missing
#[must_use]
pub fn range_expression(changes_on: Option<&str>, subtracted_against: Option<&str>) -> String {
    match (changes_on, subtracted_against) {
        (Some(on), Some(against)) => format!("{against}..{on}"),
        _ => String::new(),
    }
}

/// Parse `<short-hash> <subject>` lines
///
/// Blank lines are ignored. A line without a subject is skipped with a
/// warning. With a prefix, only subjects starting with it are kept.
#[must_use]
pub fn parse_git_log(output: &str, prefix: Option<&str>) -> CommitMessages {
    let mut commits = CommitMessages::new();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let line = line.trim_end_matches('\r');
        let Some((hash, message)) = line.split_once(' ') else {
            warn!(line = %line, "skipping git log line without a message");
            continue;
        };

        if prefix.is_none_or(|p| message.starts_with(p)) {
            commits.insert(hash, message);
        }
    }

    commits
}

/// Commits reachable from `changes_on` but not from `subtracted_against`
///
/// Runs `git fetch origin` first and never merges. When the fetch fails the
/// log query is not issued at all, since it would only see stale refs.
#[instrument(skip(shell), fields(host = %shell.host()))]
pub async fn compare(
    shell: &RepoShell,
    changes_on: Option<&str>,
    subtracted_against: Option<&str>,
    prefix: Option<&str>,
) -> CommitDrift {
    let range = range_expression(changes_on, subtracted_against);

    let fetch = shell.git("fetch origin").await;
    if !fetch.success {
        return CommitDrift::undeterminable();
    }

    let log_args = format!("log {} {range}", shell.flavor().log_format());
    let log = shell.git(&log_args).await;
    if !log.success {
        return CommitDrift::undeterminable();
    }

    let commits = parse_git_log(&log.output, prefix);
    debug!(range = %range, commits = commits.len(), "compared branches");

    CommitDrift::from_commits(commits)
}
