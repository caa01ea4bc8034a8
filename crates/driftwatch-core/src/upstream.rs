//! Upstream reference resolution

use tracing::{debug, instrument, warn};

use crate::config::UpstreamMode;
use crate::shell::RepoShell;

/// Log marker that puts an EPICS checkout on the old Galil branch
const GALIL_OLD_MARKER: &str = "galil-old";
const GALIL_OLD_BRANCH: &str = "origin/galil-old";
const MAIN_BRANCH: &str = "origin/main";
const MASTER_BRANCH: &str = "origin/master";

/// Work out which ref the host's history is measured against
///
/// Only the `Epics` mode talks to the host; it returns `None` when that
/// call fails.
#[instrument(skip(shell), fields(host = %shell.host()))]
pub async fn resolve_upstream(mode: &UpstreamMode, shell: &RepoShell) -> Option<String> {
    let upstream = match mode {
        UpstreamMode::Hostname => format!("origin/{}", shell.host()),
        UpstreamMode::Epics => epics_parent_branch(shell).await?,
        UpstreamMode::Main => MAIN_BRANCH.to_string(),
        UpstreamMode::Master => MASTER_BRANCH.to_string(),
        UpstreamMode::Literal(branch) => branch.clone(),
    };

    debug!(upstream = %upstream, "resolved upstream reference");
    Some(upstream)
}

async fn epics_parent_branch(shell: &RepoShell) -> Option<String> {
    let log = shell.git("log").await;
    if !log.success {
        warn!(host = %shell.host(), "could not read log to pick the EPICS parent branch");
        return None;
    }

    if log.output.contains(GALIL_OLD_MARKER) {
        Some(GALIL_OLD_BRANCH.to_string())
    } else {
        Some(MAIN_BRANCH.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ShellFlavor;
    use crate::testing::ScriptedExecutor;

    async fn resolve(mode: UpstreamMode, executor: ScriptedExecutor) -> (Option<String>, usize) {
        let executor = Arc::new(executor);
        let shell = RepoShell::new(executor.clone(), ShellFlavor::Cmd, "C:\\Instrument\\Apps\\EPICS");
        let upstream = resolve_upstream(&mode, &shell).await;
        (upstream, executor.calls().len())
    }

    #[tokio::test]
    async fn test_static_modes_issue_no_commands() {
        let (upstream, calls) = resolve(UpstreamMode::Hostname, ScriptedExecutor::new("NDXLARMOR")).await;
        assert_eq!(upstream.as_deref(), Some("origin/NDXLARMOR"));
        assert_eq!(calls, 0);

        let (upstream, _) = resolve(UpstreamMode::Main, ScriptedExecutor::new("NDXA")).await;
        assert_eq!(upstream.as_deref(), Some("origin/main"));

        let (upstream, _) = resolve(UpstreamMode::Master, ScriptedExecutor::new("NDXA")).await;
        assert_eq!(upstream.as_deref(), Some("origin/master"));

        let (upstream, _) = resolve(
            UpstreamMode::Literal("origin/release".to_string()),
            ScriptedExecutor::new("NDXA"),
        )
        .await;
        assert_eq!(upstream.as_deref(), Some("origin/release"));
    }

    #[tokio::test]
    async fn test_epics_marker_selects_galil_old() {
        let executor = ScriptedExecutor::new("NDXA")
            .respond("git log", "commit abc\n    Merge branch 'galil-old' into NDXA\n");
        let (upstream, calls) = resolve(UpstreamMode::Epics, executor).await;

        assert_eq!(upstream.as_deref(), Some("origin/galil-old"));
        assert_eq!(calls, 1);

        let executor = ScriptedExecutor::new("NDXA").respond("git log", "commit abc\n    Tidy\n");
        let (upstream, _) = resolve(UpstreamMode::Epics, executor).await;
        assert_eq!(upstream.as_deref(), Some("origin/main"));
    }

    #[tokio::test]
    async fn test_epics_log_failure_resolves_nothing() {
        let executor = ScriptedExecutor::new("NDXA").unreachable("git log");
        let (upstream, _) = resolve(UpstreamMode::Epics, executor).await;

        assert_eq!(upstream, None);
    }
}
