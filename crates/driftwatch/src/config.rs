//! Command-line / environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use driftwatch_core::{AuditConfig, ShellFlavor, UpstreamMode};
use driftwatch_exec::Credentials;
use driftwatch_inventory::discovery::DEFAULT_CONFIG_VERSION_URL;

/// Audit instrument working copies for uncommitted or unpushed changes
///
/// Every option can also be supplied through the environment variable
/// shown next to it, which is how the CI pipeline configures the run.
#[derive(Parser, Debug)]
#[command(name = "driftwatch", version, about)]
pub struct Args {
    /// Repository path on the audited hosts
    #[arg(long, env = "REPO_DIR")]
    pub repo_dir: String,

    /// Upstream branch mode: hostname, epics, main, master or a literal ref
    #[arg(long, env = "UPSTREAM_BRANCH_CONFIG")]
    pub upstream_branch: UpstreamMode,

    /// SSH username
    #[arg(long, env = "SSH_CREDENTIALS_USR")]
    pub ssh_user: String,

    /// SSH password
    #[arg(long, env = "SSH_CREDENTIALS_PSW", hide_env_values = true)]
    pub ssh_password: String,

    /// SSH port
    #[arg(long, env = "SSH_PORT", default_value_t = 22)]
    pub ssh_port: u16,

    /// Seconds allowed for each connect, authenticate or command step
    #[arg(long, env = "SSH_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Shell on the audited hosts (cmd or posix)
    #[arg(long, env = "REMOTE_SHELL", default_value = "cmd")]
    pub remote_shell: ShellFlavor,

    /// Directory receiving git_status/<host>.txt
    #[arg(long, env = "WORKSPACE", default_value = ".")]
    pub results_dir: PathBuf,

    /// Audit the test list instead of discovered instruments
    #[arg(long, env = "USE_TEST_INSTRUMENT_LIST", default_value_t = false, action = ArgAction::Set)]
    pub use_test_instrument_list: bool,

    /// Comma-separated hostnames used with the test list switch
    #[arg(long, env = "TEST_INSTRUMENT_LIST", default_value = "")]
    pub test_instrument_list: String,

    /// Include porcelain status lines in the report
    #[arg(long, env = "SHOW_UNCOMMITTED_CHANGES_MESSAGES", default_value_t = false, action = ArgAction::Set)]
    pub show_uncommitted_changes_messages: bool,

    /// Archive `git diff` output next to the status
    #[arg(long, env = "CAPTURE_DIFF", default_value_t = true, action = ArgAction::Set)]
    pub capture_diff: bool,

    /// Only report commits whose subject starts with this prefix
    #[arg(long, env = "COMMIT_PREFIX")]
    pub commit_prefix: Option<String>,

    /// Number of hosts checked at once
    #[arg(long, env = "AUDIT_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// URL of the JSON instrument list
    #[arg(long, env = "INSTLIST_URL")]
    pub instlist_url: Option<String>,

    /// Base URL of config_version.txt, the hostname is appended
    #[arg(long, env = "INST_CONFIG_VERSION_URL", default_value = DEFAULT_CONFIG_VERSION_URL)]
    pub config_version_url: String,

    /// Verbose logging
    #[arg(long, env = "DEBUG_MODE", default_value_t = false, action = ArgAction::Set)]
    pub debug: bool,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the validated audit configuration
    pub fn audit_config(&self) -> eyre::Result<AuditConfig> {
        let mut config = AuditConfig::new(
            self.repo_dir.clone(),
            Credentials::new(self.ssh_user.clone(), self.ssh_password.clone()),
            self.upstream_branch.clone(),
        );
        config.shell = self.remote_shell;
        config.show_uncommitted_messages = self.show_uncommitted_changes_messages;
        config.capture_diff = self.capture_diff;
        config.commit_prefix = self.commit_prefix.clone().filter(|p| !p.is_empty());
        config.ssh_port = self.ssh_port;
        config.timeout = self.timeout();
        config.concurrency = self.concurrency;
        config.results_dir = self.results_dir.clone();
        config.debug = self.debug;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "driftwatch",
            "--repo-dir",
            "C:\\Instrument\\Settings\\config",
            "--upstream-branch",
            "hostname",
            "--ssh-user",
            "spudulike",
            "--ssh-password",
            "secret",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        let config = args.audit_config().unwrap();

        assert_eq!(config.upstream, UpstreamMode::Hostname);
        assert_eq!(config.shell, ShellFlavor::Cmd);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!args.use_test_instrument_list);
        assert!(!config.show_uncommitted_messages);
        assert!(config.capture_diff);
        assert_eq!(config.commit_prefix, None);
        assert!(!config.debug);
    }

    #[test]
    fn test_debug_mode_reaches_audit_config() {
        let config = parse(&["--debug", "true"]).audit_config().unwrap();

        assert!(config.debug);
    }

    #[test]
    fn test_pipeline_switches() {
        let args = parse(&[
            "--use-test-instrument-list",
            "true",
            "--test-instrument-list",
            "NDXA, NDXB",
            "--show-uncommitted-changes-messages",
            "true",
            "--remote-shell",
            "posix",
            "--commit-prefix",
            "Hotfix:",
        ]);
        let config = args.audit_config().unwrap();

        assert!(args.use_test_instrument_list);
        assert_eq!(args.test_instrument_list, "NDXA, NDXB");
        assert!(config.show_uncommitted_messages);
        assert_eq!(config.shell, ShellFlavor::Posix);
        assert_eq!(config.commit_prefix.as_deref(), Some("Hotfix:"));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(parse(&["--concurrency", "0"]).audit_config().is_err());
        assert!(
            Args::try_parse_from([
                "driftwatch",
                "--repo-dir",
                "/srv/repo",
                "--upstream-branch",
                "main",
                "--ssh-user",
                "u",
                "--ssh-password",
                "p",
                "--remote-shell",
                "fish",
            ])
            .is_err()
        );
    }
}
