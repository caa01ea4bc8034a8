//! SSH command execution using russh crate

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use russh::keys::ssh_key;
use russh::{ChannelMsg, Disconnect, client};
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

use crate::error::ExecError;
use crate::result::{CommandResult, ConnectionInfo, Credentials};
use crate::traits::RemoteExecutor;

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Accept all server keys (like StrictHostKeyChecking=no)
        Ok(true)
    }
}

/// SSH command executor
///
/// Every call to [`RemoteExecutor::run`] opens a fresh session, runs exactly
/// one command and disconnects again, whatever the outcome. Nothing is pooled
/// between commands.
pub struct SshExecutor {
    /// Connection configuration
    conn_info: ConnectionInfo,
    /// Password credentials
    credentials: Credentials,
}

impl std::fmt::Debug for SshExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshExecutor")
            .field("conn_info", &self.conn_info)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl SshExecutor {
    /// Create a new SSH executor
    pub fn new(conn_info: ConnectionInfo, credentials: Credentials) -> Self {
        Self {
            conn_info,
            credentials,
        }
    }

    /// Get connection info
    pub fn connection_info(&self) -> &ConnectionInfo {
        &self.conn_info
    }

    fn limit(&self) -> Duration {
        self.conn_info.timeout
    }

    /// Connect and authenticate with username/password
    #[instrument(skip(self), fields(host = %self.conn_info.host))]
    async fn open_session(&self) -> Result<client::Handle<SshClientHandler>, ExecError> {
        let limit = self.limit();

        debug!(
            host = %self.conn_info.host,
            port = self.conn_info.port,
            user = %self.credentials.username,
            "connecting to SSH"
        );

        let config = Arc::new(client::Config {
            inactivity_timeout: Some(limit),
            ..Default::default()
        });

        let mut session = timeout(
            limit,
            client::connect(
                config,
                (&self.conn_info.host[..], self.conn_info.port),
                SshClientHandler,
            ),
        )
        .await
        .map_err(|_| ExecError::Timeout {
            stage: "connect",
            timeout: limit,
        })?
        .map_err(|e| ExecError::ConnectionFailed(e.to_string()))?;

        let auth_res = timeout(
            limit,
            session.authenticate_password(
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            ),
        )
        .await
        .map_err(|_| ExecError::Timeout {
            stage: "authentication",
            timeout: limit,
        })?
        .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;

        if !auth_res.success() {
            return Err(ExecError::AuthenticationFailed(format!(
                "password authentication rejected for {}",
                self.credentials.username
            )));
        }

        Ok(session)
    }

    /// Execute command on an authenticated session
    async fn execute_remote(
        session: &mut client::Handle<SshClientHandler>,
        cmd: &str,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        channel
            .exec(true, cmd)
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let mut status = -1;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Exit status may arrive after EOF, so only stop once the channel closes
        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == 1 {
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    status = exit_status.cast_signed();
                }
                Some(ChannelMsg::Close) | None => break,
                _ => {}
            }
        }

        Ok(CommandResult {
            status,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
            duration: start.elapsed(),
        })
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    #[instrument(skip(self, cmd), fields(host = %self.conn_info.host))]
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        let limit = self.limit();
        let mut session = self.open_session().await?;

        debug!(command = %cmd, "executing remote command");

        let result = timeout(limit, Self::execute_remote(&mut session, cmd)).await;

        if let Err(e) = session
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            warn!(host = %self.conn_info.host, error = %e, "SSH disconnect failed");
        }

        match result {
            Ok(Ok(cmd_result)) => {
                debug!(
                    command = %cmd,
                    status = cmd_result.status,
                    duration = ?cmd_result.duration,
                    "remote command completed"
                );
                Ok(cmd_result)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                error!(command = %cmd, timeout = ?limit, "command timed out");
                Err(ExecError::Timeout {
                    stage: "command",
                    timeout: limit,
                })
            }
        }
    }

    fn host(&self) -> &str {
        &self.conn_info.host
    }

    fn executor_type(&self) -> &'static str {
        "ssh"
    }
}

/// Builder for `SshExecutor`
pub struct SshExecutorBuilder {
    conn_info: ConnectionInfo,
    credentials: Credentials,
}

impl SshExecutorBuilder {
    /// Create builder with required fields
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            conn_info: ConnectionInfo::new(host),
            credentials,
        }
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.conn_info.port = port;
        self
    }

    /// Set connect/command timeout
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.conn_info.timeout = limit;
        self
    }

    /// Build the executor
    pub fn build(self) -> SshExecutor {
        SshExecutor::new(self.conn_info, self.credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_connection_fields() {
        let executor = SshExecutorBuilder::new("NDXA", Credentials::new("user", "pw"))
            .with_port(2222)
            .with_timeout(Duration::from_secs(3))
            .build();

        assert_eq!(executor.host(), "NDXA");
        assert_eq!(executor.connection_info().port, 2222);
        assert_eq!(executor.connection_info().timeout, Duration::from_secs(3));
        assert_eq!(executor.executor_type(), "ssh");
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_without_hanging() {
        // Reserved TEST-NET address, nothing answers there
        let executor = SshExecutorBuilder::new("192.0.2.1", Credentials::new("user", "pw"))
            .with_timeout(Duration::from_millis(200))
            .build();

        let outcome = executor.execute("git status --porcelain").await;
        assert!(!outcome.success);
        assert!(!outcome.output.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires SSH server"]
    async fn test_ssh_command_roundtrip() {
        let executor = SshExecutorBuilder::new("localhost", Credentials::new("user", "pw")).build();
        let result = executor.run("echo ok").await.unwrap();
        assert_eq!(result.stdout.trim(), "ok");
    }
}
