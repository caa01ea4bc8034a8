//! Executor factory for audited hosts

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use driftwatch_core::{AuditConfig, CoreError, ExecutorFactory};
use driftwatch_exec::{Credentials, LocalExecutor, RemoteExecutor, SshExecutorBuilder};

/// SSH for every host, except the local machine which is run directly
pub struct DefaultExecutorFactory {
    credentials: Credentials,
    port: u16,
    timeout: Duration,
}

impl DefaultExecutorFactory {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            credentials: config.credentials.clone(),
            port: config.ssh_port,
            timeout: config.timeout,
        }
    }

    fn create_executor_sync(&self, hostname: &str) -> Result<Arc<dyn RemoteExecutor>, CoreError> {
        if hostname.is_empty() || hostname.contains(['/', '\\', ' ']) {
            return Err(CoreError::ExecutorError {
                host: hostname.to_string(),
                message: "not a valid hostname".to_string(),
            });
        }

        if hostname == "localhost" || hostname == "127.0.0.1" {
            return Ok(Arc::new(LocalExecutor::new(hostname, self.timeout)));
        }

        let executor = SshExecutorBuilder::new(hostname, self.credentials.clone())
            .with_port(self.port)
            .with_timeout(self.timeout)
            .build();
        Ok(Arc::new(executor))
    }
}

#[async_trait]
impl ExecutorFactory for DefaultExecutorFactory {
    async fn create_executor(&self, hostname: &str) -> Result<Arc<dyn RemoteExecutor>, CoreError> {
        self.create_executor_sync(hostname)
    }
}

#[cfg(test)]
mod tests {
    use driftwatch_core::UpstreamMode;

    use super::*;

    fn factory() -> DefaultExecutorFactory {
        DefaultExecutorFactory::new(&AuditConfig::new(
            "/srv/repo",
            Credentials::new("user", "pw"),
            UpstreamMode::Main,
        ))
    }

    #[test]
    fn test_localhost_executor_creation() {
        let executor = factory().create_executor_sync("localhost").unwrap();
        assert_eq!(executor.executor_type(), "local");
    }

    #[test]
    fn test_remote_executor_creation() {
        let executor = factory().create_executor_sync("NDXLARMOR").unwrap();
        assert_eq!(executor.executor_type(), "ssh");
        assert_eq!(executor.host(), "NDXLARMOR");
    }

    #[test]
    fn test_invalid_hostname() {
        assert!(factory().create_executor_sync("../etc").is_err());
        assert!(factory().create_executor_sync("").is_err());
    }
}
