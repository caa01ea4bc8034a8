//! Remote executor trait

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::{CommandOutcome, CommandResult};

/// Runs single shell commands against one target host
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run one command, surfacing transport problems as errors
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError>;

    /// Run one command and fold every failure into the returned value
    async fn execute(&self, cmd: &str) -> CommandOutcome {
        self.run(cmd).await.into()
    }

    /// Host this executor talks to
    fn host(&self) -> &str;

    /// Short label for logs
    fn executor_type(&self) -> &'static str;
}
