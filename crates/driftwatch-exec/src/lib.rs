//! driftwatch-exec: Remote execution abstraction
//!
//! Provides the executor trait plus SSH and local implementations. Every
//! command runs in its own short-lived session and is bounded by a timeout.

pub mod error;
pub mod local;
pub mod result;
pub mod ssh;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::{CommandOutcome, CommandResult, ConnectionInfo, Credentials};
pub use ssh::{SshExecutor, SshExecutorBuilder};
pub use traits::RemoteExecutor;
