//! Fleet audit loop
//!
//! Hosts are checked in batches of `concurrency` tasks. Results are awaited
//! in the order the hosts were supplied and folded into the summary by this
//! loop alone, so the report is reproducible whatever order tasks finish in.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::checker::HostDriftChecker;
use crate::summary::FleetSummary;

/// Stops an audit before its next batch starts
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs the drift checker over a list of hosts
pub struct FleetAuditor {
    checker: Arc<HostDriftChecker>,
    concurrency: usize,
    cancel: CancelHandle,
}

impl FleetAuditor {
    pub fn new(checker: Arc<HostDriftChecker>) -> Self {
        let concurrency = checker.config().concurrency.max(1);
        Self {
            checker,
            concurrency,
            cancel: CancelHandle::default(),
        }
    }

    /// Handle that aborts the audit between batches
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Check every host and triage the results
    pub async fn audit(&self, hosts: &[String]) -> FleetSummary {
        let mut summary = FleetSummary::new();

        info!(
            total_hosts = hosts.len(),
            batch_size = self.concurrency,
            "starting fleet audit"
        );

        for (batch_index, batch) in hosts.chunks(self.concurrency).enumerate() {
            if self.cancel.is_cancelled() {
                let skipped = &hosts[batch_index * self.concurrency..];
                warn!(skipped = skipped.len(), "audit cancelled, remaining hosts not checked");
                for hostname in skipped {
                    summary.record_undeterminable(hostname);
                }
                break;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for hostname in batch {
                info!(host = %hostname, "checking host");
                let checker = Arc::clone(&self.checker);
                let host = hostname.clone();
                let handle = tokio::spawn(async move { checker.check_host(&host).await });
                handles.push((hostname, handle));
            }

            for (hostname, handle) in handles {
                match handle.await {
                    Ok(Ok(record)) => summary.record(&record),
                    Ok(Err(e)) => {
                        error!(host = %hostname, error = %e, "could not check host");
                        summary.record_undeterminable(hostname);
                    }
                    Err(e) => {
                        error!(host = %hostname, error = %e, "host check panicked");
                        summary.record_undeterminable(hostname);
                    }
                }
            }
        }

        info!(verdict = ?summary.verdict(), "fleet audit finished");
        summary
    }
}
