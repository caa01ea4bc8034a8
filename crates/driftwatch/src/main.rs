//! driftwatch
//!
//! Audits instrument working copies for uncommitted changes and for commits
//! missing on either side of their upstream branch. Exits 1 when anything
//! needs attention.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use driftwatch_core::{CancelHandle, FleetAuditor, FsArchiver, HostDriftChecker};
use driftwatch_inventory::{HttpDiscovery, InstrumentDiscovery, InventoryError, TargetSource};

mod config;
mod factory;

use config::Args;
use factory::DefaultExecutorFactory;

/// Conventional shell status for a process ended by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = args.audit_config().wrap_err("invalid configuration")?;

    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?config, "running in debug mode");

    let source = TargetSource::select(
        args.use_test_instrument_list,
        &args.test_instrument_list,
        || {
            let url = args.instlist_url.as_deref().ok_or_else(|| {
                InventoryError::ConfigError(
                    "INSTLIST_URL is required unless the test instrument list is used".to_string(),
                )
            })?;
            let discovery = HttpDiscovery::new(url, args.config_version_url.clone(), args.timeout())?;
            Ok(Arc::new(discovery) as Arc<dyn InstrumentDiscovery>)
        },
    )?;
    let hosts = driftwatch_inventory::resolve_targets(&source)
        .await
        .wrap_err("could not determine which hosts to audit")?;

    let config = Arc::new(config);
    let checker = HostDriftChecker::new(
        config.clone(),
        Arc::new(DefaultExecutorFactory::new(&config)),
        Arc::new(FsArchiver::new(&config.results_dir)),
    );
    let auditor = FleetAuditor::new(Arc::new(checker));

    let cancel = auditor.cancel_handle();
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, cancel).await {
            warn!("second interrupt received, exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let summary = auditor.audit(&hosts).await;

    info!("summary of results");
    print!("{summary}");

    Ok(ExitCode::from(summary.verdict().exit_code()))
}

/// Cancels the audit on the first interrupt, then resolves to `true` once a
/// second one arrives
async fn watch_interrupts<F, Fut>(mut interrupt: F, cancel: CancelHandle) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    warn!("interrupt received, stopping after the current hosts; press Ctrl-C again to quit");
    cancel.cancel();

    interrupt().await.is_ok()
}
