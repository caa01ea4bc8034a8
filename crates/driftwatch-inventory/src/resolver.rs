//! Audit target resolution

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::discovery::InstrumentDiscovery;
use crate::error::InventoryError;
use crate::types::VersionedHost;

/// Where the list of hosts comes from
#[derive(Clone)]
pub enum TargetSource {
    /// Comma-separated hostnames, discovery is never consulted
    TestList(String),
    /// Live instrument list filtered by configuration version
    Discovery(Arc<dyn InstrumentDiscovery>),
}

impl TargetSource {
    /// Pick the source from the pipeline switches
    ///
    /// `discovery` is only invoked when the test list is not in use.
    ///
    /// # Errors
    /// Propagates the error from building the discovery client
    pub fn select<F>(use_test_list: bool, test_list: &str, discovery: F) -> Result<Self, InventoryError>
    where
        F: FnOnce() -> Result<Arc<dyn InstrumentDiscovery>, InventoryError>,
    {
        if use_test_list {
            Ok(TargetSource::TestList(test_list.to_string()))
        } else {
            Ok(TargetSource::Discovery(discovery()?))
        }
    }
}

impl std::fmt::Debug for TargetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetSource::TestList(list) => f.debug_tuple("TestList").field(list).finish(),
            TargetSource::Discovery(_) => f.write_str("Discovery"),
        }
    }
}

/// Split a comma-separated host list, trimming and dropping empty entries
#[must_use]
pub fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading number of a dotted version string, e.g. `15` for `15.0.1`
#[must_use]
pub fn parse_major_version(text: &str) -> Option<u32> {
    text.trim().split('.').next()?.trim().parse().ok()
}

/// Keep hosts on the newest two major versions, in their original order
#[must_use]
pub fn select_latest_versions(hosts: &[VersionedHost]) -> Vec<String> {
    let versions: BTreeSet<u32> = hosts.iter().map(|h| h.major_version).collect();
    let newest: Vec<u32> = versions.iter().rev().take(2).copied().collect();

    hosts
        .iter()
        .filter(|h| newest.contains(&h.major_version))
        .map(|h| h.hostname.clone())
        .collect()
}

/// Produce the ordered list of hosts to audit
///
/// # Errors
/// Returns `InventoryError::NoHosts` when nothing is left to audit, or the
/// discovery error when the instrument list cannot be fetched
#[instrument(skip(source))]
pub async fn resolve_targets(source: &TargetSource) -> Result<Vec<String>, InventoryError> {
    let hosts = match source {
        TargetSource::TestList(raw) => {
            info!("using test instrument list");
            parse_host_list(raw)
        }
        TargetSource::Discovery(discovery) => {
            info!("getting instruments on the two latest configuration versions");
            discover(discovery.as_ref()).await?
        }
    };

    if hosts.is_empty() {
        return Err(InventoryError::NoHosts(format!("{source:?} resolved to nothing")));
    }

    info!(count = hosts.len(), hosts = ?hosts, "resolved audit targets");
    Ok(hosts)
}

async fn discover(discovery: &dyn InstrumentDiscovery) -> Result<Vec<String>, InventoryError> {
    let mut versioned = Vec::new();

    for instrument in discovery.instruments().await? {
        if instrument.seci {
            continue;
        }

        let hostname = instrument.host_name;
        let version = match discovery.config_version(&hostname).await {
            Ok(text) => text,
            Err(e) => {
                warn!(host = %hostname, error = %e, "skipping instrument without config version");
                continue;
            }
        };

        match parse_major_version(&version) {
            Some(major_version) => {
                debug!(
                    instrument = %instrument.name,
                    host = %hostname,
                    major_version,
                    "found instrument"
                );
                versioned.push(VersionedHost {
                    hostname,
                    major_version,
                });
            }
            None => {
                warn!(host = %hostname, version = %version.trim(), "unparsable config version");
            }
        }
    }

    Ok(select_latest_versions(&versioned))
}
