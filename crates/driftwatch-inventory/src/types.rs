//! Inventory type definitions

use serde::{Deserialize, Serialize};

/// One entry of the published instrument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    /// Instrument name
    pub name: String,
    /// Machine the instrument control software runs on
    pub host_name: String,
    /// Still on the legacy control system, never audited
    #[serde(default)]
    pub seci: bool,
}

/// A host together with the major version of its configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedHost {
    pub hostname: String,
    pub major_version: u32,
}
