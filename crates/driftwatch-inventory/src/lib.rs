//! driftwatch-inventory: Which hosts to audit
//!
//! Either a fixed comma-separated test list, or the live instrument list
//! narrowed to instruments running one of the two newest configuration
//! versions.

pub mod discovery;
pub mod error;
pub mod resolver;
pub mod types;

pub use discovery::{HttpDiscovery, InstrumentDiscovery};
pub use error::InventoryError;
pub use resolver::{
    TargetSource, parse_host_list, parse_major_version, resolve_targets, select_latest_versions,
};
pub use types::{InstrumentRecord, VersionedHost};
