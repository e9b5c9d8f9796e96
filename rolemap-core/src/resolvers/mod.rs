//! Subsystem resolvers
//!
//! Each resolver reads one section of the environment and fills the roles
//! that subsystem owns. A missing section is reported as
//! [`SubsystemOutcome::Skipped`]; a present but incomplete one is an error.

pub mod compute_fabric;
pub mod monitoring;
pub mod network_overlay;
pub mod object_storage;

pub use compute_fabric::ComputeFabricResolver;
pub use monitoring::MonitoringResolver;
pub use object_storage::ObjectStorageResolver;

use crate::attributes::is_truthy;
use crate::{AttributeStore, HostAddress, Resolution, Result, RoleError, Subsystem};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsystemOutcome {
    /// The section was present and its roles were filled.
    Resolved,
    /// The section is absent from the document.
    Skipped,
}

pub trait SubsystemResolver {
    fn subsystem(&self) -> Subsystem;

    fn resolve(
        &self,
        store: &AttributeStore,
        resolution: &mut Resolution,
    ) -> Result<SubsystemOutcome>;
}

/// A `{ ipaddr: ... }` entry in a topology.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeRecord {
    pub ipaddr: HostAddress,
}

/// Decodes a single-node entry such as `head` or `mon_bootstrap`. A null or
/// empty entry counts as not configured.
pub(crate) fn decode_node(
    subsystem: Subsystem,
    entry: Option<&Value>,
) -> Result<Option<NodeRecord>> {
    let Some(entry) = entry.filter(|value| is_truthy(value)) else {
        return Ok(None);
    };

    NodeRecord::deserialize(entry)
        .map(Some)
        .map_err(|error| RoleError::malformed(subsystem, error))
}
