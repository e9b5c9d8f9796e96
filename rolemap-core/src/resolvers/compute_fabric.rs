use super::{SubsystemOutcome, SubsystemResolver, network_overlay};
use crate::attributes::is_truthy;
use crate::{AttributeStore, HostAddress, Resolution, Result, Role, RoleError, Subsystem};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Deserialize)]
struct ComputeFabricSection {
    topology: ComputeTopology,
    #[serde(default)]
    network: Value,
}

#[derive(Debug, Deserialize)]
struct ComputeTopology {
    #[serde(rename = "clc-1")]
    control_plane: HostAddress,
    #[serde(rename = "user-facing")]
    user_facing: Vec<HostAddress>,
    walrus: Option<HostAddress>,
    clusters: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ClusterRecord {
    #[serde(rename = "cc-1")]
    cluster_controller: Option<HostAddress>,
    #[serde(rename = "sc-1")]
    storage_controller: Option<HostAddress>,
    nodes: Option<WorkerList>,
}

/// Worker addresses, either whitespace separated or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkerList {
    Spaced(String),
    Listed(Vec<HostAddress>),
}

impl WorkerList {
    fn into_addresses(self) -> Vec<HostAddress> {
        match self {
            WorkerList::Spaced(text) => text.split_whitespace().map(HostAddress::from).collect(),
            WorkerList::Listed(addresses) => addresses,
        }
    }
}

/// Fills the control plane, per-cluster and overlay roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeFabricResolver;

impl ComputeFabricResolver {
    pub fn new() -> Self {
        Self
    }
}

impl SubsystemResolver for ComputeFabricResolver {
    fn subsystem(&self) -> Subsystem {
        Subsystem::ComputeFabric
    }

    fn resolve(
        &self,
        store: &AttributeStore,
        resolution: &mut Resolution,
    ) -> Result<SubsystemOutcome> {
        let Some(section) = store.decode_section::<ComputeFabricSection>(Subsystem::ComputeFabric)?
        else {
            return Ok(SubsystemOutcome::Skipped);
        };
        let ComputeFabricSection { topology, network } = section;

        let roles = resolution.roles_mut();
        roles.set_only(Role::ControlPlane, topology.control_plane);
        roles.replace(Role::UserFacing, topology.user_facing.into_iter().collect());

        // Without a walrus host, object storage is served by the riakcs cluster.
        match topology.walrus {
            Some(walrus) => roles.set_only(Role::ObjectGateway, walrus),
            None => roles.replace(Role::ObjectGateway, BTreeSet::new()),
        }

        for (name, record) in &topology.clusters {
            let hosts = resolve_cluster(name, record, resolution)?;
            tracing::debug!("Cluster {} resolved with {} hosts", name, hosts.len());
            resolution.record_cluster(name, hosts);
        }

        if let Some(overlay) = network_overlay::overlay_section(store, &network) {
            network_overlay::apply(&network, overlay, resolution.roles_mut());
        }

        Ok(SubsystemOutcome::Resolved)
    }
}

/// Records are decoded one at a time so every failure names its cluster. A
/// null or empty record has no cluster controller.
fn resolve_cluster(
    name: &str,
    record: &Value,
    resolution: &mut Resolution,
) -> Result<BTreeSet<HostAddress>> {
    if !is_truthy(record) {
        return Err(RoleError::MissingClusterController(name.to_string()));
    }
    let cluster =
        ClusterRecord::deserialize(record).map_err(|error| RoleError::MalformedCluster {
            cluster: name.to_string(),
            reason: error.to_string(),
        })?;

    let cluster_controller = cluster
        .cluster_controller
        .ok_or_else(|| RoleError::MissingClusterController(name.to_string()))?;
    let storage_controller = cluster
        .storage_controller
        .ok_or_else(|| RoleError::MissingStorageController(name.to_string()))?;
    let workers = cluster
        .nodes
        .ok_or_else(|| RoleError::MissingClusterNodes(name.to_string()))?
        .into_addresses();

    let roles = resolution.roles_mut();
    roles.insert(Role::ClusterController, cluster_controller.clone());
    roles.insert(Role::StorageController, storage_controller.clone());
    roles.extend(Role::NodeController, workers.iter().cloned());

    let mut hosts = BTreeSet::from([cluster_controller, storage_controller]);
    hosts.extend(workers);
    Ok(hosts)
}
