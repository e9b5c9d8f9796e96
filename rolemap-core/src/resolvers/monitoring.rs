use super::{NodeRecord, SubsystemOutcome, SubsystemResolver, decode_node};
use crate::{AttributeStore, Resolution, Result, Role, RoleError, Subsystem};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct MonitoringSection {
    topology: MonitoringTopology,
}

#[derive(Debug, Deserialize)]
struct MonitoringTopology {
    mon_bootstrap: Option<Value>,
    mons: Option<Vec<NodeRecord>>,
    osds: Option<Vec<NodeRecord>>,
}

/// Fills `mon-bootstrap`, `ceph-mons` and `ceph-osds`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitoringResolver;

impl MonitoringResolver {
    pub fn new() -> Self {
        Self
    }
}

impl SubsystemResolver for MonitoringResolver {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Monitoring
    }

    fn resolve(
        &self,
        store: &AttributeStore,
        resolution: &mut Resolution,
    ) -> Result<SubsystemOutcome> {
        let Some(section) = store.decode_section::<MonitoringSection>(Subsystem::Monitoring)? else {
            return Ok(SubsystemOutcome::Skipped);
        };
        let topology = section.topology;
        let roles = resolution.roles_mut();

        let bootstrap = decode_node(Subsystem::Monitoring, topology.mon_bootstrap.as_ref())?
            .ok_or(RoleError::MissingBootstrapMonitor)?;
        roles.set_only(Role::MonitorBootstrap, bootstrap.ipaddr);

        if let Some(mons) = topology.mons {
            roles.extend(Role::Monitor, mons.into_iter().map(|mon| mon.ipaddr));
        }

        let osds = topology
            .osds
            .filter(|osds| !osds.is_empty())
            .ok_or(RoleError::MissingDataNodes)?;
        roles.extend(Role::DataNode, osds.into_iter().map(|osd| osd.ipaddr));

        Ok(SubsystemOutcome::Resolved)
    }
}
