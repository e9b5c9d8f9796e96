use super::{SubsystemOutcome, SubsystemResolver, decode_node};
use crate::{AttributeStore, HostAddress, Resolution, Result, Role, RoleError, Subsystem};
use serde::Deserialize;
use serde_json::Value;

/// Top-level attribute that selects the nginx balancer.
pub const NGINX_KEY: &str = "nginx";
/// Top-level attribute that selects the haproxy balancer.
pub const HAPROXY_KEY: &str = "haproxy";

#[derive(Debug, Deserialize)]
struct ObjectStorageSection {
    topology: ObjectStorageTopology,
}

#[derive(Debug, Deserialize)]
struct ObjectStorageTopology {
    head: Option<Value>,
    nodes: Option<Vec<HostAddress>>,
    load_balancer: Option<HostAddress>,
}

/// Fills `riak-head`, `riak-node` and the load balancer roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectStorageResolver;

impl ObjectStorageResolver {
    pub fn new() -> Self {
        Self
    }
}

impl SubsystemResolver for ObjectStorageResolver {
    fn subsystem(&self) -> Subsystem {
        Subsystem::ObjectStorage
    }

    fn resolve(
        &self,
        store: &AttributeStore,
        resolution: &mut Resolution,
    ) -> Result<SubsystemOutcome> {
        let Some(section) = store.decode_section::<ObjectStorageSection>(Subsystem::ObjectStorage)?
        else {
            return Ok(SubsystemOutcome::Skipped);
        };
        let topology = section.topology;
        let roles = resolution.roles_mut();

        let head = decode_node(Subsystem::ObjectStorage, topology.head.as_ref())?
            .ok_or(RoleError::MissingHeadNode)?;
        roles.set_only(Role::StorageHead, head.ipaddr);

        if let Some(nodes) = topology.nodes {
            roles.extend(Role::StorageNode, nodes);
        }

        if let Some(address) = topology.load_balancer.filter(|address| !address.is_empty()) {
            let balancer = select_load_balancer(store)?;
            roles.set_only(balancer, address);
        }

        Ok(SubsystemOutcome::Resolved)
    }
}

/// Picks the balancer role from the top-level attributes. nginx is checked
/// first and is not supported yet.
fn select_load_balancer(store: &AttributeStore) -> Result<Role> {
    if store.has_flag(NGINX_KEY) {
        return Err(RoleError::UnsupportedLoadBalancer(Role::NginxBalancer));
    }
    if store.has_flag(HAPROXY_KEY) {
        return Ok(Role::HaproxyBalancer);
    }
    Err(RoleError::MissingLoadBalancer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_ATTRIBUTES_KEY, RoleMap};
    use std::collections::BTreeSet;

    fn resolve(yaml: &str) -> Result<Resolution> {
        let store = AttributeStore::from_yaml_str(yaml, DEFAULT_ATTRIBUTES_KEY).unwrap();
        let mut resolution = Resolution::new(RoleMap::new());
        ObjectStorageResolver::new().resolve(&store, &mut resolution)?;
        Ok(resolution)
    }

    fn hosts(values: &[&str]) -> BTreeSet<HostAddress> {
        values.iter().copied().map(HostAddress::from).collect()
    }

    #[test]
    fn test_absent_section_is_skipped() {
        let store = AttributeStore::from_yaml_str(
            "default_attributes:\n  ceph: {}\n",
            DEFAULT_ATTRIBUTES_KEY,
        )
        .unwrap();
        let mut resolution = Resolution::new(RoleMap::new());
        let outcome = ObjectStorageResolver::new()
            .resolve(&store, &mut resolution)
            .unwrap();

        assert_eq!(outcome, SubsystemOutcome::Skipped);
        assert!(resolution.roles().is_empty());
    }

    #[test]
    fn test_single_node_cluster() {
        let resolution = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      head:
        ipaddr: 10.0.5.1
"#,
        )
        .unwrap();

        assert_eq!(resolution.hosts(Role::StorageHead), &hosts(&["10.0.5.1"]));
        assert!(resolution.hosts(Role::StorageNode).is_empty());
        assert_eq!(resolution.all_hosts(), &hosts(&["10.0.5.1"]));
    }

    #[test]
    fn test_nodes_and_haproxy_balancer() {
        let resolution = resolve(
            r#"
default_attributes:
  haproxy:
    enabled: true
  riakcs_cluster:
    topology:
      head:
        ipaddr: 10.0.5.1
      nodes:
        - 10.0.5.2
        - 10.0.5.3
      load_balancer: 10.0.5.10
"#,
        )
        .unwrap();

        assert_eq!(
            resolution.hosts(Role::StorageNode),
            &hosts(&["10.0.5.2", "10.0.5.3"])
        );
        assert_eq!(resolution.hosts(Role::HaproxyBalancer), &hosts(&["10.0.5.10"]));
        assert!(resolution.hosts(Role::NginxBalancer).is_empty());
        assert_eq!(resolution.all_hosts().len(), 4);
    }

    #[test]
    fn test_missing_head_is_fatal() {
        let error = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      nodes: [10.0.5.2]
"#,
        )
        .unwrap_err();

        assert!(matches!(error, RoleError::MissingHeadNode));
    }

    #[test]
    fn test_null_head_is_fatal() {
        let error = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      head: ~
"#,
        )
        .unwrap_err();

        assert!(matches!(error, RoleError::MissingHeadNode));
    }

    #[test]
    fn test_empty_head_is_fatal() {
        let error = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      head: {}
      nodes: [10.0.5.2]
"#,
        )
        .unwrap_err();

        assert!(matches!(error, RoleError::MissingHeadNode));
    }

    #[test]
    fn test_head_without_address_is_malformed() {
        let error = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      head:
        hostname: riak-1
"#,
        )
        .unwrap_err();

        assert!(matches!(
            error,
            RoleError::MalformedSection {
                section: Subsystem::ObjectStorage,
                ..
            }
        ));
    }

    #[test]
    fn test_nginx_wins_over_haproxy_and_is_unsupported() {
        let error = resolve(
            r#"
default_attributes:
  nginx:
    enabled: true
  haproxy:
    enabled: true
  riakcs_cluster:
    topology:
      head:
        ipaddr: 10.0.5.1
      load_balancer: 10.0.5.10
"#,
        )
        .unwrap_err();

        assert!(matches!(
            error,
            RoleError::UnsupportedLoadBalancer(Role::NginxBalancer)
        ));
    }

    #[test]
    fn test_balancer_address_without_implementation_is_fatal() {
        let error = resolve(
            r#"
default_attributes:
  riakcs_cluster:
    topology:
      head:
        ipaddr: 10.0.5.1
      load_balancer: 10.0.5.10
"#,
        )
        .unwrap_err();

        assert!(matches!(error, RoleError::MissingLoadBalancer));
    }

    #[test]
    fn test_balancer_flags_ignored_without_address() {
        let resolution = resolve(
            r#"
default_attributes:
  nginx:
    enabled: true
  riakcs_cluster:
    topology:
      head:
        ipaddr: 10.0.5.1
"#,
        )
        .unwrap();

        assert!(resolution.hosts(Role::NginxBalancer).is_empty());
    }

    #[test]
    fn test_missing_topology_is_malformed() {
        let error = resolve("default_attributes:\n  riakcs_cluster:\n    admin_key: abc\n")
            .unwrap_err();

        assert!(matches!(
            error,
            RoleError::MalformedSection {
                section: Subsystem::ObjectStorage,
                ..
            }
        ));
    }
}
