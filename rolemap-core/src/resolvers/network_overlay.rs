//! Network overlay roles for the compute fabric.
//!
//! The gateway hostname comes from the fabric's network config and is
//! resolved to an address through the overlay's host mapping. When any link
//! of that chain is missing the roles fall back to `midolman = node-controller`
//! and `midonet-api = clc` without reporting an error.
//
// TODO: confirm with product owners whether an incomplete overlay chain
// should stay a silent fallback or become a reported misconfiguration.

use crate::{AttributeStore, HostAddress, Role, RoleMap, Subsystem};
use serde_json::Value;
use std::collections::BTreeSet;

/// Network mode in which the compute fabric runs on the overlay.
pub const OVERLAY_NETWORK_MODE: &str = "VPCMIDO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OverlayHosts {
    pub api: HostAddress,
    pub agents: BTreeSet<HostAddress>,
}

/// Returns the overlay section when the fabric's `network` settings enable it.
pub(crate) fn overlay_section<'a>(store: &'a AttributeStore, network: &Value) -> Option<&'a Value> {
    let overlay = store.section(Subsystem::NetworkOverlay)?;
    let mode = network.get("mode").and_then(Value::as_str)?;
    (mode == OVERLAY_NETWORK_MODE).then_some(overlay)
}

pub(crate) fn lookup_overlay_hosts(network: &Value, overlay: &Value) -> Option<OverlayHosts> {
    let gateway = network
        .get("config-json")?
        .get("Mido")?
        .get("EucanetdHost")?
        .as_str()?;
    let mapping = overlay.get("midolman-host-mapping")?.as_object()?;
    let api = mapping.get(gateway)?.as_str()?;

    Some(OverlayHosts {
        api: HostAddress::from(api),
        agents: mapping
            .values()
            .filter_map(Value::as_str)
            .map(HostAddress::from)
            .collect(),
    })
}

/// Fills `midonet-api` and `midolman`. Runs after `node-controller` and
/// `clc` are populated.
pub(crate) fn apply(network: &Value, overlay: &Value, roles: &mut RoleMap) {
    match lookup_overlay_hosts(network, overlay) {
        Some(hosts) => {
            roles.insert(Role::NetworkApi, hosts.api);
            let workers = roles.get(Role::NodeController).clone();
            roles.extend(Role::NetworkAgent, hosts.agents);
            roles.extend(Role::NetworkAgent, workers);
        }
        None => {
            tracing::debug!(
                "Network overlay lookup incomplete; using node controllers as agents and the control plane as API"
            );
            let workers = roles.get(Role::NodeController).clone();
            let control_plane = roles.get(Role::ControlPlane).clone();
            roles.replace(Role::NetworkAgent, workers);
            roles.replace(Role::NetworkApi, control_plane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn network() -> Value {
        json!({
            "mode": "VPCMIDO",
            "config-json": { "Mido": { "EucanetdHost": "gw-1" } },
        })
    }

    #[test]
    fn test_lookup_resolves_gateway_through_mapping() {
        let overlay = json!({
            "midolman-host-mapping": { "gw-1": "10.0.9.1", "nc-1": "10.0.9.2" },
        });

        let hosts = lookup_overlay_hosts(&network(), &overlay).unwrap();
        assert_eq!(hosts.api, HostAddress::from("10.0.9.1"));
        assert_eq!(hosts.agents.len(), 2);
    }

    #[test]
    fn test_lookup_fails_on_unmapped_gateway() {
        let overlay = json!({ "midolman-host-mapping": { "nc-1": "10.0.9.2" } });
        assert!(lookup_overlay_hosts(&network(), &overlay).is_none());
    }

    #[test]
    fn test_lookup_fails_without_gateway_host() {
        let network = json!({ "mode": "VPCMIDO", "config-json": { "Mido": {} } });
        let overlay = json!({ "midolman-host-mapping": { "gw-1": "10.0.9.1" } });
        assert!(lookup_overlay_hosts(&network, &overlay).is_none());
    }

    #[test]
    fn test_fallback_copies_existing_roles() {
        let mut roles = RoleMap::new();
        roles.insert(Role::ControlPlane, HostAddress::from("10.0.0.1"));
        roles.insert(Role::NodeController, HostAddress::from("10.0.1.1"));
        roles.insert(Role::NetworkAgent, HostAddress::from("10.0.7.7"));

        apply(&network(), &json!({ "version": "5.2" }), &mut roles);

        assert_eq!(roles.get(Role::NetworkAgent), roles.get(Role::NodeController));
        assert_eq!(roles.get(Role::NetworkApi), roles.get(Role::ControlPlane));
    }
}
