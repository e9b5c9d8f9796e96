use crate::{Result, RoleError};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A function a host plays in the deployment.
///
/// The catalog is closed: every variant appears in [`Role::ALL`] in the order
/// consumers expect, and [`Role::All`] is the synthetic union of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "clc")]
    ControlPlane,
    #[serde(rename = "user-facing")]
    UserFacing,
    #[serde(rename = "walrus")]
    ObjectGateway,
    #[serde(rename = "midonet-api")]
    NetworkApi,
    #[serde(rename = "cluster-controller")]
    ClusterController,
    #[serde(rename = "storage-controller")]
    StorageController,
    #[serde(rename = "node-controller")]
    NodeController,
    #[serde(rename = "midolman")]
    NetworkAgent,
    #[serde(rename = "mon-bootstrap")]
    MonitorBootstrap,
    #[serde(rename = "ceph-mons")]
    Monitor,
    #[serde(rename = "ceph-osds")]
    DataNode,
    #[serde(rename = "riak-head")]
    StorageHead,
    #[serde(rename = "riak-node")]
    StorageNode,
    #[serde(rename = "haproxy")]
    HaproxyBalancer,
    #[serde(rename = "nginx")]
    NginxBalancer,
    #[serde(rename = "all")]
    All,
}

impl Role {
    pub const COUNT: usize = 16;

    pub const ALL: [Role; Role::COUNT] = [
        Role::ControlPlane,
        Role::UserFacing,
        Role::ObjectGateway,
        Role::NetworkApi,
        Role::ClusterController,
        Role::StorageController,
        Role::NodeController,
        Role::NetworkAgent,
        Role::MonitorBootstrap,
        Role::Monitor,
        Role::DataNode,
        Role::StorageHead,
        Role::StorageNode,
        Role::HaproxyBalancer,
        Role::NginxBalancer,
        Role::All,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Role::ControlPlane => "clc",
            Role::UserFacing => "user-facing",
            Role::ObjectGateway => "walrus",
            Role::NetworkApi => "midonet-api",
            Role::ClusterController => "cluster-controller",
            Role::StorageController => "storage-controller",
            Role::NodeController => "node-controller",
            Role::NetworkAgent => "midolman",
            Role::MonitorBootstrap => "mon-bootstrap",
            Role::Monitor => "ceph-mons",
            Role::DataNode => "ceph-osds",
            Role::StorageHead => "riak-head",
            Role::StorageNode => "riak-node",
            Role::HaproxyBalancer => "haproxy",
            Role::NginxBalancer => "nginx",
            Role::All => "all",
        }
    }

    /// Position of the role in [`Role::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(value: &str) -> Result<Self> {
        let tag = value.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.tag() == tag)
            .ok_or_else(|| RoleError::UnknownRole(tag.to_string()))
    }
}

/// An IP address or hostname, taken as given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostAddress(SmolStr);

impl HostAddress {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(SmolStr::new(address))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for HostAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HostAddress {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

impl AsRef<str> for HostAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for HostAddress {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_index() {
        for (position, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), position);
        }
        assert_eq!(Role::ALL.last(), Some(&Role::All));
    }

    #[test]
    fn test_tags_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.tag().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" riak-head ".parse::<Role>().unwrap(), Role::StorageHead);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let error = "load-balancer".parse::<Role>().unwrap_err();
        assert!(matches!(error, RoleError::UnknownRole(tag) if tag == "load-balancer"));
    }

    #[test]
    fn test_serde_uses_tag() {
        let encoded = serde_json::to_string(&Role::NetworkAgent).unwrap();
        assert_eq!(encoded, "\"midolman\"");
        let decoded: Role = serde_json::from_str("\"ceph-osds\"").unwrap();
        assert_eq!(decoded, Role::DataNode);
    }

    #[test]
    fn test_host_address_is_transparent() {
        let address: HostAddress = serde_json::from_str("\"10.0.0.7\"").unwrap();
        assert_eq!(address.as_str(), "10.0.0.7");
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"10.0.0.7\"");
    }
}
