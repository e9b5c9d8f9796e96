use crate::{Role, Subsystem};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RoleError>;

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse environment document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Malformed {section} section: {reason}")]
    MalformedSection { section: Subsystem, reason: String },

    #[error("No head node found for object-storage cluster")]
    MissingHeadNode,

    #[error("No load balancer found for object-storage cluster")]
    MissingLoadBalancer,

    #[error("{0} load balancer is not implemented yet")]
    UnsupportedLoadBalancer(Role),

    #[error("No monitor found for bootstrapping")]
    MissingBootstrapMonitor,

    #[error("No data node found for monitoring cluster")]
    MissingDataNodes,

    #[error("Malformed cluster {cluster}: {reason}")]
    MalformedCluster { cluster: String, reason: String },

    #[error("Unable to find cluster controller in topology for cluster {0}")]
    MissingClusterController(String),

    #[error("Unable to find storage controller in topology for cluster {0}")]
    MissingStorageController(String),

    #[error("Unable to find nodes in topology for cluster {0}")]
    MissingClusterNodes(String),
}

impl RoleError {
    pub(crate) fn malformed(section: Subsystem, reason: impl std::fmt::Display) -> Self {
        Self::MalformedSection {
            section,
            reason: reason.to_string(),
        }
    }

    /// True when a subsystem section is present but violates its schema.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedSection { .. }
                | Self::MissingHeadNode
                | Self::MissingLoadBalancer
                | Self::UnsupportedLoadBalancer(_)
                | Self::MissingBootstrapMonitor
                | Self::MissingDataNodes
                | Self::MalformedCluster { .. }
                | Self::MissingClusterController(_)
                | Self::MissingStorageController(_)
                | Self::MissingClusterNodes(_)
        )
    }

    /// Name of the compute-fabric cluster the error refers to, if any.
    pub fn cluster(&self) -> Option<&str> {
        match self {
            Self::MalformedCluster { cluster: name, .. }
            | Self::MissingClusterController(name)
            | Self::MissingStorageController(name)
            | Self::MissingClusterNodes(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_errors_carry_name() {
        let error = RoleError::MissingClusterNodes("zone-b".to_string());
        assert_eq!(error.cluster(), Some("zone-b"));
        assert!(error.is_structural());
        assert_eq!(
            error.to_string(),
            "Unable to find nodes in topology for cluster zone-b"
        );
    }

    #[test]
    fn test_malformed_cluster_is_named() {
        let error = RoleError::MalformedCluster {
            cluster: "zone-c".to_string(),
            reason: "invalid type".to_string(),
        };
        assert_eq!(error.cluster(), Some("zone-c"));
        assert!(error.is_structural());
        assert_eq!(error.to_string(), "Malformed cluster zone-c: invalid type");
    }

    #[test]
    fn test_ambient_errors_are_not_structural() {
        let error = RoleError::Config("missing attributes".to_string());
        assert!(!error.is_structural());
        assert_eq!(error.cluster(), None);
    }

    #[test]
    fn test_unsupported_balancer_message_uses_tag() {
        let error = RoleError::UnsupportedLoadBalancer(Role::NginxBalancer);
        assert_eq!(error.to_string(), "nginx load balancer is not implemented yet");
    }
}
