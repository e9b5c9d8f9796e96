//! Rolemap Core - host role resolution for cluster environments
//!
//! Walks the subsystem sections of an environment document and derives,
//! for every role in a fixed catalog, the hosts that must play it:
//! - compute fabric (`eucalyptus`), with an optional network overlay (`midokura`)
//! - object storage (`riakcs_cluster`)
//! - distributed monitoring (`ceph`)

pub mod aggregator;
pub mod attributes;
pub mod error;
pub mod resolvers;
pub mod role;
pub mod role_map;

pub use aggregator::RoleAggregator;
pub use attributes::{AttributeStore, DEFAULT_ATTRIBUTES_KEY, Subsystem};
pub use error::{Result, RoleError};
pub use resolvers::{
    ComputeFabricResolver, MonitoringResolver, ObjectStorageResolver, SubsystemOutcome,
    SubsystemResolver,
};
pub use role::{HostAddress, Role};
pub use role_map::{ClusterHosts, Resolution, RoleMap};
