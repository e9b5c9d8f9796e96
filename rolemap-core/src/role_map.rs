use crate::{HostAddress, Role};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Hosts of every compute-fabric cluster, keyed by cluster name.
pub type ClusterHosts = BTreeMap<String, BTreeSet<HostAddress>>;

/// One host set per catalog role.
///
/// Sets live in a fixed array indexed by [`Role`], so a role can never be
/// missing from the map. Every insertion also lands in [`Role::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMap {
    sets: [BTreeSet<HostAddress>; Role::COUNT],
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> &BTreeSet<HostAddress> {
        &self.sets[role.index()]
    }

    pub fn all(&self) -> &BTreeSet<HostAddress> {
        self.get(Role::All)
    }

    pub fn contains(&self, role: Role, address: &str) -> bool {
        self.get(role).contains(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<HostAddress>)> {
        Role::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(BTreeSet::is_empty)
    }

    /// Adds `address` to `role`. Returns false if it was already there.
    pub fn insert(&mut self, role: Role, address: HostAddress) -> bool {
        self.sets[Role::All.index()].insert(address.clone());
        self.sets[role.index()].insert(address)
    }

    pub fn extend<I>(&mut self, role: Role, addresses: I)
    where
        I: IntoIterator<Item = HostAddress>,
    {
        for address in addresses {
            self.insert(role, address);
        }
    }

    /// Makes `address` the only member of `role`.
    pub fn set_only(&mut self, role: Role, address: HostAddress) {
        self.replace(role, BTreeSet::from([address]));
    }

    /// Replaces the whole set of `role`.
    pub fn replace(&mut self, role: Role, addresses: BTreeSet<HostAddress>) {
        self.sets[Role::All.index()].extend(addresses.iter().cloned());
        self.sets[role.index()] = addresses;
    }

    /// Rebuilds [`Role::All`] as the union of every other role.
    pub fn refresh_all(&mut self) {
        let union: BTreeSet<HostAddress> = self
            .iter()
            .filter(|(role, _)| *role != Role::All)
            .flat_map(|(_, hosts)| hosts.iter().cloned())
            .collect();
        self.sets[Role::All.index()] = union;
    }
}

impl Serialize for RoleMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Role::COUNT))?;
        for (role, hosts) in self.iter() {
            map.serialize_entry(role.tag(), hosts)?;
        }
        map.end()
    }
}

/// Outcome of a full role resolution.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Resolution {
    roles: RoleMap,
    clusters: ClusterHosts,
}

impl Resolution {
    pub(crate) fn new(roles: RoleMap) -> Self {
        Self {
            roles,
            clusters: ClusterHosts::new(),
        }
    }

    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    pub fn hosts(&self, role: Role) -> &BTreeSet<HostAddress> {
        self.roles.get(role)
    }

    pub fn all_hosts(&self) -> &BTreeSet<HostAddress> {
        self.roles.all()
    }

    pub fn clusters(&self) -> &ClusterHosts {
        &self.clusters
    }

    pub fn cluster_hosts(&self, name: &str) -> Option<&BTreeSet<HostAddress>> {
        self.clusters.get(name)
    }

    pub(crate) fn roles_mut(&mut self) -> &mut RoleMap {
        &mut self.roles
    }

    /// Records a cluster's hosts and folds them into [`Role::All`].
    pub(crate) fn record_cluster(&mut self, name: &str, hosts: BTreeSet<HostAddress>) {
        self.roles.sets[Role::All.index()].extend(hosts.iter().cloned());
        self.clusters.entry(name.to_string()).or_default().extend(hosts);
    }
}
