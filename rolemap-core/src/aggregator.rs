use crate::{
    AttributeStore, ComputeFabricResolver, MonitoringResolver, ObjectStorageResolver, Resolution,
    Result, Role, RoleMap, SubsystemOutcome, SubsystemResolver,
};

/// Runs the subsystem resolvers over one role map.
pub struct RoleAggregator {
    resolvers: Vec<Box<dyn SubsystemResolver>>,
}

impl Default for RoleAggregator {
    /// Object storage, then monitoring, then the compute fabric.
    fn default() -> Self {
        Self::with_resolvers(vec![
            Box::new(ObjectStorageResolver::new()),
            Box::new(MonitoringResolver::new()),
            Box::new(ComputeFabricResolver::new()),
        ])
    }
}

impl RoleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolvers(resolvers: Vec<Box<dyn SubsystemResolver>>) -> Self {
        Self { resolvers }
    }

    /// A role map with every catalog role present and empty.
    pub fn initialize_roles() -> RoleMap {
        RoleMap::new()
    }

    /// Resolves every role. Fails on the first structural violation, in
    /// which case no role map is returned.
    pub fn resolve(&self, store: &AttributeStore) -> Result<Resolution> {
        let mut resolution = Resolution::new(Self::initialize_roles());

        for resolver in &self.resolvers {
            let subsystem = resolver.subsystem();
            match resolver.resolve(store, &mut resolution)? {
                SubsystemOutcome::Resolved => {
                    tracing::debug!("Resolved roles for {} section", subsystem);
                }
                SubsystemOutcome::Skipped => {
                    tracing::debug!("No {} section in environment; skipping", subsystem);
                }
            }
        }

        resolution.roles_mut().refresh_all();

        tracing::info!(
            "Resolved {} hosts across {} roles",
            resolution.all_hosts().len(),
            resolution
                .roles()
                .iter()
                .filter(|(role, hosts)| *role != Role::All && !hosts.is_empty())
                .count()
        );

        Ok(resolution)
    }
}
