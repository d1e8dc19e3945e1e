use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use splitfee::access::{AccessContextResolver, AccessScope, CallerIdentity, ResolveError};
use splitfee::error::AppError;
use splitfee::stats::{
    ApplicationQuery, ApplicationRecord, MetricsRepository, Owner, Placement, RepositoryError,
    RoleQuery, RoleRecord,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Token grant entry in a marketplace snapshot.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdentityGrant {
    pub(crate) token: String,
    pub(crate) access: AccessScope,
}

/// Serialized marketplace state backing the in-memory collaborators.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MarketplaceSnapshot {
    #[serde(default)]
    pub(crate) identities: Vec<IdentityGrant>,
    #[serde(default)]
    pub(crate) roles: Vec<RoleRecord>,
    #[serde(default)]
    pub(crate) applications: Vec<ApplicationRecord>,
    #[serde(default)]
    pub(crate) placements: Vec<Placement>,
}

impl MarketplaceSnapshot {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub(crate) fn into_collaborators(self) -> (InMemoryAccessResolver, InMemoryMetricsStore) {
        let grants = self
            .identities
            .into_iter()
            .map(|grant| (grant.token, grant.access))
            .collect();
        let store = InMemoryMetricsStore {
            roles: Arc::new(self.roles),
            applications: Arc::new(self.applications),
            placements: Arc::new(self.placements),
        };
        (InMemoryAccessResolver { grants }, store)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccessResolver {
    grants: HashMap<String, AccessScope>,
}

#[async_trait]
impl AccessContextResolver for InMemoryAccessResolver {
    async fn resolve(&self, identity: &CallerIdentity) -> Result<AccessScope, ResolveError> {
        self.grants
            .get(identity.as_str())
            .cloned()
            .ok_or(ResolveError::UnknownIdentity)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricsStore {
    roles: Arc<Vec<RoleRecord>>,
    applications: Arc<Vec<ApplicationRecord>>,
    placements: Arc<Vec<Placement>>,
}

#[async_trait]
impl MetricsRepository for InMemoryMetricsStore {
    async fn count_roles(&self, query: &RoleQuery) -> Result<u64, RepositoryError> {
        Ok(self.roles.iter().filter(|role| query.matches(role)).count() as u64)
    }

    async fn count_applications(&self, query: &ApplicationQuery) -> Result<u64, RepositoryError> {
        Ok(self
            .applications
            .iter()
            .filter(|application| query.matches(application))
            .count() as u64)
    }

    async fn list_placements(&self, owner: &Owner) -> Result<Vec<Placement>, RepositoryError> {
        Ok(self
            .placements
            .iter()
            .filter(|placement| owner.owns_placement(placement))
            .cloned()
            .collect())
    }
}
