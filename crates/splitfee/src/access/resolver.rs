use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::stats::domain::{CandidateId, OrganizationId, RecruiterId};

/// Opaque external identity presented by the caller (e.g. a bearer token).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What an authenticated caller is allowed to see. Built per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessScope {
    pub identity_user_id: String,
    #[serde(default)]
    pub recruiter_id: Option<RecruiterId>,
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
    #[serde(default)]
    pub organization_ids: BTreeSet<OrganizationId>,
    #[serde(default)]
    pub is_platform_admin: bool,
}

/// Capability resolving a caller identity into an [`AccessScope`].
///
/// Implementations must be side-effect free so the metrics core can be driven
/// by fixed fakes in tests.
#[async_trait]
pub trait AccessContextResolver: Send + Sync {
    async fn resolve(&self, identity: &CallerIdentity) -> Result<AccessScope, ResolveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("identity token is not recognized")]
    UnknownIdentity,
    #[error("access resolver unavailable: {0}")]
    Unavailable(String),
}
