use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{
    ApplicationRecord, ApplicationStage, CandidateId, OrganizationId, Placement, RecruiterId,
    RoleRecord, RoleStatus,
};

/// Whose rows a query may touch. Always derived from a resolved access scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Recruiter(RecruiterId),
    Candidate(CandidateId),
    Organizations(BTreeSet<OrganizationId>),
    Platform,
}

impl Owner {
    pub fn owns_role(&self, role: &RoleRecord) -> bool {
        match self {
            Owner::Recruiter(id) => role.recruiter_id.as_ref() == Some(id),
            // Candidates never own roles.
            Owner::Candidate(_) => false,
            Owner::Organizations(ids) => ids.contains(&role.organization_id),
            Owner::Platform => true,
        }
    }

    pub fn owns_application(&self, application: &ApplicationRecord) -> bool {
        match self {
            Owner::Recruiter(id) => &application.recruiter_id == id,
            Owner::Candidate(id) => &application.candidate_id == id,
            Owner::Organizations(ids) => ids.contains(&application.organization_id),
            Owner::Platform => true,
        }
    }

    pub fn owns_placement(&self, placement: &Placement) -> bool {
        match self {
            Owner::Recruiter(id) => &placement.recruiter_id == id,
            Owner::Candidate(id) => &placement.candidate_id == id,
            Owner::Organizations(ids) => ids.contains(&placement.organization_id),
            Owner::Platform => true,
        }
    }
}

/// Count of roles owned by `owner` in one of `statuses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleQuery {
    pub owner: Owner,
    pub statuses: &'static [RoleStatus],
}

impl RoleQuery {
    pub fn matches(&self, role: &RoleRecord) -> bool {
        self.owner.owns_role(role) && self.statuses.contains(&role.status)
    }
}

/// Count of applications owned by `owner` in one of `stages`, optionally
/// restricted to a submission window (inclusive on both ends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub owner: Owner,
    pub stages: &'static [ApplicationStage],
    pub submitted_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl ApplicationQuery {
    pub fn matches(&self, application: &ApplicationRecord) -> bool {
        let in_window = match self.submitted_between {
            Some((from, to)) => application.submitted_at >= from && application.submitted_at <= to,
            None => true,
        };
        in_window
            && self.owner.owns_application(application)
            && self.stages.contains(&application.stage)
    }
}

/// Read-only access to the rows the metrics aggregation needs.
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    async fn count_roles(&self, query: &RoleQuery) -> Result<u64, RepositoryError>;
    async fn count_applications(&self, query: &ApplicationQuery) -> Result<u64, RepositoryError>;
    async fn list_placements(&self, owner: &Owner) -> Result<Vec<Placement>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
