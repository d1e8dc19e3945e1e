use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::access::{AccessContextResolver, AccessScope, CallerIdentity, ResolveError};
use crate::stats::domain::{
    ApplicationId, ApplicationRecord, ApplicationStage, CandidateId, OrganizationId, Placement,
    PlacementId, PlacementState, RecruiterId, RoleId, RoleRecord, RoleStatus,
};
use crate::stats::repository::{
    ApplicationQuery, MetricsRepository, Owner, RepositoryError, RoleQuery,
};
use crate::stats::service::StatsService;

pub(super) const RECRUITER_TOKEN: &str = "tok-recruiter";
pub(super) const CANDIDATE_TOKEN: &str = "tok-candidate";
pub(super) const COMPANY_TOKEN: &str = "tok-company";
pub(super) const ADMIN_TOKEN: &str = "tok-admin";
pub(super) const BARE_TOKEN: &str = "tok-bare";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn recruiter_id() -> RecruiterId {
    RecruiterId("rec-1".to_string())
}

pub(super) fn org(id: &str) -> OrganizationId {
    OrganizationId(id.to_string())
}

fn scope(user: &str) -> AccessScope {
    AccessScope {
        identity_user_id: user.to_string(),
        recruiter_id: None,
        candidate_id: None,
        organization_ids: BTreeSet::new(),
        is_platform_admin: false,
    }
}

#[derive(Default)]
pub(super) struct FixedResolver {
    scopes: HashMap<String, AccessScope>,
}

impl FixedResolver {
    pub(super) fn standard() -> Self {
        let mut scopes = HashMap::new();

        let mut recruiter = scope("user-recruiter");
        recruiter.recruiter_id = Some(recruiter_id());
        scopes.insert(RECRUITER_TOKEN.to_string(), recruiter);

        let mut candidate = scope("user-candidate");
        candidate.candidate_id = Some(CandidateId("cand-1".to_string()));
        scopes.insert(CANDIDATE_TOKEN.to_string(), candidate);

        let mut company = scope("user-company");
        company.organization_ids.insert(org("org-1"));
        scopes.insert(COMPANY_TOKEN.to_string(), company);

        let mut admin = scope("user-admin");
        admin.is_platform_admin = true;
        scopes.insert(ADMIN_TOKEN.to_string(), admin);

        scopes.insert(BARE_TOKEN.to_string(), scope("user-bare"));

        Self { scopes }
    }
}

#[async_trait]
impl AccessContextResolver for FixedResolver {
    async fn resolve(&self, identity: &CallerIdentity) -> Result<AccessScope, ResolveError> {
        self.scopes
            .get(identity.as_str())
            .cloned()
            .ok_or(ResolveError::UnknownIdentity)
    }
}

/// Identity provider that is always down.
pub(super) struct FailingResolver;

#[async_trait]
impl AccessContextResolver for FailingResolver {
    async fn resolve(&self, _identity: &CallerIdentity) -> Result<AccessScope, ResolveError> {
        Err(ResolveError::Unavailable("identity provider timed out".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) roles: Vec<RoleRecord>,
    pub(super) applications: Vec<ApplicationRecord>,
    pub(super) placements: Vec<Placement>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsRepository for MemoryStore {
    async fn count_roles(&self, query: &RoleQuery) -> Result<u64, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.roles.iter().filter(|role| query.matches(role)).count() as u64)
    }

    async fn count_applications(&self, query: &ApplicationQuery) -> Result<u64, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .applications
            .iter()
            .filter(|application| query.matches(application))
            .count() as u64)
    }

    async fn list_placements(&self, owner: &Owner) -> Result<Vec<Placement>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .placements
            .iter()
            .filter(|placement| owner.owns_placement(placement))
            .cloned()
            .collect())
    }
}

/// Counts succeed, the placement fetch fails.
#[derive(Default)]
pub(super) struct FailingPlacementStore {
    pub(super) counts_served: AtomicUsize,
}

#[async_trait]
impl MetricsRepository for FailingPlacementStore {
    async fn count_roles(&self, _query: &RoleQuery) -> Result<u64, RepositoryError> {
        self.counts_served.fetch_add(1, Ordering::SeqCst);
        Ok(4)
    }

    async fn count_applications(&self, _query: &ApplicationQuery) -> Result<u64, RepositoryError> {
        self.counts_served.fetch_add(1, Ordering::SeqCst);
        Ok(2)
    }

    async fn list_placements(&self, _owner: &Owner) -> Result<Vec<Placement>, RepositoryError> {
        Err(RepositoryError::Unavailable("placements table offline".to_string()))
    }
}

pub(super) fn placement(
    id: &str,
    recruiter: &str,
    organization: &str,
    hired_at: Option<DateTime<Utc>>,
    recruiter_share: u64,
    state: PlacementState,
    guarantee_expires_at: Option<DateTime<Utc>>,
) -> Placement {
    Placement {
        id: PlacementId(id.to_string()),
        recruiter_id: RecruiterId(recruiter.to_string()),
        organization_id: org(organization),
        candidate_id: CandidateId(format!("cand-{id}")),
        hired_at,
        fee_amount: recruiter_share * 2,
        recruiter_share,
        platform_share: recruiter_share,
        state,
        guarantee_expires_at,
    }
}

fn role(id: &str, organization: &str, recruiter: Option<&str>, status: RoleStatus) -> RoleRecord {
    RoleRecord {
        id: RoleId(id.to_string()),
        organization_id: org(organization),
        recruiter_id: recruiter.map(|value| RecruiterId(value.to_string())),
        status,
    }
}

fn application(
    id: &str,
    organization: &str,
    recruiter: &str,
    candidate: &str,
    stage: ApplicationStage,
    submitted_at: DateTime<Utc>,
) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(id.to_string()),
        role_id: RoleId(format!("role-for-{id}")),
        organization_id: org(organization),
        recruiter_id: RecruiterId(recruiter.to_string()),
        candidate_id: CandidateId(candidate.to_string()),
        stage,
        submitted_at,
    }
}

/// Marketplace snapshot shared by the service and routing tests.
///
/// `rec-1` works `org-1`; `rec-2` works `org-2`. Placements A/B/C mirror the
/// canonical pending-payout scenario.
pub(super) fn store() -> MemoryStore {
    let now = now();
    MemoryStore {
        roles: vec![
            role("role-1", "org-1", Some("rec-1"), RoleStatus::Open),
            role("role-2", "org-1", Some("rec-1"), RoleStatus::Active),
            role("role-3", "org-1", Some("rec-1"), RoleStatus::Filled),
            role("role-4", "org-2", Some("rec-2"), RoleStatus::Active),
            role("role-5", "org-2", None, RoleStatus::Draft),
        ],
        applications: vec![
            application(
                "app-1",
                "org-1",
                "rec-1",
                "cand-1",
                ApplicationStage::Submitted,
                now - Duration::days(2),
            ),
            application(
                "app-2",
                "org-1",
                "rec-1",
                "cand-2",
                ApplicationStage::Interview,
                now - Duration::days(20),
            ),
            application(
                "app-3",
                "org-1",
                "rec-1",
                "cand-1",
                ApplicationStage::Offer,
                now - Duration::days(40),
            ),
            application(
                "app-4",
                "org-2",
                "rec-2",
                "cand-3",
                ApplicationStage::Screen,
                now - Duration::days(1),
            ),
            application(
                "app-5",
                "org-1",
                "rec-1",
                "cand-4",
                ApplicationStage::Rejected,
                now - Duration::days(3),
            ),
        ],
        placements: vec![
            placement("a", "rec-1", "org-1", None, 1000, PlacementState::Active, None),
            placement(
                "b",
                "rec-1",
                "org-1",
                Some(now - Duration::days(5)),
                500,
                PlacementState::Settled,
                Some(now + Duration::days(10)),
            ),
            placement(
                "c",
                "rec-1",
                "org-1",
                Some(now - Duration::days(100)),
                300,
                PlacementState::Settled,
                Some(now - Duration::days(10)),
            ),
            placement(
                "d",
                "rec-2",
                "org-2",
                Some(now - Duration::days(1)),
                800,
                PlacementState::Active,
                Some(now + Duration::days(80)),
            ),
            Placement {
                candidate_id: CandidateId("cand-1".to_string()),
                ..placement(
                    "e",
                    "rec-2",
                    "org-2",
                    Some(now - Duration::days(30)),
                    400,
                    PlacementState::Completed,
                    Some(now + Duration::days(60)),
                )
            },
        ],
        calls: AtomicUsize::new(0),
    }
}

pub(super) fn build_service() -> (StatsService<FixedResolver, MemoryStore>, Arc<MemoryStore>) {
    let repository = Arc::new(store());
    let service = StatsService::new(Arc::new(FixedResolver::standard()), repository.clone());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
