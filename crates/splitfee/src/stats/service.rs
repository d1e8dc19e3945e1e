use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{instrument, warn};

use super::domain::{ApplicationStage, RoleStatus};
use super::ledger::{FeeShare, PlacementLedger, PlacementTally};
use super::range::{parse_range_at, Range};
use super::repository::{ApplicationQuery, MetricsRepository, Owner, RepositoryError, RoleQuery};
use super::views::{
    CandidateMetrics, CompanyMetrics, PlatformMetrics, RecruiterMetrics, ScopedMetrics,
    StatsResponse,
};
use crate::access::{
    normalize_scope, AccessContextResolver, AccessScope, CallerIdentity, ResolveError, Scope,
    ScopeError,
};

/// Query parameters accepted by the stats operation.
///
/// `type` is the legacy name of `scope`; when both are present `scope` wins.
/// Only an absent or empty value counts as missing; whitespace is a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

impl StatsParams {
    fn scope_token(&self) -> Option<&str> {
        [self.scope.as_deref(), self.kind.as_deref()]
            .into_iter()
            .flatten()
            .find(|token| !token.is_empty())
    }

    pub fn selected_scope(&self) -> Result<Scope, ScopeError> {
        match self.scope_token() {
            Some(token) => normalize_scope(token),
            None => Ok(Scope::Recruiter),
        }
    }
}

/// Service composing access resolution, the metrics store and fee classification.
pub struct StatsService<A, R> {
    resolver: Arc<A>,
    repository: Arc<R>,
}

impl<A, R> StatsService<A, R>
where
    A: AccessContextResolver + 'static,
    R: MetricsRepository + 'static,
{
    pub fn new(resolver: Arc<A>, repository: Arc<R>) -> Self {
        Self {
            resolver,
            repository,
        }
    }

    /// Compute metrics for the caller against the current instant.
    pub async fn get_stats(
        &self,
        identity: &CallerIdentity,
        params: &StatsParams,
    ) -> Result<StatsResponse, StatsError> {
        self.get_stats_at(identity, params, Utc::now()).await
    }

    /// Compute metrics for the caller with `now` pinned.
    #[instrument(
        skip(self, identity, params),
        fields(scope = tracing::field::Empty, range = tracing::field::Empty)
    )]
    pub async fn get_stats_at(
        &self,
        identity: &CallerIdentity,
        params: &StatsParams,
        now: DateTime<Utc>,
    ) -> Result<StatsResponse, StatsError> {
        let scope = params.selected_scope()?;
        let range = parse_range_at(params.range.as_deref(), now);
        let span = tracing::Span::current();
        span.record("scope", scope.label());
        span.record("range", range.label.as_str());

        let access = self.resolver.resolve(identity).await?;
        let metrics = match scope {
            Scope::Recruiter => ScopedMetrics::Recruiter(self.recruiter(&access, &range).await?),
            Scope::Candidate => ScopedMetrics::Candidate(self.candidate(&access, &range).await?),
            Scope::Company => ScopedMetrics::Company(self.company(&access, &range).await?),
            Scope::Platform => ScopedMetrics::Platform(self.platform(&access, &range).await?),
        };

        Ok(StatsResponse {
            scope,
            range: range.view(),
            metrics,
        })
    }

    async fn recruiter(
        &self,
        access: &AccessScope,
        range: &Range,
    ) -> Result<RecruiterMetrics, StatsError> {
        let recruiter_id = access
            .recruiter_id
            .clone()
            .ok_or_else(|| missing_profile(access, Scope::Recruiter))?;
        let owner = Owner::Recruiter(recruiter_id);
        let (active_roles, pipeline_count, pending_offers, tally) =
            self.owner_figures(owner, range, FeeShare::Recruiter).await?;
        Ok(RecruiterMetrics::new(
            active_roles,
            pipeline_count,
            pending_offers,
            tally,
        ))
    }

    async fn candidate(
        &self,
        access: &AccessScope,
        range: &Range,
    ) -> Result<CandidateMetrics, StatsError> {
        let candidate_id = access
            .candidate_id
            .clone()
            .ok_or_else(|| missing_profile(access, Scope::Candidate))?;
        let owner = Owner::Candidate(candidate_id);

        let submitted = ApplicationQuery {
            owner: owner.clone(),
            stages: ApplicationStage::ALL,
            submitted_between: Some((range.from, range.to)),
        };
        let active = ApplicationQuery {
            owner: owner.clone(),
            stages: ApplicationStage::PIPELINE,
            submitted_between: None,
        };
        let offers = ApplicationQuery {
            owner: owner.clone(),
            stages: ApplicationStage::PENDING_OFFER,
            submitted_between: None,
        };

        let (applications_in_range, active_applications, pending_offers, placements) = tokio::try_join!(
            self.repository.count_applications(&submitted),
            self.repository.count_applications(&active),
            self.repository.count_applications(&offers),
            self.repository.list_placements(&owner),
        )?;

        let ledger = PlacementLedger::at(range.to);
        Ok(CandidateMetrics {
            applications_in_range,
            active_applications,
            pending_offers,
            placements: ledger.hired_count(&placements),
            in_guarantee: ledger.in_guarantee_count(&placements),
        })
    }

    async fn company(
        &self,
        access: &AccessScope,
        range: &Range,
    ) -> Result<CompanyMetrics, StatsError> {
        if access.organization_ids.is_empty() {
            return Err(missing_profile(access, Scope::Company));
        }
        let owner = Owner::Organizations(access.organization_ids.clone());
        let (active_roles, pipeline_count, pending_offers, tally) =
            self.owner_figures(owner, range, FeeShare::Total).await?;
        Ok(CompanyMetrics::new(
            active_roles,
            pipeline_count,
            pending_offers,
            tally,
        ))
    }

    async fn platform(
        &self,
        access: &AccessScope,
        range: &Range,
    ) -> Result<PlatformMetrics, StatsError> {
        if !access.is_platform_admin {
            return Err(missing_profile(access, Scope::Platform));
        }
        let (active_roles, pipeline_count, pending_offers, tally) = self
            .owner_figures(Owner::Platform, range, FeeShare::Platform)
            .await?;
        Ok(PlatformMetrics::new(
            active_roles,
            pipeline_count,
            pending_offers,
            tally,
        ))
    }

    /// Fan out the three counts and the placement fetch, failing as a whole if any read fails.
    async fn owner_figures(
        &self,
        owner: Owner,
        range: &Range,
        share: FeeShare,
    ) -> Result<(u64, u64, u64, PlacementTally), StatsError> {
        let roles = RoleQuery {
            owner: owner.clone(),
            statuses: RoleStatus::ACTIVE,
        };
        let pipeline = ApplicationQuery {
            owner: owner.clone(),
            stages: ApplicationStage::PIPELINE,
            submitted_between: None,
        };
        let offers = ApplicationQuery {
            owner: owner.clone(),
            stages: ApplicationStage::PENDING_OFFER,
            submitted_between: None,
        };

        let (active_roles, pipeline_count, pending_offers, placements) = tokio::try_join!(
            self.repository.count_roles(&roles),
            self.repository.count_applications(&pipeline),
            self.repository.count_applications(&offers),
            self.repository.list_placements(&owner),
        )?;

        let tally = PlacementLedger::at(range.to).tally(&placements, share);
        Ok((active_roles, pipeline_count, pending_offers, tally))
    }
}

fn missing_profile(access: &AccessScope, scope: Scope) -> StatsError {
    warn!(
        user = %access.identity_user_id,
        %scope,
        "caller is not provisioned for requested scope"
    );
    StatsError::MissingProfile(scope)
}

/// Error raised by the stats service.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error(transparent)]
    UnknownScope(#[from] ScopeError),
    #[error("caller has no {0} profile for this request")]
    MissingProfile(Scope),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl StatsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StatsError::UnknownScope(_) => StatusCode::BAD_REQUEST,
            StatsError::MissingProfile(_) => StatusCode::FORBIDDEN,
            StatsError::Resolve(ResolveError::UnknownIdentity) => StatusCode::UNAUTHORIZED,
            StatsError::Resolve(ResolveError::Unavailable(_)) | StatsError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand back to a client.
    pub fn public_message(&self) -> String {
        match self {
            StatsError::Resolve(ResolveError::Unavailable(_)) | StatsError::Repository(_) => {
                "metrics are temporarily unavailable".to_string()
            }
            other => other.to_string(),
        }
    }
}
