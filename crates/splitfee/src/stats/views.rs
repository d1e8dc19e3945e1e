use serde::Serialize;

use super::ledger::PlacementTally;
use super::range::RangeView;
use crate::access::Scope;

/// Dashboard figures for a recruiter. Serialized with the dashboard's camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterMetrics {
    pub active_roles: u64,
    pub pipeline_count: u64,
    pub pending_offers: u64,
    pub placements_this_month: u64,
    pub placements_this_year: u64,
    /// Calendar year-to-date; not narrowed by the requested range.
    #[serde(rename = "totalEarningsYTD")]
    pub total_earnings_ytd: u64,
    pub pending_payouts: u64,
}

impl RecruiterMetrics {
    pub(crate) fn new(
        active_roles: u64,
        pipeline_count: u64,
        pending_offers: u64,
        tally: PlacementTally,
    ) -> Self {
        Self {
            active_roles,
            pipeline_count,
            pending_offers,
            placements_this_month: tally.placements_this_month,
            placements_this_year: tally.placements_this_year,
            total_earnings_ytd: tally.earned_ytd,
            pending_payouts: tally.pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMetrics {
    pub applications_in_range: u64,
    pub active_applications: u64,
    pub pending_offers: u64,
    pub placements: u64,
    pub in_guarantee: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetrics {
    pub active_roles: u64,
    pub pipeline_count: u64,
    pub pending_offers: u64,
    pub placements_this_month: u64,
    pub placements_this_year: u64,
    #[serde(rename = "feesCommittedYTD")]
    pub fees_committed_ytd: u64,
    pub fees_in_guarantee: u64,
}

impl CompanyMetrics {
    pub(crate) fn new(
        active_roles: u64,
        pipeline_count: u64,
        pending_offers: u64,
        tally: PlacementTally,
    ) -> Self {
        Self {
            active_roles,
            pipeline_count,
            pending_offers,
            placements_this_month: tally.placements_this_month,
            placements_this_year: tally.placements_this_year,
            fees_committed_ytd: tally.earned_ytd,
            fees_in_guarantee: tally.pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub active_roles: u64,
    pub pipeline_count: u64,
    pub pending_offers: u64,
    pub placements_this_month: u64,
    pub placements_this_year: u64,
    #[serde(rename = "platformRevenueYTD")]
    pub platform_revenue_ytd: u64,
    pub pending_platform_revenue: u64,
}

impl PlatformMetrics {
    pub(crate) fn new(
        active_roles: u64,
        pipeline_count: u64,
        pending_offers: u64,
        tally: PlacementTally,
    ) -> Self {
        Self {
            active_roles,
            pipeline_count,
            pending_offers,
            placements_this_month: tally.placements_this_month,
            placements_this_year: tally.placements_this_year,
            platform_revenue_ytd: tally.earned_ytd,
            pending_platform_revenue: tally.pending,
        }
    }
}

/// One variant per scope; the scope itself is reported next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScopedMetrics {
    Recruiter(RecruiterMetrics),
    Candidate(CandidateMetrics),
    Company(CompanyMetrics),
    Platform(PlatformMetrics),
}

impl ScopedMetrics {
    pub fn scope(&self) -> Scope {
        match self {
            Self::Recruiter(_) => Scope::Recruiter,
            Self::Candidate(_) => Scope::Candidate,
            Self::Company(_) => Scope::Company,
            Self::Platform(_) => Scope::Platform,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub scope: Scope,
    pub range: RangeView,
    pub metrics: ScopedMetrics,
}
