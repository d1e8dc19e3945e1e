//! Access-scoped placement metrics: range windowing, fee classification, and the
//! `/api/v1/stats` surface.

pub mod domain;
pub mod ledger;
pub mod range;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStage, CandidateId, OrganizationId, Placement,
    PlacementId, PlacementState, RecruiterId, RoleId, RoleRecord, RoleStatus,
};
pub use ledger::{FeeShare, PlacementLedger, PlacementTally};
pub use range::{parse_range, parse_range_at, Range, RangeView};
pub use repository::{ApplicationQuery, MetricsRepository, Owner, RepositoryError, RoleQuery};
pub use router::stats_router;
pub use service::{StatsError, StatsParams, StatsService};
pub use views::{
    CandidateMetrics, CompanyMetrics, PlatformMetrics, RecruiterMetrics, ScopedMetrics,
    StatsResponse,
};
