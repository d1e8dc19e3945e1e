use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for recruiter profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecruiterId(pub String);

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for hiring organizations (companies).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Lifecycle tag of a placement. Transitions are driven by billing, never by the metrics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    Active,
    Settled,
    Completed,
    Cancelled,
    ClawedBack,
}

impl PlacementState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Settled => "settled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::ClawedBack => "clawed_back",
        }
    }
}

/// A confirmed hire and the fee split it generated.
///
/// Amounts are whole currency units and never change after creation; only the
/// classification of `recruiter_share` (earned, pending, settled) moves with
/// `state` and `guarantee_expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub recruiter_id: RecruiterId,
    pub organization_id: OrganizationId,
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub hired_at: Option<DateTime<Utc>>,
    pub fee_amount: u64,
    pub recruiter_share: u64,
    pub platform_share: u64,
    pub state: PlacementState,
    #[serde(default)]
    pub guarantee_expires_at: Option<DateTime<Utc>>,
}

impl Placement {
    /// Whether the fee is still provisional at `now`.
    ///
    /// Either an `active` state or an unexpired guarantee keeps the fee pending;
    /// neither condition alone is sufficient to call it final.
    pub fn is_pending_at(&self, now: DateTime<Utc>) -> bool {
        self.state == PlacementState::Active || self.is_in_guarantee_at(now)
    }

    pub fn is_in_guarantee_at(&self, now: DateTime<Utc>) -> bool {
        self.guarantee_expires_at.is_some_and(|expires_at| expires_at > now)
    }

    pub fn hired_since(&self, start: DateTime<Utc>) -> bool {
        self.hired_at.is_some_and(|hired_at| hired_at >= start)
    }
}

/// Publishing status of a role on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    Draft,
    Open,
    Active,
    Paused,
    Filled,
    Closed,
}

impl RoleStatus {
    /// Statuses counted as an active role on dashboards.
    pub const ACTIVE: &'static [RoleStatus] = &[RoleStatus::Open, RoleStatus::Active];
}

/// Read-only projection of a posted role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub recruiter_id: Option<RecruiterId>,
    pub status: RoleStatus,
}

/// Stage of a candidate submission within a role's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStage {
    Submitted,
    Screen,
    Interview,
    Offer,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStage {
    pub const PIPELINE: &'static [ApplicationStage] = &[
        ApplicationStage::Submitted,
        ApplicationStage::Screen,
        ApplicationStage::Interview,
    ];

    pub const PENDING_OFFER: &'static [ApplicationStage] = &[ApplicationStage::Offer];

    pub const ALL: &'static [ApplicationStage] = &[
        ApplicationStage::Submitted,
        ApplicationStage::Screen,
        ApplicationStage::Interview,
        ApplicationStage::Offer,
        ApplicationStage::Hired,
        ApplicationStage::Rejected,
        ApplicationStage::Withdrawn,
    ];
}

/// Read-only projection of a candidate submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub role_id: RoleId,
    pub organization_id: OrganizationId,
    pub recruiter_id: RecruiterId,
    pub candidate_id: CandidateId,
    pub stage: ApplicationStage,
    pub submitted_at: DateTime<Utc>,
}
