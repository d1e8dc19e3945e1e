use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::Placement;
use super::range::{start_of_month, start_of_year};

/// Which slice of a placement fee a tally sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeShare {
    Recruiter,
    Platform,
    Total,
}

impl FeeShare {
    pub fn amount(self, placement: &Placement) -> u64 {
        match self {
            Self::Recruiter => placement.recruiter_share,
            Self::Platform => placement.platform_share,
            Self::Total => placement.fee_amount,
        }
    }
}

/// Placement counts and fee sums classified against a single `now`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementTally {
    pub placements_this_month: u64,
    pub placements_this_year: u64,
    /// Always calendar year-to-date, whatever window the request asked for.
    pub earned_ytd: u64,
    pub pending: u64,
}

/// Classifies placement fees as earned, pending or settled at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct PlacementLedger {
    now: DateTime<Utc>,
    month_start: DateTime<Utc>,
    year_start: DateTime<Utc>,
}

impl PlacementLedger {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            month_start: start_of_month(now),
            year_start: start_of_year(now),
        }
    }

    pub fn tally(&self, placements: &[Placement], share: FeeShare) -> PlacementTally {
        placements
            .iter()
            .fold(PlacementTally::default(), |mut tally, placement| {
                let amount = share.amount(placement);
                if placement.hired_since(self.month_start) {
                    tally.placements_this_month += 1;
                }
                if placement.hired_since(self.year_start) {
                    tally.placements_this_year += 1;
                    tally.earned_ytd = tally.earned_ytd.saturating_add(amount);
                }
                if placement.is_pending_at(self.now) {
                    tally.pending = tally.pending.saturating_add(amount);
                }
                tally
            })
    }

    pub fn hired_count(&self, placements: &[Placement]) -> u64 {
        placements
            .iter()
            .filter(|placement| placement.hired_at.is_some())
            .count() as u64
    }

    pub fn in_guarantee_count(&self, placements: &[Placement]) -> u64 {
        placements
            .iter()
            .filter(|placement| placement.is_in_guarantee_at(self.now))
            .count() as u64
    }
}
