//! Dashboard counters over a user's seeds.

use serde::Serialize;

use crate::{Seed, SeedStatus, Timestamp};

/// Window, in days, for the "this week" counter.
pub const WEEK_DAYS: i64 = 7;

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_seeds: usize,
    /// Seeds created in the last [`WEEK_DAYS`] days.
    pub captured_this_week: usize,
    /// Seeds still in status `captured`.
    pub ready_to_write: usize,
}

impl DashboardStats {
    pub fn compute(seeds: &[Seed], now: Timestamp) -> Self {
        Self {
            total_seeds: seeds.len(),
            captured_this_week: seeds
                .iter()
                .filter(|s| s.created_at.is_within_days_of(now, WEEK_DAYS))
                .count(),
            ready_to_write: seeds
                .iter()
                .filter(|s| s.status == SeedStatus::Captured)
                .count(),
        }
    }
}
