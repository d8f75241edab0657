use chrono::NaiveDateTime;

use super::availability::{self, Availability, PREWARN_MINUTES};
use super::domain::{ShopStatus, VerificationTier};
use super::schedule::WeeklySchedule;

/// Combine trust tier and opening hours into the single display state.
///
/// Trust gates visibility of operating status: an unverified shop is always
/// shown in the unknown state, its declared hours are never consulted. A
/// verified shop without a usable schedule reads as closed.
pub fn project(
    tier: VerificationTier,
    schedule: Option<&WeeklySchedule>,
    now: NaiveDateTime,
    prewarn_minutes: u16,
) -> ShopStatus {
    if tier == VerificationTier::Unverified {
        return ShopStatus::Unverified;
    }

    let Some(schedule) = schedule else {
        return ShopStatus::Closed;
    };

    match availability::resolve(schedule, now, prewarn_minutes) {
        Availability::Open => ShopStatus::Open,
        Availability::OpeningSoon => ShopStatus::OpeningSoon,
        Availability::Closed => ShopStatus::Closed,
    }
}

/// Projector entry point with the standard prewarn window.
pub fn project_status(
    tier: VerificationTier,
    schedule: Option<&WeeklySchedule>,
    now: NaiveDateTime,
) -> ShopStatus {
    project(tier, schedule, now, PREWARN_MINUTES)
}
