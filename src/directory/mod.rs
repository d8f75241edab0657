//! Shop verification and availability engine.
//!
//! The directory tracks community-reported shops on a map. Each record moves
//! through a trust pipeline (votes promote it to verified, operators publish
//! or delete it) while its display status is projected on every read from
//! the trust tier, the weekly schedule, and the clock. Everything here is
//! synchronous, single-record logic; persistence and transport belong to the
//! host.

pub mod availability;
pub mod claims;
pub mod domain;
pub mod favorites;
pub mod moderation;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod status;
pub mod verification;

#[cfg(test)]
mod tests;

pub use availability::{resolve_availability, Availability, PREWARN_MINUTES};
pub use claims::{ClaimConflictError, ClaimDecision, OwnershipClaim, OwnershipMutation};
pub use domain::{
    Coordinates, Shop, ShopCategory, ShopEdits, ShopId, ShopStatus, ShopSubmission, UserId,
    VerificationTier,
};
pub use favorites::FavoritesLedger;
pub use moderation::{build_queue, ModerationKind, ModerationQueueItem};
pub use repository::{
    FavoriteStore, MemoryFavoriteStore, MemoryShopRepository, RepositoryError, ShopRepository,
};
pub use router::directory_router;
pub use schedule::{
    DaySchedule, InvalidScheduleError, RawDaySchedule, RawTimeRange, RawWeeklySchedule, TimeRange,
    WeeklySchedule,
};
pub use service::{DirectoryService, DirectoryServiceError, EngineConfig, ShopView};
pub use status::project_status;
pub use verification::policy::PROMOTION_THRESHOLD;
pub use verification::{DuplicateVoteError, VerificationLedger, Vote, VoteReceipt};
