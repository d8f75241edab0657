use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::directory::claims::OwnershipClaim;
use crate::directory::domain::{
    Coordinates, Shop, ShopCategory, ShopId, ShopSubmission, UserId, VerificationTier,
};
use crate::directory::repository::{
    MemoryFavoriteStore, MemoryShopRepository, RepositoryError, ShopRepository,
};
use crate::directory::schedule::{
    RawDaySchedule, RawTimeRange, RawWeeklySchedule, WeeklySchedule,
};
use crate::directory::service::{DirectoryService, EngineConfig};
use crate::directory::verification::VerificationLedger;

pub(super) fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

pub(super) fn shop_id(raw: &str) -> ShopId {
    ShopId(raw.to_string())
}

pub(super) fn raw_slot(opens_at: &str, closes_at: &str) -> RawTimeRange {
    RawTimeRange {
        opens_at: opens_at.to_string(),
        closes_at: closes_at.to_string(),
    }
}

pub(super) fn open_day(slots: &[(&str, &str)]) -> RawDaySchedule {
    RawDaySchedule {
        closed: false,
        slots: slots
            .iter()
            .map(|(opens_at, closes_at)| raw_slot(opens_at, closes_at))
            .collect(),
    }
}

pub(super) fn closed_day() -> RawDaySchedule {
    RawDaySchedule {
        closed: true,
        slots: Vec::new(),
    }
}

/// Monday 09:00-13:00 / 15:00-19:00, everything else unset (resolves closed).
pub(super) fn monday_split_shift() -> RawWeeklySchedule {
    RawWeeklySchedule {
        monday: open_day(&[("09:00", "13:00"), ("15:00", "19:00")]),
        ..RawWeeklySchedule::default()
    }
}

pub(super) fn split_shift_schedule() -> WeeklySchedule {
    WeeklySchedule::from_raw(&monday_split_shift()).expect("fixture schedule is valid")
}

/// 2024-01-01 is a Monday.
pub(super) fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn unverified_shop(id: &str) -> Shop {
    Shop {
        id: shop_id(id),
        name: format!("Shop {id}"),
        categories: vec![ShopCategory::Other],
        description: String::new(),
        address: "Via San Pietro 12".to_string(),
        coordinates: Coordinates {
            lat: 46.067,
            lng: 11.121,
        },
        website: None,
        evidence_url: None,
        schedule: None,
        ledger: VerificationLedger::new(),
        tier: VerificationTier::Unverified,
        owner_id: None,
        pending_claim: None,
        submitted_by: None,
        submitted_at: monday_at(8, 0),
    }
}

pub(super) fn verified_shop(id: &str) -> Shop {
    Shop {
        tier: VerificationTier::Verified,
        schedule: Some(split_shift_schedule()),
        ..unverified_shop(id)
    }
}

pub(super) fn pending_claim(shop: &Shop, claimant: &str) -> OwnershipClaim {
    OwnershipClaim {
        shop_id: shop.id.clone(),
        claimant: user(claimant),
        evidence_url: Some("https://img.example/licence.png".to_string()),
        created_at: monday_at(9, 30),
    }
}

pub(super) fn submission(name: &str) -> ShopSubmission {
    ShopSubmission {
        name: name.to_string(),
        categories: vec!["Alimenti".to_string()],
        description: "Organic groceries".to_string(),
        address: "Piazza Duomo 5".to_string(),
        coordinates: Coordinates {
            lat: 46.066,
            lng: 11.12,
        },
        website: None,
        evidence_url: Some("https://img.example/storefront.png".to_string()),
        schedule: Some(monday_split_shift()),
        submitted_by: Some(user("reporter")),
        claimed_by_submitter: false,
    }
}

pub(super) type MemoryService = DirectoryService<MemoryShopRepository, MemoryFavoriteStore>;

pub(super) fn memory_service() -> (Arc<MemoryShopRepository>, Arc<MemoryFavoriteStore>, MemoryService)
{
    let repository = Arc::new(MemoryShopRepository::new());
    let favorites = Arc::new(MemoryFavoriteStore::new());
    let service = DirectoryService::new(
        repository.clone(),
        favorites.clone(),
        EngineConfig::default(),
    );
    (repository, favorites, service)
}

/// Repository stub that fails every operation, for 500-path router tests.
#[derive(Debug, Default)]
pub(super) struct UnavailableRepository;

impl ShopRepository for UnavailableRepository {
    fn insert(&self, _shop: Shop) -> Result<Shop, RepositoryError> {
        Err(RepositoryError::Unavailable("down for maintenance".to_string()))
    }

    fn update(&self, _shop: Shop) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("down for maintenance".to_string()))
    }

    fn fetch(&self, _id: &ShopId) -> Result<Option<Shop>, RepositoryError> {
        Err(RepositoryError::Unavailable("down for maintenance".to_string()))
    }

    fn remove(&self, _id: &ShopId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("down for maintenance".to_string()))
    }

    fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        Err(RepositoryError::Unavailable("down for maintenance".to_string()))
    }
}
