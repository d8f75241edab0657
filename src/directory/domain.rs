use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::claims::OwnershipClaim;
use super::schedule::{RawWeeklySchedule, WeeklySchedule};
use super::status::project_status;
use super::verification::VerificationLedger;

/// Identifier wrapper for shops in the directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShopId(pub String);

impl std::fmt::Display for ShopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product taxonomy shown on the map filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    Clothing,
    Food,
    HomeCare,
    Other,
}

impl ShopCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ShopCategory::Clothing => "clothing",
            ShopCategory::Food => "food",
            ShopCategory::HomeCare => "home_care",
            ShopCategory::Other => "other",
        }
    }

    /// Normalize a free-form category label from upstream data. Labels arrive
    /// in several languages and spellings, so matching is substring-based.
    pub fn normalize(raw: &str) -> Self {
        let clean = raw.trim().to_lowercase();
        if clean.is_empty() {
            return ShopCategory::Other;
        }
        if clean == "food" || clean.contains("aliment") {
            return ShopCategory::Food;
        }
        if clean == "clothing" || clean == "vestiario" || clean.contains("vestit") {
            return ShopCategory::Clothing;
        }
        if clean == "home_care" || clean.contains("cura") || clean.contains("casa") {
            return ShopCategory::HomeCare;
        }
        ShopCategory::Other
    }

    /// Normalize a label list, defaulting to `Other` when nothing usable
    /// survives.
    pub fn normalize_all(raw: &[String]) -> Vec<Self> {
        let categories: Vec<Self> = raw.iter().map(|label| Self::normalize(label)).collect();
        if categories.is_empty() {
            vec![ShopCategory::Other]
        } else {
            categories
        }
    }
}

/// Community trust classification of a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationTier {
    Unverified,
    Verified,
}

impl VerificationTier {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationTier::Unverified => "UNVERIFIED",
            VerificationTier::Verified => "VERIFIED",
        }
    }
}

/// User-facing display state of a shop, derived on read from tier, schedule,
/// and clock. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopStatus {
    Unverified,
    Open,
    OpeningSoon,
    Closed,
}

impl ShopStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ShopStatus::Unverified => "UNVERIFIED",
            ShopStatus::Open => "OPEN",
            ShopStatus::OpeningSoon => "OPENING_SOON",
            ShopStatus::Closed => "CLOSED",
        }
    }
}

/// Map position of a shop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// The shop aggregate as the engine sees it. Schedule and ledger mutate only
/// through the service operations; status is recomputed on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub categories: Vec<ShopCategory>,
    pub description: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub website: Option<String>,
    /// Licence scan or storefront photo backing the submission.
    pub evidence_url: Option<String>,
    pub schedule: Option<WeeklySchedule>,
    pub ledger: VerificationLedger,
    pub tier: VerificationTier,
    pub owner_id: Option<UserId>,
    pub pending_claim: Option<OwnershipClaim>,
    pub submitted_by: Option<UserId>,
    pub submitted_at: NaiveDateTime,
}

impl Shop {
    pub fn status_at(&self, now: NaiveDateTime) -> ShopStatus {
        project_status(self.tier, self.schedule.as_ref(), now)
    }

    /// Identity shown to the operator as the party behind a new submission.
    pub fn reporter(&self) -> Option<&UserId> {
        self.submitted_by.as_ref().or(self.owner_id.as_ref())
    }
}

/// Community intake payload for a new shop report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSubmission {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub evidence_url: Option<String>,
    #[serde(default)]
    pub schedule: Option<RawWeeklySchedule>,
    #[serde(default)]
    pub submitted_by: Option<UserId>,
    /// Set when the reporter is the shop owner registering their own
    /// activity; the submission then carries them as prospective owner.
    #[serde(default)]
    pub claimed_by_submitter: bool,
}

/// Field corrections an operator applies while publishing a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopEdits {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub evidence_url: Option<String>,
    #[serde(default)]
    pub schedule: Option<RawWeeklySchedule>,
}
