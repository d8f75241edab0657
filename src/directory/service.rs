use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::availability::PREWARN_MINUTES;
use super::claims::{self, ClaimConflictError, ClaimDecision, OwnershipClaim, OwnershipMutation};
use super::domain::{
    Coordinates, Shop, ShopCategory, ShopEdits, ShopId, ShopStatus, ShopSubmission, UserId,
    VerificationTier,
};
use super::moderation::{self, ModerationQueueItem};
use super::repository::{FavoriteStore, RepositoryError, ShopRepository};
use super::schedule::{InvalidScheduleError, WeeklySchedule};
use super::status;
use super::verification::policy::{self, PROMOTION_THRESHOLD};
use super::verification::{DuplicateVoteError, VerificationLedger, VoteReceipt};

/// Engine dials, overridable through configuration for staging experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub promotion_threshold: i32,
    pub prewarn_minutes: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: PROMOTION_THRESHOLD,
            prewarn_minutes: PREWARN_MINUTES,
        }
    }
}

static SHOP_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_shop_id() -> ShopId {
    let id = SHOP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ShopId(format!("shop-{id:06}"))
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error(transparent)]
    DuplicateVote(#[from] DuplicateVoteError),
    #[error(transparent)]
    ClaimConflict(#[from] ClaimConflictError),
    #[error(transparent)]
    InvalidSchedule(#[from] InvalidScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no pending ownership claim for shop {0}")]
    NoPendingClaim(ShopId),
}

/// Sanitized representation of a shop as map clients consume it, with the
/// status projected at the requested instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopView {
    pub id: ShopId,
    pub name: String,
    pub categories: Vec<ShopCategory>,
    pub status: ShopStatus,
    pub tier: VerificationTier,
    pub score: i32,
    pub coordinates: Coordinates,
    pub address: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_claimant: Option<UserId>,
}

/// Service composing the shop store, vote ledger, claim workflow, and queue
/// builder behind the operations the host exposes.
pub struct DirectoryService<R, F> {
    repository: Arc<R>,
    favorites: Arc<F>,
    config: EngineConfig,
}

impl<R, F> DirectoryService<R, F>
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    pub fn new(repository: Arc<R>, favorites: Arc<F>, config: EngineConfig) -> Self {
        Self {
            repository,
            favorites,
            config,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Register a community-reported shop. It enters the directory
    /// unverified with an empty ledger; malformed opening hours collapse to
    /// an all-closed week rather than losing the report.
    pub fn submit_shop(
        &self,
        submission: ShopSubmission,
        now: NaiveDateTime,
    ) -> Result<Shop, DirectoryServiceError> {
        let schedule = submission
            .schedule
            .as_ref()
            .map(WeeklySchedule::from_raw_or_closed);

        let owner_id = if submission.claimed_by_submitter {
            submission.submitted_by.clone()
        } else {
            None
        };

        let shop = Shop {
            id: next_shop_id(),
            name: submission.name,
            categories: ShopCategory::normalize_all(&submission.categories),
            description: submission.description,
            address: submission.address,
            coordinates: submission.coordinates,
            website: submission.website,
            evidence_url: submission.evidence_url,
            schedule,
            ledger: VerificationLedger::new(),
            tier: VerificationTier::Unverified,
            owner_id,
            pending_claim: None,
            submitted_by: submission.submitted_by,
            submitted_at: now,
        };

        let stored = self.repository.insert(shop)?;
        info!(shop_id = %stored.id, "new shop awaiting verification");
        Ok(stored)
    }

    pub fn shop(
        &self,
        shop_id: &ShopId,
        now: NaiveDateTime,
    ) -> Result<ShopView, DirectoryServiceError> {
        let shop = self.fetch_shop(shop_id)?;
        Ok(self.view(&shop, now))
    }

    pub fn list_shops(&self, now: NaiveDateTime) -> Result<Vec<ShopView>, DirectoryServiceError> {
        let shops = self.repository.list()?;
        Ok(shops.iter().map(|shop| self.view(shop, now)).collect())
    }

    /// Cast a sustainability vote. A user votes at most once per shop, ever;
    /// promotion to `Verified` happens the moment the score first reaches the
    /// threshold and is never undone by later votes.
    pub fn cast_vote(
        &self,
        shop_id: &ShopId,
        user_id: UserId,
        is_positive: bool,
    ) -> Result<VoteReceipt, DirectoryServiceError> {
        let mut shop = self.fetch_shop(shop_id)?;

        let mut receipt = shop.ledger.cast_vote(user_id, is_positive)?;
        shop.tier = policy::next_tier_with_threshold(
            shop.tier,
            receipt.score,
            self.config.promotion_threshold,
        );
        receipt.tier = shop.tier;

        if receipt.tier == VerificationTier::Verified {
            info!(shop_id = %shop.id, score = receipt.score, "shop verified by community votes");
        }

        self.repository.update(shop)?;
        Ok(receipt)
    }

    /// File an ownership claim against a shop. One pending claim per shop;
    /// a second attempt is rejected while the first is open.
    pub fn submit_claim(
        &self,
        shop_id: &ShopId,
        claimant: UserId,
        evidence_url: Option<String>,
        now: NaiveDateTime,
    ) -> Result<OwnershipClaim, DirectoryServiceError> {
        let mut shop = self.fetch_shop(shop_id)?;
        let claim = claims::submit_claim(&mut shop, claimant, evidence_url, now)?;
        self.repository.update(shop)?;
        Ok(claim)
    }

    /// Operator verdict on a pending claim. Accept transfers ownership to
    /// the claimant; reject clears the claim and leaves the shop untouched.
    pub fn resolve_claim(
        &self,
        shop_id: &ShopId,
        decision: ClaimDecision,
    ) -> Result<OwnershipMutation, DirectoryServiceError> {
        let mut shop = self.fetch_shop(shop_id)?;
        let mutation = claims::resolve_claim(&mut shop, decision)
            .ok_or_else(|| DirectoryServiceError::NoPendingClaim(shop_id.clone()))?;
        self.repository.update(shop)?;
        info!(shop_id = %mutation.shop_id, decision = ?mutation.decision, "ownership claim resolved");
        Ok(mutation)
    }

    /// Operator publish: apply corrections and mark the shop verified so it
    /// appears on the map for everyone. Operator edits are validated
    /// strictly; malformed hours bounce back instead of being silently
    /// closed.
    pub fn publish_submission(
        &self,
        shop_id: &ShopId,
        edits: ShopEdits,
        now: NaiveDateTime,
    ) -> Result<ShopView, DirectoryServiceError> {
        let mut shop = self.fetch_shop(shop_id)?;

        if let Some(raw) = &edits.schedule {
            shop.schedule = Some(WeeklySchedule::from_raw(raw)?);
        }
        if let Some(name) = edits.name {
            shop.name = name;
        }
        if let Some(categories) = edits.categories {
            shop.categories = ShopCategory::normalize_all(&categories);
        }
        if let Some(description) = edits.description {
            shop.description = description;
        }
        if let Some(address) = edits.address {
            shop.address = address;
        }
        if let Some(website) = edits.website {
            shop.website = Some(website);
        }
        if let Some(evidence_url) = edits.evidence_url {
            shop.evidence_url = Some(evidence_url);
        }

        shop.tier = VerificationTier::Verified;
        info!(shop_id = %shop.id, "shop published by operator");

        let view = self.view(&shop, now);
        self.repository.update(shop)?;
        Ok(view)
    }

    /// Operator reject of a brand-new submission: the shop is deleted
    /// outright. Deliberately harsher than rejecting an ownership claim.
    pub fn reject_submission(&self, shop_id: &ShopId) -> Result<(), DirectoryServiceError> {
        self.repository.remove(shop_id)?;
        info!(%shop_id, "submission rejected and deleted");
        Ok(())
    }

    /// The operator worklist: pending claims and unverified submissions, in
    /// arrival order.
    pub fn moderation_queue(&self) -> Result<Vec<ModerationQueueItem>, DirectoryServiceError> {
        let shops = self.repository.list()?;
        Ok(moderation::build_queue(&shops))
    }

    /// Save a shop to the user's favorites. Idempotent; returns `false` when
    /// it was already saved.
    pub fn add_favorite(
        &self,
        user_id: &UserId,
        shop_id: &ShopId,
    ) -> Result<bool, DirectoryServiceError> {
        self.fetch_shop(shop_id)?;
        Ok(self.favorites.add(user_id, shop_id.clone())?)
    }

    /// Drop a shop from the user's favorites. Idempotent, and safe to call
    /// for shops that have since been deleted.
    pub fn remove_favorite(
        &self,
        user_id: &UserId,
        shop_id: &ShopId,
    ) -> Result<bool, DirectoryServiceError> {
        Ok(self.favorites.remove(user_id, shop_id)?)
    }

    /// The user's saved shops with freshly projected status. Favorites whose
    /// shop has been deleted are skipped.
    pub fn favorites(
        &self,
        user_id: &UserId,
        now: NaiveDateTime,
    ) -> Result<Vec<ShopView>, DirectoryServiceError> {
        let mut views = Vec::new();
        for shop_id in self.favorites.list(user_id)? {
            if let Some(shop) = self.repository.fetch(&shop_id)? {
                views.push(self.view(&shop, now));
            }
        }
        Ok(views)
    }

    fn fetch_shop(&self, shop_id: &ShopId) -> Result<Shop, DirectoryServiceError> {
        Ok(self
            .repository
            .fetch(shop_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    fn view(&self, shop: &Shop, now: NaiveDateTime) -> ShopView {
        let status = status::project(
            shop.tier,
            shop.schedule.as_ref(),
            now,
            self.config.prewarn_minutes,
        );
        ShopView {
            id: shop.id.clone(),
            name: shop.name.clone(),
            categories: shop.categories.clone(),
            status,
            tier: shop.tier,
            score: shop.ledger.score(),
            coordinates: shop.coordinates,
            address: shop.address.clone(),
            description: shop.description.clone(),
            website: shop.website.clone(),
            evidence_url: shop.evidence_url.clone(),
            hours: shop.schedule.as_ref().map(WeeklySchedule::format_for_display),
            owner_id: shop.owner_id.clone(),
            pending_claimant: shop
                .pending_claim
                .as_ref()
                .map(|claim| claim.claimant.clone()),
        }
    }
}
