use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Shop, ShopId, UserId, VerificationTier};

/// Which operator action a queue entry calls for: publish-with-edits for a
/// fresh report, accept/reject for an ownership claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationKind {
    NewSubmission,
    OwnershipClaim,
}

/// Read-only projection of a shop awaiting an operator decision. Recomputed
/// from the shop collection on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationQueueItem {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub kind: ModerationKind,
    /// Licence scan or photo backing the request, when one was attached.
    pub evidence_url: Option<String>,
    /// Claimant for ownership claims, reporter for new submissions. `None`
    /// means an anonymous report.
    pub requested_by: Option<UserId>,
    pub requested_at: NaiveDateTime,
}

impl ModerationQueueItem {
    /// Derive the queue entry for a shop, if it needs one. A pending claim
    /// takes precedence over the unverified discriminant.
    pub fn from_shop(shop: &Shop) -> Option<Self> {
        if let Some(claim) = &shop.pending_claim {
            return Some(Self {
                shop_id: shop.id.clone(),
                shop_name: shop.name.clone(),
                kind: ModerationKind::OwnershipClaim,
                evidence_url: claim.evidence_url.clone().or_else(|| shop.evidence_url.clone()),
                requested_by: Some(claim.claimant.clone()),
                requested_at: claim.created_at,
            });
        }

        if shop.tier == VerificationTier::Unverified {
            return Some(Self {
                shop_id: shop.id.clone(),
                shop_name: shop.name.clone(),
                kind: ModerationKind::NewSubmission,
                evidence_url: shop.evidence_url.clone(),
                requested_by: shop.reporter().cloned(),
                requested_at: shop.submitted_at,
            });
        }

        None
    }
}

/// Build the operator worklist from the shop collection, preserving arrival
/// order.
pub fn build_queue(shops: &[Shop]) -> Vec<ModerationQueueItem> {
    shops.iter().filter_map(ModerationQueueItem::from_shop).collect()
}
