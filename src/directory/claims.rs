use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Shop, ShopId, UserId};

/// A user's pending request to be recognized as a shop's owner. At most one
/// exists per shop at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipClaim {
    pub shop_id: ShopId,
    pub claimant: UserId,
    /// Licence scan attached to the claim for the operator check.
    pub evidence_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Raised when a claim is submitted while another is still pending.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shop {shop_id} already has a pending ownership claim from {pending_claimant}")]
pub struct ClaimConflictError {
    pub shop_id: ShopId,
    pub pending_claimant: UserId,
}

/// Operator verdict on a pending claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimDecision {
    Accept,
    Reject,
}

/// The exact ownership change the host must persist after a claim resolves.
/// Nothing outside the ownership field is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipMutation {
    pub shop_id: ShopId,
    pub decision: ClaimDecision,
    pub claimant: UserId,
    /// `Some` on accept, `None` on reject (owner unchanged).
    pub new_owner: Option<UserId>,
}

/// Attach a pending claim to a shop, rejecting a second claim while one is
/// open.
pub fn submit_claim(
    shop: &mut Shop,
    claimant: UserId,
    evidence_url: Option<String>,
    now: NaiveDateTime,
) -> Result<OwnershipClaim, ClaimConflictError> {
    if let Some(pending) = &shop.pending_claim {
        return Err(ClaimConflictError {
            shop_id: shop.id.clone(),
            pending_claimant: pending.claimant.clone(),
        });
    }

    let claim = OwnershipClaim {
        shop_id: shop.id.clone(),
        claimant,
        evidence_url,
        created_at: now,
    };
    shop.pending_claim = Some(claim.clone());

    Ok(claim)
}

/// Resolve the pending claim. Accepting transfers ownership to the claimant;
/// rejecting only clears the claim — the shop itself is never deleted here,
/// unlike a rejected brand-new submission.
///
/// Returns `None` when no claim is pending.
pub fn resolve_claim(shop: &mut Shop, decision: ClaimDecision) -> Option<OwnershipMutation> {
    let claim = shop.pending_claim.take()?;

    let new_owner = match decision {
        ClaimDecision::Accept => {
            shop.owner_id = Some(claim.claimant.clone());
            Some(claim.claimant.clone())
        }
        ClaimDecision::Reject => None,
    };

    Some(OwnershipMutation {
        shop_id: shop.id.clone(),
        decision,
        claimant: claim.claimant,
        new_owner,
    })
}
