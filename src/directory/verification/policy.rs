use super::super::domain::VerificationTier;

/// Cumulative score at which community trust promotes a shop.
pub const PROMOTION_THRESHOLD: i32 = 8;

/// Pure score-to-tier mapping.
pub fn tier_for(score: i32) -> VerificationTier {
    tier_with_threshold(score, PROMOTION_THRESHOLD)
}

pub fn tier_with_threshold(score: i32, threshold: i32) -> VerificationTier {
    if score >= threshold {
        VerificationTier::Verified
    } else {
        VerificationTier::Unverified
    }
}

/// Tier transition applied after a ledger change. Promotion is one-way: a
/// shop that has reached `Verified` keeps it even if the recomputed score
/// later falls below the threshold.
pub fn next_tier(current: VerificationTier, score: i32) -> VerificationTier {
    next_tier_with_threshold(current, score, PROMOTION_THRESHOLD)
}

pub fn next_tier_with_threshold(
    current: VerificationTier,
    score: i32,
    threshold: i32,
) -> VerificationTier {
    match current {
        VerificationTier::Verified => VerificationTier::Verified,
        VerificationTier::Unverified => tier_with_threshold(score, threshold),
    }
}
