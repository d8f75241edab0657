pub mod policy;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{UserId, VerificationTier};

/// A single community vote on a shop's sustainability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub const fn from_is_positive(is_positive: bool) -> Self {
        if is_positive {
            Vote::Up
        } else {
            Vote::Down
        }
    }

    pub const fn sign(self) -> i32 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// Raised when a user tries to vote twice on the same shop. The original
/// vote stands; there is no retraction or toggle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {user_id} has already voted on this shop")]
pub struct DuplicateVoteError {
    pub user_id: UserId,
}

/// Outcome of a successful vote: the new score and the tier it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub score: i32,
    pub tier: VerificationTier,
    pub positive: usize,
    pub negative: usize,
}

/// Per-shop vote book: one vote per user, ever, with the aggregate score kept
/// in lockstep with the vote signs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLedger {
    votes: BTreeMap<UserId, Vote>,
    score: i32,
}

impl VerificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored votes, recomputing the score.
    pub fn from_votes<I>(votes: I) -> Self
    where
        I: IntoIterator<Item = (UserId, Vote)>,
    {
        let votes: BTreeMap<UserId, Vote> = votes.into_iter().collect();
        let score = votes.values().map(|vote| vote.sign()).sum();
        Self { votes, score }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn vote_of(&self, user_id: &UserId) -> Option<Vote> {
        self.votes.get(user_id).copied()
    }

    pub fn positive_count(&self) -> usize {
        self.votes.values().filter(|vote| **vote == Vote::Up).count()
    }

    pub fn negative_count(&self) -> usize {
        self.votes.values().filter(|vote| **vote == Vote::Down).count()
    }

    /// Record a vote, rejecting duplicates without touching the score.
    pub fn cast_vote(
        &mut self,
        user_id: UserId,
        is_positive: bool,
    ) -> Result<VoteReceipt, DuplicateVoteError> {
        if self.votes.contains_key(&user_id) {
            return Err(DuplicateVoteError { user_id });
        }

        let vote = Vote::from_is_positive(is_positive);
        self.score += vote.sign();
        self.votes.insert(user_id, vote);

        Ok(VoteReceipt {
            score: self.score,
            tier: policy::tier_for(self.score),
            positive: self.positive_count(),
            negative: self.negative_count(),
        })
    }
}
