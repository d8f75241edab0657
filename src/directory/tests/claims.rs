use super::common::*;
use crate::directory::claims::{self, ClaimDecision};

#[test]
fn submitting_a_claim_marks_it_pending() {
    let mut shop = verified_shop("s-1");

    let claim = claims::submit_claim(
        &mut shop,
        user("giulia"),
        Some("https://img.example/licence.png".to_string()),
        monday_at(9, 30),
    )
    .expect("first claim succeeds");

    assert_eq!(claim.claimant, user("giulia"));
    assert_eq!(shop.pending_claim.as_ref(), Some(&claim));
    assert_eq!(shop.owner_id, None, "ownership changes only on accept");
}

#[test]
fn second_claim_while_pending_is_rejected_and_the_first_stands() {
    let mut shop = verified_shop("s-1");
    let original = claims::submit_claim(&mut shop, user("giulia"), None, monday_at(9, 30))
        .expect("first claim succeeds");

    let error = claims::submit_claim(&mut shop, user("luca"), None, monday_at(10, 0))
        .expect_err("second claim must conflict");

    assert_eq!(error.shop_id, shop.id);
    assert_eq!(error.pending_claimant, user("giulia"));
    assert_eq!(shop.pending_claim.as_ref(), Some(&original));
}

#[test]
fn accept_transfers_ownership_and_clears_the_claim() {
    let mut shop = verified_shop("s-1");
    claims::submit_claim(&mut shop, user("giulia"), None, monday_at(9, 30))
        .expect("claim succeeds");

    let mutation =
        claims::resolve_claim(&mut shop, ClaimDecision::Accept).expect("claim was pending");

    assert_eq!(mutation.new_owner, Some(user("giulia")));
    assert_eq!(shop.owner_id, Some(user("giulia")));
    assert!(shop.pending_claim.is_none());
}

#[test]
fn reject_clears_the_claim_and_leaves_the_shop_unchanged() {
    let mut shop = verified_shop("s-1");
    shop.owner_id = Some(user("previous-owner"));
    claims::submit_claim(&mut shop, user("giulia"), None, monday_at(9, 30))
        .expect("claim succeeds");
    let before = shop.clone();

    let mutation =
        claims::resolve_claim(&mut shop, ClaimDecision::Reject).expect("claim was pending");

    assert_eq!(mutation.new_owner, None);
    assert_eq!(mutation.claimant, user("giulia"));
    assert_eq!(shop.owner_id, Some(user("previous-owner")));
    assert!(shop.pending_claim.is_none());

    // Everything except the cleared claim is untouched; the shop is not
    // deleted the way a rejected new submission is.
    let mut expected = before;
    expected.pending_claim = None;
    assert_eq!(shop.tier, expected.tier);
    assert_eq!(shop.name, expected.name);
    assert_eq!(shop.ledger, expected.ledger);
}

#[test]
fn resolving_without_a_pending_claim_returns_none() {
    let mut shop = verified_shop("s-1");
    assert!(claims::resolve_claim(&mut shop, ClaimDecision::Accept).is_none());
}

#[test]
fn a_new_claim_can_follow_a_resolved_one() {
    let mut shop = verified_shop("s-1");
    claims::submit_claim(&mut shop, user("giulia"), None, monday_at(9, 30))
        .expect("claim succeeds");
    claims::resolve_claim(&mut shop, ClaimDecision::Reject).expect("claim was pending");

    claims::submit_claim(&mut shop, user("luca"), None, monday_at(11, 0))
        .expect("slot is free again");
    assert_eq!(
        shop.pending_claim.as_ref().map(|claim| claim.claimant.clone()),
        Some(user("luca"))
    );
}
