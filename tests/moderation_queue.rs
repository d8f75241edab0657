//! Integration specifications for the operator moderation queue: which shops
//! show up, how the two queue actions differ, and how the queue drains.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use shopgreen::directory::{
    ClaimDecision, Coordinates, DirectoryService, EngineConfig, MemoryFavoriteStore,
    MemoryShopRepository, ModerationKind, ShopEdits, ShopSubmission, UserId,
};

type MemoryService = DirectoryService<MemoryShopRepository, MemoryFavoriteStore>;

fn service() -> Arc<MemoryService> {
    Arc::new(DirectoryService::new(
        Arc::new(MemoryShopRepository::new()),
        Arc::new(MemoryFavoriteStore::new()),
        EngineConfig::default(),
    ))
}

fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

fn submission(name: &str, reporter: Option<&str>) -> ShopSubmission {
    ShopSubmission {
        name: name.to_string(),
        categories: Vec::new(),
        description: String::new(),
        address: String::new(),
        coordinates: Coordinates {
            lat: 46.067,
            lng: 11.121,
        },
        website: None,
        evidence_url: Some("https://img.example/licence.png".to_string()),
        schedule: None,
        submitted_by: reporter.map(user),
        claimed_by_submitter: false,
    }
}

#[test]
fn queue_lists_submissions_and_claims_in_arrival_order() {
    let service = service();

    let first = service
        .submit_shop(submission("BioMarket", Some("reporter")), monday_at(8, 0))
        .expect("submission stored");
    let second = service
        .submit_shop(submission("EcoWear", None), monday_at(8, 5))
        .expect("submission stored");

    // Verify the first shop, then file a claim against it: it re-enters the
    // queue as a claim review, after the still-unverified second shop.
    for i in 0..8 {
        service
            .cast_vote(&first.id, user(&format!("voter-{i}")), true)
            .expect("vote accepted");
    }
    service
        .submit_claim(&first.id, user("giulia"), None, monday_at(9, 0))
        .expect("claim filed");

    let queue = service.moderation_queue().expect("queue builds");
    assert_eq!(queue.len(), 2);

    assert_eq!(queue[0].shop_id, first.id);
    assert_eq!(queue[0].kind, ModerationKind::OwnershipClaim);
    assert_eq!(queue[0].requested_by, Some(user("giulia")));

    assert_eq!(queue[1].shop_id, second.id);
    assert_eq!(queue[1].kind, ModerationKind::NewSubmission);
    assert_eq!(queue[1].requested_by, None, "anonymous report");
    assert_eq!(
        queue[1].evidence_url.as_deref(),
        Some("https://img.example/licence.png")
    );
}

#[test]
fn the_two_queue_actions_differ_in_severity() {
    let service = service();

    let published = service
        .submit_shop(submission("Orto Urbano", Some("reporter")), monday_at(8, 0))
        .expect("submission stored");
    let deleted = service
        .submit_shop(submission("Duplicate Stand", None), monday_at(8, 5))
        .expect("submission stored");

    // Publishing keeps the shop and verifies it; rejecting a submission
    // deletes it outright.
    service
        .publish_submission(&published.id, ShopEdits::default(), monday_at(9, 0))
        .expect("publish succeeds");
    service
        .reject_submission(&deleted.id)
        .expect("rejection succeeds");

    assert!(service.moderation_queue().expect("queue builds").is_empty());
    assert!(service.shop(&published.id, monday_at(9, 30)).is_ok());
    assert!(service.shop(&deleted.id, monday_at(9, 30)).is_err());
}

#[test]
fn rejecting_a_claim_keeps_the_shop_but_drains_the_queue_entry() {
    let service = service();

    let shop = service
        .submit_shop(submission("VerdeCasa", Some("reporter")), monday_at(8, 0))
        .expect("submission stored");
    service
        .publish_submission(&shop.id, ShopEdits::default(), monday_at(8, 30))
        .expect("publish succeeds");

    service
        .submit_claim(&shop.id, user("giulia"), None, monday_at(9, 0))
        .expect("claim filed");
    assert_eq!(service.moderation_queue().expect("queue builds").len(), 1);

    service
        .resolve_claim(&shop.id, ClaimDecision::Reject)
        .expect("claim resolved");

    assert!(service.moderation_queue().expect("queue builds").is_empty());
    let view = service.shop(&shop.id, monday_at(9, 30)).expect("view");
    assert_eq!(view.owner_id, None, "reject leaves ownership unchanged");
}
