use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::common::*;
use crate::directory::domain::ShopEdits;
use crate::directory::repository::{MemoryFavoriteStore, MemoryShopRepository, ShopRepository};
use crate::directory::router::{
    claim_handler, list_handler, publish_handler, submit_handler, vote_handler, ClaimRequest,
    VoteRequest,
};
use crate::directory::schedule::RawWeeklySchedule;
use crate::directory::service::{DirectoryService, EngineConfig};

fn arc_service() -> (Arc<MemoryShopRepository>, Arc<MemoryService>) {
    let (repository, favorites, _) = memory_service();
    let service = Arc::new(DirectoryService::new(
        repository.clone(),
        favorites,
        EngineConfig::default(),
    ));
    (repository, service)
}

#[tokio::test]
async fn submit_handler_creates_an_unverified_shop() {
    let (_, service) = arc_service();

    let response = submit_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service),
        axum::Json(submission("BioMarket")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn vote_handler_returns_conflict_on_duplicate() {
    let (_, service) = arc_service();
    let shop = service
        .submit_shop(submission("BioMarket"), monday_at(8, 0))
        .expect("submission stored");

    let first = vote_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service.clone()),
        Path(shop.id.0.clone()),
        axum::Json(VoteRequest {
            user_id: "mario".to_string(),
            is_positive: true,
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let duplicate = vote_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service),
        Path(shop.id.0.clone()),
        axum::Json(VoteRequest {
            user_id: "mario".to_string(),
            is_positive: false,
        }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn vote_handler_returns_not_found_for_missing_shops() {
    let (_, service) = arc_service();

    let response = vote_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service),
        Path("missing".to_string()),
        axum::Json(VoteRequest {
            user_id: "mario".to_string(),
            is_positive: true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn claim_handler_returns_conflict_while_one_is_pending() {
    let (repository, service) = arc_service();
    let shop = verified_shop("s-1");
    repository.insert(shop.clone()).expect("seed shop");

    let first = claim_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service.clone()),
        Path(shop.id.0.clone()),
        axum::Json(ClaimRequest {
            user_id: "giulia".to_string(),
            evidence_url: None,
        }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = claim_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service),
        Path(shop.id.0.clone()),
        axum::Json(ClaimRequest {
            user_id: "luca".to_string(),
            evidence_url: None,
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn publish_handler_returns_unprocessable_for_malformed_hours() {
    let (_, service) = arc_service();
    let shop = service
        .submit_shop(submission("Orto Urbano"), monday_at(8, 0))
        .expect("submission stored");

    let response = publish_handler::<MemoryShopRepository, MemoryFavoriteStore>(
        State(service),
        Path(shop.id.0.clone()),
        axum::Json(ShopEdits {
            schedule: Some(RawWeeklySchedule {
                monday: open_day(&[("17:00", "09:00")]),
                ..RawWeeklySchedule::default()
            }),
            ..ShopEdits::default()
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_handler_returns_internal_error_when_the_store_is_down() {
    let service = Arc::new(DirectoryService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryFavoriteStore::new()),
        EngineConfig::default(),
    ));

    let response =
        list_handler::<UnavailableRepository, MemoryFavoriteStore>(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
