use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::claims::ClaimDecision;
use super::domain::{ShopEdits, ShopId, ShopSubmission, UserId};
use super::repository::{FavoriteStore, RepositoryError, ShopRepository};
use super::service::{DirectoryService, DirectoryServiceError};

/// Router builder exposing the directory engine over HTTP.
pub fn directory_router<R, F>(service: Arc<DirectoryService<R, F>>) -> Router
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/shops",
            get(list_handler::<R, F>).post(submit_handler::<R, F>),
        )
        .route(
            "/api/v1/shops/:shop_id",
            get(shop_handler::<R, F>).delete(reject_handler::<R, F>),
        )
        .route("/api/v1/shops/:shop_id/votes", post(vote_handler::<R, F>))
        .route("/api/v1/shops/:shop_id/claims", post(claim_handler::<R, F>))
        .route(
            "/api/v1/shops/:shop_id/claims/resolution",
            post(resolve_claim_handler::<R, F>),
        )
        .route(
            "/api/v1/shops/:shop_id/publication",
            post(publish_handler::<R, F>),
        )
        .route("/api/v1/moderation/queue", get(queue_handler::<R, F>))
        .route(
            "/api/v1/users/:user_id/favorites",
            get(favorites_handler::<R, F>),
        )
        .route(
            "/api/v1/users/:user_id/favorites/:shop_id",
            put(add_favorite_handler::<R, F>).delete(remove_favorite_handler::<R, F>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoteRequest {
    pub user_id: String,
    pub is_positive: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClaimRequest {
    pub user_id: String,
    #[serde(default)]
    pub evidence_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveClaimRequest {
    pub decision: ClaimDecision,
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

fn error_response(error: DirectoryServiceError) -> Response {
    let status = match &error {
        DirectoryServiceError::DuplicateVote(_)
        | DirectoryServiceError::ClaimConflict(_)
        | DirectoryServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryServiceError::Repository(RepositoryError::NotFound)
        | DirectoryServiceError::NoPendingClaim(_) => StatusCode::NOT_FOUND,
        DirectoryServiceError::InvalidSchedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DirectoryServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    axum::Json(submission): axum::Json<ShopSubmission>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    let now = now_local();
    match service.submit_shop(submission, now) {
        Ok(shop) => {
            let payload = json!({
                "shop_id": shop.id,
                "status": shop.status_at(now).label(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.list_shops(now_local()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn shop_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.shop(&ShopId(shop_id), now_local()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vote_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
    axum::Json(request): axum::Json<VoteRequest>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.cast_vote(
        &ShopId(shop_id),
        UserId(request.user_id),
        request.is_positive,
    ) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn claim_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
    axum::Json(request): axum::Json<ClaimRequest>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.submit_claim(
        &ShopId(shop_id),
        UserId(request.user_id),
        request.evidence_url,
        now_local(),
    ) {
        Ok(claim) => (StatusCode::ACCEPTED, axum::Json(claim)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_claim_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
    axum::Json(request): axum::Json<ResolveClaimRequest>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.resolve_claim(&ShopId(shop_id), request.decision) {
        Ok(mutation) => (StatusCode::OK, axum::Json(mutation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
    axum::Json(edits): axum::Json<ShopEdits>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.publish_submission(&ShopId(shop_id), edits, now_local()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(shop_id): Path<String>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.reject_submission(&ShopId(shop_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.moderation_queue() {
        Ok(items) => (StatusCode::OK, axum::Json(items)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn favorites_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.favorites(&UserId(user_id), now_local()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_favorite_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path((user_id, shop_id)): Path<(String, String)>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.add_favorite(&UserId(user_id), &ShopId(shop_id)) {
        Ok(added) => (StatusCode::OK, axum::Json(json!({ "added": added }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_favorite_handler<R, F>(
    State(service): State<Arc<DirectoryService<R, F>>>,
    Path((user_id, shop_id)): Path<(String, String)>,
) -> Response
where
    R: ShopRepository + 'static,
    F: FavoriteStore + 'static,
{
    match service.remove_favorite(&UserId(user_id), &ShopId(shop_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(json!({ "removed": removed }))).into_response(),
        Err(error) => error_response(error),
    }
}
