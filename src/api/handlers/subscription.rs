//! Push subscription handler.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::put;
use axum::{Json, Router};

use crate::api::dto::SubscribeRequest;
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ChatError, ErrorResponse};

/// `PUT /rooms/:id/subscriptions` — Register or replace a push
/// subscription for (room, session).
///
/// Idempotent upsert: repeated calls with the same session replace the
/// stored payload and never create duplicates.
///
/// # Errors
///
/// Returns [`ChatError::RoomNotFound`] if the room does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}/subscriptions",
    tag = "Subscriptions",
    summary = "Upsert a push subscription",
    description = "Stores the session's push subscription payload for this room, replacing any previous payload for the same session.",
    params(
        ("id" = uuid::Uuid, Path, description = "Room UUID"),
    ),
    request_body = SubscribeRequest,
    responses(
        (status = 204, description = "Subscription stored"),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn upsert_subscription(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ChatError> {
    state
        .chat_service
        .subscribe(RoomId::from_uuid(id), &req.session_id, &req.subscription)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rooms/{id}/subscriptions", put(upsert_subscription))
}
