//! Message handlers: send and list per room.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{MessageDto, SendMessageRequest};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ChatError, ErrorResponse};

/// `POST /rooms/:id/messages` — Send a message to a room.
///
/// # Errors
///
/// Returns [`ChatError::RoomNotFound`] if the room does not exist and
/// [`ChatError::InvalidRequest`] on empty content.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/messages",
    tag = "Messages",
    summary = "Send a message",
    description = "Stores a message in the room's feed, bumps the room's activity timestamp, and triggers push notification fan-out to other subscribed sessions.",
    params(
        ("id" = uuid::Uuid, Path, description = "Room UUID"),
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = MessageDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let message = state
        .chat_service
        .send_message(
            RoomId::from_uuid(id),
            &req.sender_name,
            &req.session_id,
            &req.content,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}

/// `GET /rooms/:id/messages` — List a room's messages in order.
///
/// # Errors
///
/// Returns [`ChatError::RoomNotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/messages",
    tag = "Messages",
    summary = "List room messages",
    description = "Returns the room's full message feed in insertion order. Live updates are delivered over the WebSocket endpoint.",
    params(
        ("id" = uuid::Uuid, Path, description = "Room UUID"),
    ),
    responses(
        (status = 200, description = "Messages in insertion order", body = Vec<MessageDto>),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ChatError> {
    let messages = state.chat_service.list_messages(RoomId::from_uuid(id)).await?;
    let dtos: Vec<MessageDto> = messages.into_iter().map(MessageDto::from).collect();
    Ok(Json(dtos))
}

/// Message routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rooms/{id}/messages", post(send_message).get(list_messages))
}
