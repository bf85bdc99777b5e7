//! Room handlers: create and lookup by code.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateRoomRequest, RoomDto};
use crate::app_state::AppState;
use crate::error::{ChatError, ErrorResponse};

/// `POST /rooms` — Create a new room.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] on a blank name and
/// [`ChatError::CodeGenerationExhausted`] if no free code was found.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "Create a new room",
    description = "Creates a room with a server-generated unique 6-character join code and returns the full room record.",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created successfully", body = RoomDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Code generation exhausted", body = ErrorResponse),
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let room = state
        .chat_service
        .create_room(&req.name, &req.creator_name)
        .await?;
    Ok((StatusCode::CREATED, Json(RoomDto::from(room))))
}

/// `GET /rooms/:code` — Look up a room by its join code.
///
/// Responds `200` with `null` when no live room carries the code, so
/// the join flow can distinguish "no such room" from a transport error.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{code}",
    tag = "Rooms",
    summary = "Look up a room by join code",
    description = "Exact-match lookup by 6-character code. Returns the room, or JSON null when the code matches no live room (never created, or expired and swept).",
    params(
        ("code" = String, Path, description = "6-character room code"),
    ),
    responses(
        (status = 200, description = "Room, or null when absent", body = Option<RoomDto>),
    )
)]
pub async fn get_room_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let room = state.chat_service.room_by_code(&code).await;
    Json(room.map(RoomDto::from))
}

/// Room management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(get_room_by_code))
}
