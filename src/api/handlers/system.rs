//! System endpoints: health check and retention config.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    rooms: usize,
    messages: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and live room/message counts.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.chat_service.store();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rooms: store.room_count().await,
            messages: store.message_count().await,
        }),
    )
}

/// Retention policy response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RetentionResponse {
    message_ttl_secs: u64,
    room_ttl_secs: u64,
    sweep_interval_secs: u64,
}

/// `GET /config/retention` — Active retention policy.
#[utoipa::path(
    get,
    path = "/config/retention",
    tag = "System",
    summary = "Retention policy",
    description = "Returns the message TTL, room inactivity TTL, and sweep interval the server was started with, so clients can display expiry hints.",
    responses(
        (status = 200, description = "Retention policy", body = RetentionResponse),
    )
)]
pub async fn retention_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(RetentionResponse {
            message_ttl_secs: state.retention.message_ttl_secs,
            room_ttl_secs: state.retention.room_ttl_secs,
            sweep_interval_secs: state.retention.sweep_interval_secs,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/retention", get(retention_handler))
}
