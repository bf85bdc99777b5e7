//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::ChatService;

/// Retention policy values exposed by `GET /config/retention`.
#[derive(Debug, Clone, Copy)]
pub struct RetentionInfo {
    /// Seconds a message lives before the sweeper may delete it.
    pub message_ttl_secs: u64,
    /// Seconds of room inactivity before the sweeper may delete it.
    pub room_ttl_secs: u64,
    /// Seconds between sweep passes.
    pub sweep_interval_secs: u64,
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat service for all business logic.
    pub chat_service: Arc<ChatService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Retention policy as configured at startup.
    pub retention: RetentionInfo,
}
