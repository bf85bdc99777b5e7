//! fakechat-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, plus
//! the background retention sweeper.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fakechat_gateway::api;
use fakechat_gateway::app_state::{AppState, RetentionInfo};
use fakechat_gateway::config::ChatConfig;
use fakechat_gateway::domain::{ChatStore, EventBus};
use fakechat_gateway::notify::{HttpPushGateway, NotificationDispatcher};
use fakechat_gateway::service::ChatService;
use fakechat_gateway::sweeper::Sweeper;
use fakechat_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ChatConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting fakechat-gateway");

    // Build domain layer
    let store = Arc::new(ChatStore::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build notification and service layers
    let gateway = HttpPushGateway::new(Duration::from_millis(config.push_timeout_ms))
        .map_err(|e| anyhow::anyhow!("push gateway init failed: {e}"))?;
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&store),
        Arc::new(gateway),
    ));
    let chat_service = Arc::new(ChatService::new(
        Arc::clone(&store),
        event_bus.clone(),
        dispatcher,
        config.code_max_attempts,
    ));

    // Spawn the retention sweeper
    let sweeper = Sweeper::new(
        Arc::clone(&store),
        event_bus.clone(),
        config.message_ttl_secs,
        config.room_ttl_secs,
        config.sweep_interval_secs,
    );
    tokio::spawn(sweeper.run());
    tracing::info!(
        message_ttl_secs = config.message_ttl_secs,
        room_ttl_secs = config.room_ttl_secs,
        sweep_interval_secs = config.sweep_interval_secs,
        "retention sweeper started"
    );

    // Build application state
    let app_state = AppState {
        chat_service,
        event_bus,
        retention: RetentionInfo {
            message_ttl_secs: config.message_ttl_secs,
            room_ttl_secs: config.room_ttl_secs,
            sweep_interval_secs: config.sweep_interval_secs,
        },
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
