//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

use anyhow::Context;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`ChatConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Seconds a message lives before the sweeper deletes it.
    pub message_ttl_secs: u64,

    /// Seconds of room inactivity before the sweeper deletes the room
    /// and everything in it.
    pub room_ttl_secs: u64,

    /// Seconds between retention sweep runs.
    pub sweep_interval_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Retry budget for room-code generation before giving up.
    pub code_max_attempts: u32,

    /// Per-request timeout for push notification delivery, in
    /// milliseconds, so one slow endpoint cannot stall the fan-out.
    pub push_timeout_ms: u64,
}

impl ChatConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        // Retention defaults match the reference deployment: messages
        // live 1 hour, rooms 24 hours of inactivity, sweep every 30 min.
        let message_ttl_secs = parse_env("MESSAGE_TTL_SECS", 60 * 60);
        let room_ttl_secs = parse_env("ROOM_TTL_SECS", 24 * 60 * 60);
        let sweep_interval_secs = parse_env("SWEEP_INTERVAL_SECS", 30 * 60);

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);
        let code_max_attempts = parse_env("ROOM_CODE_MAX_ATTEMPTS", 32);
        let push_timeout_ms = parse_env("PUSH_TIMEOUT_MS", 5_000);

        Ok(Self {
            listen_addr,
            message_ttl_secs,
            room_ttl_secs,
            sweep_interval_secs,
            event_bus_capacity,
            code_max_attempts,
            push_timeout_ms,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
