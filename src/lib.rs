//! # fakechat-gateway
//!
//! REST API and WebSocket gateway for FakeChat, an ephemeral anonymous
//! group chat.
//!
//! Rooms are joined by short shareable codes, messages are ordered
//! per-room feeds, and nothing lives forever: a background sweeper
//! deletes messages after a fixed TTL and retires rooms after a period
//! of inactivity, cascading to everything inside them. All state lives
//! in process memory.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ChatService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── ChatStore (domain/)
//!     ├── Sweeper (sweeper/)
//!     │
//!     └── NotificationDispatcher (notify/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod service;
pub mod sweeper;
pub mod ws;
