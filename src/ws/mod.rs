//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` delivers live room feeds: clients
//! subscribe to room ids and receive every subsequent [`crate::domain::ChatEvent`]
//! touching those rooms, starting from a message snapshot taken at
//! subscribe time.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
