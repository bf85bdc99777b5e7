//! Push-notification fan-out.
//!
//! The gateway's only responsibility here is to gather the current
//! subscription set for a room and attempt one independent delivery per
//! non-excluded subscriber. Actual transport lives behind the
//! [`PushGateway`] trait; delivery failures are logged and never reach
//! the message sender.

pub mod dispatcher;
pub mod gateway;

pub use dispatcher::NotificationDispatcher;
pub use gateway::{HttpPushGateway, PushError, PushGateway, PushPayload};
