//! Push-notification subscription entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RoomId;

/// A registered push endpoint for a (room, session) pair.
///
/// At most one live record exists per pair; a repeated subscribe
/// replaces the payload (last write wins). The payload is an opaque
/// serialized push endpoint — the store never interprets it, only the
/// dispatcher does. Subscriptions are never expired by time; they are
/// removed only when their room is swept.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Owning room.
    pub room_id: RoomId,
    /// Session this endpoint belongs to.
    pub session_id: String,
    /// Opaque serialized push endpoint (JSON string from the client).
    pub subscription: String,
    /// Timestamp of the most recent upsert.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a new subscription record.
    #[must_use]
    pub fn new(
        room_id: RoomId,
        session_id: String,
        subscription: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id,
            session_id,
            subscription,
            updated_at: now,
        }
    }
}
