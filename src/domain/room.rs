//! Room entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RoomCode, RoomId};

/// A named chat room identified by a unique short code.
///
/// Rooms are anonymous and ephemeral: they carry no member list, only a
/// last-activity timestamp that the retention sweeper compares against
/// the room TTL. Every field except `last_activity_at` is immutable
/// after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Display name chosen by the creator.
    pub name: String,
    /// Public 6-character join code, unique among live rooms.
    pub code: RoomCode,
    /// Display name of the room creator.
    pub creator_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent message (or creation, if none yet).
    /// Converges to the maximum observed timestamp under concurrent sends.
    pub last_activity_at: DateTime<Utc>,
}

impl Room {
    /// Creates a new room with a fresh id and `last_activity_at = now`.
    #[must_use]
    pub fn new(name: String, creator_name: String, code: RoomCode, now: DateTime<Utc>) -> Self {
        Self {
            id: RoomId::new(),
            name,
            code,
            creator_name,
            created_at: now,
            last_activity_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_room_starts_with_activity_at_creation() {
        let now = Utc::now();
        let room = Room::new(
            "Test".to_string(),
            "Alice".to_string(),
            RoomCode::from_string("ABC123".to_string()),
            now,
        );
        assert_eq!(room.created_at, now);
        assert_eq!(room.last_activity_at, now);
        assert_eq!(room.code.as_str(), "ABC123");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let room = Room::new(
            "Test".to_string(),
            "Alice".to_string(),
            RoomCode::from_string("ABC123".to_string()),
            Utc::now(),
        );
        let json = serde_json::to_string(&room).unwrap_or_default();
        assert!(json.contains("creatorName"));
        assert!(json.contains("lastActivityAt"));
    }
}
