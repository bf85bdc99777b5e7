//! Room DTOs for create and lookup operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Room, RoomCode, RoomId};

/// Request body for `POST /rooms`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    /// Display name for the room.
    pub name: String,
    /// Display name of the creator.
    pub creator_name: String,
}

/// Room representation returned by the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    /// Unique room identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: RoomId,
    /// Room display name.
    pub name: String,
    /// Public 6-character join code.
    #[schema(value_type = String)]
    pub code: RoomCode,
    /// Display name of the creator.
    pub creator_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent activity.
    pub last_activity_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            code: room.code,
            creator_name: room.creator_name,
            created_at: room.created_at,
            last_activity_at: room.last_activity_at,
        }
    }
}
