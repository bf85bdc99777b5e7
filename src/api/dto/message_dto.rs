//! Message DTOs for send and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Message, MessageId, RoomId};

/// Request body for `POST /rooms/{id}/messages`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Display name of the sender.
    pub sender_name: String,
    /// Opaque client-generated session identifier.
    pub session_id: String,
    /// Message content. May carry the reply-quoting prefix.
    pub content: String,
}

/// Message representation returned by the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    /// Unique message identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: MessageId,
    /// Owning room.
    #[schema(value_type = uuid::Uuid)]
    pub room_id: RoomId,
    /// Display name of the sender.
    pub sender_name: String,
    /// Session identifier of the sender.
    pub session_id: String,
    /// Message content.
    pub content: String,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_name: message.sender_name,
            session_id: message.session_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}
