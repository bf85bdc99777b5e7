//! Domain events reflecting chat state mutations.
//!
//! Every state change emits a [`ChatEvent`] through the [`super::EventBus`].
//! Events are broadcast to WebSocket subscribers so that a message feed
//! behaves as a live query: clients re-render on each event instead of
//! polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Message, MessageId, RoomCode, RoomId};

/// Domain event emitted after every state mutation.
///
/// Delivery to WebSocket clients is at-least-once; clients must treat
/// re-delivered events as idempotent re-renders.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "eventType", rename_all = "camelCase")]
pub enum ChatEvent {
    /// Emitted when a new room is created.
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        /// Room identifier.
        room_id: RoomId,
        /// Public join code.
        code: RoomCode,
        /// Room display name.
        name: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a message is stored.
    #[serde(rename_all = "camelCase")]
    MessageSent {
        /// Room identifier.
        room_id: RoomId,
        /// The stored message, including its assigned id and timestamp.
        message: Message,
    },

    /// Emitted when the sweeper deletes messages past the message TTL.
    #[serde(rename_all = "camelCase")]
    MessagesExpired {
        /// Room identifier.
        room_id: RoomId,
        /// Ids of the deleted messages, in their stored order.
        message_ids: Vec<MessageId>,
        /// Sweep timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the sweeper deletes an inactive room and its
    /// remaining messages and subscriptions.
    #[serde(rename_all = "camelCase")]
    RoomExpired {
        /// Room identifier.
        room_id: RoomId,
        /// Sweep timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ChatEvent {
    /// Returns the room ID associated with this event.
    #[must_use]
    pub fn room_id(&self) -> RoomId {
        match self {
            Self::RoomCreated { room_id, .. }
            | Self::MessageSent { room_id, .. }
            | Self::MessagesExpired { room_id, .. }
            | Self::RoomExpired { room_id, .. } => *room_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "roomCreated",
            Self::MessageSent { .. } => "messageSent",
            Self::MessagesExpired { .. } => "messagesExpired",
            Self::RoomExpired { .. } => "roomExpired",
        }
    }
}
