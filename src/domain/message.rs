//! Message entity and the reply-quoting content convention.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RoomId;

/// Prefix marking a message content as a reply to an earlier message.
const REPLY_PREFIX: &str = ">> @";

/// Separator between the quoted reply header and the message body.
const REPLY_SEPARATOR: &str = "\n\n";

/// Unique identifier for a message.
///
/// Wraps a UUID v4, assigned at insertion time together with the
/// creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(uuid::Uuid);

impl MessageId {
    /// Creates a new random `MessageId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat message.
///
/// Immutable once stored. Per-room ordering is the insertion order kept
/// by the store; `created_at` additionally drives retention expiry.
/// Sender identity is a display name plus an unauthenticated session id
/// used only to distinguish "my messages" and to address notifications.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Owning room.
    pub room_id: RoomId,
    /// Display name of the sender; may vary per message.
    pub sender_name: String,
    /// Opaque client-generated session identifier. Not a credential.
    pub session_id: String,
    /// Free-text content. May carry a reply header, see [`Message::reply_parts`].
    pub content: String,
    /// Insertion timestamp; also the retention clock for this message.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a new message with a fresh id.
    #[must_use]
    pub fn new(
        room_id: RoomId,
        sender_name: String,
        session_id: String,
        content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            room_id,
            sender_name,
            session_id,
            content,
            created_at: now,
        }
    }

    /// Splits a reply-formatted content into `(header, body)`.
    ///
    /// The reference client encodes a reply relation as a content prefix
    /// `">> @<sender>: <quoted>\n\n<body>"`. For such content the header
    /// is `"@<sender>: <quoted>"` and the body is everything after the
    /// first blank line (which may itself contain blank lines). A reply
    /// marker without a separator yields an empty body. Returns `None`
    /// for plain messages.
    #[must_use]
    pub fn reply_parts(&self) -> Option<(&str, &str)> {
        if !self.content.starts_with(REPLY_PREFIX) {
            return None;
        }
        // Drop the ">> " marker but keep the "@" in the header.
        let rest = self.content.strip_prefix(">> ")?;
        match rest.split_once(REPLY_SEPARATOR) {
            Some((header, body)) => Some((header, body)),
            None => Some((rest, "")),
        }
    }
}

/// Composes a reply content string in the reference client's convention.
#[must_use]
pub fn compose_reply(quoted_sender: &str, quoted_content: &str, body: &str) -> String {
    format!("{REPLY_PREFIX}{quoted_sender}: {quoted_content}{REPLY_SEPARATOR}{body}")
}
