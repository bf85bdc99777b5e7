//! Chat service: orchestrates room, message, and subscription operations.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ChatEvent, ChatStore, EventBus, Message, Room, RoomCode, RoomId, Subscription};
use crate::error::ChatError;
use crate::notify::NotificationDispatcher;

/// Orchestration layer for all chat operations.
///
/// Stateless coordinator: owns references to [`ChatStore`] for state,
/// [`EventBus`] for event emission, and [`NotificationDispatcher`] for
/// push fan-out. Every mutation method follows the pattern: validate →
/// mutate store → emit events → (maybe) spawn fan-out → return result.
#[derive(Debug, Clone)]
pub struct ChatService {
    store: Arc<ChatStore>,
    event_bus: EventBus,
    dispatcher: Arc<NotificationDispatcher>,
    code_max_attempts: u32,
}

impl ChatService {
    /// Creates a new `ChatService`.
    #[must_use]
    pub fn new(
        store: Arc<ChatStore>,
        event_bus: EventBus,
        dispatcher: Arc<NotificationDispatcher>,
        code_max_attempts: u32,
    ) -> Self {
        Self {
            store,
            event_bus,
            dispatcher,
            code_max_attempts,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`ChatStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    /// Creates a new room with a freshly allocated unique join code.
    ///
    /// Codes are regenerated on collision up to the configured retry
    /// budget; with a 36^6 code space exhaustion indicates a capacity
    /// problem rather than bad luck.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] on an empty name and
    /// [`ChatError::CodeGenerationExhausted`] if no free code was found.
    pub async fn create_room(&self, name: &str, creator_name: &str) -> Result<Room, ChatError> {
        let name = name.trim();
        let creator_name = creator_name.trim();
        if name.is_empty() {
            return Err(ChatError::InvalidRequest("room name is empty".to_string()));
        }
        if creator_name.is_empty() {
            return Err(ChatError::InvalidRequest(
                "creator name is empty".to_string(),
            ));
        }

        for _ in 0..self.code_max_attempts {
            let room = Room::new(
                name.to_string(),
                creator_name.to_string(),
                RoomCode::generate(),
                Utc::now(),
            );
            match self.store.insert_room(room.clone()).await {
                Ok(()) => {
                    let _ = self.event_bus.publish(ChatEvent::RoomCreated {
                        room_id: room.id,
                        code: room.code.clone(),
                        name: room.name.clone(),
                        timestamp: room.created_at,
                    });
                    tracing::info!(room_id = %room.id, code = %room.code, "room created");
                    return Ok(room);
                }
                Err(ChatError::CodeConflict(code)) => {
                    tracing::debug!(code, "room code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            attempts = self.code_max_attempts,
            "room code generation exhausted"
        );
        Err(ChatError::CodeGenerationExhausted)
    }

    /// Exact room lookup by join code.
    ///
    /// `None` means never created, or expired and swept — a normal
    /// outcome, not an error.
    pub async fn room_by_code(&self, code: &str) -> Option<Room> {
        self.store.room_by_code(code).await
    }

    /// Stores a message, bumps room activity, and spawns push fan-out.
    ///
    /// The insert and the activity bump are atomic with respect to
    /// readers. Notification delivery runs in a detached task; its
    /// completion is never awaited and its failures never surface here.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist
    /// and [`ChatError::InvalidRequest`] on empty content.
    pub async fn send_message(
        &self,
        room_id: RoomId,
        sender_name: &str,
        session_id: &str,
        content: &str,
    ) -> Result<Message, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "message content is empty".to_string(),
            ));
        }

        let message = Message::new(
            room_id,
            sender_name.to_string(),
            session_id.to_string(),
            content.to_string(),
            Utc::now(),
        );
        let message = self.store.append_message(message).await?;

        let _ = self.event_bus.publish(ChatEvent::MessageSent {
            room_id,
            message: message.clone(),
        });

        // Fan-out needs the room's name and code for the payload; the
        // room may already be gone if a sweep raced us, in which case
        // there is nobody left to notify.
        if let Some(room) = self.store.room(room_id).await {
            let dispatcher = Arc::clone(&self.dispatcher);
            let outgoing = message.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(&room, &outgoing).await;
            });
        }

        tracing::debug!(room_id = %room_id, message_id = %message.id, "message stored");
        Ok(message)
    }

    /// Returns a room's messages in insertion order.
    ///
    /// This is the one-shot snapshot; live updates flow through the
    /// WebSocket event subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn list_messages(&self, room_id: RoomId) -> Result<Vec<Message>, ChatError> {
        self.store.messages(room_id).await
    }

    /// Registers or replaces the push endpoint for (room, session).
    ///
    /// Last write wins; repeated calls never create duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn subscribe(
        &self,
        room_id: RoomId,
        session_id: &str,
        subscription: &str,
    ) -> Result<(), ChatError> {
        let sub = Subscription::new(
            room_id,
            session_id.to_string(),
            subscription.to_string(),
            Utc::now(),
        );
        let replaced = self.store.upsert_subscription(sub).await?;
        tracing::debug!(room_id = %room_id, session_id, replaced, "subscription upserted");
        Ok(())
    }
}
