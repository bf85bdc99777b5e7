//! Concurrent chat storage: rooms, messages, and subscriptions.
//!
//! [`ChatStore`] keeps the three logical collections behind a single
//! [`tokio::sync::RwLock`]. One lock (rather than per-collection locks)
//! keeps multi-collection mutations atomic with respect to readers: a
//! reader can never observe a message without the matching activity
//! bump, or a swept room whose messages are still visible.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{Message, MessageId, Room, RoomId, Subscription};
use crate::error::ChatError;

/// Counters returned by a cascading room deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStats {
    /// Messages deleted together with the room.
    pub messages_removed: usize,
    /// Subscriptions deleted together with the room.
    pub subscriptions_removed: usize,
}

/// The three collections, guarded as one unit.
///
/// `rooms_by_code` is a secondary unique index over live rooms; it is
/// maintained on every insert and delete so `code` lookups are O(1).
/// `messages` keeps per-room insertion order in a `Vec`, which is the
/// canonical ordering for a room's feed. `subscriptions` is keyed by
/// session id within each room, giving upsert-by-(room, session) as a
/// single map insert.
#[derive(Debug, Default)]
struct Tables {
    rooms: HashMap<RoomId, Room>,
    rooms_by_code: HashMap<String, RoomId>,
    messages: HashMap<RoomId, Vec<Message>>,
    subscriptions: HashMap<RoomId, HashMap<String, Subscription>>,
}

/// Central store for all live chat state.
#[derive(Debug, Default)]
pub struct ChatStore {
    tables: RwLock<Tables>,
}

impl ChatStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new room, enforcing code uniqueness among live rooms.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::CodeConflict`] if another live room already
    /// holds the same code. The caller regenerates and retries.
    pub async fn insert_room(&self, room: Room) -> Result<(), ChatError> {
        let mut tables = self.tables.write().await;
        if tables.rooms_by_code.contains_key(room.code.as_str()) {
            return Err(ChatError::CodeConflict(room.code.as_str().to_string()));
        }
        tables
            .rooms_by_code
            .insert(room.code.as_str().to_string(), room.id);
        tables.messages.insert(room.id, Vec::new());
        tables.rooms.insert(room.id, room);
        Ok(())
    }

    /// Returns the room with the given id, if it is still live.
    pub async fn room(&self, room_id: RoomId) -> Option<Room> {
        let tables = self.tables.read().await;
        tables.rooms.get(&room_id).cloned()
    }

    /// Exact lookup by join code via the unique index.
    ///
    /// Absent (never created, or expired and swept) is a normal `None`,
    /// not an error.
    pub async fn room_by_code(&self, code: &str) -> Option<Room> {
        let tables = self.tables.read().await;
        let room_id = tables.rooms_by_code.get(code)?;
        tables.rooms.get(room_id).cloned()
    }

    /// Bumps a room's `last_activity_at` to at least `now`.
    ///
    /// Idempotent and monotonic: concurrent bumps converge to the
    /// maximum timestamp. Returns `false` if the room is gone.
    pub async fn touch_activity(&self, room_id: RoomId, now: DateTime<Utc>) -> bool {
        let mut tables = self.tables.write().await;
        match tables.rooms.get_mut(&room_id) {
            Some(room) => {
                room.last_activity_at = room.last_activity_at.max(now);
                true
            }
            None => false,
        }
    }

    /// Appends a message to its room's feed and bumps room activity.
    ///
    /// Both writes happen under one lock acquisition, so readers always
    /// see the message and the activity bump together.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn append_message(&self, message: Message) -> Result<Message, ChatError> {
        let mut tables = self.tables.write().await;
        let Some(room) = tables.rooms.get_mut(&message.room_id) else {
            return Err(ChatError::RoomNotFound(*message.room_id.as_uuid()));
        };
        room.last_activity_at = room.last_activity_at.max(message.created_at);
        tables
            .messages
            .entry(message.room_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    /// Returns a room's messages in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn messages(&self, room_id: RoomId) -> Result<Vec<Message>, ChatError> {
        let tables = self.tables.read().await;
        if !tables.rooms.contains_key(&room_id) {
            return Err(ChatError::RoomNotFound(*room_id.as_uuid()));
        }
        Ok(tables.messages.get(&room_id).cloned().unwrap_or_default())
    }

    /// Upserts a push subscription keyed by (room, session).
    ///
    /// A single conditional map insert under the write lock, so the
    /// find-then-patch race of naive two-step upserts cannot occur.
    /// Returns `true` when an existing payload was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn upsert_subscription(&self, sub: Subscription) -> Result<bool, ChatError> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&sub.room_id) {
            return Err(ChatError::RoomNotFound(*sub.room_id.as_uuid()));
        }
        let replaced = tables
            .subscriptions
            .entry(sub.room_id)
            .or_default()
            .insert(sub.session_id.clone(), sub)
            .is_some();
        Ok(replaced)
    }

    /// Returns all subscriptions for a room. Empty if the room is gone.
    pub async fn subscriptions(&self, room_id: RoomId) -> Vec<Subscription> {
        let tables = self.tables.read().await;
        tables
            .subscriptions
            .get(&room_id)
            .map(|by_session| by_session.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Deletes every message created before `cutoff`, across all rooms.
    ///
    /// Room activity timestamps are untouched; only the room TTL retires
    /// a room. Returns the deleted ids grouped by room, in stored order,
    /// so the caller can notify live readers.
    pub async fn remove_expired_messages(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Vec<(RoomId, Vec<MessageId>)> {
        let mut tables = self.tables.write().await;
        let mut removed = Vec::new();
        for (room_id, feed) in &mut tables.messages {
            let expired: Vec<MessageId> = feed
                .iter()
                .filter(|m| m.created_at < cutoff)
                .map(|m| m.id)
                .collect();
            if expired.is_empty() {
                continue;
            }
            feed.retain(|m| m.created_at >= cutoff);
            removed.push((*room_id, expired));
        }
        removed
    }

    /// Returns ids of rooms whose last activity predates `cutoff`.
    pub async fn rooms_inactive_since(&self, cutoff: DateTime<Utc>) -> Vec<RoomId> {
        let tables = self.tables.read().await;
        tables
            .rooms
            .values()
            .filter(|room| room.last_activity_at < cutoff)
            .map(|room| room.id)
            .collect()
    }

    /// Deletes a room together with all its messages and subscriptions.
    ///
    /// Children are removed before the parent, all under one lock
    /// acquisition, so no reader ever sees a message or subscription
    /// outliving its room. Idempotent: deleting an already-deleted room
    /// returns `None`.
    pub async fn remove_room_cascade(&self, room_id: RoomId) -> Option<CascadeStats> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&room_id) {
            return None;
        }
        let messages_removed = tables.messages.remove(&room_id).map_or(0, |v| v.len());
        let subscriptions_removed = tables.subscriptions.remove(&room_id).map_or(0, |m| m.len());
        if let Some(room) = tables.rooms.remove(&room_id) {
            tables.rooms_by_code.remove(room.code.as_str());
        }
        Some(CascadeStats {
            messages_removed,
            subscriptions_removed,
        })
    }

    /// Returns the number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.tables.read().await.rooms.len()
    }

    /// Returns the number of live messages across all rooms.
    pub async fn message_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.messages.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RoomCode;
    use chrono::Duration;

    fn make_room(code: &str) -> Room {
        Room::new(
            "Test".to_string(),
            "Alice".to_string(),
            RoomCode::from_string(code.to_string()),
            Utc::now(),
        )
    }

    fn make_message(room_id: RoomId, content: &str, at: DateTime<Utc>) -> Message {
        Message::new(
            room_id,
            "Alice".to_string(),
            "s1".to_string(),
            content.to_string(),
            at,
        )
    }

    fn make_sub(room_id: RoomId, session: &str, payload: &str) -> Subscription {
        Subscription::new(
            room_id,
            session.to_string(),
            payload.to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_lookup_by_id_and_code() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;

        let result = store.insert_room(room).await;
        assert!(result.is_ok());

        let by_id = store.room(id).await;
        assert!(by_id.is_some());

        let by_code = store.room_by_code("ABC123").await;
        assert_eq!(by_code.map(|r| r.id), Some(id));
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let store = ChatStore::new();
        let result = store.insert_room(make_room("ABC123")).await;
        assert!(result.is_ok());

        let dup = store.insert_room(make_room("ABC123")).await;
        assert!(matches!(dup, Err(ChatError::CodeConflict(_))));
    }

    #[tokio::test]
    async fn lookup_unknown_code_returns_none() {
        let store = ChatStore::new();
        assert!(store.room_by_code("NOSUCH").await.is_none());
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;

        let now = Utc::now();
        for i in 0..5 {
            let result = store
                .append_message(make_message(id, &format!("msg-{i}"), now))
                .await;
            assert!(result.is_ok());
        }

        let Ok(messages) = store.messages(id).await else {
            panic!("expected messages");
        };
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg-0", "msg-1", "msg-2", "msg-3", "msg-4"]);
    }

    #[tokio::test]
    async fn append_bumps_activity_to_message_time() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let created = room.last_activity_at;
        let _ = store.insert_room(room).await;

        let later = created + Duration::minutes(10);
        let result = store.append_message(make_message(id, "hi", later)).await;
        assert!(result.is_ok());

        let Some(room) = store.room(id).await else {
            panic!("room gone");
        };
        assert_eq!(room.last_activity_at, later);
    }

    #[tokio::test]
    async fn activity_never_moves_backwards() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let created = room.last_activity_at;
        let _ = store.insert_room(room).await;

        // A message stamped in the past must not rewind the activity clock.
        let earlier = created - Duration::minutes(10);
        let result = store.append_message(make_message(id, "old", earlier)).await;
        assert!(result.is_ok());

        let Some(room) = store.room(id).await else {
            panic!("room gone");
        };
        assert_eq!(room.last_activity_at, created);
    }

    #[tokio::test]
    async fn append_to_unknown_room_fails() {
        let store = ChatStore::new();
        let result = store
            .append_message(make_message(RoomId::new(), "hi", Utc::now()))
            .await;
        assert!(matches!(result, Err(ChatError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn touch_activity_is_idempotent_and_monotonic() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;

        let t1 = Utc::now() + Duration::minutes(5);
        assert!(store.touch_activity(id, t1).await);
        assert!(store.touch_activity(id, t1).await);
        assert!(store.touch_activity(id, t1 - Duration::minutes(1)).await);

        let Some(room) = store.room(id).await else {
            panic!("room gone");
        };
        assert_eq!(room.last_activity_at, t1);

        assert!(!store.touch_activity(RoomId::new(), t1).await);
    }

    #[tokio::test]
    async fn upsert_replaces_payload_for_same_session() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;

        let first = store.upsert_subscription(make_sub(id, "s1", "payloadA")).await;
        assert_eq!(first.ok(), Some(false));

        let second = store.upsert_subscription(make_sub(id, "s1", "payloadB")).await;
        assert_eq!(second.ok(), Some(true));

        let subs = store.subscriptions(id).await;
        assert_eq!(subs.len(), 1);
        assert_eq!(
            subs.first().map(|s| s.subscription.as_str()),
            Some("payloadB")
        );
    }

    #[tokio::test]
    async fn subscribe_to_unknown_room_fails() {
        let store = ChatStore::new();
        let result = store
            .upsert_subscription(make_sub(RoomId::new(), "s1", "payload"))
            .await;
        assert!(matches!(result, Err(ChatError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn remove_expired_messages_honors_cutoff() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;

        let now = Utc::now();
        let old = store
            .append_message(make_message(id, "old", now - Duration::hours(2)))
            .await;
        assert!(old.is_ok());
        let fresh = store.append_message(make_message(id, "fresh", now)).await;
        assert!(fresh.is_ok());

        let removed = store
            .remove_expired_messages(now - Duration::hours(1))
            .await;
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.first().map(|(_, ids)| ids.len()), Some(1));

        let Ok(messages) = store.messages(id).await else {
            panic!("expected messages");
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages.first().map(|m| m.content.as_str()), Some("fresh"));
    }

    #[tokio::test]
    async fn cascade_removes_room_messages_and_subscriptions() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;
        let _ = store.append_message(make_message(id, "hi", Utc::now())).await;
        let _ = store.upsert_subscription(make_sub(id, "s1", "p")).await;

        let stats = store.remove_room_cascade(id).await;
        assert_eq!(
            stats,
            Some(CascadeStats {
                messages_removed: 1,
                subscriptions_removed: 1,
            })
        );

        assert!(store.room(id).await.is_none());
        assert!(store.room_by_code("ABC123").await.is_none());
        assert!(store.subscriptions(id).await.is_empty());
        assert!(matches!(
            store.messages(id).await,
            Err(ChatError::RoomNotFound(_))
        ));
    }

    #[tokio::test]
    async fn cascade_is_idempotent() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;

        assert!(store.remove_room_cascade(id).await.is_some());
        assert!(store.remove_room_cascade(id).await.is_none());
    }

    #[tokio::test]
    async fn code_is_reusable_after_cascade() {
        let store = ChatStore::new();
        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;
        let _ = store.remove_room_cascade(id).await;

        let reinserted = store.insert_room(make_room("ABC123")).await;
        assert!(reinserted.is_ok());
    }

    #[tokio::test]
    async fn rooms_inactive_since_filters_by_activity() {
        let store = ChatStore::new();
        let now = Utc::now();
        let active = make_room("ACTIVE");
        let active_id = active.id;
        let stale = Room::new(
            "Stale".to_string(),
            "Bob".to_string(),
            RoomCode::from_string("STALE1".to_string()),
            now - Duration::hours(25),
        );
        let stale_id = stale.id;
        let _ = store.insert_room(active).await;
        let _ = store.insert_room(stale).await;

        let inactive = store.rooms_inactive_since(now - Duration::hours(24)).await;
        assert_eq!(inactive, vec![stale_id]);
        assert!(!inactive.contains(&active_id));
    }

    #[tokio::test]
    async fn counts_track_contents() {
        let store = ChatStore::new();
        assert_eq!(store.room_count().await, 0);
        assert_eq!(store.message_count().await, 0);

        let room = make_room("ABC123");
        let id = room.id;
        let _ = store.insert_room(room).await;
        let _ = store.append_message(make_message(id, "a", Utc::now())).await;
        let _ = store.append_message(make_message(id, "b", Utc::now())).await;

        assert_eq!(store.room_count().await, 1);
        assert_eq!(store.message_count().await, 2);
    }
}
