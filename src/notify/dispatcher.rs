//! Per-message notification fan-out.

use std::sync::Arc;

use crate::domain::{ChatStore, Message, Room};

use super::{PushGateway, PushPayload};

/// Maximum number of content characters included in a notification body.
const BODY_PREVIEW_CHARS: usize = 100;

/// Fans a new message out to every other subscribed session in a room.
///
/// Invoked fire-and-forget from the service layer after a message is
/// stored; the sender never awaits it and never learns about delivery
/// failures.
#[derive(Debug)]
pub struct NotificationDispatcher {
    store: Arc<ChatStore>,
    gateway: Arc<dyn PushGateway>,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(store: Arc<ChatStore>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { store, gateway }
    }

    /// Delivers a notification for `message` to all of `room`'s
    /// subscribers except the sender's own session.
    ///
    /// Each delivery attempt is independent: an unusable endpoint or a
    /// failed request is logged and the loop continues. Returns the
    /// number of successful deliveries (used by tests and logging).
    pub async fn dispatch(&self, room: &Room, message: &Message) -> usize {
        let subscriptions = self.store.subscriptions(room.id).await;
        if subscriptions.is_empty() {
            return 0;
        }

        let payload = build_payload(room, message);
        let mut delivered = 0;

        for sub in subscriptions {
            if sub.session_id == message.session_id {
                continue;
            }

            let Some(endpoint) = extract_endpoint(&sub.subscription) else {
                tracing::warn!(
                    room_id = %room.id,
                    session_id = %sub.session_id,
                    "subscription payload has no endpoint, skipping"
                );
                continue;
            };

            match self.gateway.deliver(&endpoint, &payload).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        room_id = %room.id,
                        session_id = %sub.session_id,
                        error = %e,
                        "push delivery failed"
                    );
                }
            }
        }

        tracing::debug!(room_id = %room.id, delivered, "notification fan-out complete");
        delivered
    }
}

/// Builds the notification payload for a message.
fn build_payload(room: &Room, message: &Message) -> PushPayload {
    PushPayload {
        title: format!("{} @ {}", message.sender_name, room.name),
        body: message.content.chars().take(BODY_PREVIEW_CHARS).collect(),
        url: format!("/room/{}", room.code),
    }
}

/// Pulls the endpoint URL out of an opaque subscription payload.
///
/// The client stores a serialized push subscription; the only field the
/// gateway needs is `endpoint`.
fn extract_endpoint(subscription: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(subscription).ok()?;
    value
        .get("endpoint")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{RoomCode, Subscription};
    use crate::notify::PushError;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    /// Test gateway that records deliveries and can fail per endpoint.
    #[derive(Debug, Default)]
    struct RecordingGateway {
        delivered: Mutex<Vec<(String, PushPayload)>>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl PushGateway for RecordingGateway {
        async fn deliver(&self, endpoint: &str, payload: &PushPayload) -> Result<(), PushError> {
            if self.failing.iter().any(|f| f == endpoint) {
                return Err(PushError::Delivery("boom".to_string()));
            }
            self.delivered
                .lock()
                .await
                .push((endpoint.to_string(), payload.clone()));
            Ok(())
        }
    }

    fn endpoint_payload(url: &str) -> String {
        format!("{{\"endpoint\":\"{url}\",\"keys\":{{}}}}")
    }

    async fn setup(gateway: Arc<RecordingGateway>) -> (Arc<ChatStore>, NotificationDispatcher, Room) {
        let store = Arc::new(ChatStore::new());
        let room = Room::new(
            "Lounge".to_string(),
            "Alice".to_string(),
            RoomCode::from_string("ABC123".to_string()),
            Utc::now(),
        );
        let insert = store.insert_room(room.clone()).await;
        assert!(insert.is_ok());
        let dispatcher = NotificationDispatcher::new(Arc::clone(&store), gateway);
        (store, dispatcher, room)
    }

    fn make_message(room: &Room, session: &str, content: &str) -> Message {
        Message::new(
            room.id,
            "Alice".to_string(),
            session.to_string(),
            content.to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn sender_session_is_excluded() {
        let gateway = Arc::new(RecordingGateway::default());
        let (store, dispatcher, room) = setup(Arc::clone(&gateway)).await;

        for (session, url) in [("s1", "https://push/s1"), ("s2", "https://push/s2")] {
            let sub = Subscription::new(
                room.id,
                session.to_string(),
                endpoint_payload(url),
                Utc::now(),
            );
            let result = store.upsert_subscription(sub).await;
            assert!(result.is_ok());
        }

        let delivered = dispatcher.dispatch(&room, &make_message(&room, "s1", "hi")).await;
        assert_eq!(delivered, 1);

        let log = gateway.delivered.lock().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().map(|(e, _)| e.as_str()), Some("https://push/s2"));
    }

    #[tokio::test]
    async fn one_failing_endpoint_does_not_stop_the_rest() {
        let gateway = Arc::new(RecordingGateway {
            delivered: Mutex::new(Vec::new()),
            failing: vec!["https://push/s2".to_string()],
        });
        let (store, dispatcher, room) = setup(Arc::clone(&gateway)).await;

        for (session, url) in [
            ("s2", "https://push/s2"),
            ("s3", "https://push/s3"),
            ("s4", "https://push/s4"),
        ] {
            let sub = Subscription::new(
                room.id,
                session.to_string(),
                endpoint_payload(url),
                Utc::now(),
            );
            let result = store.upsert_subscription(sub).await;
            assert!(result.is_ok());
        }

        let delivered = dispatcher.dispatch(&room, &make_message(&room, "s1", "hi")).await;
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn malformed_subscription_is_skipped() {
        let gateway = Arc::new(RecordingGateway::default());
        let (store, dispatcher, room) = setup(Arc::clone(&gateway)).await;

        let sub = Subscription::new(
            room.id,
            "s2".to_string(),
            "not json".to_string(),
            Utc::now(),
        );
        let result = store.upsert_subscription(sub).await;
        assert!(result.is_ok());

        let delivered = dispatcher.dispatch(&room, &make_message(&room, "s1", "hi")).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn payload_has_title_preview_and_room_url() {
        let gateway = Arc::new(RecordingGateway::default());
        let (store, dispatcher, room) = setup(Arc::clone(&gateway)).await;

        let sub = Subscription::new(
            room.id,
            "s2".to_string(),
            endpoint_payload("https://push/s2"),
            Utc::now(),
        );
        let result = store.upsert_subscription(sub).await;
        assert!(result.is_ok());

        let long_content = "x".repeat(250);
        let delivered = dispatcher
            .dispatch(&room, &make_message(&room, "s1", &long_content))
            .await;
        assert_eq!(delivered, 1);

        let log = gateway.delivered.lock().await;
        let Some((_, payload)) = log.first() else {
            panic!("expected a delivery");
        };
        assert_eq!(payload.title, "Alice @ Lounge");
        assert_eq!(payload.body.chars().count(), 100);
        assert_eq!(payload.url, "/room/ABC123");
    }
}
