//! Periodic retention sweeper.
//!
//! Runs on a fixed interval and enforces the two retention rules:
//! messages older than the message TTL are deleted, and rooms whose
//! last activity predates the room TTL are deleted together with all
//! their children. Expiry is visible only at sweep boundaries; between
//! sweeps, expired-but-unswept data remains readable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{ChatEvent, ChatStore, EventBus};

/// Counters for a single sweep pass, logged after each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Messages deleted by the message TTL.
    pub messages_expired: usize,
    /// Rooms deleted by the room TTL.
    pub rooms_expired: usize,
    /// Messages deleted as part of room cascades.
    pub cascaded_messages: usize,
    /// Subscriptions deleted as part of room cascades.
    pub cascaded_subscriptions: usize,
}

/// Background task that applies retention policy to the store.
#[derive(Debug)]
pub struct Sweeper {
    store: Arc<ChatStore>,
    event_bus: EventBus,
    message_ttl: chrono::Duration,
    room_ttl: chrono::Duration,
    interval: Duration,
}

impl Sweeper {
    /// Creates a sweeper with the given TTLs and run interval.
    #[must_use]
    pub fn new(
        store: Arc<ChatStore>,
        event_bus: EventBus,
        message_ttl_secs: u64,
        room_ttl_secs: u64,
        sweep_interval_secs: u64,
    ) -> Self {
        Self {
            store,
            event_bus,
            message_ttl: chrono::Duration::seconds(
                i64::try_from(message_ttl_secs).unwrap_or(i64::MAX),
            ),
            room_ttl: chrono::Duration::seconds(i64::try_from(room_ttl_secs).unwrap_or(i64::MAX)),
            interval: Duration::from_secs(sweep_interval_secs),
        }
    }

    /// Runs the sweep loop forever. Spawned as a background task at
    /// startup; the first tick fires after one full interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = self.sweep_once(Utc::now()).await;
            tracing::info!(
                messages_expired = report.messages_expired,
                rooms_expired = report.rooms_expired,
                cascaded_messages = report.cascaded_messages,
                cascaded_subscriptions = report.cascaded_subscriptions,
                "retention sweep complete"
            );
        }
    }

    /// Performs one sweep pass against the clock reading `now`.
    ///
    /// Both cutoffs are computed once from `now`, so every record in
    /// the pass is judged against the same instant. Message expiry runs
    /// first, then room expiry; a room kept alive by recent activity
    /// keeps its fresh messages even when older ones were just removed.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> SweepReport {
        let message_cutoff = now - self.message_ttl;
        let room_cutoff = now - self.room_ttl;
        let mut report = SweepReport::default();

        for (room_id, message_ids) in self.store.remove_expired_messages(message_cutoff).await {
            report.messages_expired += message_ids.len();
            let _ = self.event_bus.publish(ChatEvent::MessagesExpired {
                room_id,
                message_ids,
                timestamp: now,
            });
        }

        for room_id in self.store.rooms_inactive_since(room_cutoff).await {
            // May have been deleted concurrently; the cascade is
            // idempotent and None just means nothing to do.
            let Some(stats) = self.store.remove_room_cascade(room_id).await else {
                continue;
            };
            report.rooms_expired += 1;
            report.cascaded_messages += stats.messages_removed;
            report.cascaded_subscriptions += stats.subscriptions_removed;
            let _ = self.event_bus.publish(ChatEvent::RoomExpired {
                room_id,
                timestamp: now,
            });
            tracing::debug!(
                room_id = %room_id,
                messages = stats.messages_removed,
                subscriptions = stats.subscriptions_removed,
                "inactive room swept"
            );
        }

        report
    }
}
