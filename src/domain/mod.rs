//! Domain layer: core types, chat store, and event system.
//!
//! This module contains the server-side domain model: room identity and
//! join codes, the message and subscription entities, the event bus for
//! broadcasting state changes, and the chat store holding all live data.

pub mod chat_event;
pub mod event_bus;
pub mod message;
pub mod room;
pub mod room_code;
pub mod room_id;
pub mod store;
pub mod subscription;

pub use chat_event::ChatEvent;
pub use event_bus::EventBus;
pub use message::{Message, MessageId};
pub use room::Room;
pub use room_code::RoomCode;
pub use room_id::RoomId;
pub use store::{CascadeStats, ChatStore};
pub use subscription::Subscription;
