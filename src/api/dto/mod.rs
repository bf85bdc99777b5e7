//! Request and response DTOs for the REST API.
//!
//! Wire fields are camelCase to match the reference web client.

pub mod message_dto;
pub mod room_dto;
pub mod subscription_dto;

pub use message_dto::{MessageDto, SendMessageRequest};
pub use room_dto::{CreateRoomRequest, RoomDto};
pub use subscription_dto::SubscribeRequest;
