//! Service layer orchestrating store access, events, and notifications.

pub mod chat_service;

pub use chat_service::ChatService;
