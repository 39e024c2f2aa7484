//! Domain layer: chat state model and lifecycle rules.

pub mod chat;
pub mod message;
pub mod registry;
pub mod user;
