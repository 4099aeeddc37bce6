//! Shared protocol types for the chat client.
//!
//! This crate defines the serializable message structures exchanged with the
//! completion endpoint, the display-side conversation types, and the
//! strongly-typed error enums shared across the workspace.

pub mod error;
pub mod event;
pub mod message;

/// Re-export of all protocol error types.
pub use error::*;
/// Re-export of stream event types.
pub use event::StreamEvent;
/// Re-export of conversation/message types.
pub use message::{DisplayMessage, ProviderMessage, Role, Sender};
