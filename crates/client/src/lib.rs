//! Conversation state and the streaming completion controller.
//!
//! This crate holds the in-memory conversation store, the prompt builder,
//! the SSE transport/decoder, and the controller that folds incremental
//! response fragments into the conversation as they arrive.

pub mod controller;
pub mod conversation;
pub mod prompt;
pub mod sse;
pub mod stream;

/// Turn lifecycle controller.
pub use controller::{ChatController, ERROR_REPLY, Submission};
/// In-memory conversation store.
pub use conversation::Conversation;
/// Fixed system prompt and provider request builder.
pub use prompt::{SYSTEM_PROMPT, build_request};
/// Streaming completion transport.
pub use stream::{CompletionClient, DEFAULT_ENDPOINT};
