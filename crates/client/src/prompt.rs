//! Fixed system prompt and provider request construction.

use proto::{DisplayMessage, ProviderMessage, Role};

/// System instruction prepended to every request.
pub const SYSTEM_PROMPT: &str = "You are an AI assistant with expertise in blockchain technology, smart contracts, and web3 development. You provide clear, concise, and technically accurate responses. When discussing code or technical concepts, you use specific examples and explain them in a way that's easy to understand.";

/// Builds the provider message list for one turn: the system prompt, the
/// prior conversation mapped through `Role::from(Sender)`, then the new user
/// message. Derived fresh per request and never stored.
pub fn build_request(history: &[DisplayMessage], user_text: &str) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ProviderMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().map(ProviderMessage::from));
    messages.push(ProviderMessage::new(Role::User, user_text));
    messages
}
