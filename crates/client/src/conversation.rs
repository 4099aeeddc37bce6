//! In-memory conversation store.

use proto::DisplayMessage;
use tokio::sync::watch;

/// Ordered conversation state for one UI session.
///
/// Messages are append-only except the trailing assistant message, which is
/// replaced in place while a stream is active. Every mutation bumps a
/// revision counter published on a `watch` channel so the renderer can
/// redraw on change without polling the whole store.
pub struct Conversation {
    messages: Vec<DisplayMessage>,
    input: String,
    busy: bool,
    revision: watch::Sender<u64>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            messages: Vec::new(),
            input: String::new(),
            busy: false,
            revision,
        }
    }

    /// Returns the ordered message list.
    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    /// Returns the last message, if any.
    pub fn last(&self) -> Option<&DisplayMessage> {
        self.messages.last()
    }

    /// Appends a message.
    pub fn push(&mut self, msg: DisplayMessage) {
        self.messages.push(msg);
        self.bump();
    }

    /// Overwrites the final message. No-op on an empty conversation.
    pub fn replace_last(&mut self, msg: DisplayMessage) {
        if let Some(last) = self.messages.last_mut() {
            *last = msg;
            self.bump();
        }
    }

    /// Returns the pending, not-yet-submitted input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.bump();
    }

    /// Clears and returns the pending input text.
    pub fn take_input(&mut self) -> String {
        let text = std::mem::take(&mut self.input);
        self.bump();
        text
    }

    /// Returns `true` while a completion stream is active.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Sets the busy gate.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.bump();
    }

    /// Returns a receiver that observes the revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&mut self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
