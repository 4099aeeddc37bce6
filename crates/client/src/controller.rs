//! Turn lifecycle: submit, fold stream events, terminate.

use proto::{DisplayMessage, Sender, StreamEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::conversation::Conversation;
use crate::prompt::build_request;
use crate::stream::CompletionClient;

/// Fallback assistant reply shown when a request cannot be constructed.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The input was consumed and a turn started (or failed visibly).
    Accepted,
    /// Empty input or a turn already in flight; nothing happened.
    Ignored,
}

/// The single in-flight completion stream.
///
/// Owns the accumulated response text; the accumulator only grows while the
/// session is alive, and the session is dropped on its first terminal event.
struct StreamSession {
    rx: mpsc::Receiver<StreamEvent>,
    full_content: String,
}

/// Drives one conversation against the completion endpoint.
pub struct ChatController {
    conversation: Conversation,
    client: CompletionClient,
    session: Option<StreamSession>,
}

impl ChatController {
    /// Creates a controller over an empty conversation.
    pub fn new(client: CompletionClient) -> Self {
        Self {
            conversation: Conversation::new(),
            client,
            session: None,
        }
    }

    /// Returns the conversation store.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the conversation store mutably (input editing, scrolling).
    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    /// Returns the endpoint this controller talks to.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Returns `true` while a completion stream is in flight.
    pub fn is_streaming(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a turn from the given raw input.
    ///
    /// Whitespace-only input and submissions while a turn is in flight are
    /// dropped, not queued. On acceptance the pending input is cleared, the
    /// user message is appended optimistically, and the stream is opened.
    /// A synchronous request-construction failure appends the fixed
    /// [`ERROR_REPLY`]; failures after the stream opens are reported only
    /// through [`StreamEvent::Error`] and stay out of the conversation.
    pub fn submit(&mut self, raw: &str) -> Submission {
        let text = raw.trim();
        if text.is_empty() || self.conversation.is_busy() {
            return Submission::Ignored;
        }
        let text = text.to_string();

        self.conversation.take_input();
        self.conversation.set_busy(true);

        let request = build_request(self.conversation.messages(), &text);
        self.conversation.push(DisplayMessage::user(text));

        match self.client.open(&request) {
            Ok(rx) => {
                self.session = Some(StreamSession {
                    rx,
                    full_content: String::new(),
                });
            }
            Err(err) => {
                warn!(error = %err, "Failed to open completion stream");
                self.conversation.push(DisplayMessage::assistant(ERROR_REPLY));
                self.conversation.set_busy(false);
            }
        }
        Submission::Accepted
    }

    /// Waits for the next stream event. Pends forever when no stream is
    /// active, so it can sit in a `select!` branch behind an
    /// [`is_streaming`](Self::is_streaming) guard.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        match &mut self.session {
            Some(session) => session.rx.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Folds one stream event into the conversation.
    ///
    /// Fragments extend the accumulator and are reconciled into the trailing
    /// message: replaced in place when it is already assistant-authored,
    /// appended as a new assistant message on the first fragment of a turn.
    /// `None` means the event channel closed without a terminal event and is
    /// treated as an error.
    pub fn apply_event(&mut self, event: Option<StreamEvent>) {
        let Some(session) = &mut self.session else {
            return;
        };

        match event {
            Some(StreamEvent::Fragment(chunk)) => {
                session.full_content.push_str(&chunk);
                let message = DisplayMessage::assistant(session.full_content.clone());
                if self.conversation.last().map(|m| m.sender) == Some(Sender::Assistant) {
                    self.conversation.replace_last(message);
                } else {
                    self.conversation.push(message);
                }
            }
            Some(StreamEvent::Done) => self.finish_turn(None),
            Some(StreamEvent::Error(reason)) => self.finish_turn(Some(reason)),
            None => self.finish_turn(Some("event channel closed".to_string())),
        }
    }

    /// Ends the active turn: the session is dropped and input re-enabled.
    /// Errors are logged but never rendered; any partial text stays as is.
    fn finish_turn(&mut self, error: Option<String>) {
        match &error {
            Some(reason) => warn!(reason = %reason, "Completion stream ended with error"),
            None => debug!("Completion stream finished"),
        }
        self.session = None;
        self.conversation.set_busy(false);
    }
}
