/// Events emitted by an active completion stream.
///
/// These are sent via `tokio::sync::mpsc` from the stream reader task so
/// that the controller can fold incremental output into the conversation
/// while the connection is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A partial chunk of assistant output.
    Fragment(String),
    /// The server signalled end of response; the turn is complete.
    Done,
    /// The stream failed; the reason is for logs only.
    Error(String),
}

impl StreamEvent {
    /// Returns `true` for events that end the stream (`Done` or `Error`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}
