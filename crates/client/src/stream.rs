//! Streaming completion transport.

use futures_util::StreamExt;
use proto::{ProviderMessage, StreamError, StreamEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::sse::SseDecoder;

/// Completion endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "https://chat-ai-function.fleek.co/api/chat";

/// Channel capacity for in-flight stream events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// HTTP client for the streaming completion endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CompletionClient {
    /// Creates a client targeting the default endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client targeting a custom endpoint (useful for proxies/tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Opens one completion stream for the given message list.
    ///
    /// The full conversation is serialized as a JSON array into a single
    /// `messages` query parameter. Returns the receiving half of the event
    /// channel; the connection itself is driven by a spawned reader task, so
    /// failures after this point arrive as [`StreamEvent::Error`] rather
    /// than as an `Err`. Only request construction can fail synchronously.
    pub fn open(
        &self,
        messages: &[ProviderMessage],
    ) -> Result<mpsc::Receiver<StreamEvent>, StreamError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| StreamError::Request(e.to_string()))?;
        let payload =
            serde_json::to_string(messages).map_err(|e| StreamError::Request(e.to_string()))?;

        debug!(
            endpoint = %self.endpoint,
            messages = messages.len(),
            "Opening completion stream"
        );

        let request = self.client.get(url).query(&[("messages", payload.as_str())]);

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            if let Err(err) = pump(request, &tx).await {
                warn!(error = %err, "Completion stream failed");
                let _ = tx.send(StreamEvent::Error(err.to_string())).await;
            }
        });

        Ok(rx)
    }
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the response byte stream and forwards decoded events until a
/// terminal event or the channel closes.
async fn pump(
    request: reqwest::RequestBuilder,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<(), StreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| StreamError::Connect(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(200).collect();
        return Err(StreamError::Http {
            status: status.as_u16(),
            preview,
        });
    }

    let mut decoder = SseDecoder::new();
    let mut bytes = response.bytes_stream();

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk.map_err(|e| StreamError::Transport(e.to_string()))?;
        for record in decoder.feed(&chunk) {
            let Some(event) = record.into_event() else {
                continue;
            };
            let terminal = event.is_terminal();
            if tx.send(event).await.is_err() {
                // Receiver dropped; nobody is listening anymore.
                return Ok(());
            }
            if terminal {
                return Ok(());
            }
        }
    }

    Err(StreamError::Transport(
        "stream closed before done event".to_string(),
    ))
}
