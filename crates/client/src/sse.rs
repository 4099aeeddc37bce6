//! Incremental server-sent events decoder.

use proto::{StreamError, StreamEvent};
use serde::Deserialize;
use tracing::error;

/// One decoded SSE record: an optional `event:` name and the joined
/// `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseRecord {
    /// Value of the `event:` field, when present.
    pub event: Option<String>,
    /// Concatenation of all `data:` lines, joined with `\n`.
    pub data: String,
}

/// Default payload shape carried by fragment records.
#[derive(Debug, Deserialize)]
struct FragmentPayload {
    content: String,
}

impl SseRecord {
    /// Maps a wire record onto a stream event.
    ///
    /// The `done` event name is terminal regardless of payload. Any other
    /// record must carry a `{"content": ...}` JSON object; a record whose
    /// payload fails to parse is dropped so the stream can continue.
    pub fn into_event(self) -> Option<StreamEvent> {
        if self.event.as_deref() == Some("done") {
            return Some(StreamEvent::Done);
        }
        if self.data.is_empty() {
            return None;
        }
        match serde_json::from_str::<FragmentPayload>(&self.data) {
            Ok(payload) => Some(StreamEvent::Fragment(payload.content)),
            Err(err) => {
                let err = StreamError::Payload(err.to_string());
                error!(error = %err, data = %self.data, "Dropping undecodable SSE payload");
                None
            }
        }
    }
}

/// Stateful decoder over an SSE byte stream.
///
/// Bytes arrive in arbitrary chunks; records are emitted only once their
/// blank-line terminator has been seen. CRLF line endings are tolerated.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes and returns every record completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        self.buf.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some((record_end, rest_start)) = find_record_boundary(&self.buf) {
            let record_bytes: Vec<u8> = self.buf.drain(..rest_start).take(record_end).collect();
            if let Some(record) = parse_record(&record_bytes) {
                records.push(record);
            }
        }
        records
    }
}

/// Finds the first blank-line record terminator, returning the record's end
/// offset and the offset where the next record begins.
fn find_record_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i + 1 < buf.len() {
        if buf[i] == b'\n' {
            if buf[i + 1] == b'\n' {
                return Some((i, i + 2));
            }
            if buf[i + 1] == b'\r' && buf.get(i + 2) == Some(&b'\n') {
                return Some((i, i + 3));
            }
        }
        i += 1;
    }
    None
}

/// Parses one record's lines. Comment lines and unknown fields are ignored;
/// multiple `data:` lines join with `\n`. Returns `None` for records with no
/// recognized field (e.g. keep-alive comments).
fn parse_record(bytes: &[u8]) -> Option<SseRecord> {
    let text = String::from_utf8_lossy(bytes);
    let mut event = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    if event.is_none() && data_lines.is_empty() {
        return None;
    }
    Some(SseRecord {
        event,
        data: data_lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(decoder: &mut SseDecoder, text: &str) -> Vec<SseRecord> {
        decoder.feed(text.as_bytes())
    }

    // ── record framing ─────────────────────────────────────────────────────────

    #[test]
    fn single_record_decodes_after_blank_line() {
        let mut decoder = SseDecoder::new();
        let records = feed_str(&mut decoder, "data: {\"content\":\"hi\"}\n\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "{\"content\":\"hi\"}");
        assert_eq!(records[0].event, None);
    }

    #[test]
    fn incomplete_record_waits_for_terminator() {
        let mut decoder = SseDecoder::new();
        assert!(feed_str(&mut decoder, "data: {\"content\":\"par").is_empty());
        assert!(feed_str(&mut decoder, "tial\"}\n").is_empty());
        let records = feed_str(&mut decoder, "\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "{\"content\":\"partial\"}");
    }

    #[test]
    fn multiple_records_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let records = feed_str(
            &mut decoder,
            "data: {\"content\":\"a\"}\n\ndata: {\"content\":\"b\"}\n\n",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].data, "{\"content\":\"b\"}");
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let mut decoder = SseDecoder::new();
        let records = feed_str(&mut decoder, "event: done\r\ndata: [DONE]\r\n\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event.as_deref(), Some("done"));
        assert_eq!(records[0].data, "[DONE]");
    }

    #[test]
    fn multi_line_data_joins_with_newline() {
        let mut decoder = SseDecoder::new();
        let records = feed_str(&mut decoder, "data: first\ndata: second\n\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "first\nsecond");
    }

    #[test]
    fn comments_and_unknown_fields_are_ignored() {
        let mut decoder = SseDecoder::new();
        let records = feed_str(
            &mut decoder,
            ": keep-alive\nid: 42\ndata: {\"content\":\"x\"}\n\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "{\"content\":\"x\"}");
    }

    #[test]
    fn comment_only_record_produces_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(feed_str(&mut decoder, ": ping\n\n").is_empty());
    }

    #[test]
    fn boundary_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(feed_str(&mut decoder, "data: {\"content\":\"y\"}\r\n\r").is_empty());
        let records = feed_str(&mut decoder, "\n");
        assert_eq!(records.len(), 1);
    }

    // ── event mapping ──────────────────────────────────────────────────────────

    #[test]
    fn done_event_maps_to_terminal() {
        let record = SseRecord {
            event: Some("done".to_string()),
            data: "[DONE]".to_string(),
        };
        assert_eq!(record.into_event(), Some(proto::StreamEvent::Done));
    }

    #[test]
    fn default_event_maps_to_fragment() {
        let record = SseRecord {
            event: None,
            data: "{\"content\":\"chunk\"}".to_string(),
        };
        assert_eq!(
            record.into_event(),
            Some(proto::StreamEvent::Fragment("chunk".to_string()))
        );
    }

    #[test]
    fn malformed_payload_is_dropped() {
        let record = SseRecord {
            event: None,
            data: "not json".to_string(),
        };
        assert_eq!(record.into_event(), None);
    }
}
