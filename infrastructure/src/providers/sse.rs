//! Server-sent events plumbing shared by the HTTP providers.
//!
//! [`SseDecoder`] splits a byte stream into `data:` payloads;
//! [`spawn_event_stream`] runs the decoding on a background task and feeds
//! the resulting [`StreamEvent`]s into a [`StreamHandle`].

use arena_application::ports::llm_gateway::StreamHandle;
use arena_domain::StreamEvent;
use futures::StreamExt;
use std::string::FromUtf8Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Channel capacity between the HTTP task and the consumer
const STREAM_BUFFER: usize = 64;

/// Incremental decoder for `text/event-stream` bodies.
///
/// Bytes are buffered until a blank line closes an event, so multibyte
/// characters split across network chunks decode intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the data of every event completed by them.
    ///
    /// Multi-line `data:` fields are joined with `\n`; comments and other
    /// fields are ignored. An event block that is not valid UTF-8 is an error.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, FromUtf8Error> {
        self.buffer.extend_from_slice(chunk);
        if self.buffer.contains(&b'\r') {
            self.buffer = strip_carriage_returns(&self.buffer);
        }

        let mut events = Vec::new();
        while let Some(idx) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..idx + 2).collect();
            if let Some(data) = event_data(&String::from_utf8(block)?) {
                events.push(data);
            }
        }
        Ok(events)
    }

    /// Data of a trailing event that was not terminated by a blank line
    pub fn finish(&mut self) -> Result<Option<String>, FromUtf8Error> {
        let rest = String::from_utf8(std::mem::take(&mut self.buffer))?;
        Ok(event_data(&rest))
    }
}

/// `\r\n` becomes `\n`; a trailing `\r` is kept until its `\n` arrives
fn strip_carriage_returns(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}

fn event_data(block: &str) -> Option<String> {
    let lines: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Provider-specific translation of event payloads
pub trait EventParser: Send + 'static {
    /// Translate one `data:` payload. Returns `true` once the provider has
    /// signalled the end of the reply.
    fn parse(&mut self, data: &str, out: &mut Vec<StreamEvent>) -> bool;

    /// Flush anything still pending when the body ends
    fn finish(&mut self, _out: &mut Vec<StreamEvent>) {}
}

/// Decode `response` on a background task.
///
/// The task stops early when the handle is dropped, which also drops the
/// HTTP response and closes the connection.
pub fn spawn_event_stream(response: reqwest::Response, mut parser: impl EventParser) -> StreamHandle {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);

    tokio::spawn(async move {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut text = String::new();
        let mut pending = Vec::new();

        'read: while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
            };
            let events = match decoder.push(&chunk) {
                Ok(events) => events,
                Err(e) => {
                    let _ = tx.send(invalid_utf8(e)).await;
                    return;
                }
            };
            for data in events {
                let done = parser.parse(&data, &mut pending);
                if !forward(&tx, &mut pending, &mut text).await {
                    return;
                }
                if done {
                    break 'read;
                }
            }
        }

        match decoder.finish() {
            Ok(Some(data)) => {
                parser.parse(&data, &mut pending);
            }
            Ok(None) => {}
            Err(e) => {
                let _ = tx.send(invalid_utf8(e)).await;
                return;
            }
        }
        parser.finish(&mut pending);
        if forward(&tx, &mut pending, &mut text).await {
            debug!("Stream finished ({} chars)", text.len());
            let _ = tx.send(StreamEvent::Completed(text)).await;
        }
    });

    StreamHandle::new(rx)
}

fn invalid_utf8(error: FromUtf8Error) -> StreamEvent {
    StreamEvent::Error(format!("Invalid UTF-8 in event stream: {}", error.utf8_error()))
}

/// Send pending events; `false` when the stream must stop (error sent or
/// receiver gone).
async fn forward(
    tx: &mpsc::Sender<StreamEvent>,
    pending: &mut Vec<StreamEvent>,
    text: &mut String,
) -> bool {
    for event in pending.drain(..) {
        let is_error = matches!(event, StreamEvent::Error(_));
        if let StreamEvent::Delta(chunk) = &event {
            text.push_str(chunk);
        }
        if tx.send(event).await.is_err() || is_error {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\":").unwrap().is_empty());
        let events = decoder.push(b"1}\n\ndata: [DONE]\n\n").unwrap();
        assert_eq!(events, ["{\"a\":1}", "[DONE]"]);
    }

    #[test]
    fn test_event_and_comment_lines() {
        let mut decoder = SseDecoder::new();
        let events = decoder
            .push(b": keep-alive\n\nevent: content_block_delta\ndata: {\"type\":\"content_block_delta\"}\n\n")
            .unwrap();
        assert_eq!(events, ["{\"type\":\"content_block_delta\"}"]);
    }

    #[test]
    fn test_crlf_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: line one\r\ndata: line two\r\n\r\n").unwrap();
        assert_eq!(events, ["line one\nline two"]);
    }

    #[test]
    fn test_unterminated_tail() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"done\":true}").unwrap().is_empty());
        assert_eq!(decoder.finish().unwrap().as_deref(), Some("{\"done\":true}"));
        assert_eq!(decoder.finish().unwrap(), None);
    }

    #[test]
    fn test_data_without_space() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(b"data:{}\n\n").unwrap(), ["{}"]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let bytes = "data: é🔥\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..7]).unwrap().is_empty());
        assert_eq!(decoder.push(&bytes[7..]).unwrap(), ["é🔥"]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: hi\r").unwrap().is_empty());
        assert!(decoder.push(b"\n\r").unwrap().is_empty());
        assert_eq!(decoder.push(b"\n").unwrap(), ["hi"]);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: \xff\xfe\n\n").is_err());
    }
}
