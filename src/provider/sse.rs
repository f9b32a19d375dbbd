// provider/sse.rs — Incremental SSE decoding for the Responses API stream.
//
// Network chunks do not respect line or UTF-8 boundaries, so bytes are
// buffered and only complete `data:` lines are decoded. Each data line is a
// JSON event with a `type` discriminator; only `response.output_text.delta`
// carries forwardable text.

use std::collections::VecDeque;

use crate::provider::ResponseEvent;

/// Stateful line decoder. Feed raw chunks, drain decoded events.
#[derive(Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one network chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> VecDeque<ResponseEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = VecDeque::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(event) = decode_line(line.trim_end_matches('\r').trim_start()) {
                events.push_back(event);
            }
        }

        events
    }
}

fn decode_line(line: &str) -> Option<ResponseEvent> {
    // `event:` lines, comments, and blank separators carry no payload we need;
    // the JSON `type` field discriminates on its own.
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(data).ok()?;
    let kind = value.get("type").and_then(|t| t.as_str())?;

    Some(match kind {
        "response.output_text.delta" => {
            let delta = value.get("delta").and_then(|d| d.as_str())?.to_string();
            ResponseEvent::OutputTextDelta { delta }
        }
        "response.created" => ResponseEvent::Created,
        "response.completed" => ResponseEvent::Completed,
        other => ResponseEvent::Other(other.to_string()),
    })
}
