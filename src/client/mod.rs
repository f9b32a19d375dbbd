// client/mod.rs — Client-side transcript controller.
//
// Owns the conversation state a front end renders: the transcript, a loading
// flag, and the last error. One send_message call drives a full turn: the
// optimistic user append, the POST to the relay endpoint, and the chunk loop
// that types the assistant reply into the last transcript entry.

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::chat::{seeded_transcript, Message, Role};

/// Side-effect hook fired when the outgoing user message contains the
/// trigger substring (case-insensitive). Fired once, before the request.
type TriggerFn = Box<dyn FnMut(&str) + Send>;

pub struct ChatController {
    http: reqwest::Client,
    endpoint: String,
    messages: Vec<Message>,
    is_loading: bool,
    error: Option<String>,
    trigger: Option<(String, TriggerFn)>,
}

impl ChatController {
    /// Controller with the seeded greeting transcript, talking to the relay
    /// endpoint at `endpoint` (e.g. "http://127.0.0.1:4310/api/stream").
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_transcript(endpoint, seeded_transcript())
    }

    pub fn with_transcript(endpoint: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            messages,
            is_loading: false,
            error: None,
            trigger: None,
        }
    }

    /// Register the pattern-triggered hook. Matching is a case-insensitive
    /// substring test against each outgoing user message.
    pub fn on_trigger(mut self, pattern: impl Into<String>, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.trigger = Some((pattern.into(), Box::new(f)));
        self
    }

    // ─── UI-facing state ──────────────────────────────────────────────────────

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ─── Sending ─────────────────────────────────────────────────────────────

    /// Run one chat turn. Failures land in `error()`, never in a return
    /// value — the transcript is left without a dangling assistant turn.
    pub async fn send_message(&mut self, content: &str) {
        let content = content.trim();
        // Single-flight: a second call while a turn is in flight is a no-op,
        // as is a blank message.
        if content.is_empty() || self.is_loading {
            return;
        }

        self.is_loading = true;
        self.error = None;

        if let Some((pattern, callback)) = &mut self.trigger {
            if content.to_lowercase().contains(&pattern.to_lowercase()) {
                callback(content);
            }
        }

        // Optimistic append; rolled back one entry on failure.
        self.messages.push(Message::user(content));

        if let Err(e) = self.stream_turn(content).await {
            debug!(error = %e, "chat turn failed");
            self.error = Some(e.to_string());
            // Drop the placeholder — or, if the failure predates it, the
            // unanswered user message — so no partial turn lingers.
            self.messages.pop();
        }

        self.is_loading = false;
    }

    async fn stream_turn(&mut self, content: &str) -> Result<()> {
        let body = serde_json::json!({
            "message": content,
            "chatHistory": self.messages,
        });

        let mut response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("failed to reach chat endpoint")?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the relay's human-readable message when it sent one.
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from));
            return Err(match detail {
                Some(msg) => anyhow!("{msg}"),
                None => anyhow!("failed to send message: {status}"),
            });
        }

        // Headers are in: append the placeholder the chunk loop types into.
        self.messages.push(Message::assistant(""));

        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.context("stream read failed")? {
            buf.extend_from_slice(&chunk);
            // Decode the whole buffer each time so a UTF-8 sequence split
            // across chunks never corrupts the visible text.
            let text = String::from_utf8_lossy(&buf).into_owned();
            match self.messages.last_mut() {
                // Guard: only the in-progress placeholder is ever mutated.
                Some(last) if last.role == Role::Assistant => last.content = text,
                _ => break,
            }
        }

        // Natural end of stream — the turn is complete with whatever text
        // arrived, even none. An upstream abort after headers is not
        // distinguishable from success here; the reply just ends early.
        Ok(())
    }
}
