// validate.rs — Typed parse of inbound chat request bodies.
//
// An arbitrary JSON value either becomes a well-typed ChatRequest or fails
// with the first violated constraint. Pure — no coercion, no side effects.
// Unknown fields are ignored for forward compatibility.

use serde_json::Value;

use crate::chat::{Message, Role};

/// Maximum user message length in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;
/// Maximum number of prior turns accepted, capping the context sent upstream.
pub const MAX_HISTORY_LEN: usize = 50;

/// A validated, normalized chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Trimmed, non-empty user message.
    pub message: String,
    /// Prior turns, oldest first.
    pub chat_history: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body must be valid JSON")]
    MalformedJson,
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("message is required and must be a string")]
    MessageMissing,
    #[error("message cannot be empty")]
    MessageEmpty,
    #[error("message too long (max {MAX_MESSAGE_CHARS} characters)")]
    MessageTooLong,
    #[error("chatHistory must be an array of messages")]
    HistoryNotAnArray,
    #[error("chatHistory too long (max {MAX_HISTORY_LEN} messages)")]
    HistoryTooLong,
    #[error("chatHistory[{0}] must be an object with role and content")]
    HistoryEntryNotAnObject(usize),
    #[error("chatHistory[{0}].role must be \"user\" or \"assistant\"")]
    HistoryEntryBadRole(usize),
    #[error("chatHistory[{0}].content must be a non-empty string")]
    HistoryEntryEmptyContent(usize),
}

impl ChatRequest {
    /// Parse and validate a raw JSON body. `chatHistory` is optional and
    /// defaults to empty; every present entry must be a structured message —
    /// the legacy plain-string form is rejected, not coerced.
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MessageMissing)?
            .trim()
            .to_string();
        if message.is_empty() {
            return Err(ValidationError::MessageEmpty);
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong);
        }

        let chat_history = match obj.get("chatHistory") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => {
                if entries.len() > MAX_HISTORY_LEN {
                    return Err(ValidationError::HistoryTooLong);
                }
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| parse_history_entry(i, entry))
                    .collect::<Result<Vec<_>, _>>()?
            }
            Some(_) => return Err(ValidationError::HistoryNotAnArray),
        };

        Ok(Self {
            message,
            chat_history,
        })
    }
}

fn parse_history_entry(index: usize, entry: &Value) -> Result<Message, ValidationError> {
    let obj = entry
        .as_object()
        .ok_or(ValidationError::HistoryEntryNotAnObject(index))?;

    let role = match obj.get("role").and_then(Value::as_str) {
        Some("user") => Role::User,
        Some("assistant") => Role::Assistant,
        _ => return Err(ValidationError::HistoryEntryBadRole(index)),
    };

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .ok_or(ValidationError::HistoryEntryEmptyContent(index))?
        .to_string();

    Ok(Message { role, content })
}
