// chat/mod.rs — Conversation data model.
//
// A transcript is an ordered list of messages starting with the seeded
// assistant greeting. Messages are immutable once appended, except for the
// in-progress assistant placeholder the client mutates while streaming.

pub mod prompt;

use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Greeting every new transcript is seeded with — the first onboarding
/// question, so the assistant speaks first.
pub const GREETING: &str = "Welcome to your personal travel assistant! I'd love to learn about \
your travel preferences. What is your favorite country to visit or would like to visit?";

/// A fresh transcript: just the assistant greeting.
pub fn seeded_transcript() -> Vec<Message> {
    vec![Message::assistant(GREETING)]
}
