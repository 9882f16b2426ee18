//! Conversation history
//!
//! An append-only record of the turns in one session. Past turns are never
//! edited or removed once shown.

use crate::assets::AssetId;
use crate::llm::ChatTurn;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable entry in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Decorative asset shown with an assistant turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetId>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            asset: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>, asset: Option<AssetId>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            asset,
            created_at: Utc::now(),
        }
    }
}

/// Ordered, append-only message history
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// History reduced to role and text, ready for the completion API
    pub fn to_chat_turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|m| match m.role {
                Role::User => ChatTurn::user(m.text.clone()),
                Role::Assistant => ChatTurn::model(m.text.clone()),
            })
            .collect()
    }
}
