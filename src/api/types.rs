//! API request and response types

use crate::assets::AssetId;
use crate::config::Layout;
use crate::conversation::Message;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub queued: bool,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
}

/// Response with the session transcript
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
}

/// UI layout and fixed images
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub layout: Layout,
    pub mood_detection: bool,
    pub avatar: Option<AssetId>,
    pub avatar_image: Option<String>,
    pub sidebar: Option<AssetId>,
    pub sidebar_image: Option<String>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
