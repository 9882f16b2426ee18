//! Mock collaborators for session tests

use super::render::{Presenter, RenderCommand};
use crate::llm::{ApiError, ChatService, ChatTurn};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Chat service that replays queued replies
#[derive(Default)]
pub struct MockChatService {
    responses: Mutex<VecDeque<Result<String, ApiError>>>,
    /// History passed to every call
    pub requests: Mutex<Vec<Vec<ChatTurn>>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<Vec<ChatTurn>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn generate(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

/// Chat service whose reply is held back until [`GatedChatService::release`]
pub struct GatedChatService {
    gate: Notify,
    reply: String,
}

impl GatedChatService {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            gate: Notify::new(),
            reply: reply.into(),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ChatService for GatedChatService {
    async fn generate(&self, _history: &[ChatTurn]) -> Result<String, ApiError> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }

    fn model_id(&self) -> &str {
        "gated-model"
    }
}

/// Presenter that keeps every command it receives
#[derive(Default)]
pub struct RecordingPresenter {
    commands: Mutex<Vec<RenderCommand>>,
}

impl RecordingPresenter {
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, command: RenderCommand) {
        self.commands.lock().unwrap().push(command);
    }
}
