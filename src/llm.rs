//! Chat-completion provider abstraction
//!
//! The conversation core only needs `generate(history) -> text`; providers
//! sit behind the [`ChatService`] trait.

mod error;
mod gemini;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use gemini::{GeminiService, DEFAULT_MODEL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for chat-completion providers
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Produce the next model turn for the given history
    async fn generate(&self, history: &[ChatTurn]) -> Result<String, ApiError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Arc<T> {
    async fn generate(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        (**self).generate(history).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for chat services
pub struct LoggingService {
    inner: Arc<dyn ChatService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn ChatService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl ChatService for LoggingService {
    async fn generate(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(history).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    response_chars = text.chars().count(),
                    "Completion request finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
