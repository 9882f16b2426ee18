//! Google Gemini provider implementation

use super::types::ChatTurn;
use super::{ApiError, ChatService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-flash-lite-latest";

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: &str, base_url: Option<&str>) -> Result<Self, ApiError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/'),
            model
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ApiError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model_id: model.to_string(),
        })
    }

    fn translate_request(history: &[ChatTurn]) -> GeminiRequest {
        let contents = history
            .iter()
            .map(|turn| GeminiContent {
                role: Some(turn.role.as_str().to_string()),
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        GeminiRequest { contents }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<String, ApiError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::unknown("No candidates in response"))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(ApiError::unknown(format!(
                "Empty response (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatService for GeminiService {
    async fn generate(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        let gemini_request = Self::translate_request(history);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ApiError::network(format!("Connection failed: {e}"))
                } else {
                    ApiError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |error_resp| error_resp.error.message);
            return Err(ApiError::from_status(status.as_u16(), &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
