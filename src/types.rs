// Type definitions and enums

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Processing stage of an uploaded file.
///
/// Stored as TEXT in the `files` table and returned verbatim to polling
/// clients, so the wire spellings are part of the API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
pub enum JobStatus {
    #[serde(rename = "saving")]
    #[sqlx(rename = "saving")]
    Saving,
    #[serde(rename = "queued")]
    #[sqlx(rename = "queued")]
    Queued,
    #[serde(rename = "processing")]
    #[sqlx(rename = "processing")]
    Processing,
    #[serde(rename = "Converting to images")]
    #[sqlx(rename = "Converting to images")]
    ConvertingToImages,
    #[serde(rename = "Converting to images success")]
    #[sqlx(rename = "Converting to images success")]
    ConvertingToImagesSuccess,
    #[serde(rename = "Processed")]
    #[sqlx(rename = "Processed")]
    Processed,
    #[serde(rename = "failed")]
    #[sqlx(rename = "failed")]
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Saving => write!(f, "saving"),
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::ConvertingToImages => write!(f, "Converting to images"),
            JobStatus::ConvertingToImagesSuccess => write!(f, "Converting to images success"),
            JobStatus::Processed => write!(f, "Processed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Content part for multimodal messages (text, images, etc.)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>, // "low", "high", or "auto"
    },
    #[serde(rename = "image_base64")]
    ImageBase64 {
        base64: String,
        media_type: String, // e.g., "image/jpeg", "image/png"
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

/// Message content - can be simple text or multimodal (text + images)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Multimodal(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content (for simple text or first text part in multimodal)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Multimodal(parts) => parts.iter().find_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// Count image parts (0 for plain text content)
    pub fn image_count(&self) -> usize {
        match self {
            MessageContent::Text(_) => 0,
            MessageContent::Multimodal(parts) => parts
                .iter()
                .filter(|p| {
                    matches!(
                        p,
                        ContentPart::ImageUrl { .. } | ContentPart::ImageBase64 { .. }
                    )
                })
                .count(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: MessageContent,
}

impl LLMMessage {
    /// Create a user message with plain text content
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message with text plus one base64 image (for vision models)
    pub fn user_with_base64_image(
        text: impl Into<String>,
        base64: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Multimodal(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageBase64 {
                    base64: base64.into(),
                    media_type: media_type.into(),
                    detail: None,
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        // Clients poll these exact spellings; they must never drift.
        let cases = [
            (JobStatus::Saving, "saving"),
            (JobStatus::Queued, "queued"),
            (JobStatus::Processing, "processing"),
            (JobStatus::ConvertingToImages, "Converting to images"),
            (
                JobStatus::ConvertingToImagesSuccess,
                "Converting to images success",
            ),
            (JobStatus::Processed, "Processed"),
            (JobStatus::Failed, "failed"),
        ];
        for (status, expected) in cases {
            assert_eq!(status.to_string(), expected);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", expected)
            );
        }
    }

    #[test]
    fn test_image_count() {
        let text = MessageContent::Text("hello".to_string());
        assert_eq!(text.image_count(), 0);

        let msg = LLMMessage::user_with_base64_image("roast", "aGk=", "image/jpeg");
        assert_eq!(msg.content.image_count(), 1);
        assert_eq!(msg.content.as_text(), Some("roast"));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::LLMApi("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
