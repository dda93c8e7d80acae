// Gemini adapter via Google's OpenAI-compatible endpoint
// Documentation: https://ai.google.dev/gemini-api/docs/openai
// Vision input goes through the standard chat-completions multimodal
// content format (text part + image_url data-URI part).

use crate::llm::provider::LLMAdapter;
use crate::types::{
    AppError, AppResult, LLMRequest, LLMResponse, MessageContent, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const GEMINI_OPENAI_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

pub struct GeminiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request types (OpenAI chat-completions wire format)
#[derive(Serialize)]
struct GeminiChatRequest {
    model: String,
    messages: Vec<GeminiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct GeminiMessage {
    role: String,
    content: GeminiMessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiMessageContent {
    Text(String),
    Multimodal(Vec<GeminiContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum GeminiContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: GeminiImageUrl },
}

#[derive(Serialize)]
struct GeminiImageUrl {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

// Response types
#[derive(Deserialize)]
struct GeminiChatResponse {
    choices: Vec<GeminiChoice>,
    #[serde(default)]
    usage: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiChoice {
    message: GeminiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl GeminiAdapter {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: GEMINI_OPENAI_API_BASE.to_string(),
        }
    }

    /// Override the API base - configuration and tests point this at a
    /// different host.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Convert internal message format to the OpenAI-compatible wire format
    fn convert_message(msg: &crate::types::LLMMessage) -> GeminiMessage {
        let content = match &msg.content {
            MessageContent::Text(text) => GeminiMessageContent::Text(text.clone()),
            MessageContent::Multimodal(parts) => {
                let wire_parts: Vec<GeminiContentPart> = parts
                    .iter()
                    .map(|part| match part {
                        crate::types::ContentPart::Text { text } => {
                            GeminiContentPart::Text { text: text.clone() }
                        }
                        crate::types::ContentPart::ImageUrl { url, detail } => {
                            GeminiContentPart::ImageUrl {
                                image_url: GeminiImageUrl {
                                    url: url.clone(),
                                    detail: detail.clone(),
                                },
                            }
                        }
                        crate::types::ContentPart::ImageBase64 {
                            base64,
                            media_type,
                            detail,
                        } => {
                            let data_url = format!("data:{};base64,{}", media_type, base64);
                            GeminiContentPart::ImageUrl {
                                image_url: GeminiImageUrl {
                                    url: data_url,
                                    detail: detail.clone(),
                                },
                            }
                        }
                    })
                    .collect();
                GeminiMessageContent::Multimodal(wire_parts)
            }
        };

        GeminiMessage {
            role: msg.role.clone(),
            content,
        }
    }
}

#[async_trait]
impl LLMAdapter for GeminiAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        let messages: Vec<GeminiMessage> =
            request.messages.iter().map(Self::convert_message).collect();

        let wire_request = GeminiChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Gemini request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "Gemini API error ({}): {} (code: {:?})",
                    status, error_response.error.message, error_response.error.code
                )));
            }

            return Err(AppError::LLMApi(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let wire_response: GeminiChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        let choice = wire_response
            .choices
            .first()
            .ok_or_else(|| AppError::LLMApi("Gemini returned no choices".to_string()))?;

        let usage = wire_response
            .usage
            .as_ref()
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            finish_reason: choice
                .finish_reason
                .clone()
                .unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LLMMessage;

    #[test]
    fn test_base64_part_becomes_data_url() {
        let msg = LLMMessage::user_with_base64_image("roast this resume", "aGVsbG8=", "image/jpeg");
        let wire = GeminiAdapter::convert_message(&msg);

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let adapter = GeminiAdapter::new("k").with_base_url("http://localhost:1234/");
        assert_eq!(adapter.base_url, "http://localhost:1234");
    }

    #[tokio::test]
    async fn test_chat_completion_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "choices": [{
                        "message": { "role": "assistant", "content": "This resume is a cry for help." },
                        "finish_reason": "stop"
                    }],
                    "usage": { "prompt_tokens": 10, "completion_tokens": 9, "total_tokens": 19 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let adapter = GeminiAdapter::new("test-key").with_base_url(&server.url());
        let request = LLMRequest {
            model: "gemini-2.0-flash".to_string(),
            messages: vec![LLMMessage::user("roast this resume")],
            max_tokens: None,
            temperature: None,
        };

        let response = adapter.create_chat_completion(&request).await.unwrap();
        assert_eq!(response.content, "This resume is a cry for help.");
        assert_eq!(response.finish_reason, "stop");
        assert_eq!(response.usage.total_tokens, 19);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_surfaces_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(
                serde_json::json!({
                    "error": { "message": "API key not valid", "code": 400 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let adapter = GeminiAdapter::new("bad-key").with_base_url(&server.url());
        let request = LLMRequest {
            model: "gemini-2.0-flash".to_string(),
            messages: vec![LLMMessage::user("hi")],
            max_tokens: None,
            temperature: None,
        };

        let err = adapter.create_chat_completion(&request).await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }
}
