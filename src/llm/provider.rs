use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match config.provider.as_str() {
            // Gemini exposes an OpenAI-compatible chat-completions surface
            "gemini" | "google" => Box::new(
                crate::llm::gemini::GeminiAdapter::new(&config.api_key)
                    .with_base_url(&config.base_url),
            ),
            other => {
                return Err(AppError::Internal(format!(
                    "unsupported LLM provider: {}",
                    other
                )))
            }
        };

        Ok(Self { adapter })
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LLMConfig {
        LLMConfig {
            provider: provider.to_string(),
            api_key: "test-key".to_string(),
            base_url: crate::llm::gemini::GEMINI_OPENAI_API_BASE.to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    #[test]
    fn test_provider_selection() {
        assert!(LLM::new(&config("gemini")).is_ok());
        assert!(LLM::new(&config("google")).is_ok());
        assert!(LLM::new(&config("carrier-pigeon")).is_err());
    }
}
