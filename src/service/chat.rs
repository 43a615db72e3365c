// src/service/chat.rs
//
// Thin client for the Groq chat-completions API (OpenAI-compatible). One
// blocking call per request, no retries; failures surface as Upstream errors.

use serde::{Deserialize, Serialize};

use crate::{config::Config, dtos::chatdtos::ChatMessage, service::error::ServiceError};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct ChatService {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ChatService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.groq_api_key.clone(),
            model: config.groq_model.clone(),
        }
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let payload = CompletionRequest {
            model: &self.model,
            messages,
            temperature: 0.7,
            max_tokens: 500,
        };

        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("chat completion returned {}: {}", status, body);
            return Err(ServiceError::Upstream(format!(
                "upstream returned {}",
                status
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::Upstream("empty completion".to_string()))
    }
}
