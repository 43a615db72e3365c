// src/dtos/chatdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotRequestDto {
    #[validate(length(min = 1, max = 2000, message = "Message is required"))]
    pub message: String,
    pub conversation_history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotResponseDto {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}
