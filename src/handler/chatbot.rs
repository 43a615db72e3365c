// src/handler/chatbot.rs
//
// Customer-facing assistant. The system prompt carries the shop context plus
// the customer's most recent tickets so the model can answer "where is my
// repair" without tool calls.

use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::ticketdb::TicketExt,
    dtos::chatdtos::{ChatMessage, ChatbotRequestDto, ChatbotResponseDto},
    error::HttpError,
    middleware::CustomerAuth,
    AppState,
};

const MAX_HISTORY_TURNS: usize = 10;
const MAX_TICKET_CONTEXT: usize = 3;

pub fn chatbot_handler() -> Router {
    Router::new().route("/", post(chat_with_assistant))
}

pub async fn chat_with_assistant(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<CustomerAuth>,
    Json(body): Json<ChatbotRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let tickets = app_state
        .db_client
        .get_customer_tickets(auth.customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut ticket_context = String::new();
    for details in tickets.iter().take(MAX_TICKET_CONTEXT) {
        ticket_context.push_str(&format!(
            "- Ticket #{}: {} {} ({}), status '{}', priority '{}'\n",
            details.ticket.id,
            details.device_brand,
            details.device_model,
            details.device_type.to_str(),
            details.ticket.status.to_str(),
            details.ticket.priority,
        ));
    }
    if ticket_context.is_empty() {
        ticket_context.push_str("- No repair tickets on file.\n");
    }

    let system_prompt = format!(
        "You are a helpful assistant for a device repair shop. You help \
         customers check on their repairs, explain repair statuses and answer \
         general questions about the shop's services. Be concise and friendly. \
         You are talking to {}. Their recent tickets:\n{}",
        auth.customer.name, ticket_context
    );

    let mut messages = Vec::with_capacity(MAX_HISTORY_TURNS + 2);
    messages.push(ChatMessage {
        role: "system".to_string(),
        content: system_prompt,
    });

    if let Some(history) = &body.conversation_history {
        let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
        messages.extend(history[start..].iter().cloned());
    }

    messages.push(ChatMessage {
        role: "user".to_string(),
        content: body.message,
    });

    let response = app_state
        .chat_service
        .complete(&messages)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ChatbotResponseDto {
        response,
        timestamp: Utc::now(),
    }))
}
