// src/handler/tickets.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::ticketdb::{TicketExt, TicketFilter},
    dtos::ticketdtos::{
        CreateTicketDto, StatusStatisticsDto, TicketListQueryDto, UpdateTicketDto,
        ValidStatusesResponseDto,
    },
    error::HttpError,
    service::{error::ServiceError, transition},
    AppState,
};

pub fn tickets_handler() -> Router {
    Router::new()
        .route("/", post(create_ticket).get(list_tickets))
        .route("/:ticket_id", get(get_ticket).patch(update_ticket))
        .route("/:ticket_id/history", get(get_ticket_history))
        .route("/:ticket_id/valid-statuses", get(get_valid_statuses))
        .route("/customer/:email", get(get_tickets_by_email))
        .route("/stats/status", get(get_status_statistics))
}

pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !transition::validate_priority(&body.priority) {
        return Err(ServiceError::InvalidPriority(body.priority).into());
    }

    let ticket = app_state
        .db_client
        .create_ticket(body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("ticket {} created for customer {}", ticket.id, ticket.customer_id);

    let details = app_state
        .db_client
        .get_ticket_with_details(ticket.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::server_error("Ticket vanished after creation"))?;

    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(ticket_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .get_ticket_with_details(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Ticket {} not found", ticket_id)))?;

    Ok(Json(ticket))
}

pub async fn list_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<TicketListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(100);

    let filter = TicketFilter {
        status: query.status,
        ..Default::default()
    };

    let tickets = app_state
        .db_client
        .get_tickets(skip, limit, filter)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(tickets))
}

pub async fn update_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(ticket_id): Path<i64>,
    Json(body): Json<UpdateTicketDto>,
) -> Result<Response, HttpError> {
    match app_state
        .lifecycle_service
        .apply_update(ticket_id, &body, "system")
        .await
    {
        Ok(_) => {
            let details = app_state
                .db_client
                .get_ticket_with_details(ticket_id)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
                .ok_or_else(|| HttpError::server_error("Ticket vanished after update"))?;

            Ok(Json(details).into_response())
        }
        // Transition/priority rejections carry the full allowed set so the
        // caller can self-correct without a second round trip.
        Err(err) => {
            if let Some(allowed) = err.allowed_statuses() {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "status": "fail",
                        "message": err.to_string(),
                        "valid_next_statuses": allowed,
                    })),
                )
                    .into_response());
            }

            if let Some(priorities) = err.valid_priorities() {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "status": "fail",
                        "message": err.to_string(),
                        "valid_priorities": priorities,
                    })),
                )
                    .into_response());
            }

            Err(err.into())
        }
    }
}

pub async fn get_ticket_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(ticket_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let _ = app_state
        .db_client
        .get_ticket(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Ticket {} not found", ticket_id)))?;

    let history = app_state
        .db_client
        .get_ticket_history(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(history))
}

pub async fn get_valid_statuses(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(ticket_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .get_ticket(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Ticket {} not found", ticket_id)))?;

    Ok(Json(ValidStatusesResponseDto {
        ticket_id,
        current_status: ticket.status,
        valid_next_statuses: transition::valid_next_statuses(ticket.status).to_vec(),
        is_actionable: transition::is_ticket_actionable(ticket.status),
    }))
}

pub async fn get_tickets_by_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state
        .db_client
        .get_tickets_by_customer_email(&email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(tickets))
}

pub async fn get_status_statistics(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let counts = app_state
        .db_client
        .get_ticket_count_by_status()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total: i64 = counts.iter().map(|c| c.count).sum();
    let statistics = counts
        .into_iter()
        .map(|c| (c.status.to_str().to_string(), serde_json::json!(c.count)))
        .collect::<serde_json::Map<_, _>>();

    Ok(Json(StatusStatisticsDto {
        statistics: serde_json::Value::Object(statistics),
        total,
    }))
}
