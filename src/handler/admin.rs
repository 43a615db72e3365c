// src/handler/admin.rs
//
// Endpoints behind admin_auth: dashboard aggregates, ticket search, customer
// listing and the bulk status update.

use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{
        customerdb::CustomerExt,
        ticketdb::{TicketExt, TicketFilter},
    },
    dtos::{
        authdtos::{CustomerListQueryDto, FilterCustomerDto},
        ticketdtos::{BulkStatusUpdateDto, BulkUpdateResponseDto, TicketSearchQueryDto},
    },
    error::HttpError,
    middleware::AdminAuth,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/tickets/search", get(search_tickets))
        .route("/tickets/bulk-update", post(bulk_update_tickets))
        .route("/customers", get(list_customers))
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let statistics = app_state
        .db_client
        .get_dashboard_statistics()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(statistics))
}

pub async fn search_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<TicketSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(100);

    let filter = TicketFilter {
        status: query.status,
        priority: query.priority.map(|p| p.to_lowercase()),
        customer_name: query.customer_name,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let tickets = app_state
        .db_client
        .get_tickets(skip, limit, filter)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(tickets))
}

pub async fn bulk_update_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AdminAuth>,
    Json(body): Json<BulkStatusUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let actor = body
        .changed_by
        .as_deref()
        .unwrap_or(auth.admin.username.as_str());

    let requested_count = body.ticket_ids.len();
    let updated_count = app_state
        .lifecycle_service
        .bulk_apply_status(&body.ticket_ids, body.new_status, actor)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(BulkUpdateResponseDto {
        updated_count,
        requested_count,
        success: updated_count > 0,
        message: format!(
            "Successfully updated {} out of {} tickets",
            updated_count, requested_count
        ),
    }))
}

pub async fn list_customers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<CustomerListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(100);

    let customers = app_state
        .db_client
        .get_customers(skip, limit, query.search.as_deref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered: Vec<FilterCustomerDto> = customers
        .iter()
        .map(FilterCustomerDto::filter_customer)
        .collect();

    Ok(Json(filtered))
}
