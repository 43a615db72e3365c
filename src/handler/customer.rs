// src/handler/customer.rs
//
// Endpoints behind customer_auth. Every query is scoped to the authenticated
// customer; ids in the path never widen access.

use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::{
    db::{notificationdb::NotificationExt, ticketdb::TicketExt},
    dtos::authdtos::{CustomerProfileDto, FilterCustomerDto, Response},
    error::HttpError,
    middleware::CustomerAuth,
    AppState,
};

pub fn customer_handler() -> Router {
    Router::new()
        .route("/profile", get(get_customer_profile))
        .route("/tickets", get(get_my_tickets))
        .route("/notifications", get(get_my_notifications))
        .route(
            "/notifications/:notification_id/read",
            patch(mark_notification_read),
        )
}

pub async fn get_customer_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<CustomerAuth>,
) -> Result<impl IntoResponse, HttpError> {
    let unread_notifications = app_state
        .db_client
        .get_unread_notification_count(auth.customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CustomerProfileDto {
        customer: FilterCustomerDto::filter_customer(&auth.customer),
        unread_notifications,
    }))
}

pub async fn get_my_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<CustomerAuth>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state
        .db_client
        .get_customer_tickets(auth.customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(tickets))
}

pub async fn get_my_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<CustomerAuth>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .db_client
        .get_customer_notifications(auth.customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(notifications))
}

pub async fn mark_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<CustomerAuth>,
    Path(notification_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let marked = app_state
        .db_client
        .mark_notification_read(notification_id, auth.customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Someone else's notification and a nonexistent one look identical.
    if !marked {
        return Err(HttpError::not_found(format!(
            "Notification {} not found",
            notification_id
        )));
    }

    Ok(Json(Response {
        status: "success",
        message: "Notification marked as read".to_string(),
    }))
}
