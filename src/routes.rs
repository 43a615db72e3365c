// src/routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler,
        auth::{auth_handler, auth_me_handler},
        chatbot::chatbot_handler,
        customer::customer_handler,
        tickets::tickets_handler,
    },
    middleware::{admin_auth, customer_auth},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest(
            "/auth",
            auth_handler().merge(auth_me_handler().layer(middleware::from_fn(admin_auth))),
        )
        .nest("/tickets", tickets_handler())
        .nest(
            "/customer",
            customer_handler().layer(middleware::from_fn(customer_auth)),
        )
        .nest(
            "/chatbot",
            chatbot_handler().layer(middleware::from_fn(customer_auth)),
        )
        .nest(
            "/admin",
            admin_handler().layer(middleware::from_fn(admin_auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_route)
}
