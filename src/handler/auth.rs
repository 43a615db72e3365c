// src/handler/auth.rs
use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{admindb::AdminExt, customerdb::CustomerExt},
    dtos::authdtos::{
        AdminLoginDto, AdminTokenResponseDto, CustomerLoginDto, CustomerSignupDto,
        CustomerTokenResponseDto, FilterAdminDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::AdminAuth,
    utils::{password, token, token::PrincipalKind},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(admin_login))
        .route("/customer/signup", post(customer_signup))
        .route("/customer/login", post(customer_login))
}

pub fn auth_me_handler() -> Router {
    Router::new().route("/me", get(get_current_admin))
}

pub async fn admin_login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<AdminLoginDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_admin_by_username(&body.username)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Fails closed: absent admin and wrong password are indistinguishable.
    let admin = result
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &admin.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    // Distinct signal once the credential check passed.
    if !admin.is_active {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    app_state
        .db_client
        .update_admin_last_login(admin.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let access_token = token::create_token(
        &admin.id.to_string(),
        PrincipalKind::Admin,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(AdminTokenResponseDto {
        access_token,
        token_type: "bearer".to_string(),
        admin_username: admin.username,
        admin_full_name: admin.full_name,
    }))
}

pub async fn get_current_admin(
    Extension(auth): Extension<AdminAuth>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(FilterAdminDto::filter_admin(&auth.admin)))
}

pub async fn customer_signup(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CustomerSignupDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let hashed_password = password::hash(&body.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_customer_by_email(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let customer = match existing {
        Some(customer) if customer.password.is_some() => {
            return Err(HttpError::bad_request(ErrorMessage::EmailExist.to_string()));
        }
        // Legacy customer created at ticket submission: attach credentials.
        Some(customer) => app_state
            .db_client
            .set_customer_password(customer.id, &hashed_password)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
        None => app_state
            .db_client
            .create_customer_with_password(&body.name, &body.email, &body.phone, &hashed_password)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    };

    let access_token = token::create_token(
        &customer.id.to_string(),
        PrincipalKind::Customer,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CustomerTokenResponseDto {
        access_token,
        token_type: "bearer".to_string(),
        customer_id: customer.id,
        customer_name: customer.name,
        customer_email: customer.email,
    }))
}

pub async fn customer_login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CustomerLoginDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_customer_by_email(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let customer = result
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    // Guest customers have no digest; same generic rejection.
    let stored_password = customer
        .password
        .as_deref()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, stored_password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if !customer.is_active {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    app_state
        .db_client
        .update_customer_last_login(customer.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let access_token = token::create_token(
        &customer.id.to_string(),
        PrincipalKind::Customer,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CustomerTokenResponseDto {
        access_token,
        token_type: "bearer".to_string(),
        customer_id: customer.id,
        customer_name: customer.name,
        customer_email: customer.email,
    }))
}
