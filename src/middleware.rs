// src/middleware.rs
use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};

use crate::{
    db::{admindb::AdminExt, customerdb::CustomerExt},
    error::{ErrorMessage, HttpError},
    models::{adminmodel::Admin, customermodel::Customer},
    utils::token::{self, PrincipalKind},
    AppState,
};

#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub admin: Admin,
}

#[derive(Debug, Clone)]
pub struct CustomerAuth {
    pub customer: Customer,
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
        .map(|token| token.to_owned())
}

fn decode_bearer(
    req: &Request,
    app_state: &AppState,
    expected_kind: PrincipalKind,
) -> Result<uuid::Uuid, HttpError> {
    let token = bearer_token(req)
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let claims = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    // A valid token of the wrong principal kind is a permission problem,
    // not an authentication one.
    if claims.kind != expected_kind {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    uuid::Uuid::parse_str(&claims.sub)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))
}

/// Resolves a bearer token to an active admin. The subject is re-resolved
/// against the store on every request, so deactivation takes effect on the
/// next call without token revocation infrastructure.
pub async fn admin_auth(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let admin_id = decode_bearer(&req, &app_state, PrincipalKind::Admin)?;

    let admin = app_state
        .db_client
        .get_admin(admin_id)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    if !admin.is_active {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    req.extensions_mut().insert(AdminAuth { admin });

    Ok(next.run(req).await)
}

/// Customer counterpart of [`admin_auth`].
pub async fn customer_auth(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let customer_id = decode_bearer(&req, &app_state, PrincipalKind::Customer)?;

    let customer = app_state
        .db_client
        .get_customer(customer_id)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    if !customer.is_active {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountInactive.to_string(),
        ));
    }

    req.extensions_mut().insert(CustomerAuth { customer });

    Ok(next.run(req).await)
}
