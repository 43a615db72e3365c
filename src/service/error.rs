// src/service/error.rs
use thiserror::Error;

use crate::{
    error::HttpError,
    models::ticketmodel::TicketStatus,
    service::transition::{TransitionError, VALID_PRIORITIES},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Ticket {0} not found")]
    TicketNotFound(i64),

    #[error("Ticket {0} was modified by another request, please retry")]
    ConcurrentUpdate(i64),

    #[error("{}", .0.message())]
    InvalidTransition(TransitionError),

    #[error("Invalid priority '{0}'. Must be one of: low, normal, high, urgent")]
    InvalidPriority(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chat completion failed: {0}")]
    Upstream(String),
}

impl ServiceError {
    /// Allowed next statuses for transition rejections, so callers can
    /// self-correct without a second round trip.
    pub fn allowed_statuses(&self) -> Option<&'static [TicketStatus]> {
        match self {
            ServiceError::InvalidTransition(err) => Some(err.allowed()),
            _ => None,
        }
    }

    pub fn valid_priorities(&self) -> Option<&'static [&'static str]> {
        match self {
            ServiceError::InvalidPriority(_) => Some(&VALID_PRIORITIES),
            _ => None,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::TicketNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::ConcurrentUpdate(_) => HttpError::conflict(error.to_string()),

            ServiceError::InvalidTransition(_) | ServiceError::InvalidPriority(_) => {
                HttpError::bad_request(error.to_string())
            }

            ServiceError::Upstream(_) => HttpError::bad_gateway(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}
