// src/dtos/ticketdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ticketmodel::{DeviceType, TicketStatus};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 100, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(
        length(min = 1, message = "Customer email is required"),
        email(message = "Email is invalid")
    )]
    pub customer_email: String,

    #[validate(length(min = 1, max = 20, message = "Customer phone is required"))]
    pub customer_phone: String,

    pub device_type: DeviceType,

    #[validate(length(min = 1, max = 50, message = "Device brand is required"))]
    pub device_brand: String,

    #[validate(length(min = 1, max = 100, message = "Device model is required"))]
    pub device_model: String,

    #[validate(length(min = 1, message = "Issue description is required"))]
    pub issue_description: String,

    pub serial_number: Option<String>,

    #[serde(default = "default_priority")]
    pub priority: String,

    pub estimated_cost: Option<f64>,
    pub notes: Option<String>,
}

fn default_priority() -> String {
    "normal".to_string()
}

/// Partial update: fields absent from the request are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateTicketDto {
    pub status: Option<TicketStatus>,
    pub priority: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusUpdateDto {
    #[validate(length(min = 1, message = "At least one ticket id is required"))]
    pub ticket_ids: Vec<i64>,
    pub new_status: TicketStatus,
    pub changed_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponseDto {
    pub updated_count: usize,
    pub requested_count: usize,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidStatusesResponseDto {
    pub ticket_id: i64,
    pub current_status: TicketStatus,
    pub valid_next_statuses: Vec<TicketStatus>,
    pub is_actionable: bool,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct TicketListQueryDto {
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    pub status: Option<TicketStatus>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct TicketSearchQueryDto {
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    pub status: Option<TicketStatus>,
    pub priority: Option<String>,
    pub customer_name: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct StatusStatisticsDto {
    pub statistics: serde_json::Value,
    pub total: i64,
}
