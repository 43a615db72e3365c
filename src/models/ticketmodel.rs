// src/models/ticketmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    Diagnosed,
    InProgress,
    WaitingParts,
    Completed,
    ReadyPickup,
    Delivered,
    Cancelled,
}

impl TicketStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Diagnosed => "diagnosed",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::WaitingParts => "waiting_parts",
            TicketStatus::Completed => "completed",
            TicketStatus::ReadyPickup => "ready_pickup",
            TicketStatus::Delivered => "delivered",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    pub const ALL: [TicketStatus; 8] = [
        TicketStatus::Pending,
        TicketStatus::Diagnosed,
        TicketStatus::InProgress,
        TicketStatus::WaitingParts,
        TicketStatus::Completed,
        TicketStatus::ReadyPickup,
        TicketStatus::Delivered,
        TicketStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "device_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Phone,
    Laptop,
    Tablet,
    Desktop,
    Watch,
    Other,
}

impl DeviceType {
    pub fn to_str(&self) -> &'static str {
        match self {
            DeviceType::Phone => "phone",
            DeviceType::Laptop => "laptop",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Watch => "watch",
            DeviceType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: i64,
    pub device_type: DeviceType,
    pub brand: String,
    pub model: String,
    pub issue_description: String,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: i64,
    pub customer_id: Uuid,
    pub device_id: i64,
    pub status: TicketStatus,
    pub priority: String,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

// Ticket joined with its customer and device for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketWithDetails {
    #[sqlx(flatten)]
    pub ticket: Ticket,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub device_type: DeviceType,
    pub device_brand: String,
    pub device_model: String,
    pub issue_description: String,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketHistory {
    pub id: i64,
    pub ticket_id: i64,
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub changed_by: String,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}
