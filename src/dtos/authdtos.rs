// src/dtos/authdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{adminmodel::Admin, customermodel::Customer};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdminLoginDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CustomerSignupDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CustomerLoginDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminTokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub admin_username: String,
    pub admin_full_name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerTokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterAdminDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl FilterAdminDto {
    pub fn filter_admin(admin: &Admin) -> Self {
        FilterAdminDto {
            id: admin.id,
            username: admin.username.to_owned(),
            email: admin.email.to_owned(),
            full_name: admin.full_name.to_owned(),
            is_active: admin.is_active,
            created_at: admin.created_at,
            last_login: admin.last_login,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterCustomerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl FilterCustomerDto {
    pub fn filter_customer(customer: &Customer) -> Self {
        FilterCustomerDto {
            id: customer.id,
            name: customer.name.to_owned(),
            email: customer.email.to_owned(),
            phone: customer.phone.to_owned(),
            is_active: customer.is_active,
            created_at: customer.created_at,
            last_login: customer.last_login,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerProfileDto {
    #[serde(flatten)]
    pub customer: FilterCustomerDto,
    pub unread_notifications: i64,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct CustomerListQueryDto {
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}
