// src/db/ticketdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::Error;

use super::db::DBClient;
use crate::{
    dtos::ticketdtos::CreateTicketDto,
    models::ticketmodel::{Ticket, TicketHistory, TicketStatus, TicketWithDetails},
    service::lifecycle::TicketUpdatePlan,
};

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<String>,
    pub customer_name: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub count: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStatistics {
    pub total_tickets: i64,
    pub total_customers: i64,
    pub average_estimated_cost: f64,
    pub recent_tickets_7_days: i64,
    pub tickets_by_priority: serde_json::Value,
    pub tickets_by_device_type: serde_json::Value,
}

#[async_trait]
pub trait TicketExt {
    async fn get_ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, Error>;

    async fn get_ticket_with_details(
        &self,
        ticket_id: i64,
    ) -> Result<Option<TicketWithDetails>, Error>;

    async fn get_tickets(
        &self,
        skip: i64,
        limit: i64,
        filter: TicketFilter,
    ) -> Result<Vec<TicketWithDetails>, Error>;

    async fn get_tickets_by_customer_email(
        &self,
        email: &str,
    ) -> Result<Vec<TicketWithDetails>, Error>;

    async fn get_customer_tickets(
        &self,
        customer_id: uuid::Uuid,
    ) -> Result<Vec<TicketWithDetails>, Error>;

    /// Creates the customer (or reuses an existing one by email), a fresh
    /// device row and a pending ticket in one transaction.
    async fn create_ticket(&self, ticket: CreateTicketDto) -> Result<Ticket, Error>;

    /// Commits a validated update plan atomically: the ticket row, the
    /// history row (iff the status changed) and the customer notification
    /// (iff the status changed) all land in one transaction, so no reader
    /// ever observes one without the others. The UPDATE is guarded on the
    /// status the plan was validated against; returns None when the ticket
    /// no longer matches (deleted or moved by a concurrent update).
    async fn apply_ticket_update(&self, plan: &TicketUpdatePlan)
        -> Result<Option<Ticket>, Error>;

    async fn get_ticket_history(&self, ticket_id: i64) -> Result<Vec<TicketHistory>, Error>;

    async fn get_ticket_count_by_status(&self) -> Result<Vec<StatusCount>, Error>;

    async fn get_dashboard_statistics(&self) -> Result<DashboardStatistics, Error>;
}

#[async_trait]
impl TicketExt for DBClient {
    async fn get_ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_ticket_with_details(
        &self,
        ticket_id: i64,
    ) -> Result<Option<TicketWithDetails>, Error> {
        let ticket = sqlx::query_as::<_, TicketWithDetails>(
            r#"
            SELECT
                t.*,
                c.name as customer_name,
                c.email as customer_email,
                c.phone as customer_phone,
                d.device_type,
                d.brand as device_brand,
                d.model as device_model,
                d.issue_description,
                d.serial_number
            FROM tickets t
            JOIN customers c ON t.customer_id = c.id
            JOIN devices d ON t.device_id = d.id
            WHERE t.id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_tickets(
        &self,
        skip: i64,
        limit: i64,
        filter: TicketFilter,
    ) -> Result<Vec<TicketWithDetails>, Error> {
        let customer_name_pattern = filter
            .customer_name
            .as_ref()
            .map(|name| format!("%{}%", name));

        let tickets = sqlx::query_as::<_, TicketWithDetails>(
            r#"
            SELECT
                t.*,
                c.name as customer_name,
                c.email as customer_email,
                c.phone as customer_phone,
                d.device_type,
                d.brand as device_brand,
                d.model as device_model,
                d.issue_description,
                d.serial_number
            FROM tickets t
            JOIN customers c ON t.customer_id = c.id
            JOIN devices d ON t.device_id = d.id
            WHERE ($1::ticket_status IS NULL OR t.status = $1)
              AND ($2::varchar IS NULL OR t.priority = $2)
              AND ($3::varchar IS NULL OR c.name ILIKE $3)
              AND ($4::timestamptz IS NULL OR t.created_at >= $4)
              AND ($5::timestamptz IS NULL OR t.created_at <= $5)
            ORDER BY t.created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.status)
        .bind(filter.priority)
        .bind(customer_name_pattern)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn get_tickets_by_customer_email(
        &self,
        email: &str,
    ) -> Result<Vec<TicketWithDetails>, Error> {
        let tickets = sqlx::query_as::<_, TicketWithDetails>(
            r#"
            SELECT
                t.*,
                c.name as customer_name,
                c.email as customer_email,
                c.phone as customer_phone,
                d.device_type,
                d.brand as device_brand,
                d.model as device_model,
                d.issue_description,
                d.serial_number
            FROM tickets t
            JOIN customers c ON t.customer_id = c.id
            JOIN devices d ON t.device_id = d.id
            WHERE c.email = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn get_customer_tickets(
        &self,
        customer_id: uuid::Uuid,
    ) -> Result<Vec<TicketWithDetails>, Error> {
        let tickets = sqlx::query_as::<_, TicketWithDetails>(
            r#"
            SELECT
                t.*,
                c.name as customer_name,
                c.email as customer_email,
                c.phone as customer_phone,
                d.device_type,
                d.brand as device_brand,
                d.model as device_model,
                d.issue_description,
                d.serial_number
            FROM tickets t
            JOIN customers c ON t.customer_id = c.id
            JOIN devices d ON t.device_id = d.id
            WHERE t.customer_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn create_ticket(&self, ticket: CreateTicketDto) -> Result<Ticket, Error> {
        let mut tx = self.pool.begin().await?;

        // Reuse the customer row by email; tickets never duplicate customers.
        let customer_id: uuid::Uuid = match sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id FROM customers WHERE email = $1
            "#,
        )
        .bind(&ticket.customer_email)
        .fetch_optional(&mut *tx)
        .await?
        {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, uuid::Uuid>(
                    r#"
                    INSERT INTO customers (name, email, phone)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(&ticket.customer_name)
                .bind(&ticket.customer_email)
                .bind(&ticket.customer_phone)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // Devices are deliberately not deduplicated: every submission gets
        // its own row, even for a repeat repair of the same physical item.
        let device_id: i64 = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO devices (device_type, brand, model, issue_description, serial_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(ticket.device_type)
        .bind(&ticket.device_brand)
        .bind(&ticket.device_model)
        .bind(&ticket.issue_description)
        .bind(&ticket.serial_number)
        .fetch_one(&mut *tx)
        .await?;

        let created = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (customer_id, device_id, status, priority, estimated_cost, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(device_id)
        .bind(TicketStatus::Pending)
        .bind(ticket.priority.to_lowercase())
        .bind(ticket.estimated_cost)
        .bind(&ticket.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn apply_ticket_update(
        &self,
        plan: &TicketUpdatePlan,
    ) -> Result<Option<Ticket>, Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET status = $2,
                priority = COALESCE($3, priority),
                estimated_cost = COALESCE($4, estimated_cost),
                actual_cost = COALESCE($5, actual_cost),
                notes = COALESCE($6, notes),
                completed_at = CASE WHEN $7 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
            WHERE id = $1 AND status = $8
            RETURNING *
            "#,
        )
        .bind(plan.ticket_id)
        .bind(plan.status)
        .bind(&plan.priority)
        .bind(plan.estimated_cost)
        .bind(plan.actual_cost)
        .bind(&plan.notes)
        .bind(plan.stamp_completed_at)
        .bind(plan.expected_status)
        .fetch_optional(&mut *tx)
        .await?;

        let updated = match updated {
            Some(ticket) => ticket,
            None => return Ok(None),
        };

        if let Some(change) = &plan.status_change {
            sqlx::query(
                r#"
                INSERT INTO ticket_history (ticket_id, old_status, new_status, changed_by, notes)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(plan.ticket_id)
            .bind(change.old_status)
            .bind(change.new_status)
            .bind(&change.changed_by)
            .bind(&change.notes)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO customer_notifications (customer_id, ticket_id, message)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(plan.customer_id)
            .bind(plan.ticket_id)
            .bind(&change.notification_message)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn get_ticket_history(&self, ticket_id: i64) -> Result<Vec<TicketHistory>, Error> {
        let history = sqlx::query_as::<_, TicketHistory>(
            r#"
            SELECT * FROM ticket_history
            WHERE ticket_id = $1
            ORDER BY changed_at DESC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    async fn get_ticket_count_by_status(&self) -> Result<Vec<StatusCount>, Error> {
        let counts = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(id) as count
            FROM tickets
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn get_dashboard_statistics(&self) -> Result<DashboardStatistics, Error> {
        let total_tickets: i64 = sqlx::query_scalar(r#"SELECT COUNT(id) FROM tickets"#)
            .fetch_one(&self.pool)
            .await?;

        let total_customers: i64 = sqlx::query_scalar(r#"SELECT COUNT(id) FROM customers"#)
            .fetch_one(&self.pool)
            .await?;

        let average_estimated_cost: f64 = sqlx::query_scalar::<_, Option<f64>>(
            r#"SELECT AVG(estimated_cost) FROM tickets"#,
        )
        .fetch_one(&self.pool)
        .await?
        .unwrap_or(0.0);

        let seven_days_ago = Utc::now() - Duration::days(7);
        let recent_tickets_7_days: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(id) FROM tickets WHERE created_at >= $1"#)
                .bind(seven_days_ago)
                .fetch_one(&self.pool)
                .await?;

        let priority_rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT priority, COUNT(id)
            FROM tickets
            GROUP BY priority
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let device_rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT d.device_type::varchar, COUNT(t.id)
            FROM devices d
            JOIN tickets t ON t.device_id = d.id
            GROUP BY d.device_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tickets_by_priority = priority_rows
            .into_iter()
            .map(|(priority, count)| (priority, serde_json::json!(count)))
            .collect::<serde_json::Map<_, _>>();

        let tickets_by_device_type = device_rows
            .into_iter()
            .map(|(device_type, count)| (device_type, serde_json::json!(count)))
            .collect::<serde_json::Map<_, _>>();

        Ok(DashboardStatistics {
            total_tickets,
            total_customers,
            average_estimated_cost: (average_estimated_cost * 100.0).round() / 100.0,
            recent_tickets_7_days,
            tickets_by_priority: serde_json::Value::Object(tickets_by_priority),
            tickets_by_device_type: serde_json::Value::Object(tickets_by_device_type),
        })
    }
}
