// src/db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::customermodel::CustomerNotification;

#[async_trait]
pub trait NotificationExt {
    async fn get_customer_notifications(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerNotification>, Error>;

    async fn get_unread_notification_count(&self, customer_id: Uuid) -> Result<i64, Error>;

    /// Marks a notification read, scoped to its owner. Returns false when no
    /// such notification exists for this customer. The flag never reverts.
    async fn mark_notification_read(
        &self,
        notification_id: i64,
        customer_id: Uuid,
    ) -> Result<bool, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn get_customer_notifications(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerNotification>, Error> {
        let notifications = sqlx::query_as::<_, CustomerNotification>(
            r#"
            SELECT * FROM customer_notifications
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn get_unread_notification_count(&self, customer_id: Uuid) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(id) FROM customer_notifications
            WHERE customer_id = $1 AND is_read = false
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
        customer_id: Uuid,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE customer_notifications
            SET is_read = true
            WHERE id = $1 AND customer_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
