// src/db/customerdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::customermodel::Customer;

#[async_trait]
pub trait CustomerExt {
    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, Error>;

    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, Error>;

    async fn create_customer_with_password(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        hashed_password: &str,
    ) -> Result<Customer, Error>;

    /// Attach credentials to a legacy/guest customer created at ticket
    /// submission time.
    async fn set_customer_password(
        &self,
        customer_id: Uuid,
        hashed_password: &str,
    ) -> Result<Customer, Error>;

    async fn update_customer_last_login(&self, customer_id: Uuid) -> Result<(), Error>;

    async fn get_customers(
        &self,
        skip: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, Error>;
}

#[async_trait]
impl CustomerExt for DBClient {
    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn create_customer_with_password(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        hashed_password: &str,
    ) -> Result<Customer, Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn set_customer_password(
        &self,
        customer_id: Uuid,
        hashed_password: &str,
    ) -> Result<Customer, Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET password = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn update_customer_last_login(&self, customer_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE customers
            SET last_login = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_customers(
        &self,
        skip: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, Error> {
        let pattern = search.map(|s| format!("%{}%", s));

        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::varchar IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}
