// src/db/admindb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::adminmodel::Admin;

#[async_trait]
pub trait AdminExt {
    async fn get_admin(&self, admin_id: Uuid) -> Result<Option<Admin>, Error>;

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, Error>;

    async fn admin_count(&self) -> Result<i64, Error>;

    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
        full_name: &str,
    ) -> Result<Admin, Error>;

    async fn update_admin_last_login(&self, admin_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
impl AdminExt for DBClient {
    async fn get_admin(&self, admin_id: Uuid) -> Result<Option<Admin>, Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT * FROM admins
            WHERE id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT * FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn admin_count(&self) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(id) FROM admins"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
        full_name: &str,
    ) -> Result<Admin, Error> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (username, email, password, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn update_admin_last_login(&self, admin_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE admins
            SET last_login = NOW()
            WHERE id = $1
            "#,
        )
        .bind(admin_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
