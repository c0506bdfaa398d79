use anyhow::{anyhow, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database: {}", mask_database_url(&config.url));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        let connection = Self { pool };
        connection.health_check().await?;

        info!("Successfully connected to database");
        Ok(connection)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        let test_value: i32 = row.try_get("test")?;
        if test_value != 1 {
            return Err(anyhow!("Database health check returned unexpected value"));
        }

        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::query("CREATE SCHEMA IF NOT EXISTS sales_management")
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to create sales_management schema: {}", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales_management.seller (
                id SERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                contact_info VARCHAR(100),
                registration_date TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create seller table: {}", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales_management."transaction" (
                id SERIAL PRIMARY KEY,
                seller_id INTEGER NOT NULL
                    REFERENCES sales_management.seller(id) ON DELETE CASCADE,
                amount NUMERIC NOT NULL CHECK (amount > 0),
                payment_type VARCHAR(16) NOT NULL,
                transaction_date TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create transaction table: {}", e))?;

        sqlx::query(
            r#"CREATE INDEX IF NOT EXISTS idx_transaction_seller_date ON sales_management."transaction"(seller_id, transaction_date)"#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create seller/date index: {}", e))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            // scheme separator is not a password
            if url[colon_pos + 1..at_pos].starts_with("//") {
                return url.to_string();
            }
            let mut masked = url.to_string();
            masked.replace_range(colon_pos + 1..at_pos, "****");
            return masked;
        }
    }
    url.to_string()
}
