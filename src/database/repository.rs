use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::{
    database::{
        models::*,
        traits::SalesStore,
    },
    types::{Seller, Transaction},
};

/// Postgres-backed [`SalesStore`].
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_transactions_for(&self, seller_id: i32) -> Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, amount, payment_type, transaction_date, seller_id
            FROM sales_management."transaction"
            WHERE seller_id = $1
            ORDER BY transaction_date, id
            "#,
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch transactions of seller {}: {}", seller_id, e))?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}

#[async_trait]
impl SalesStore for SalesRepository {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn find_all_sellers(&self) -> Result<Vec<Seller>> {
        let rows = sqlx::query_as::<_, SellerRow>(
            r#"
            SELECT id, name, contact_info, registration_date
            FROM sales_management.seller
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch sellers: {}", e))?;

        Ok(rows.into_iter().map(Seller::from).collect())
    }

    async fn find_all_sellers_with_transactions(&self) -> Result<Vec<Seller>> {
        let mut sellers = self.find_all_sellers().await?;

        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, amount, payment_type, transaction_date, seller_id
            FROM sales_management."transaction"
            ORDER BY seller_id, transaction_date, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch transactions: {}", e))?;

        let mut by_seller: HashMap<i32, Vec<Transaction>> = HashMap::new();
        for row in rows {
            let transaction = Transaction::try_from(row)?;
            by_seller.entry(transaction.seller_id).or_default().push(transaction);
        }

        for seller in &mut sellers {
            seller.transactions = by_seller.remove(&seller.id).unwrap_or_default();
        }

        debug!("Loaded {} sellers with transactions", sellers.len());
        Ok(sellers)
    }

    async fn find_seller(&self, id: i32) -> Result<Option<Seller>> {
        let row = sqlx::query_as::<_, SellerRow>(
            r#"
            SELECT id, name, contact_info, registration_date
            FROM sales_management.seller
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch seller {}: {}", id, e))?;

        match row {
            Some(row) => {
                let mut seller = Seller::from(row);
                seller.transactions = self.fetch_transactions_for(id).await?;
                Ok(Some(seller))
            }
            None => Ok(None),
        }
    }

    async fn seller_exists(&self, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sales_management.seller WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to check seller {}: {}", id, e))?;

        Ok(exists)
    }

    async fn create_seller(&self, seller: NewSeller) -> Result<Seller> {
        let row = sqlx::query_as::<_, SellerRow>(
            r#"
            INSERT INTO sales_management.seller (name, contact_info, registration_date)
            VALUES ($1, $2, $3)
            RETURNING id, name, contact_info, registration_date
            "#,
        )
        .bind(&seller.name)
        .bind(&seller.contact_info)
        .bind(seller.registration_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to save seller: {}", e))?;

        debug!("Saved seller: {}", row.id);
        Ok(Seller::from(row))
    }

    async fn update_seller(
        &self,
        id: i32,
        name: Option<String>,
        contact_info: Option<String>,
    ) -> Result<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE sales_management.seller
            SET name = COALESCE($2, name),
                contact_info = COALESCE($3, contact_info)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(contact_info)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to update seller {}: {}", id, e))?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_seller(&self, id: i32) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM sales_management.seller WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete seller {}: {}", id, e))?
            .rows_affected();

        if deleted > 0 {
            info!("Deleted seller {}", id);
        }
        Ok(deleted > 0)
    }

    async fn find_all_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, amount, payment_type, transaction_date, seller_id
            FROM sales_management."transaction"
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch transactions: {}", e))?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn find_transaction(&self, id: i32) -> Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, amount, payment_type, transaction_date, seller_id
            FROM sales_management."transaction"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch transaction {}: {}", id, e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO sales_management."transaction" (seller_id, amount, payment_type, transaction_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, amount, payment_type, transaction_date, seller_id
            "#,
        )
        .bind(transaction.seller_id)
        .bind(&transaction.amount)
        .bind(transaction.payment_type.as_str())
        .bind(transaction.transaction_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to save transaction: {}", e))?;

        debug!("Saved transaction {} for seller {}", row.id, row.seller_id);
        Transaction::try_from(row)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;
        Ok(())
    }
}
