use anyhow::Result;
use async_trait::async_trait;

use crate::{
    database::models::{NewSeller, NewTransaction},
    types::{Seller, Transaction},
};

/// Storage for sellers and their transactions.
#[async_trait]
pub trait SalesStore: Send + Sync {
    fn name(&self) -> &str;

    /// Sellers without their transactions.
    async fn find_all_sellers(&self) -> Result<Vec<Seller>>;

    /// Every seller with its full transaction history loaded.
    async fn find_all_sellers_with_transactions(&self) -> Result<Vec<Seller>>;

    async fn find_seller(&self, id: i32) -> Result<Option<Seller>>;

    async fn seller_exists(&self, id: i32) -> Result<bool>;

    async fn create_seller(&self, seller: NewSeller) -> Result<Seller>;

    /// Returns `false` when the seller does not exist.
    async fn update_seller(
        &self,
        id: i32,
        name: Option<String>,
        contact_info: Option<String>,
    ) -> Result<bool>;

    /// Removes the seller and its transactions. Returns `false` when missing.
    async fn delete_seller(&self, id: i32) -> Result<bool>;

    async fn find_all_transactions(&self) -> Result<Vec<Transaction>>;

    async fn find_transaction(&self, id: i32) -> Result<Option<Transaction>>;

    async fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction>;

    async fn health_check(&self) -> Result<()>;
}
