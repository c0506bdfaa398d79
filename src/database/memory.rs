use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    database::{
        models::{NewSeller, NewTransaction},
        traits::SalesStore,
    },
    types::{Seller, Transaction},
};

#[derive(Default)]
struct Tables {
    sellers: BTreeMap<i32, Seller>,
    transactions: BTreeMap<i32, Transaction>,
    next_seller_id: i32,
    next_transaction_id: i32,
}

impl Tables {
    fn transactions_of(&self, seller_id: i32) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .values()
            .filter(|t| t.seller_id == seller_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| a.transaction_date.cmp(&b.transaction_date).then(a.id.cmp(&b.id)));
        transactions
    }
}

/// Process-local [`SalesStore`], ids assigned sequentially from 1.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SalesStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_all_sellers(&self) -> Result<Vec<Seller>> {
        let tables = self.tables.read().await;
        Ok(tables.sellers.values().cloned().collect())
    }

    async fn find_all_sellers_with_transactions(&self) -> Result<Vec<Seller>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sellers
            .values()
            .map(|seller| Seller {
                transactions: tables.transactions_of(seller.id),
                ..seller.clone()
            })
            .collect())
    }

    async fn find_seller(&self, id: i32) -> Result<Option<Seller>> {
        let tables = self.tables.read().await;
        Ok(tables.sellers.get(&id).map(|seller| Seller {
            transactions: tables.transactions_of(id),
            ..seller.clone()
        }))
    }

    async fn seller_exists(&self, id: i32) -> Result<bool> {
        Ok(self.tables.read().await.sellers.contains_key(&id))
    }

    async fn create_seller(&self, seller: NewSeller) -> Result<Seller> {
        let mut tables = self.tables.write().await;
        tables.next_seller_id += 1;
        let created = Seller {
            id: tables.next_seller_id,
            name: seller.name,
            contact_info: seller.contact_info,
            registration_date: seller.registration_date,
            transactions: Vec::new(),
        };
        tables.sellers.insert(created.id, created.clone());
        debug!("Stored seller {} in memory", created.id);
        Ok(created)
    }

    async fn update_seller(
        &self,
        id: i32,
        name: Option<String>,
        contact_info: Option<String>,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(seller) = tables.sellers.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = name {
            seller.name = name;
        }
        if let Some(contact_info) = contact_info {
            seller.contact_info = Some(contact_info);
        }
        Ok(true)
    }

    async fn delete_seller(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.sellers.remove(&id).is_none() {
            return Ok(false);
        }
        tables.transactions.retain(|_, t| t.seller_id != id);
        Ok(true)
    }

    async fn find_all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.tables.read().await.transactions.values().cloned().collect())
    }

    async fn find_transaction(&self, id: i32) -> Result<Option<Transaction>> {
        Ok(self.tables.read().await.transactions.get(&id).cloned())
    }

    async fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction> {
        let mut tables = self.tables.write().await;
        if !tables.sellers.contains_key(&transaction.seller_id) {
            return Err(anyhow!("Seller {} does not exist", transaction.seller_id));
        }
        tables.next_transaction_id += 1;
        let created = Transaction {
            id: tables.next_transaction_id,
            amount: transaction.amount,
            payment_type: transaction.payment_type,
            transaction_date: transaction.transaction_date,
            seller_id: transaction.seller_id,
        };
        tables.transactions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentType;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, TimeZone, Utc};

    fn new_seller(name: &str) -> NewSeller {
        NewSeller {
            name: name.to_string(),
            contact_info: Some("555-555-555".to_string()),
            registration_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn new_transaction(seller_id: i32, amount: i32, days: i64) -> NewTransaction {
        NewTransaction {
            seller_id,
            amount: BigDecimal::from(amount),
            payment_type: PaymentType::Cash,
            transaction_date: Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
                + Duration::days(days),
        }
    }

    #[tokio::test]
    async fn test_sellers_are_loaded_with_sorted_transactions() {
        let store = InMemoryStore::new();
        let first = store.create_seller(new_seller("Alice")).await.unwrap();
        let second = store.create_seller(new_seller("Bob")).await.unwrap();
        store.create_transaction(new_transaction(first.id, 10, 5)).await.unwrap();
        store.create_transaction(new_transaction(first.id, 20, 1)).await.unwrap();

        let sellers = store.find_all_sellers_with_transactions().await.unwrap();

        assert_eq!(sellers.len(), 2);
        assert_eq!(sellers[0].id, first.id);
        assert_eq!(sellers[0].transactions.len(), 2);
        assert_eq!(sellers[0].transactions[0].amount, BigDecimal::from(20));
        assert!(sellers[1].transactions.is_empty());
        assert_eq!(sellers[1].id, second.id);

        let plain = store.find_all_sellers().await.unwrap();
        assert!(plain.iter().all(|s| s.transactions.is_empty()));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_transactions() {
        let store = InMemoryStore::new();
        let seller = store.create_seller(new_seller("Alice")).await.unwrap();
        let transaction = store.create_transaction(new_transaction(seller.id, 10, 0)).await.unwrap();

        assert!(store.delete_seller(seller.id).await.unwrap());
        assert!(!store.delete_seller(seller.id).await.unwrap());
        assert!(store.find_transaction(transaction.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let store = InMemoryStore::new();
        let seller = store.create_seller(new_seller("Alice")).await.unwrap();

        assert!(store.update_seller(seller.id, Some("Alicia".to_string()), None).await.unwrap());
        assert!(!store.update_seller(99, None, None).await.unwrap());

        let updated = store.find_seller(seller.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.contact_info.as_deref(), Some("555-555-555"));
    }

    #[tokio::test]
    async fn test_transaction_requires_existing_seller() {
        let store = InMemoryStore::new();
        assert!(store.create_transaction(new_transaction(1, 10, 0)).await.is_err());
    }
}
