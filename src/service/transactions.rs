use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::info;

use crate::{
    analytics::Clock,
    database::{NewTransaction, SalesStore},
    service::error::{ServiceError, ServiceResult},
    types::{PaymentType, Transaction},
};

pub struct TransactionService {
    store: Arc<dyn SalesStore>,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn SalesStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn find_all_transactions(&self) -> ServiceResult<Vec<Transaction>> {
        Ok(self.store.find_all_transactions().await?)
    }

    pub async fn find_transaction(&self, id: i32) -> ServiceResult<Transaction> {
        self.store
            .find_transaction(id)
            .await?
            .ok_or(ServiceError::TransactionNotFound(id))
    }

    /// Records a sale for an existing seller, stamped with the current time.
    pub async fn create_transaction(
        &self,
        seller_id: i32,
        amount: BigDecimal,
        payment_type: PaymentType,
    ) -> ServiceResult<Transaction> {
        if !self.store.seller_exists(seller_id).await? {
            return Err(ServiceError::SellerNotFound(seller_id));
        }

        let transaction = self
            .store
            .create_transaction(NewTransaction {
                seller_id,
                amount,
                payment_type,
                transaction_date: self.clock.now(),
            })
            .await?;

        info!(
            "Recorded transaction {}: {} via {} for seller {}",
            transaction.id, transaction.amount, transaction.payment_type, seller_id
        );
        Ok(transaction)
    }
}
