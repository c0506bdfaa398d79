use thiserror::Error;

use crate::analytics::Period;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Seller with id '{0}' not found")]
    SellerNotFound(i32),

    #[error("Seller with period '{0}' not found")]
    NoActiveSeller(Period),

    #[error("Transaction with id {0} was not found")]
    TransactionNotFound(i32),

    #[error("Seller {seller_id} has {count} transactions, best period search is limited to {limit}")]
    HistoryTooLarge {
        seller_id: i32,
        count: usize,
        limit: usize,
    },

    #[error("Storage error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
