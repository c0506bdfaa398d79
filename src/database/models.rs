use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{PaymentType, Seller, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SellerRow {
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionRow {
    pub id: i32,
    pub amount: BigDecimal,
    pub payment_type: String,
    pub transaction_date: DateTime<Utc>,
    pub seller_id: i32,
}

/// Seller fields supplied on creation; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSeller {
    pub name: String,
    pub contact_info: Option<String>,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub seller_id: i32,
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub transaction_date: DateTime<Utc>,
}

impl From<SellerRow> for Seller {
    fn from(row: SellerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact_info: row.contact_info,
            registration_date: row.registration_date,
            transactions: Vec::new(),
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            amount: row.amount,
            payment_type: row.payment_type.parse()?,
            transaction_date: row.transaction_date,
            seller_id: row.seller_id,
        })
    }
}
