use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Card => "CARD",
            PaymentType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentType::Cash),
            "CARD" => Ok(PaymentType::Card),
            "TRANSFER" => Ok(PaymentType::Transfer),
            other => Err(anyhow::anyhow!("Unknown payment type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub transaction_date: DateTime<Utc>,
    pub seller_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Seller {
    /// Transactions whose timestamp falls inside `window`.
    pub fn transactions_in<'a>(
        &'a self,
        window: &'a DateWindow,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |transaction| window.contains(&transaction.transaction_date))
    }

    pub fn total_in(&self, window: &DateWindow) -> BigDecimal {
        self.transactions_in(window).map(|t| &t.amount).sum()
    }
}

/// Inclusive timestamp range used to select transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Whole calendar days: midnight of `date_from` through the last
    /// nanosecond of `date_to`.
    pub fn from_dates(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        let from = Utc.from_utc_datetime(&date_from.and_time(NaiveTime::MIN));
        let to = Utc.from_utc_datetime(&date_to.and_time(NaiveTime::MIN)) + Duration::days(1)
            - Duration::nanoseconds(1);
        Self { from, to }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.from <= *timestamp && *timestamp <= self.to
    }
}

/// Densest run of transaction dates for one seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub count: usize,
}

impl BestPeriod {
    pub fn span_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }

    pub fn score(&self) -> f64 {
        match self.span_days() {
            Some(span) => (self.count * self.count) as f64 / span as f64,
            None => 0.0,
        }
    }
}
