use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::{api::error::ApiError, types::PaymentType};

const NAME_LENGTH: RangeInclusive<usize> = 3..=50;
const CONTACT_LENGTH: RangeInclusive<usize> = 5..=100;
const MAX_INTEGER_DIGITS: i128 = 38;
const MAX_FRACTION_DIGITS: i128 = 18;

#[derive(Debug, Default)]
struct Errors(BTreeMap<String, String>);

impl Errors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    fn check_length(&mut self, field: &str, value: Option<&str>, bounds: &RangeInclusive<usize>) {
        if let Some(value) = value {
            if !bounds.contains(&value.chars().count()) {
                self.add(
                    field,
                    format!("size must be between {} and {}", bounds.start(), bounds.end()),
                );
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ApiError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSellerPayload {
    pub name: Option<String>,
    pub contact_info: Option<String>,
}

pub struct ValidSeller {
    pub name: String,
    pub contact_info: Option<String>,
}

impl NewSellerPayload {
    pub fn validate(self) -> Result<ValidSeller, ApiError> {
        let mut errors = Errors::default();
        if self.name.is_none() {
            errors.add("name", "must not be null");
        }
        errors.check_length("name", self.name.as_deref(), &NAME_LENGTH);
        errors.check_length("contactInfo", self.contact_info.as_deref(), &CONTACT_LENGTH);

        let Self { name, contact_info } = self;
        errors.finish(|| ValidSeller {
            name: name.unwrap_or_default(),
            contact_info,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellerPayload {
    pub name: Option<String>,
    pub contact_info: Option<String>,
}

impl UpdateSellerPayload {
    pub fn validate(self) -> Result<Self, ApiError> {
        let mut errors = Errors::default();
        errors.check_length("name", self.name.as_deref(), &NAME_LENGTH);
        errors.check_length("contactInfo", self.contact_info.as_deref(), &CONTACT_LENGTH);
        errors.finish(|| self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionPayload {
    pub seller_id: Option<i32>,
    pub amount: Option<Value>,
    pub payment_type: Option<String>,
}

pub struct ValidTransaction {
    pub seller_id: i32,
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
}

impl NewTransactionPayload {
    pub fn validate(self) -> Result<ValidTransaction, ApiError> {
        let mut errors = Errors::default();

        if self.seller_id.is_none() {
            errors.add("sellerId", "must not be null");
        }

        let amount = match self.amount.as_ref().map(parse_amount) {
            None => {
                errors.add("amount", "must not be null");
                None
            }
            Some(None) => {
                errors.add("amount", "must be a decimal number");
                None
            }
            Some(Some(amount)) if !within_money_bounds(&amount) => {
                errors.add("amount", out_of_range());
                None
            }
            Some(Some(amount)) if amount <= BigDecimal::from(0) => {
                errors.add("amount", "must be greater than 0");
                None
            }
            Some(Some(amount)) => Some(amount),
        };

        let payment_type = match self.payment_type.as_deref().map(PaymentType::from_str) {
            None => {
                errors.add("paymentType", "must not be null");
                None
            }
            Some(Err(_)) => {
                errors.add("paymentType", "must be one of CASH, CARD, TRANSFER");
                None
            }
            Some(Ok(payment_type)) => Some(payment_type),
        };

        match (self.seller_id, amount, payment_type) {
            (Some(seller_id), Some(amount), Some(payment_type)) if errors.0.is_empty() => {
                Ok(ValidTransaction {
                    seller_id,
                    amount,
                    payment_type,
                })
            }
            _ => Err(ApiError::Validation(errors.0)),
        }
    }
}

/// Accepts both JSON numbers and numeric strings, keeping the written digits.
fn parse_amount(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(number) => BigDecimal::from_str(&number.to_string()).ok(),
        Value::String(text) => BigDecimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

/// Money is limited to 38 integer and 18 fraction digits, whatever the exponent.
fn within_money_bounds(value: &BigDecimal) -> bool {
    let (_, scale) = value.as_bigint_and_exponent();
    let scale = i128::from(scale);
    let integer_digits = i128::from(value.digits()) - scale;
    scale <= MAX_FRACTION_DIGITS && integer_digits <= MAX_INTEGER_DIGITS
}

fn out_of_range() -> String {
    format!(
        "must have at most {} integer and {} fraction digits",
        MAX_INTEGER_DIGITS, MAX_FRACTION_DIGITS
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdQuery {
    pub summa: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

pub struct ValidThresholdQuery {
    pub summa: BigDecimal,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl ThresholdQuery {
    pub fn validate(self) -> Result<ValidThresholdQuery, ApiError> {
        let mut errors = Errors::default();

        let summa = match self.summa.as_deref().map(|s| BigDecimal::from_str(s.trim())) {
            None => {
                errors.add("summa", "is required");
                None
            }
            Some(Err(_)) => {
                errors.add("summa", "must be a decimal number");
                None
            }
            Some(Ok(summa)) if !within_money_bounds(&summa) => {
                errors.add("summa", out_of_range());
                None
            }
            Some(Ok(summa)) => Some(summa),
        };
        let date_from = parse_date(&mut errors, "dateFrom", self.date_from.as_deref());
        let date_to = parse_date(&mut errors, "dateTo", self.date_to.as_deref());

        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                errors.add("dateFrom", "must not be after dateTo");
            }
        }

        match (summa, date_from, date_to) {
            (Some(summa), Some(date_from), Some(date_to)) if errors.0.is_empty() => {
                Ok(ValidThresholdQuery {
                    summa,
                    date_from,
                    date_to,
                })
            }
            _ => Err(ApiError::Validation(errors.0)),
        }
    }
}

fn parse_date(errors: &mut Errors, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    match value {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(text) => match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add(field, "must be an ISO date (YYYY-MM-DD)");
                None
            }
        },
    }
}
