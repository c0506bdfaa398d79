use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    analytics::Period,
    api::{
        error::ApiError,
        payload::{NewSellerPayload, NewTransactionPayload, ThresholdQuery, UpdateSellerPayload},
        AppState,
    },
    service::ServiceError,
    types::{BestPeriod, Seller, Transaction},
};

/// Numeric `:id` path segment; a malformed id is answered with the JSON problem body.
#[derive(Debug, Clone, Copy)]
pub struct Id(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Id {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(Id(id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerResponse {
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

impl SellerResponse {
    fn with_transactions(seller: Seller) -> Self {
        Self {
            id: seller.id,
            name: seller.name,
            contact_info: seller.contact_info,
            registration_date: seller.registration_date,
            transactions: Some(seller.transactions),
        }
    }
}

impl From<Seller> for SellerResponse {
    fn from(seller: Seller) -> Self {
        Self {
            transactions: None,
            ..Self::with_transactions(seller)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    #[serde(default)]
    pub transactions: bool,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// # GET /seller
pub async fn get_all_sellers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SellerResponse>>, ApiError> {
    let sellers = state.sellers.find_all_sellers().await?;
    Ok(Json(sellers.into_iter().map(SellerResponse::from).collect()))
}

/// # GET /seller/:id
/// Transactions are included only with `?transactions=true`.
pub async fn get_seller(
    Id(id): Id,
    Query(query): Query<SellerQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SellerResponse>, ApiError> {
    let seller = state
        .sellers
        .find_seller(id)
        .await?
        .ok_or(ServiceError::SellerNotFound(id))?;

    Ok(Json(if query.transactions {
        SellerResponse::with_transactions(seller)
    } else {
        SellerResponse::from(seller)
    }))
}

/// # POST /seller
pub async fn create_seller(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSellerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = payload.validate()?;
    let seller = state.sellers.create_seller(valid.name, valid.contact_info).await?;
    Ok((StatusCode::CREATED, Json(SellerResponse::from(seller))))
}

/// # PUT /seller/:id
pub async fn update_seller(
    Id(id): Id,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSellerPayload>,
) -> Result<StatusCode, ApiError> {
    let payload = payload.validate()?;
    state
        .sellers
        .update_seller(id, payload.name, payload.contact_info)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # DELETE /seller/:id
pub async fn delete_seller(
    Id(id): Id,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.sellers.delete_seller(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /seller/less-then-summa?summa=&dateFrom=&dateTo=
pub async fn get_sellers_under_threshold(
    Query(query): Query<ThresholdQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SellerResponse>>, ApiError> {
    let query = query.validate()?;
    let sellers = state
        .sellers
        .sellers_under_threshold(query.summa, query.date_from, query.date_to)
        .await?;
    Ok(Json(sellers.into_iter().map(SellerResponse::from).collect()))
}

/// # GET /seller/most-productive?period=
pub async fn get_most_productive_seller(
    Query(query): Query<PeriodQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SellerResponse>, ApiError> {
    let raw = query.period.unwrap_or_default();
    let period: Period = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid period: {}", raw)))?;

    let seller = state.sellers.most_productive_seller(period).await?;
    Ok(Json(SellerResponse::from(seller)))
}

/// # GET /seller/:id/best-period
pub async fn get_best_period(
    Id(id): Id,
    State(state): State<Arc<AppState>>,
) -> Result<Json<BestPeriod>, ApiError> {
    Ok(Json(state.sellers.best_period(id).await?))
}

/// # GET /transaction
pub async fn get_all_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.transactions.find_all_transactions().await?))
}

/// # GET /transaction/:id
pub async fn get_transaction(
    Id(id): Id,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(state.transactions.find_transaction(id).await?))
}

/// # POST /transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = payload.validate()?;
    let transaction = state
        .transactions
        .create_transaction(valid.seller_id, valid.amount, valid.payment_type)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
