use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Invalid request")]
    Validation(BTreeMap<String, String>),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Path(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail, errors) = match self {
            ApiError::Service(err) => {
                let status = match &err {
                    ServiceError::SellerNotFound(_)
                    | ServiceError::NoActiveSeller(_)
                    | ServiceError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::HistoryTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::Store(store_err) => {
                        tracing::error!(error = ?store_err, "Storage error.");
                        return problem(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "An internal storage error occurred".to_string(),
                            None,
                        );
                    }
                };
                (status, err.to_string(), None)
            }
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "Invalid request".to_string(), Some(errors))
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::Path(rejection) => (rejection.status(), rejection.body_text(), None),
        };

        problem(status, detail, errors)
    }
}

fn problem(status: StatusCode, detail: String, errors: Option<BTreeMap<String, String>>) -> Response {
    let mut body = json!({
        "status": status.as_u16(),
        "detail": detail,
    });
    if let Some(errors) = errors {
        body["errors"] = json!(errors);
    }
    (status, Json(body)).into_response()
}
