use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::service::{SellerService, TransactionService};

pub mod error;
pub mod handlers;
pub mod payload;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub sellers: SellerService,
    pub transactions: TransactionService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/seller",
            get(handlers::get_all_sellers).post(handlers::create_seller),
        )
        .route(
            "/seller/less-then-summa",
            get(handlers::get_sellers_under_threshold),
        )
        .route(
            "/seller/most-productive",
            get(handlers::get_most_productive_seller),
        )
        .route(
            "/seller/:id",
            get(handlers::get_seller)
                .put(handlers::update_seller)
                .delete(handlers::delete_seller),
        )
        .route("/seller/:id/best-period", get(handlers::get_best_period))
        .route(
            "/transaction",
            get(handlers::get_all_transactions).post(handlers::create_transaction),
        )
        .route("/transaction/:id", get(handlers::get_transaction))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sales analytics API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analytics::FixedClock,
        config::AnalyticsConfig,
        database::{InMemoryStore, NewSeller, NewTransaction, SalesStore},
        types::PaymentType,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, TimeZone, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::str::FromStr;
    use tower::ServiceExt;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 20, 12, 0, 0).unwrap()
    }

    fn create_test_app(store: Arc<InMemoryStore>) -> Router {
        let clock = Arc::new(FixedClock(now()));
        let state = AppState {
            sellers: SellerService::new(store.clone(), clock.clone(), AnalyticsConfig::default()),
            transactions: TransactionService::new(store, clock),
        };
        router(Arc::new(state))
    }

    async fn seed(store: &InMemoryStore, name: &str, sales: &[(&str, DateTime<Utc>)]) -> i32 {
        let seller = store
            .create_seller(NewSeller {
                name: name.to_string(),
                contact_info: Some("123-123-123".to_string()),
                registration_date: now(),
            })
            .await
            .unwrap();
        for (amount, when) in sales {
            store
                .create_transaction(NewTransaction {
                    seller_id: seller.id,
                    amount: BigDecimal::from_str(amount).unwrap(),
                    payment_type: PaymentType::Cash,
                    transaction_date: *when,
                })
                .await
                .unwrap();
        }
        seller.id
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_seller() {
        let store = Arc::new(InMemoryStore::new());
        let app = create_test_app(store);

        let (status, body) = send(
            app.clone(),
            post_json("/seller", json!({ "name": "Alexander M", "contactInfo": "123-123-123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Alexander M");
        assert!(body.get("transactions").is_none());

        let id = body["id"].as_i64().unwrap();
        let (status, body) = send(app, get(&format!("/seller/{}?transactions=true", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_seller_payload() {
        let app = create_test_app(Arc::new(InMemoryStore::new()));

        let (status, body) = send(app, post_json("/seller", json!({ "name": "Al" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["name"].is_string());
    }

    #[tokio::test]
    async fn test_missing_seller_is_not_found() {
        let app = create_test_app(Arc::new(InMemoryStore::new()));

        let (status, body) = send(app, get("/seller/7")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Seller with id '7' not found");
    }

    #[tokio::test]
    async fn test_malformed_id_returns_problem_body() {
        let app = create_test_app(Arc::new(InMemoryStore::new()));

        for uri in ["/seller/abc", "/seller/abc/best-period", "/transaction/1.5"] {
            let (status, body) = send(app.clone(), get(uri)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["status"], 400);
            assert!(body["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn test_less_then_summa_rejects_huge_exponent() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, "Seller C", &[("5.61", now())]).await;
        let app = create_test_app(store);

        let (status, body) = send(
            app,
            get("/seller/less-then-summa?summa=1e2000000&dateFrom=2024-09-01&dateTo=2024-09-30"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["summa"].is_string());
    }

    #[tokio::test]
    async fn test_less_then_summa() {
        let store = Arc::new(InMemoryStore::new());
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 9, d, 10, 0, 0).unwrap();
        seed(&store, "Seller A", &[("500.12", day(1)), ("100.50", day(2)), ("325.51", day(3))]).await;
        seed(&store, "Seller B", &[("12.53", day(4)), ("52.78", day(5))]).await;
        let c = seed(&store, "Seller C", &[("5.61", day(6))]).await;
        let app = create_test_app(store);

        let (status, body) = send(
            app,
            get("/seller/less-then-summa?summa=58.12&dateFrom=2024-09-01&dateTo=2024-09-30"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], c);
    }

    #[tokio::test]
    async fn test_most_productive() {
        let store = Arc::new(InMemoryStore::new());
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 9, d, 10, 0, 0).unwrap();
        seed(&store, "Seller A", &[("10", day(2))]).await;
        let b = seed(&store, "Seller B", &[("20", day(3))]).await;
        let app = create_test_app(store);

        let (status, body) = send(app.clone(), get("/seller/most-productive?period=month")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], b);

        let (status, body) = send(app.clone(), get("/seller/most-productive?period=day")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Seller with period 'DAY' not found");

        let (status, _) = send(app, get("/seller/most-productive?period=week")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_best_period_endpoint() {
        let store = Arc::new(InMemoryStore::new());
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();
        let id = seed(&store, "Seller A", &[("1", at(1, 9)), ("1", at(10, 9)), ("1", at(11, 9))]).await;
        let app = create_test_app(store);

        let (status, body) = send(app, get(&format!("/seller/{}/best-period", id))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "start": "2024-01-10", "end": "2024-01-11", "count": 2 }));
    }

    #[tokio::test]
    async fn test_transaction_endpoints() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, "Seller A", &[]).await;
        let app = create_test_app(store);

        let (status, body) = send(
            app.clone(),
            post_json("/transaction", json!({ "sellerId": id, "amount": "25.50", "paymentType": "cash" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["paymentType"], "CASH");
        assert_eq!(body["sellerId"], id);

        let (status, _) = send(
            app.clone(),
            post_json("/transaction", json!({ "sellerId": 99, "amount": 1, "paymentType": "CARD" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(app.clone(), get("/transaction/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Transaction with id 42 was not found");

        let (status, body) = send(app, get("/transaction")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_seller() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, "Seller A", &[("5", now())]).await;
        let app = create_test_app(store.clone());

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/seller/{}", id))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "name": "Seller Z" }).to_string()))
            .unwrap();
        let (status, _) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.find_seller(id).await.unwrap().unwrap().name, "Seller Z");

        let delete = |uri: String| Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap();
        let (status, _) = send(app.clone(), delete(format!("/seller/{}", id))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(app, delete(format!("/seller/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(store.find_all_transactions().await.unwrap().is_empty());
    }
}
