//! HTTP-level tests for endpoints that do not reach the database.
//!
//! The pool connects lazily, so none of these need a running Postgres.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use oso_booking::{create_router, AppCache, AppState, Config};

fn app() -> Router {
    let config = Config {
        database_url: "postgres://localhost/oso_test".to_string(),
        ..Config::default()
    };
    let db = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();
    create_router(AppState::new(db, AppCache::new(), config))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn standard_resource() -> Value {
    json!({
        "category_code": "PR",
        "base_price": 100000,
        "base_guests": 4,
        "extra_guest_fee": 10000,
        "max_extra_guests": 2,
        "has_weekend_pricing": false
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn categories_lists_all_labels() {
    let (status, body) = send(app(), get("/api/pricing/categories")).await;
    assert_eq!(status, StatusCode::OK);

    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[0]["code"], "PR");
    assert_eq!(categories[0]["name"], "프라이빗룸");
    assert_eq!(categories[3]["name"], "VIP동");
}

#[tokio::test]
async fn calculate_with_extra_guests() {
    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": standard_resource(),
            "time_slot": {"price_multiplier": 1.0},
            "reservation_date": "2025-03-19",
            "guest_count": 6
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extra_guests"], 2);
    assert_eq!(body["extra_fee_total"]["amount"], "20000");
    assert_eq!(body["final_price"]["amount"], "120000");
    assert_eq!(body["final_price"]["currency"], "KRW");
    assert_eq!(body["max_guests"], 6);
}

#[tokio::test]
async fn calculate_weekend_rate() {
    let mut resource = standard_resource();
    resource["has_weekend_pricing"] = json!(true);

    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": resource,
            "time_slot": {"price_multiplier": 1.0, "weekend_multiplier": 1.2},
            "reservation_date": "2025-03-15",
            "guest_count": 4
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_total"]["amount"], "120000");
    assert_eq!(body["is_weekend_rate"], true);
}

#[tokio::test]
async fn calculate_rejects_too_many_guests() {
    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": standard_resource(),
            "reservation_date": "2025-03-19",
            "guest_count": 7
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "occupancy_exceeded");
    assert_eq!(body["details"]["max_guests"], 6);
    assert!(body["message"].as_str().unwrap().contains('6'));
}

#[tokio::test]
async fn calculate_rejects_bad_date() {
    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": standard_resource(),
            "reservation_date": "03/19/2025",
            "guest_count": 2
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_date");
}

#[tokio::test]
async fn calculate_rejects_zero_guests() {
    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": standard_resource(),
            "reservation_date": "2025-03-19",
            "guest_count": 0
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_guest_count");
}

#[tokio::test]
async fn calculate_rejects_negative_amounts() {
    let mut resource = standard_resource();
    resource["base_price"] = json!("-100000");
    resource["extra_guest_fee"] = json!("-5000");

    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": resource,
            "reservation_date": "2025-03-19",
            "guest_count": 6
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_resource");
}

#[tokio::test]
async fn calculate_rejects_occupancy_overflow() {
    let mut resource = standard_resource();
    resource["base_guests"] = json!(i32::MAX);
    resource["max_extra_guests"] = json!(1);

    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": resource,
            "reservation_date": "2025-03-19",
            "guest_count": 2
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_resource");
}

#[tokio::test]
async fn calculate_rejects_amount_overflow() {
    let mut resource = standard_resource();
    resource["base_price"] = json!("79228162514264337593543950335");

    let request = post_json(
        "/api/pricing/calculate",
        json!({
            "resource": resource,
            "time_slot": {"price_multiplier": 2},
            "reservation_date": "2025-03-19",
            "guest_count": 2
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "amount_overflow");
}

#[tokio::test]
async fn quote_validates_date_before_lookup() {
    let request = post_json(
        "/api/pricing/quote",
        json!({"sku_code": "PR01-L", "reservation_date": "tomorrow", "guest_count": 2}),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_date");
}

#[tokio::test]
async fn cache_stats_start_empty() {
    let (status, body) = send(app(), get("/api/cache/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skus_size"], 0);
    assert_eq!(body["offered_cached"], false);
}
