//! Cart validation endpoint tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use parisa_integration_tests::{ManualClockLimiter, test_app, test_app_with_limiter, validate_cart};
use parisa_storefront::config::RateLimitConfig;
use serde_json::json;

const SHOPPER: &str = "198.51.100.7:40000";

#[tokio::test]
async fn test_server_prices_replace_client_prices() {
    let body = json!({
        "items": [
            {"id": "kal-ring-001", "name": "Cheap Ring", "price": 1, "quantity": 2},
            {"id": "kal-earring-002", "price": 0, "quantity": 1}
        ]
    })
    .to_string();

    let response = validate_cart(test_app(), &body, SHOPPER).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.cache_control.as_deref(), Some("no-store, max-age=0"));
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["total"], 285_000 * 2 + 198_000);

    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items[0]["name"], "Persian Turquoise Ring");
    assert_eq!(items[0]["price"], 285_000);
    assert_eq!(items[0]["collection"], "kaleidoscope");
    assert_eq!(items[1]["image"], "/images/product.jpg");
}

#[tokio::test]
async fn test_insufficient_stock_rejects_whole_cart() {
    let body = json!({
        "items": [
            {"id": "kal-earring-002", "quantity": 1},
            {"id": "kal-ring-001", "quantity": 3}
        ]
    })
    .to_string();

    let response = validate_cart(test_app(), &body, SHOPPER).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.body.get("items").is_none());
    assert!(
        response.body["error"]
            .as_str()
            .unwrap()
            .contains("Persian Turquoise Ring")
    );
}

#[tokio::test]
async fn test_out_of_stock_product_is_named() {
    let body = json!({"items": [{"id": "her-ring-002", "quantity": 1}]}).to_string();

    let response = validate_cart(test_app(), &body, SHOPPER).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Product \"Heritage Signet Ring\" is not available in requested quantity"
    );
}

#[tokio::test]
async fn test_unknown_products_are_dropped_silently() {
    let body = json!({
        "items": [
            {"id": "does-not-exist", "quantity": 1},
            {"id": "kal-earring-002", "quantity": "2"}
        ]
    })
    .to_string();

    let response = validate_cart(test_app(), &body, SHOPPER).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["total"], 198_000 * 2);
}

#[tokio::test]
async fn test_quantity_is_clamped_to_ten() {
    let body = json!({"items": [{"id": "kal-earring-002", "quantity": 50}]}).to_string();

    let response = validate_cart(test_app(), &body, SHOPPER).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"][0]["quantity"], 10);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let app = test_app();
    for body in [r#"{"items": "kal-ring-001"}"#, "{}", "not json at all"] {
        let response = validate_cart(app.clone(), body, SHOPPER).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response.body["error"], "Invalid cart items format");
    }
}

#[tokio::test]
async fn test_twenty_first_request_is_throttled() {
    let app = test_app();
    let body = json!({"items": []}).to_string();

    for _ in 0..20 {
        let response = validate_cart(app.clone(), &body, SHOPPER).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = validate_cart(app.clone(), &body, SHOPPER).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["success"], false);
    assert_eq!(
        response.body["error"],
        "Rate limit exceeded. Please try again later."
    );

    // Other shoppers are unaffected
    let response = validate_cart(app, &body, "203.0.113.50:40000").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_first_request_after_window_succeeds() {
    let limiter = Arc::new(ManualClockLimiter::new(RateLimitConfig::default()));
    let app = test_app_with_limiter(limiter.clone());
    let body = json!({"items": [{"id": "kal-earring-002", "quantity": 1}]}).to_string();

    for _ in 0..20 {
        validate_cart(app.clone(), &body, SHOPPER).await;
    }
    let response = validate_cart(app.clone(), &body, SHOPPER).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    limiter.advance(Duration::from_secs(61));

    let response = validate_cart(app, &body, SHOPPER).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 198_000);
}

#[tokio::test]
async fn test_forwarded_address_is_the_rate_limit_key() {
    let limiter = Arc::new(ManualClockLimiter::new(RateLimitConfig {
        max_requests: 1,
        ..RateLimitConfig::default()
    }));
    let app = test_app_with_limiter(limiter);
    let body = json!({"items": []}).to_string();

    // Same socket peer, but a proxy header identifies different shoppers
    let first = parisa_integration_tests::send_with_headers(
        app.clone(),
        "/api/validate-cart",
        &body,
        &[("x-forwarded-for", "192.0.2.1")],
    )
    .await;
    let second = parisa_integration_tests::send_with_headers(
        app,
        "/api/validate-cart",
        &body,
        &[("x-forwarded-for", "192.0.2.2")],
    )
    .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
}
