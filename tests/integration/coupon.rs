//! Integration tests for coupon administration, lookup, and health.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_store_normalizes_and_fills_stock() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/api/coupons",
            Some(serde_json::json!({ "coupon_name": "  black friday!! ", "amount": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "BLACK_FRIDAY");
    assert_eq!(body["data"]["amount"], 10);
    assert_eq!(body["data"]["remaining_amount"], 10);
}

#[tokio::test]
async fn test_store_rejects_duplicate_names() {
    let app = TestApp::new();
    app.create_test_coupon("PROMO", 5).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/coupons",
            Some(serde_json::json!({ "coupon_name": "promo", "amount": 5 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE");
}

#[tokio::test]
async fn test_store_rejects_non_positive_amount() {
    let app = TestApp::new();

    let (status, _) = app
        .request(
            "POST",
            "/api/coupons",
            Some(serde_json::json!({ "coupon_name": "PROMO", "amount": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_lists_claimants() {
    let app = TestApp::new();
    app.create_test_user("alice").await;
    app.create_test_coupon("PROMO", 5).await;
    app.claim("alice", "PROMO").await;

    let (status, body) = app.request("GET", "/api/coupons/PROMO", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["claimed_by"][0]["username"], "alice");
}

#[tokio::test]
async fn test_listing_filters_by_search() {
    let app = TestApp::new();
    app.create_test_coupon("SUMMER_SALE", 5).await;
    app.create_test_coupon("WINTER_SALE", 5).await;

    let (status, body) = app.request("GET", "/api/coupons?search=SUMMER", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "SUMMER_SALE");
}

#[tokio::test]
async fn test_user_registration_and_lookup() {
    let app = TestApp::new();
    app.create_test_user("carol").await;

    let (status, body) = app.request("GET", "/api/users/carol", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "carol");

    let (status, _) = app.request("GET", "/api/users/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.request("GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = app.request("GET", "/api/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "connected");
    assert_eq!(body["data"]["lock_store"], "connected");
}

#[tokio::test]
async fn test_responses_carry_a_correlation_id() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(axum::body::Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-correlation-id"));
}
