//! Integration tests for the claim endpoint.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_claim_succeeds_and_reports_message() {
    let app = TestApp::new();
    app.create_test_user("alice").await;
    app.create_test_coupon("SUMMER10", 1).await;

    let (status, body) = app.claim("alice", "SUMMER10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["message"],
        "Coupon SUMMER10 is successfully claimed by user alice."
    );
}

#[tokio::test]
async fn test_second_claim_conflicts() {
    let app = TestApp::new();
    app.create_test_user("alice").await;
    app.create_test_coupon("SUMMER10", 5).await;

    let (status, _) = app.claim("alice", "SUMMER10").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.claim("alice", "SUMMER10").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_exhausted_coupon_rejects_with_business_rule() {
    let app = TestApp::new();
    app.create_test_user("alice").await;
    app.create_test_user("bob").await;
    app.create_test_coupon("SINGLE", 1).await;

    let (status, _) = app.claim("alice", "SINGLE").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.claim("bob", "SINGLE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BUSINESS_RULE");
}

#[tokio::test]
async fn test_unknown_coupon_is_404() {
    let app = TestApp::new();
    app.create_test_user("alice").await;

    let (status, body) = app.claim("alice", "NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = TestApp::new();
    app.create_test_coupon("SUMMER10", 1).await;

    let (status, _) = app.claim("nobody", "SUMMER10").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_username_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.claim("", "SUMMER10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_claim_normalizes_the_coupon_name() {
    let app = TestApp::new();
    app.create_test_user("alice").await;
    app.create_test_coupon("summer 10", 1).await;

    let (status, _) = app.claim("alice", "  SUMMER--10  ").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", "/api/coupons/SUMMER_10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["remaining_amount"], 0);
}
