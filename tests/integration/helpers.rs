//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use couponhub_api::{AppState, build_router};
use couponhub_database::{CouponLedger, MemoryCouponLedger, MemoryUserDirectory, UserDirectory};
use couponhub_lock::{LockCoordinator, LockOptions, MemoryLeaseStore};
use couponhub_service::{ClaimService, CouponService, UserService};

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
}

impl TestApp {
    /// Create a new test application over in-memory backends.
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserDirectory::new());
        let ledger = Arc::new(MemoryCouponLedger::new(users.clone()));

        let lock_options = LockOptions::default()
            .with_retry_count(20)
            .with_retry_delay(Duration::from_millis(5));
        let coordinator =
            LockCoordinator::new(Arc::new(MemoryLeaseStore::new()), lock_options.clone());

        let ledger: Arc<dyn CouponLedger> = ledger;
        let users: Arc<dyn UserDirectory> = users;

        let state = AppState {
            coupon_service: Arc::new(CouponService::new(Arc::clone(&ledger))),
            claim_service: Arc::new(ClaimService::new(
                Arc::clone(&ledger),
                Arc::clone(&users),
                coordinator.clone(),
                lock_options,
            )),
            user_service: Arc::new(UserService::new(Arc::clone(&users))),
            ledger,
            lock_coordinator: coordinator,
        };

        Self {
            router: build_router(state),
        }
    }

    /// Issue a request and return the status with the parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };

        (status, json)
    }

    /// Register a user, panicking on failure.
    pub async fn create_test_user(&self, username: &str) {
        let (status, _) = self
            .request(
                "POST",
                "/api/users",
                Some(serde_json::json!({ "username": username })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    /// Create a coupon, panicking on failure.
    pub async fn create_test_coupon(&self, name: &str, amount: i64) {
        let (status, _) = self
            .request(
                "POST",
                "/api/coupons",
                Some(serde_json::json!({ "coupon_name": name, "amount": amount })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    /// Attempt a claim and return the response.
    pub async fn claim(&self, username: &str, coupon_name: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/coupons/claim",
            Some(serde_json::json!({
                "username": username,
                "coupon_name": coupon_name,
            })),
        )
        .await
    }
}
