//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use couponhub_database::CouponLedger;
use couponhub_lock::LockCoordinator;
use couponhub_service::{ClaimService, CouponService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Coupon administration and read paths.
    pub coupon_service: Arc<CouponService>,
    /// The claim orchestrator.
    pub claim_service: Arc<ClaimService>,
    /// User registration and lookup.
    pub user_service: Arc<UserService>,
    /// Coupon ledger, exposed for health checks.
    pub ledger: Arc<dyn CouponLedger>,
    /// Lock coordinator, exposed for health checks.
    pub lock_coordinator: LockCoordinator,
}
