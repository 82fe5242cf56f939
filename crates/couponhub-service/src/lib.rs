//! # couponhub-service
//!
//! Business logic service layer for CouponHub. Each service orchestrates
//! the ledger, user directory, and lock coordinator to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod coupon;
pub mod user;

pub use coupon::{
    ClaimCoupon, ClaimService, CouponDetail, CouponService, StockReconciler, StoreCoupon,
};
pub use user::UserService;
