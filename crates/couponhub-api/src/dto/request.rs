//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Claim request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClaimCouponRequest {
    /// The claiming user's username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// The coupon to claim.
    #[validate(length(min = 1, message = "Coupon name is required"))]
    pub coupon_name: String,
}

/// Coupon store (create) request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreCouponRequest {
    /// Coupon name.
    #[validate(length(min = 1, message = "Coupon name is required"))]
    pub coupon_name: String,
    /// Total issued stock.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

/// Coupon listing query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCouponQuery {
    /// Optional name substring filter.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// User registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// Display name (optional).
    pub display_name: Option<String>,
}
