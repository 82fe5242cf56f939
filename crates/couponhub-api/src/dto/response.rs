//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use couponhub_entity::{Coupon, User};
use couponhub_service::CouponDetail;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Coupon summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponResponse {
    /// Coupon ID.
    pub id: Uuid,
    /// Normalized coupon name.
    pub name: String,
    /// Total issued stock.
    pub amount: i64,
    /// Cached unclaimed stock.
    pub remaining_amount: i64,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            id: coupon.id,
            name: coupon.name,
            amount: coupon.amount,
            remaining_amount: coupon.remaining_amount,
            created_at: coupon.created_at,
        }
    }
}

/// Coupon detail including claimants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponDetailResponse {
    /// The coupon.
    #[serde(flatten)]
    pub coupon: CouponResponse,
    /// Users holding a claim, in claim order.
    pub claimed_by: Vec<UserResponse>,
}

impl From<CouponDetail> for CouponDetailResponse {
    fn from(detail: CouponDetail) -> Self {
        Self {
            coupon: detail.coupon.into(),
            claimed_by: detail.claimed_by.into_iter().map(Into::into).collect(),
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

/// Health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Detailed health with backend reachability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database reachability.
    pub database: String,
    /// Lock store reachability.
    pub lock_store: String,
}
