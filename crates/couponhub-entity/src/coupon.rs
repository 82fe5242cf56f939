//! Coupon entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stock-limited redeemable coupon.
///
/// `remaining_amount` is a performance cache; the authoritative value is
/// `amount - count(claims)` and the two are reconciled under the per-coupon
/// lock on every claim attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: Uuid,
    /// Unique normalized coupon name (e.g. `SUMMER_10`).
    pub name: String,
    /// Total issued stock.
    pub amount: i64,
    /// Cached unclaimed stock. Invariant: `0 <= remaining_amount <= amount`.
    pub remaining_amount: i64,
    /// When the coupon was created.
    pub created_at: DateTime<Utc>,
    /// When the coupon was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Check whether the coupon can still be claimed.
    pub fn is_usable(&self) -> bool {
        self.remaining_amount > 0
    }
}

/// Data required to create a new coupon.
///
/// The new coupon starts with `remaining_amount = amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoupon {
    /// Normalized coupon name.
    pub name: String,
    /// Total issued stock.
    pub amount: i64,
}
