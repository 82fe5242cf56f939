//! Claim entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A record that one user has redeemed one coupon.
///
/// At most one claim exists per `(user_id, coupon_id)` pair. Claims are
/// created only inside the claim orchestrator's critical section and are
/// never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    /// Unique claim identifier.
    pub id: Uuid,
    /// The claiming user.
    pub user_id: Uuid,
    /// The claimed coupon.
    pub coupon_id: Uuid,
    /// When the claim was created.
    pub created_at: DateTime<Utc>,
}
