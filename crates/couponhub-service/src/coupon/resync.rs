//! Reconciliation of the cached remaining stock against claim rows.

use std::sync::Arc;

use tracing::{debug, info};

use couponhub_core::result::AppResult;
use couponhub_database::CouponLedger;
use couponhub_entity::Coupon;

/// Recomputes a coupon's remaining stock from its claim rows.
///
/// `remaining_amount` exists purely so that read paths (listings, detail
/// views) do not count claim rows; it can drift from aborted transactions,
/// manual data edits, or migrations. The reconciler runs once per claim
/// attempt, under the same per-coupon lock that serializes decrements, so
/// the cache self-heals exactly when correctness matters.
#[derive(Debug, Clone)]
pub struct StockReconciler {
    /// Coupon ledger.
    ledger: Arc<dyn CouponLedger>,
}

impl StockReconciler {
    /// Create a new reconciler over the given ledger.
    pub fn new(ledger: Arc<dyn CouponLedger>) -> Self {
        Self { ledger }
    }

    /// Bring the coupon's cached remaining stock in line with the
    /// authoritative value `amount - count(claims)`.
    ///
    /// Persists the corrected value and updates `coupon` in place before
    /// returning. Must be called while holding the coupon's claim lock.
    pub async fn resync(&self, coupon: &mut Coupon) -> AppResult<()> {
        let claim_count = self
            .ledger
            .count_claims(coupon.id)
            .await
            .map_err(|e| e.context("resyncing remaining stock"))?;
        let actual = coupon.amount.saturating_sub(claim_count as i64).max(0);

        if actual != coupon.remaining_amount {
            info!(
                coupon = %coupon.name,
                amount = coupon.amount,
                cached = coupon.remaining_amount,
                claim_count,
                actual,
                "Remaining stock drifted, resyncing"
            );
            self.ledger
                .update_remaining(coupon.id, actual)
                .await
                .map_err(|e| e.context("resyncing remaining stock"))?;
            coupon.remaining_amount = actual;
        } else {
            debug!(coupon = %coupon.name, remaining = coupon.remaining_amount, "Remaining stock is consistent");
        }

        Ok(())
    }
}
