//! The claim protocol: lock, resync, validate, write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use couponhub_core::error::AppError;
use couponhub_core::result::AppResult;
use couponhub_database::{CouponLedger, UserDirectory};
use couponhub_lock::{LockCoordinator, LockOptions, keys};

use super::name::normalize_coupon_name;
use super::resync::StockReconciler;

/// A claim request: which user redeems which coupon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimCoupon {
    /// The claiming user's username.
    pub username: String,
    /// The coupon name as entered by the client (normalized here).
    pub coupon_name: String,
}

/// Orchestrates one claim attempt.
///
/// All attempts for the same coupon serialize through a per-coupon lease
/// in the coordination store, so the sequence below runs exclusively per
/// coupon across every service replica. The ledger's conditional decrement
/// stays in place beneath the lock as an independent safety net.
#[derive(Debug, Clone)]
pub struct ClaimService {
    /// Coupon ledger.
    ledger: Arc<dyn CouponLedger>,
    /// User directory.
    users: Arc<dyn UserDirectory>,
    /// Stock reconciler, run inside the lock on every attempt.
    reconciler: StockReconciler,
    /// Lock coordinator.
    coordinator: LockCoordinator,
    /// Acquisition options for claim leases.
    lock_options: LockOptions,
}

impl ClaimService {
    /// Create a new claim service.
    pub fn new(
        ledger: Arc<dyn CouponLedger>,
        users: Arc<dyn UserDirectory>,
        coordinator: LockCoordinator,
        lock_options: LockOptions,
    ) -> Self {
        Self {
            reconciler: StockReconciler::new(Arc::clone(&ledger)),
            ledger,
            users,
            coordinator,
            lock_options,
        }
    }

    /// Claim a coupon for a user.
    ///
    /// Exactly one terminal success path; every failure is returned as a
    /// typed error. Nothing in here retries business logic — only lock
    /// acquisition retries, inside the coordinator.
    pub async fn claim(&self, input: &ClaimCoupon) -> AppResult<()> {
        let name = normalize_coupon_name(&input.coupon_name);
        if name.is_empty() {
            return Err(AppError::validation("Coupon name must not be empty"));
        }

        info!(username = %input.username, coupon = %name, "Claiming coupon");

        let key = keys::coupon_claim(&name);
        self.coordinator
            .with_lock_opts(&key, &self.lock_options, || self.claim_locked(&name, input))
            .await
    }

    /// The critical section: runs while holding the coupon's claim lease.
    async fn claim_locked(&self, name: &str, input: &ClaimCoupon) -> AppResult<()> {
        let mut coupon = self
            .ledger
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coupon {name} not found")))?;

        self.reconciler.resync(&mut coupon).await?;

        debug!(coupon = %coupon.name, remaining = coupon.remaining_amount, "Checking usability");
        if !coupon.is_usable() {
            warn!(coupon = %coupon.name, "Coupon is not usable");
            return Err(AppError::business_rule(format!(
                "Coupon {} is not usable because no stock remaining",
                coupon.name
            )));
        }

        let user = self
            .users
            .find_by_username(&input.username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", input.username)))?;

        if let Some(existing) = self.ledger.find_claim(user.id, coupon.id).await? {
            warn!(
                coupon = %coupon.name,
                username = %user.username,
                claim_id = %existing.id,
                "Coupon already claimed"
            );
            return Err(AppError::conflict(format!(
                "Coupon {} is already claimed by user {}",
                coupon.name, user.username
            )));
        }

        let claim = self.ledger.create_claim(user.id, coupon.id).await?;
        info!(
            coupon = %coupon.name,
            username = %user.username,
            claim_id = %claim.id,
            "Coupon claimed"
        );
        Ok(())
    }
}
