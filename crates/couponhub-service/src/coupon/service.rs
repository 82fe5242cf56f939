//! Coupon administration and lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use couponhub_core::error::AppError;
use couponhub_core::result::AppResult;
use couponhub_core::types::pagination::{PageRequest, PageResponse};
use couponhub_database::CouponLedger;
use couponhub_entity::{Coupon, CreateCoupon, User};

use super::name::normalize_coupon_name;

/// Data for the administrative store operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCoupon {
    /// Coupon name as entered (normalized here).
    pub coupon_name: String,
    /// Total issued stock.
    pub amount: i64,
}

/// A coupon together with the users that have claimed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponDetail {
    /// The coupon row.
    pub coupon: Coupon,
    /// Users holding a claim, in claim order.
    pub claimed_by: Vec<User>,
}

/// Handles coupon administration and read paths.
#[derive(Debug, Clone)]
pub struct CouponService {
    /// Coupon ledger.
    ledger: Arc<dyn CouponLedger>,
}

impl CouponService {
    /// Create a new coupon service.
    pub fn new(ledger: Arc<dyn CouponLedger>) -> Self {
        Self { ledger }
    }

    /// Create a new coupon with its full stock available.
    pub async fn store(&self, input: &StoreCoupon) -> AppResult<Coupon> {
        let name = normalize_coupon_name(&input.coupon_name);
        if name.is_empty() {
            return Err(AppError::validation("Coupon name must not be empty"));
        }
        if input.amount <= 0 {
            return Err(AppError::validation("Coupon amount must be positive"));
        }

        if self.ledger.find_by_name(&name).await?.is_some() {
            return Err(AppError::business_rule(format!(
                "Create failed. Coupon with name '{name}' already exists."
            )));
        }

        let coupon = self
            .ledger
            .create_coupon(&CreateCoupon {
                name: name.clone(),
                amount: input.amount,
            })
            .await?;

        info!(coupon = %coupon.name, amount = coupon.amount, "Coupon created");
        Ok(coupon)
    }

    /// Look up a coupon by name, including its claimants.
    pub async fn detail(&self, raw_name: &str) -> AppResult<CouponDetail> {
        let name = normalize_coupon_name(raw_name);

        let coupon = self
            .ledger
            .find_by_name(&name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Coupon {name} not found")))?;

        let claimed_by = self.ledger.list_claimants(coupon.id).await?;
        Ok(CouponDetail { coupon, claimed_by })
    }

    /// List coupons, optionally filtered by a name substring.
    pub async fn filter(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Coupon>> {
        self.ledger.search(search, page).await
    }
}
