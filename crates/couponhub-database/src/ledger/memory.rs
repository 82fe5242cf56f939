//! In-memory coupon ledger using a Tokio mutex.
//!
//! Holds the whole ledger behind one mutex; a mutation under the guard is
//! the transaction. Suitable for single-node demos and the hermetic test
//! suites.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use couponhub_core::error::AppError;
use couponhub_core::result::AppResult;
use couponhub_core::types::pagination::{PageRequest, PageResponse};
use couponhub_entity::{Claim, Coupon, CreateCoupon, User};

use super::CouponLedger;
use crate::users::UserDirectory;

/// Internal ledger state.
#[derive(Debug, Default)]
struct State {
    /// Coupons by id.
    coupons: HashMap<Uuid, Coupon>,
    /// Claim rows in insertion order.
    claims: Vec<Claim>,
}

/// In-memory coupon ledger.
#[derive(Debug, Clone)]
pub struct MemoryCouponLedger {
    /// Protected ledger state.
    state: Arc<Mutex<State>>,
    /// User directory for claimant resolution.
    users: Arc<dyn UserDirectory>,
}

impl MemoryCouponLedger {
    /// Create an empty ledger resolving claimants through `users`.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            users,
        }
    }
}

#[async_trait]
impl CouponLedger for MemoryCouponLedger {
    async fn create_coupon(&self, data: &CreateCoupon) -> AppResult<Coupon> {
        let mut state = self.state.lock().await;

        if state.coupons.values().any(|c| c.name == data.name) {
            return Err(AppError::conflict(format!(
                "Coupon '{}' already exists",
                data.name
            )));
        }

        let now = Utc::now();
        let coupon = Coupon {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            amount: data.amount,
            remaining_amount: data.amount,
            created_at: now,
            updated_at: now,
        };
        state.coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Coupon>> {
        let state = self.state.lock().await;
        Ok(state.coupons.values().find(|c| c.name == name).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coupon>> {
        let state = self.state.lock().await;
        Ok(state.coupons.get(&id).cloned())
    }

    async fn search(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Coupon>> {
        let state = self.state.lock().await;

        let needle = search.map(|s| s.to_uppercase());
        let mut matches: Vec<Coupon> = state
            .coupons
            .values()
            .filter(|c| match &needle {
                Some(needle) => c.name.contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len() as u64;
        let items: Vec<Coupon> = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn list_claimants(&self, coupon_id: Uuid) -> AppResult<Vec<User>> {
        let user_ids: Vec<Uuid> = {
            let state = self.state.lock().await;
            state
                .claims
                .iter()
                .filter(|c| c.coupon_id == coupon_id)
                .map(|c| c.user_id)
                .collect()
        };

        let mut claimants = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.users.find_by_id(user_id).await? {
                claimants.push(user);
            }
        }
        Ok(claimants)
    }

    async fn count_claims(&self, coupon_id: Uuid) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .claims
            .iter()
            .filter(|c| c.coupon_id == coupon_id)
            .count() as u64)
    }

    async fn find_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Option<Claim>> {
        let state = self.state.lock().await;
        Ok(state
            .claims
            .iter()
            .find(|c| c.user_id == user_id && c.coupon_id == coupon_id)
            .cloned())
    }

    async fn create_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Claim> {
        let mut state = self.state.lock().await;

        if state
            .claims
            .iter()
            .any(|c| c.user_id == user_id && c.coupon_id == coupon_id)
        {
            return Err(AppError::conflict("Coupon is already claimed by this user"));
        }

        let coupon = state
            .coupons
            .get_mut(&coupon_id)
            .ok_or_else(|| AppError::not_found(format!("Coupon {coupon_id} not found")))?;

        if coupon.remaining_amount <= 0 {
            return Err(AppError::conflict("Coupon stock exhausted during claim"));
        }
        coupon.remaining_amount -= 1;
        coupon.updated_at = Utc::now();

        let claim = Claim {
            id: Uuid::new_v4(),
            user_id,
            coupon_id,
            created_at: Utc::now(),
        };
        state.claims.push(claim.clone());
        Ok(claim)
    }

    async fn update_remaining(&self, coupon_id: Uuid, remaining: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let coupon = state
            .coupons
            .get_mut(&coupon_id)
            .ok_or_else(|| AppError::not_found(format!("Coupon {coupon_id} not found")))?;
        coupon.remaining_amount = remaining;
        coupon.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
