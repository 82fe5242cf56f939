//! The coupon ledger: coupon stock records and claim records.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use couponhub_core::result::AppResult;
use couponhub_core::types::pagination::{PageRequest, PageResponse};
use couponhub_entity::{Claim, Coupon, CreateCoupon, User};

pub use memory::MemoryCouponLedger;
pub use postgres::PgCouponLedger;

/// Transactional repository over coupon stock and claim records.
///
/// `create_claim` is the only consumptive write path: it inserts the claim
/// row and conditionally decrements `remaining_amount` inside a single
/// transaction, so either both writes land or neither does. The conditional
/// decrement is an independent safety net beneath the per-coupon lock, not
/// a redundant check.
#[async_trait]
pub trait CouponLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Create a coupon with `remaining_amount = amount`.
    /// A taken name yields a conflict error.
    async fn create_coupon(&self, data: &CreateCoupon) -> AppResult<Coupon>;

    /// Find a coupon by its normalized name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Coupon>>;

    /// Find a coupon by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coupon>>;

    /// List coupons, optionally filtered by a name substring.
    async fn search(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Coupon>>;

    /// List the users that have claimed the coupon.
    async fn list_claimants(&self, coupon_id: Uuid) -> AppResult<Vec<User>>;

    /// Count claim rows for the coupon. This is the authoritative source
    /// for the cached `remaining_amount`.
    async fn count_claims(&self, coupon_id: Uuid) -> AppResult<u64>;

    /// Find an existing claim for the (user, coupon) pair.
    async fn find_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Option<Claim>>;

    /// Insert a claim row and decrement the coupon's remaining stock, in
    /// one transaction.
    ///
    /// Fails with a conflict error if the pair is already claimed or if
    /// the conditional decrement matches no row (stock exhausted by a
    /// writer the lock should have excluded); both cases roll back the
    /// insert.
    async fn create_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Claim>;

    /// Unconditionally overwrite the cached remaining stock. Used only by
    /// the resync reconciler.
    async fn update_remaining(&self, coupon_id: Uuid, remaining: i64) -> AppResult<()>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
