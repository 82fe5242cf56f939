//! PostgreSQL coupon ledger implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use couponhub_core::error::{AppError, ErrorKind};
use couponhub_core::result::AppResult;
use couponhub_core::types::pagination::{PageRequest, PageResponse};
use couponhub_entity::{Claim, Coupon, CreateCoupon, User};

use super::CouponLedger;

/// Coupon ledger backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgCouponLedger {
    pool: PgPool,
}

impl PgCouponLedger {
    /// Create a new ledger over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponLedger for PgCouponLedger {
    async fn create_coupon(&self, data: &CreateCoupon) -> AppResult<Coupon> {
        sqlx::query_as::<_, Coupon>(
            "INSERT INTO coupons (name, amount, remaining_amount) \
             VALUES ($1, $2, $2) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(data.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("coupons_name_key") => {
                AppError::conflict(format!("Coupon '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create coupon", e),
        })
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find coupon by name", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find coupon by id", e)
            })
    }

    async fn search(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Coupon>> {
        let pattern = search.map(|s| format!("%{s}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM coupons WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count coupons", e))?;

        let coupons = sqlx::query_as::<_, Coupon>(
            "SELECT * FROM coupons WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list coupons", e))?;

        Ok(PageResponse::new(
            coupons,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_claimants(&self, coupon_id: Uuid) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u \
             JOIN claims c ON c.user_id = u.id \
             WHERE c.coupon_id = $1 \
             ORDER BY c.created_at ASC",
        )
        .bind(coupon_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list claimants", e))
    }

    async fn count_claims(&self, coupon_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE coupon_id = $1")
            .bind(coupon_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count claims", e))?;
        Ok(count as u64)
    }

    async fn find_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Option<Claim>> {
        sqlx::query_as::<_, Claim>("SELECT * FROM claims WHERE user_id = $1 AND coupon_id = $2")
            .bind(user_id)
            .bind(coupon_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find claim", e))
    }

    async fn create_claim(&self, user_id: Uuid, coupon_id: Uuid) -> AppResult<Claim> {
        // The insert and the decrement land together or not at all; the
        // transaction rolls back on drop if any step below returns early.
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let claim = sqlx::query_as::<_, Claim>(
            "INSERT INTO claims (user_id, coupon_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(coupon_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("claims_user_id_coupon_id_key") =>
            {
                AppError::conflict("Coupon is already claimed by this user")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create claim", e),
        })?;

        let updated = sqlx::query(
            "UPDATE coupons SET remaining_amount = remaining_amount - 1, updated_at = NOW() \
             WHERE id = $1 AND remaining_amount > 0",
        )
        .bind(coupon_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decrement remaining stock", e)
        })?;

        if updated.rows_affected() == 0 {
            // Stock was exhausted by a writer the lock should have
            // excluded; roll back the claim insert as well.
            warn!(%coupon_id, "Conditional decrement matched no row");
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back claim", e)
            })?;
            return Err(AppError::conflict("Coupon stock exhausted during claim"));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit claim", e)
        })?;

        Ok(claim)
    }

    async fn update_remaining(&self, coupon_id: Uuid, remaining: i64) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE coupons SET remaining_amount = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(coupon_id)
        .bind(remaining)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update remaining stock", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Coupon {coupon_id} not found")));
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
