//! Lease store trait for pluggable lock backends.

use std::time::Duration;

use async_trait::async_trait;

use couponhub_core::result::AppResult;

/// Trait for lease store backends (Redis or in-memory).
///
/// A lease is a time-bounded exclusive grant on a key. Implementations must
/// guarantee that `try_acquire` succeeds for at most one live token per key
/// at any moment, across every process sharing the store, and that
/// `release` removes the lease only when the caller still holds it.
#[async_trait]
pub trait LeaseStore: Send + Sync + std::fmt::Debug + 'static {
    /// Try to acquire the lease on `key` for `ttl`, identified by `token`.
    ///
    /// Returns `true` if the lease was granted, `false` if another holder
    /// currently owns it.
    async fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> AppResult<bool>;

    /// Release the lease on `key` if it is still held by `token`.
    ///
    /// Returns `true` if the lease was removed, `false` if it had already
    /// expired or was taken over by another holder.
    async fn release(&self, key: &str, token: &str) -> AppResult<bool>;

    /// Check that the lease store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
