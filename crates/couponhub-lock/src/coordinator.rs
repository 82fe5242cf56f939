//! Scoped lock acquisition around a lease store.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use couponhub_core::error::AppError;
use couponhub_core::result::AppResult;

use crate::options::LockOptions;
use crate::store::LeaseStore;

/// Cross-process lock coordinator.
///
/// Wraps a [`LeaseStore`] and guarantees at most one concurrent execution
/// of a critical section per key across all processes sharing the store,
/// for the lease duration. Constructed once in `main` and injected into
/// the services that need it.
#[derive(Debug, Clone)]
pub struct LockCoordinator {
    /// Lease store backend.
    store: Arc<dyn LeaseStore>,
    /// Process-wide acquisition defaults.
    defaults: LockOptions,
}

impl LockCoordinator {
    /// Create a new coordinator over the given lease store.
    pub fn new(store: Arc<dyn LeaseStore>, defaults: LockOptions) -> Self {
        Self { store, defaults }
    }

    /// Run `section` while holding the lease on `key`, with the
    /// process-wide default options.
    pub async fn with_lock<T, F, Fut>(&self, key: &str, section: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let options = self.defaults.clone();
        self.with_lock_opts(key, &options, section).await
    }

    /// Run `section` while holding the lease on `key`.
    ///
    /// The lease is released after `section` returns — success, business
    /// error, or unexpected failure. Release failures are logged and never
    /// surfaced; the operation's outcome is already determined by then.
    pub async fn with_lock_opts<T, F, Fut>(
        &self,
        key: &str,
        options: &LockOptions,
        section: F,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let token = self.acquire(key, options).await?;
        debug!(key, "Acquired lock");

        let result = section().await;

        match self.store.release(key, &token).await {
            Ok(true) => debug!(key, "Released lock"),
            Ok(false) => warn!(key, "Lease expired before release"),
            Err(e) => warn!(key, error = %e, "Failed to release lock"),
        }

        result
    }

    /// Acquire a lease with bounded retries and a fixed delay.
    ///
    /// Returns the holder token on success. Exhausting the retry budget or
    /// any store failure during acquisition yields a lock-acquisition
    /// error with no partial effects.
    async fn acquire(&self, key: &str, options: &LockOptions) -> AppResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        let attempts = options.retry_count.max(1);

        for attempt in 1..=attempts {
            let granted = self
                .store
                .try_acquire(key, &token, options.lease)
                .await
                .map_err(|e| {
                    AppError::lock_acquire(format!("Error acquiring lock for key {key}: {e}"))
                })?;

            if granted {
                return Ok(token);
            }

            debug!(key, attempt, "Lock contended, retrying");
            if attempt < attempts {
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        Err(AppError::lock_acquire(format!(
            "Could not acquire lock for key {key} after {attempts} attempts"
        )))
    }

    /// Check that the underlying lease store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}
