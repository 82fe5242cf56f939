//! Lease acquisition options.

use std::time::Duration;

use couponhub_core::config::lock::LockConfig;

/// Options for one lock acquisition.
///
/// Process-wide defaults come from configuration; call sites can override
/// individual fields per acquisition with the builder methods.
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// How long the lease is held before the store reclaims it.
    pub lease: Duration,
    /// Total number of acquisition attempts.
    pub retry_count: u32,
    /// Fixed delay between acquisition attempts.
    pub retry_delay: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            lease: Duration::from_secs(20),
            retry_count: 3,
            retry_delay: Duration::from_millis(300),
        }
    }
}

impl LockOptions {
    /// Build options from the lock configuration section.
    pub fn from_config(config: &LockConfig) -> Self {
        Self {
            lease: Duration::from_secs(config.lease_seconds),
            retry_count: config.retry_count,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Override the lease expiry.
    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    /// Override the number of acquisition attempts.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Override the delay between acquisition attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
