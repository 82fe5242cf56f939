//! In-memory lease store using a Tokio mutex.
//!
//! Serializes claims within one process only. Suitable for single-node
//! deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use couponhub_core::result::AppResult;

use crate::store::LeaseStore;

/// One live lease.
#[derive(Debug)]
struct Lease {
    /// Holder token.
    token: String,
    /// When the lease expires.
    expires_at: Instant,
}

/// In-memory lease store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaseStore {
    /// Live leases by key.
    leases: Arc<Mutex<HashMap<String, Lease>>>,
}

impl MemoryLeaseStore {
    /// Create an empty lease store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> AppResult<bool> {
        let mut leases = self.leases.lock().await;
        let now = Instant::now();

        if let Some(lease) = leases.get(key) {
            if lease.expires_at > now && lease.token != token {
                return Ok(false);
            }
        }

        leases.insert(
            key.to_string(),
            Lease {
                token: token.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn release(&self, key: &str, token: &str) -> AppResult<bool> {
        let mut leases = self.leases.lock().await;
        match leases.get(key) {
            Some(lease) if lease.token == token => {
                leases.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
