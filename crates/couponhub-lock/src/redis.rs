//! Redis lease store.
//!
//! Leases are `SET key token NX PX ttl` entries; release runs a Lua script
//! that deletes the key only while the stored token matches, so a holder
//! whose lease already expired cannot delete a successor's lease.

use std::time::Duration;

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use couponhub_core::config::lock::RedisLockConfig;
use couponhub_core::error::{AppError, ErrorKind};
use couponhub_core::result::AppResult;

use crate::store::LeaseStore;

/// Lua script for token-guarded lease release.
///
/// KEYS[1] = lease key
/// ARGV[1] = holder token
///
/// Returns 1 if the lease was deleted, 0 otherwise.
const RELEASE_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    end
    return 0
"#;

/// Redis-backed lease store for multi-replica deployments.
#[derive(Debug, Clone)]
pub struct RedisLeaseStore {
    /// Redis connection manager (pooled, reconnecting).
    conn: ConnectionManager,
    /// Key prefix for all lease keys.
    key_prefix: String,
}

impl RedisLeaseStore {
    /// Create a new Redis lease store from configuration.
    pub async fn connect(config: &RedisLockConfig) -> AppResult<Self> {
        let url = config.url();
        info!(url = %mask_redis_url(&url), "Connecting to Redis lease store");

        let client = Client::open(url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Lock, "Failed to create Redis client", e)
        })?;

        let connect = ConnectionManager::new(client);
        let conn = tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_seconds),
            connect,
        )
        .await
        .map_err(|_| AppError::lock("Timed out connecting to Redis"))?
        .map_err(|e| AppError::with_source(ErrorKind::Lock, "Failed to connect to Redis", e))?;

        info!("Successfully connected to Redis lease store");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Build a full key with the configured prefix.
    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Lock, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.prefixed_key(key);
        let mut conn = self.conn.clone();

        // SET key token PX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(token)
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn release(&self, key: &str, token: &str) -> AppResult<bool> {
        let full_key = self.prefixed_key(key);
        let mut conn = self.conn.clone();

        let deleted: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(&full_key)
            .arg(token)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(deleted > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

/// Mask password in a Redis URL for safe logging.
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos >= scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_redis_url() {
        assert_eq!(
            mask_redis_url("redis://:secret@localhost:6379"),
            "redis://:****@localhost:6379"
        );
        assert_eq!(
            mask_redis_url("redis://localhost:6379"),
            "redis://localhost:6379"
        );
    }
}
