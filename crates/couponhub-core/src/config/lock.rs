//! Coordination-store lock configuration.

use serde::{Deserialize, Serialize};

/// Top-level lock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lease store provider: `"redis"` or `"memory"`.
    ///
    /// The memory provider only serializes claims within one process and is
    /// meant for single-node deployments and tests.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Lease expiry in seconds.
    #[serde(default = "default_lease_seconds")]
    pub lease_seconds: u64,
    /// Number of acquisition retries after the initial attempt.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Delay between acquisition attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Redis-specific lease store configuration.
    #[serde(default)]
    pub redis: RedisLockConfig,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            lease_seconds: default_lease_seconds(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            redis: RedisLockConfig::default(),
        }
    }
}

/// Redis coordination-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLockConfig {
    /// Redis host.
    #[serde(default = "default_redis_host")]
    pub host: String,
    /// Redis port.
    #[serde(default = "default_redis_port")]
    pub port: u16,
    /// Redis password, if authentication is enabled.
    #[serde(default)]
    pub password: Option<String>,
    /// Whether to connect over TLS (`rediss://`).
    #[serde(default)]
    pub use_tls: bool,
    /// Maximum idle connections kept in the pool.
    #[serde(default = "default_max_idle")]
    pub max_idle_connections: u32,
    /// Maximum active connections in the pool.
    #[serde(default = "default_max_active")]
    pub max_active_connections: u32,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Key prefix for all CouponHub lease keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisLockConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
            use_tls: false,
            max_idle_connections: default_max_idle(),
            max_active_connections: default_max_active(),
            idle_timeout_seconds: default_idle_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl RedisLockConfig {
    /// Build the redis connection URL from the configured parts.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "rediss" } else { "redis" };
        match &self.password {
            Some(password) => format!("{scheme}://:{password}@{}:{}", self.host, self.port),
            None => format!("{scheme}://{}:{}", self.host, self.port),
        }
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_lease_seconds() -> u64 {
    20
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    300
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_max_idle() -> u32 {
    5
}

fn default_max_active() -> u32 {
    10
}

fn default_idle_timeout() -> u64 {
    240
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_key_prefix() -> String {
    "couponhub:".to_string()
}
