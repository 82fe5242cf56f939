//! # couponhub-lock
//!
//! Cross-process mutual exclusion for CouponHub. A [`LockCoordinator`]
//! wraps a [`store::LeaseStore`] backend and exposes scoped acquisition:
//! the lease is released on every exit path of the critical section.
//!
//! Two backends are provided:
//!
//! - **redis**: time-bounded leases in a shared Redis instance
//!   (`SET NX PX` + token-guarded release), correct across replicas
//! - **memory**: in-process leases for single-node deployments and tests
//!
//! The backend is selected at runtime based on configuration.

pub mod coordinator;
pub mod keys;
pub mod memory;
pub mod options;
pub mod redis;
pub mod store;

pub use coordinator::LockCoordinator;
pub use memory::MemoryLeaseStore;
pub use options::LockOptions;
pub use self::redis::RedisLeaseStore;
pub use store::LeaseStore;
