//! # couponhub-database
//!
//! Persistence layer for CouponHub: the transactional coupon ledger and
//! the user directory, each behind a trait with a PostgreSQL and an
//! in-memory implementation, plus connection pool management and the
//! migration runner.

pub mod connection;
pub mod ledger;
pub mod migration;
pub mod users;

pub use connection::DatabasePool;
pub use ledger::{CouponLedger, MemoryCouponLedger, PgCouponLedger};
pub use users::{MemoryUserDirectory, PgUserDirectory, UserDirectory};
