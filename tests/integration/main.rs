//! HTTP-level integration tests.
//!
//! The full router runs over the in-memory backends, so these tests need
//! no external PostgreSQL or Redis.

mod helpers;

mod claim;
mod coupon;
