//! # couponhub-api
//!
//! HTTP API layer for CouponHub. Routes, handlers, DTOs, the
//! `AppError → Response` mapping, and correlation-id/request-logging
//! middleware.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
