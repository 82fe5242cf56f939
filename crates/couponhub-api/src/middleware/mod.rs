//! HTTP middleware.

pub mod correlation;
pub mod logging;
