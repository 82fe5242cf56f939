//! HTTP request handlers.

pub mod coupon;
pub mod health;
pub mod user;

use couponhub_core::error::AppError;

/// Map validator errors into the unified validation error.
pub(crate) fn validate(input: &impl validator::Validate) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))
}
