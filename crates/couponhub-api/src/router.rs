//! Route definitions for the CouponHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(coupon_routes())
        .merge(user_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(axum_middleware::from_fn(
            middleware::correlation::correlation_id,
        ))
        .with_state(state)
}

/// Coupon listing, detail, administration, and claim.
fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/coupons", get(handlers::coupon::list_coupons))
        .route("/coupons", post(handlers::coupon::store_coupon))
        .route("/coupons/claim", post(handlers::coupon::claim_coupon))
        .route("/coupons/{name}", get(handlers::coupon::get_coupon))
}

/// User registration and lookup.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::register_user))
        .route("/users/{username}", get(handlers::user::get_user))
}

/// Liveness and backend reachability.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
