//! CouponHub server — stock-limited coupon redemption service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use couponhub_api::AppState;
use couponhub_core::config::AppConfig;
use couponhub_core::error::AppError;
use couponhub_database::{
    CouponLedger, DatabasePool, PgCouponLedger, PgUserDirectory, UserDirectory,
};
use couponhub_lock::{LeaseStore, LockCoordinator, LockOptions, MemoryLeaseStore, RedisLeaseStore};
use couponhub_service::{ClaimService, CouponService, UserService};

#[tokio::main]
async fn main() {
    let env = std::env::var("COUPONHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CouponHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    couponhub_database::migration::run_migrations(db_pool.pool()).await?;

    // ── Lock coordinator ─────────────────────────────────────────
    let lease_store = build_lease_store(&config).await?;
    let lock_options = LockOptions::from_config(&config.lock);
    let coordinator = LockCoordinator::new(lease_store, lock_options.clone());

    // ── Repositories ─────────────────────────────────────────────
    let ledger: Arc<dyn CouponLedger> = Arc::new(PgCouponLedger::new(db_pool.pool().clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(db_pool.pool().clone()));

    // ── Services ─────────────────────────────────────────────────
    let coupon_service = Arc::new(CouponService::new(Arc::clone(&ledger)));
    let claim_service = Arc::new(ClaimService::new(
        Arc::clone(&ledger),
        Arc::clone(&users),
        coordinator.clone(),
        lock_options,
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&users)));

    let state = AppState {
        coupon_service,
        claim_service,
        user_service,
        ledger,
        lock_coordinator: coordinator,
    };

    // ── HTTP server ──────────────────────────────────────────────
    let router = couponhub_api::build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "CouponHub is listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db_pool.close().await;
    tracing::info!("CouponHub stopped");
    Ok(())
}

/// Select the lease store backend from configuration.
async fn build_lease_store(config: &AppConfig) -> Result<Arc<dyn LeaseStore>, AppError> {
    match config.lock.provider.as_str() {
        "memory" => {
            tracing::warn!(
                "Using in-memory lease store; claims are only serialized within this process"
            );
            Ok(Arc::new(MemoryLeaseStore::new()))
        }
        "redis" => {
            let store = RedisLeaseStore::connect(&config.lock.redis).await?;
            Ok(Arc::new(store))
        }
        other => Err(AppError::configuration(format!(
            "Unknown lock provider '{other}' (expected 'redis' or 'memory')"
        ))),
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
