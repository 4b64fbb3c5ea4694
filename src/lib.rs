//! OSO Camping BBQ booking service.
//!
//! Prices camping/BBQ SKUs, reports per-date availability and runs the
//! reservation workflow against Postgres.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use cache::AppCache;
pub use config::Config;
pub use error::{AppError, Result};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, cache: AppCache, config: Config) -> Self {
        Self {
            db,
            cache,
            config: Arc::new(config),
        }
    }
}

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/pricing", pricing::router())
        .nest("/api/reservations", routes::reservations::router())
        .nest("/api/cache", routes::cache_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
