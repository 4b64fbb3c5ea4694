//! HTTP routes

pub mod reservations;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness check; does not touch the database
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Drop cached catalog rows after an admin edits the catalog
async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    Json(state.cache.stats())
}

/// Cache maintenance routes, mounted under `/api/cache`
pub fn cache_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(cache_stats))
        .route("/invalidate", post(invalidate_cache))
}
