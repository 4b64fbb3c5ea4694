//! In-memory caching using moka
//!
//! Catalog rows change only when an administrator edits the catalog, so SKU
//! pricing rows are cached aggressively. Availability is never cached.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::models::SkuPricingRow;
use crate::pricing::queries;

const OFFERED_KEY: &str = "offered";

/// Application cache holding catalog lookups
#[derive(Clone)]
pub struct AppCache {
    /// SKU pricing rows (sku_code -> row)
    pub skus: Cache<String, Arc<SkuPricingRow>>,
    /// Offered SKU listing (singleton)
    pub offered: Cache<String, Arc<Vec<SkuPricingRow>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // SKUs: 1000 entries, 30 min TTL, 10 min idle
            skus: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            // Offered listing: 1 entry, 15 min TTL
            offered: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(15 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            skus_size: self.skus.entry_count(),
            offered_cached: self.offered.entry_count() > 0,
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.skus.invalidate_all();
        self.offered.invalidate_all();
        info!("All caches invalidated");
    }

    /// Drop one SKU and the offered listing that may contain it
    pub async fn invalidate_sku(&self, sku_code: &str) {
        self.skus.invalidate(sku_code).await;
        self.offered.invalidate_all();
        tracing::debug!("Cache invalidated for SKU: {}", sku_code);
    }

    /// Cached SKU row, falling back to the database on a miss
    pub async fn sku(&self, db: &PgPool, sku_code: &str) -> crate::error::Result<Option<Arc<SkuPricingRow>>> {
        if let Some(cached) = self.skus.get(sku_code).await {
            tracing::debug!("Cache HIT for SKU: {}", sku_code);
            return Ok(Some(cached));
        }

        tracing::debug!("Cache MISS for SKU: {}", sku_code);
        let Some(row) = queries::find_sku_pricing(db, sku_code).await? else {
            return Ok(None);
        };

        let row = Arc::new(row);
        self.skus.insert(sku_code.to_string(), row.clone()).await;
        Ok(Some(row))
    }

    /// Cached list of offered SKUs, falling back to the database on a miss
    pub async fn offered_skus(&self, db: &PgPool) -> crate::error::Result<Arc<Vec<SkuPricingRow>>> {
        if let Some(cached) = self.offered.get(OFFERED_KEY).await {
            tracing::debug!("Cache HIT for offered SKU listing");
            return Ok(cached);
        }

        tracing::debug!("Cache MISS for offered SKU listing");
        let rows = Arc::new(queries::list_offered_skus(db).await?);
        self.offered.insert(OFFERED_KEY.to_string(), rows.clone()).await;
        Ok(rows)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub skus_size: u64,
    pub offered_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes on every tick of `period`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, period: Duration) {
    let mut interval = interval(period);
    loop {
        // First tick completes immediately, which gives the startup warm-up
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the offered catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_offered_skus(db).await {
        Ok(rows) => {
            for row in &rows {
                cache
                    .skus
                    .insert(row.sku_code.clone(), Arc::new(row.clone()))
                    .await;
            }
            cache
                .offered
                .insert(OFFERED_KEY.to_string(), Arc::new(rows))
                .await;
        }
        Err(e) => warn!("Failed to warm catalog cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::tests::sample_row;

    #[tokio::test]
    async fn test_invalidate_all_clears_entries() {
        let cache = AppCache::new();
        cache
            .skus
            .insert("PR01-L".to_string(), Arc::new(sample_row("PR01-L", "PR", "점심")))
            .await;
        assert!(cache.skus.get("PR01-L").await.is_some());

        cache.invalidate_all();
        assert!(cache.skus.get("PR01-L").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_sku_drops_row_and_listing() {
        let cache = AppCache::new();
        let row = Arc::new(sample_row("PR01-L", "PR", "점심"));
        cache.skus.insert("PR01-L".to_string(), row.clone()).await;
        cache.skus.insert("PR02-L".to_string(), row).await;
        cache
            .offered
            .insert(OFFERED_KEY.to_string(), Arc::new(vec![]))
            .await;

        cache.invalidate_sku("PR01-L").await;

        assert!(cache.skus.get("PR01-L").await.is_none());
        assert!(cache.skus.get("PR02-L").await.is_some());
        assert!(cache.offered.get(OFFERED_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_stats_reflect_offered_listing() {
        let cache = AppCache::new();
        cache
            .offered
            .insert(OFFERED_KEY.to_string(), Arc::new(vec![]))
            .await;
        cache.offered.run_pending_tasks().await;

        assert!(cache.stats().offered_cached);
    }
}
