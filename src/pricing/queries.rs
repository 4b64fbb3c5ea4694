//! Database queries for catalog and availability lookups.
//!
//! Catalog tables are read-only here. The only write is the lazy creation of
//! per-date availability rows.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{AvailabilitySlot, SkuPricingRow};

/// SKU joined with its resource and time slot
const SKU_PRICING_SELECT: &str = r#"
    SELECT
        s.sku_code,
        s.active AS sku_active,
        r.internal_code AS resource_code,
        r.category_code,
        r.display_name AS resource_name,
        r.active AS resource_active,
        r.price AS base_price,
        r.base_guests,
        r.extra_guest_fee,
        r.max_extra_guests,
        r.has_weekend_pricing,
        t.slot_code AS time_slot_code,
        t.slot_name,
        t.start_local,
        t.end_local,
        t.price_multiplier,
        t.weekday_multiplier,
        t.weekend_multiplier
    FROM sku_catalog s
    JOIN resource_catalog r ON r.internal_code = s.resource_code
    JOIN time_slot_catalog t ON t.slot_code = s.time_slot_code
"#;

/// Find one SKU by code, active or not
pub async fn find_sku_pricing(
    pool: &PgPool,
    sku_code: &str,
) -> Result<Option<SkuPricingRow>, AppError> {
    let sql = format!("{} WHERE s.sku_code = $1", SKU_PRICING_SELECT);

    let row = sqlx::query_as::<_, SkuPricingRow>(&sql)
        .bind(sku_code)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// All SKUs currently offered (SKU and resource both active)
pub async fn list_offered_skus(pool: &PgPool) -> Result<Vec<SkuPricingRow>, AppError> {
    let sql = format!(
        "{} WHERE s.active = true AND r.active = true ORDER BY r.category_code, r.internal_code, t.start_local",
        SKU_PRICING_SELECT
    );

    let rows = sqlx::query_as::<_, SkuPricingRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Create default availability rows for every offered SKU missing one on `date`.
///
/// Idempotent; returns how many rows were created.
pub async fn initialize_availability(pool: &PgPool, date: NaiveDate) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO availability (sku_code, date, available_slots, booked_slots, blocked)
        SELECT s.sku_code, $1, 1, 0, false
        FROM sku_catalog s
        JOIN resource_catalog r ON r.internal_code = s.resource_code
        WHERE s.active = true
          AND r.active = true
        ON CONFLICT (sku_code, date) DO NOTHING
        "#,
    )
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Availability of one SKU on one date.
///
/// Only returned while the SKU and its resource are active in the catalog,
/// whatever the cache holds.
pub async fn get_offered_availability(
    pool: &PgPool,
    sku_code: &str,
    date: NaiveDate,
) -> Result<Option<AvailabilitySlot>, AppError> {
    let slot = sqlx::query_as::<_, AvailabilitySlot>(
        r#"
        SELECT a.sku_code, a.date, a.available_slots, a.booked_slots, a.blocked
        FROM availability a
        JOIN sku_catalog s ON s.sku_code = a.sku_code
        JOIN resource_catalog r ON r.internal_code = s.resource_code
        WHERE a.sku_code = $1
          AND a.date = $2
          AND s.active = true
          AND r.active = true
        "#,
    )
    .bind(sku_code)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// All unblocked availability rows for a date
pub async fn list_availability_for_date(
    pool: &PgPool,
    date: NaiveDate,
) -> Result<Vec<AvailabilitySlot>, AppError> {
    let slots = sqlx::query_as::<_, AvailabilitySlot>(
        r#"
        SELECT sku_code, date, available_slots, booked_slots, blocked
        FROM availability
        WHERE date = $1
          AND blocked = false
        ORDER BY sku_code
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
