//! Pricing service functions with database access.
//!
//! These load catalog rows (through the cache) and availability, then hand
//! plain data to the calculators. They never claim or release capacity.

use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::cache::AppCache;
use crate::error::AppError;
use crate::models::{category_display_name, AvailabilitySlot, Reservation, SkuPricingRow};

use super::calculators::compute_price;
use super::models::{PriceChange, PriceQuote};
use super::queries;

/// Pricing error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Guest count above `base_guests + max_extra_guests`
    OccupancyExceeded { max_guests: i32, requested: i32 },
    InvalidGuestCount { guest_count: i32 },
    InvalidDate { value: String },
    SkuNotFound { sku_code: String },
    SkuInactive { sku_code: String },
    SlotUnavailable { sku_code: String, date: String },
    /// Resource attributes that cannot be priced
    InvalidResource { reason: String },
    /// Intermediate amount outside the decimal range
    AmountOverflow,
}

impl PricingError {
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::OccupancyExceeded { .. } => "occupancy_exceeded",
            PricingError::InvalidGuestCount { .. } => "invalid_guest_count",
            PricingError::InvalidDate { .. } => "invalid_date",
            PricingError::SkuNotFound { .. } => "sku_not_found",
            PricingError::SkuInactive { .. } => "sku_inactive",
            PricingError::SlotUnavailable { .. } => "slot_unavailable",
            PricingError::InvalidResource { .. } => "invalid_resource",
            PricingError::AmountOverflow => "amount_overflow",
        }
    }

    /// Structured details for API clients
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            PricingError::OccupancyExceeded { max_guests, requested } => Some(serde_json::json!({
                "max_guests": max_guests,
                "requested": requested,
            })),
            PricingError::SlotUnavailable { sku_code, date } => Some(serde_json::json!({
                "sku_code": sku_code,
                "date": date,
            })),
            _ => None,
        }
    }
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::OccupancyExceeded { max_guests, requested } => write!(
                f,
                "Maximum occupancy exceeded (max: {} guests, requested: {})",
                max_guests, requested
            ),
            PricingError::InvalidGuestCount { guest_count } => {
                write!(f, "Guest count must be at least 1 (got {})", guest_count)
            }
            PricingError::InvalidDate { value } => {
                write!(f, "Invalid reservation date '{}', expected YYYY-MM-DD", value)
            }
            PricingError::SkuNotFound { sku_code } => write!(f, "SKU {} not found", sku_code),
            PricingError::SkuInactive { sku_code } => {
                write!(f, "SKU {} is not currently offered", sku_code)
            }
            PricingError::SlotUnavailable { sku_code, date } => {
                write!(f, "SKU {} is not available on {}", sku_code, date)
            }
            PricingError::InvalidResource { reason } => write!(f, "Invalid resource: {}", reason),
            PricingError::AmountOverflow => write!(f, "Price is out of range"),
        }
    }
}

impl std::error::Error for PricingError {}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_reservation_date(value: &str) -> Result<NaiveDate, PricingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| PricingError::InvalidDate {
        value: value.to_string(),
    })
}

pub fn validate_guest_count(guest_count: i32) -> Result<(), PricingError> {
    if guest_count < 1 {
        return Err(PricingError::InvalidGuestCount { guest_count });
    }
    Ok(())
}

/// Quote for one SKU on one date
#[derive(Debug, Clone)]
pub struct SkuQuote {
    pub sku: Arc<SkuPricingRow>,
    pub date: NaiveDate,
    pub quote: PriceQuote,
}

/// Bookable units of one time slot within a category, priced once
#[derive(Debug, Clone)]
pub struct TimeSlotOffer {
    pub slot_name: String,
    pub time_range: String,
    pub sku_codes: Vec<String>,
    pub available_count: i32,
    pub quote: PriceQuote,
}

/// Offers for one resource category
#[derive(Debug, Clone)]
pub struct CategoryOffers {
    pub category_code: String,
    pub category_name: String,
    pub time_slots: Vec<TimeSlotOffer>,
}

/// Price a SKU without touching availability.
///
/// Used when the reservation already holds the unit, e.g. a guest-count change.
pub async fn price_sku(
    pool: &PgPool,
    cache: &AppCache,
    sku_code: &str,
    date: NaiveDate,
    guest_count: i32,
) -> Result<SkuQuote, AppError> {
    validate_guest_count(guest_count)?;

    let sku = cache
        .sku(pool, sku_code)
        .await?
        .ok_or_else(|| PricingError::SkuNotFound {
            sku_code: sku_code.to_string(),
        })?;

    if !sku.is_offered() {
        return Err(PricingError::SkuInactive {
            sku_code: sku_code.to_string(),
        }
        .into());
    }

    let quote = compute_price(&sku.resource(), &sku.time_slot(), date, guest_count)?;

    Ok(SkuQuote { sku, date, quote })
}

/// Price a SKU after confirming it is still bookable on `date`.
///
/// Availability rows for the date are created on first access.
pub async fn quote_sku(
    pool: &PgPool,
    cache: &AppCache,
    sku_code: &str,
    date: NaiveDate,
    guest_count: i32,
) -> Result<SkuQuote, AppError> {
    let priced = price_sku(pool, cache, sku_code, date, guest_count).await?;

    queries::initialize_availability(pool, date).await?;

    // Every offered SKU has a row once initialised, so a miss means the
    // catalog deactivated it after the cached row was loaded
    let Some(slot) = queries::get_offered_availability(pool, sku_code, date).await? else {
        cache.invalidate_sku(sku_code).await;
        return Err(PricingError::SkuInactive {
            sku_code: sku_code.to_string(),
        }
        .into());
    };

    if !slot.is_bookable() {
        return Err(PricingError::SlotUnavailable {
            sku_code: sku_code.to_string(),
            date: date.to_string(),
        }
        .into());
    }

    tracing::debug!(
        "Quoted {} on {} for {} guests: {}",
        sku_code,
        date,
        guest_count,
        priced.quote.final_price
    );

    Ok(priced)
}

/// Everything bookable on `date` that fits `guest_count`, grouped by category
pub async fn available_offers(
    pool: &PgPool,
    cache: &AppCache,
    date: NaiveDate,
    guest_count: i32,
) -> Result<Vec<CategoryOffers>, AppError> {
    validate_guest_count(guest_count)?;

    let created = queries::initialize_availability(pool, date).await?;
    if created > 0 {
        tracing::info!("Created {} availability rows for {}", created, date);
    }

    let slots = queries::list_availability_for_date(pool, date).await?;
    let skus = cache.offered_skus(pool).await?;

    Ok(build_offers(&skus, &slots, date, guest_count)?)
}

/// Group bookable SKUs by category and time slot and price each group.
///
/// SKUs whose occupancy ceiling is below `guest_count` are left out. A group
/// is priced from its first SKU.
pub fn build_offers(
    skus: &[SkuPricingRow],
    availability: &[AvailabilitySlot],
    date: NaiveDate,
    guest_count: i32,
) -> Result<Vec<CategoryOffers>, PricingError> {
    let by_sku: HashMap<&str, &AvailabilitySlot> = availability
        .iter()
        .filter(|slot| slot.date == date)
        .map(|slot| (slot.sku_code.as_str(), slot))
        .collect();

    let mut grouped: BTreeMap<&str, Vec<(&SkuPricingRow, i32)>> = BTreeMap::new();
    for sku in skus.iter().filter(|s| s.is_offered()) {
        let Some(slot) = by_sku.get(sku.sku_code.as_str()) else {
            continue;
        };
        if !slot.is_bookable() || sku.max_guests() < guest_count {
            continue;
        }
        grouped
            .entry(sku.category_code.as_str())
            .or_default()
            .push((sku, slot.remaining()));
    }

    let mut offers = Vec::with_capacity(grouped.len());
    for (category_code, entries) in grouped {
        let mut time_slots: Vec<TimeSlotOffer> = Vec::new();

        for (sku, remaining) in entries {
            if let Some(existing) = time_slots.iter_mut().find(|t| t.slot_name == sku.slot_name) {
                existing.sku_codes.push(sku.sku_code.clone());
                existing.available_count += remaining;
                continue;
            }

            let quote = compute_price(&sku.resource(), &sku.time_slot(), date, guest_count)?;
            time_slots.push(TimeSlotOffer {
                slot_name: sku.slot_name.clone(),
                time_range: sku.time_range(),
                sku_codes: vec![sku.sku_code.clone()],
                available_count: remaining,
                quote,
            });
        }

        offers.push(CategoryOffers {
            category_code: category_code.to_string(),
            category_name: category_display_name(category_code),
            time_slots,
        });
    }

    Ok(offers)
}

/// First bookable SKU for a category and time-slot name
pub fn find_available_sku<'a>(
    offers: &'a [CategoryOffers],
    category_code: &str,
    slot_name: &str,
) -> Option<&'a str> {
    offers
        .iter()
        .find(|c| c.category_code == category_code)?
        .time_slots
        .iter()
        .find(|t| t.slot_name == slot_name)?
        .sku_codes
        .first()
        .map(String::as_str)
}

/// Recompute the price of an existing reservation for a new guest count
pub async fn reprice_guest_change(
    pool: &PgPool,
    cache: &AppCache,
    reservation: &Reservation,
    new_guest_count: i32,
) -> Result<(SkuQuote, PriceChange), AppError> {
    let priced = price_sku(
        pool,
        cache,
        &reservation.sku_code,
        reservation.reservation_date,
        new_guest_count,
    )
    .await?;

    let change = PriceChange::between(reservation.total_amount, &priced.quote);
    Ok((priced, change))
}

/// Recompute the price of an existing reservation moved to another date and optionally another SKU.
///
/// The target must be bookable unless it is the unit the reservation already holds.
pub async fn reprice_date_change(
    pool: &PgPool,
    cache: &AppCache,
    reservation: &Reservation,
    new_date: NaiveDate,
    new_sku_code: Option<&str>,
) -> Result<(SkuQuote, PriceChange), AppError> {
    let sku_code = new_sku_code.unwrap_or(&reservation.sku_code);
    let unchanged = sku_code == reservation.sku_code && new_date == reservation.reservation_date;

    let priced = if unchanged {
        price_sku(pool, cache, sku_code, new_date, reservation.guest_count).await?
    } else {
        quote_sku(pool, cache, sku_code, new_date, reservation.guest_count).await?
    };

    let change = PriceChange::between(reservation.total_amount, &priced.quote);
    Ok((priced, change))
}
