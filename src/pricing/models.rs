//! Plain-data inputs and outputs of the pricing engine.
//!
//! These carry no database concerns; catalog rows are converted into them
//! (see `models::catalog::SkuPricingRow`) before the engine is called.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::services::PricingError;

/// Occupancy included in the base price when the catalog leaves it unset.
pub const DEFAULT_BASE_GUESTS: i32 = 4;

/// Pricing attributes of a bookable resource (room, tent, table).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    pub category_code: String,
    #[serde(default)]
    pub internal_code: Option<String>,
    pub base_price: Decimal,
    #[serde(default = "default_base_guests")]
    pub base_guests: i32,
    #[serde(default)]
    pub extra_guest_fee: Decimal,
    #[serde(default)]
    pub max_extra_guests: i32,
    #[serde(default)]
    pub has_weekend_pricing: bool,
}

fn default_base_guests() -> i32 {
    DEFAULT_BASE_GUESTS
}

impl Resource {
    /// Hard occupancy ceiling: base guests plus the allowed extras.
    ///
    /// Saturates instead of overflowing; `compute_price` rejects a ceiling
    /// that does not fit.
    pub fn max_guests(&self) -> i32 {
        self.base_guests.saturating_add(self.max_extra_guests.max(0))
    }

    /// Check client-supplied attributes before pricing them.
    pub fn validate(&self) -> Result<(), PricingError> {
        let invalid = |reason: &str| {
            Err(PricingError::InvalidResource {
                reason: reason.to_string(),
            })
        };

        if self.base_price <= Decimal::ZERO {
            return invalid("base_price must be positive");
        }
        if self.base_guests < 0 {
            return invalid("base_guests must not be negative");
        }
        if self.extra_guest_fee < Decimal::ZERO {
            return invalid("extra_guest_fee must not be negative");
        }
        if self.max_extra_guests < 0 {
            return invalid("max_extra_guests must not be negative");
        }
        if self.base_guests.checked_add(self.max_extra_guests).is_none() {
            return invalid("base_guests + max_extra_guests is out of range");
        }
        Ok(())
    }
}

/// Multiplier attributes of a reservable time window.
///
/// `None` means "unset" and is resolved through the fallback chain in
/// `calculators::select_multiplier`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeSlot {
    #[serde(default)]
    pub price_multiplier: Option<Decimal>,
    #[serde(default)]
    pub weekday_multiplier: Option<Decimal>,
    #[serde(default)]
    pub weekend_multiplier: Option<Decimal>,
    #[serde(default)]
    pub start_local: Option<NaiveTime>,
    #[serde(default)]
    pub end_local: Option<NaiveTime>,
}

/// Full price breakdown for one (resource, time slot, date, guest count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub multiplier: Decimal,
    pub base_total: Decimal,
    pub base_guests: i32,
    pub guest_count: i32,
    pub extra_guests: i32,
    pub extra_fee_per_person: Decimal,
    pub extra_fee_total: Decimal,
    pub final_price: Decimal,
    pub max_guests: i32,
    pub is_weekend_rate: bool,
}

/// Difference between a stored reservation total and a recomputed quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceChange {
    #[serde(with = "rust_decimal::serde::str")]
    pub previous_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub new_total: Decimal,
    /// Positive when the customer owes more, negative for a refund.
    #[serde(with = "rust_decimal::serde::str")]
    pub difference: Decimal,
}

impl PriceChange {
    pub fn between(previous_total: Decimal, quote: &PriceQuote) -> Self {
        Self {
            previous_total,
            new_total: quote.final_price,
            difference: quote.final_price - previous_total,
        }
    }

    pub fn is_increase(&self) -> bool {
        self.difference > Decimal::ZERO
    }
}
