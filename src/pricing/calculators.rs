//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access, no shared state.
//! Safe to call from any number of tasks concurrently.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::models::{PriceQuote, Resource, TimeSlot};
use crate::pricing::services::PricingError;

/// Multiplier used when a resource has no weekend pricing and the slot sets none.
pub const DEFAULT_MULTIPLIER: Decimal = dec!(1.0);

/// Weekend surcharge used when weekend pricing is on and the slot sets no multiplier at all.
pub const DEFAULT_WEEKEND_MULTIPLIER: Decimal = dec!(1.2);

/// Round to the given decimal places, halves away from zero.
///
/// Prices are whole won, so callers normally pass `places = 0`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use oso_booking::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Saturday and Sunday are weekend days. The date is a calendar date, no timezone applies.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// A zero multiplier is treated like a missing one.
fn configured(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|m| !m.is_zero())
}

/// Pick the multiplier that applies to `time_slot` on `date`.
///
/// Without weekend pricing only `price_multiplier` counts. With it, the
/// day-specific multiplier wins, then `price_multiplier`, then the default
/// for that kind of day.
pub fn select_multiplier(time_slot: &TimeSlot, date: NaiveDate, has_weekend_pricing: bool) -> Decimal {
    let generic = configured(time_slot.price_multiplier);

    if !has_weekend_pricing {
        return generic.unwrap_or(DEFAULT_MULTIPLIER);
    }

    if is_weekend(date) {
        configured(time_slot.weekend_multiplier)
            .or(generic)
            .unwrap_or(DEFAULT_WEEKEND_MULTIPLIER)
    } else {
        configured(time_slot.weekday_multiplier)
            .or(generic)
            .unwrap_or(DEFAULT_MULTIPLIER)
    }
}

/// Compute the full price breakdown for a booking request.
///
/// Fails with `PricingError::OccupancyExceeded` when `guest_count` is above
/// `base_guests + max_extra_guests`; nothing is computed in that case.
/// Amounts that leave the decimal range give `PricingError::AmountOverflow`.
pub fn compute_price(
    resource: &Resource,
    time_slot: &TimeSlot,
    reservation_date: NaiveDate,
    guest_count: i32,
) -> Result<PriceQuote, PricingError> {
    let max_guests = resource
        .base_guests
        .checked_add(resource.max_extra_guests.max(0))
        .ok_or_else(|| PricingError::InvalidResource {
            reason: "base_guests + max_extra_guests is out of range".to_string(),
        })?;
    if guest_count > max_guests {
        return Err(PricingError::OccupancyExceeded {
            max_guests,
            requested: guest_count,
        });
    }

    let multiplier = select_multiplier(time_slot, reservation_date, resource.has_weekend_pricing);
    let base_total = round_money(
        resource
            .base_price
            .checked_mul(multiplier)
            .ok_or(PricingError::AmountOverflow)?,
        0,
    );

    let extra_guests = guest_count.saturating_sub(resource.base_guests).max(0);
    let extra_fee_total = Decimal::from(extra_guests)
        .checked_mul(resource.extra_guest_fee)
        .ok_or(PricingError::AmountOverflow)?;
    let final_price = base_total
        .checked_add(extra_fee_total)
        .ok_or(PricingError::AmountOverflow)?;

    Ok(PriceQuote {
        base_price: resource.base_price,
        multiplier,
        base_total,
        base_guests: resource.base_guests,
        guest_count,
        extra_guests,
        extra_fee_per_person: resource.extra_guest_fee,
        extra_fee_total,
        final_price,
        max_guests,
        is_weekend_rate: resource.has_weekend_pricing && is_weekend(reservation_date),
    })
}

/// Simple total without occupancy rules: rounded `base_price × multiplier` plus flat fees.
pub fn calculate_total_price(base_price: Decimal, multiplier: Decimal, additional_fees: Decimal) -> Decimal {
    round_money(base_price * multiplier, 0) + additional_fees
}
