//! Per-date capacity records for SKUs

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// Units of a SKU sold per date when nothing else is configured
pub const DEFAULT_AVAILABLE_SLOTS: i32 = 1;

/// Availability row from `availability`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AvailabilitySlot {
    pub sku_code: String,
    pub date: NaiveDate,
    pub available_slots: i32,
    pub booked_slots: i32,
    pub blocked: bool,
}

impl AvailabilitySlot {
    /// Row created lazily the first time a date is looked at
    pub fn new_default(sku_code: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            sku_code: sku_code.into(),
            date,
            available_slots: DEFAULT_AVAILABLE_SLOTS,
            booked_slots: 0,
            blocked: false,
        }
    }

    pub fn is_bookable(&self) -> bool {
        !self.blocked && self.booked_slots < self.available_slots
    }

    /// Units still free; zero when blocked
    pub fn remaining(&self) -> i32 {
        if self.blocked {
            0
        } else {
            (self.available_slots - self.booked_slots).max(0)
        }
    }
}
