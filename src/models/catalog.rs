//! Catalog models: resources, time slots and the SKUs pairing them.
//!
//! Catalog data is maintained by the admin screens; this service only reads it.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::pricing::models::{Resource, TimeSlot, DEFAULT_BASE_GUESTS};

/// Resource category codes used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CategoryCode {
    /// Private room
    #[serde(rename = "PR")]
    PrivateRoom,
    /// Sofa table
    #[serde(rename = "ST")]
    SofaTable,
    /// Tent
    #[serde(rename = "TN")]
    Tent,
    /// VIP building
    #[serde(rename = "VP")]
    Vip,
    /// Outdoor table
    #[serde(rename = "YT")]
    OutdoorTable,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 5] = [
        CategoryCode::PrivateRoom,
        CategoryCode::SofaTable,
        CategoryCode::Tent,
        CategoryCode::Vip,
        CategoryCode::OutdoorTable,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PR" => Some(CategoryCode::PrivateRoom),
            "ST" => Some(CategoryCode::SofaTable),
            "TN" => Some(CategoryCode::Tent),
            "VP" => Some(CategoryCode::Vip),
            "YT" => Some(CategoryCode::OutdoorTable),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            CategoryCode::PrivateRoom => "PR",
            CategoryCode::SofaTable => "ST",
            CategoryCode::Tent => "TN",
            CategoryCode::Vip => "VP",
            CategoryCode::OutdoorTable => "YT",
        }
    }

    /// Customer-facing label
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryCode::PrivateRoom => "프라이빗룸",
            CategoryCode::SofaTable => "소파테이블",
            CategoryCode::Tent => "텐트동",
            CategoryCode::Vip => "VIP동",
            CategoryCode::OutdoorTable => "야장테이블",
        }
    }
}

/// Display label for a raw category code.
///
/// Categories can be added to the catalog before this table learns about
/// them, so unknown codes come back unchanged.
pub fn category_display_name(code: &str) -> String {
    CategoryCode::from_code(code)
        .map(|c| c.display_name().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Format a time window as `HH:MM - HH:MM`
pub fn format_time_slot(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
}

/// One SKU joined with its resource and time slot (sku_catalog ⨝ resource_catalog ⨝ time_slot_catalog)
#[derive(Debug, Clone, FromRow)]
pub struct SkuPricingRow {
    pub sku_code: String,
    pub sku_active: bool,
    pub resource_code: String,
    pub category_code: String,
    pub resource_name: Option<String>,
    pub resource_active: bool,
    pub base_price: Option<Decimal>,
    pub base_guests: Option<i32>,
    pub extra_guest_fee: Option<Decimal>,
    pub max_extra_guests: Option<i32>,
    pub has_weekend_pricing: Option<bool>,
    pub time_slot_code: String,
    pub slot_name: String,
    pub start_local: NaiveTime,
    pub end_local: NaiveTime,
    pub price_multiplier: Option<Decimal>,
    pub weekday_multiplier: Option<Decimal>,
    pub weekend_multiplier: Option<Decimal>,
}

impl SkuPricingRow {
    /// A SKU is sold only while both it and its resource are active
    pub fn is_offered(&self) -> bool {
        self.sku_active && self.resource_active
    }

    /// Engine view of the resource, with catalog defaults for unset columns
    pub fn resource(&self) -> Resource {
        Resource {
            category_code: self.category_code.clone(),
            internal_code: Some(self.resource_code.clone()),
            base_price: self.base_price.unwrap_or(Decimal::ZERO),
            base_guests: self.base_guests.unwrap_or(DEFAULT_BASE_GUESTS),
            extra_guest_fee: self.extra_guest_fee.unwrap_or(Decimal::ZERO),
            max_extra_guests: self.max_extra_guests.unwrap_or(0),
            has_weekend_pricing: self.has_weekend_pricing.unwrap_or(false),
        }
    }

    /// Engine view of the time slot. Unset multipliers stay unset.
    pub fn time_slot(&self) -> TimeSlot {
        TimeSlot {
            price_multiplier: self.price_multiplier,
            weekday_multiplier: self.weekday_multiplier,
            weekend_multiplier: self.weekend_multiplier,
            start_local: Some(self.start_local),
            end_local: Some(self.end_local),
        }
    }

    pub fn max_guests(&self) -> i32 {
        self.resource().max_guests()
    }

    pub fn time_range(&self) -> String {
        format_time_slot(self.start_local, self.end_local)
    }
}
