//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::PriceQuote;
use super::services::{CategoryOffers, SkuQuote, TimeSlotOffer};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Price breakdown
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuoteResponse {
    pub base_price: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    pub base_total: MoneyResponse,
    pub base_guests: i32,
    pub guest_count: i32,
    pub extra_guests: i32,
    pub extra_fee_per_person: MoneyResponse,
    pub extra_fee_total: MoneyResponse,
    pub final_price: MoneyResponse,
    pub max_guests: i32,
    pub is_weekend_rate: bool,
}

impl PriceQuoteResponse {
    pub fn from_quote(quote: &PriceQuote, currency: &str) -> Self {
        Self {
            base_price: MoneyResponse::new(quote.base_price, currency),
            multiplier: quote.multiplier,
            base_total: MoneyResponse::new(quote.base_total, currency),
            base_guests: quote.base_guests,
            guest_count: quote.guest_count,
            extra_guests: quote.extra_guests,
            extra_fee_per_person: MoneyResponse::new(quote.extra_fee_per_person, currency),
            extra_fee_total: MoneyResponse::new(quote.extra_fee_total, currency),
            final_price: MoneyResponse::new(quote.final_price, currency),
            max_guests: quote.max_guests,
            is_weekend_rate: quote.is_weekend_rate,
        }
    }
}

/// Response for a SKU quote
#[derive(Debug, Serialize)]
pub struct SkuQuoteResponse {
    pub sku_code: String,
    pub category_code: String,
    pub category_name: String,
    pub slot_name: String,
    pub time_range: String,
    pub reservation_date: String,
    pub quote: PriceQuoteResponse,
}

impl SkuQuoteResponse {
    pub fn from_sku_quote(priced: &SkuQuote, currency: &str) -> Self {
        Self {
            sku_code: priced.sku.sku_code.clone(),
            category_code: priced.sku.category_code.clone(),
            category_name: crate::models::category_display_name(&priced.sku.category_code),
            slot_name: priced.sku.slot_name.clone(),
            time_range: priced.sku.time_range(),
            reservation_date: priced.date.to_string(),
            quote: PriceQuoteResponse::from_quote(&priced.quote, currency),
        }
    }
}

/// One priced time slot in the offers listing
#[derive(Debug, Serialize)]
pub struct TimeSlotOfferResponse {
    pub slot_name: String,
    pub time_range: String,
    pub sku_codes: Vec<String>,
    pub available_count: i32,
    pub quote: PriceQuoteResponse,
}

/// Offers for one category
#[derive(Debug, Serialize)]
pub struct CategoryOffersResponse {
    pub category_code: String,
    pub category_name: String,
    pub time_slots: Vec<TimeSlotOfferResponse>,
}

impl CategoryOffersResponse {
    pub fn from_offers(offers: &CategoryOffers, currency: &str) -> Self {
        Self {
            category_code: offers.category_code.clone(),
            category_name: offers.category_name.clone(),
            time_slots: offers
                .time_slots
                .iter()
                .map(|t: &TimeSlotOffer| TimeSlotOfferResponse {
                    slot_name: t.slot_name.clone(),
                    time_range: t.time_range.clone(),
                    sku_codes: t.sku_codes.clone(),
                    available_count: t.available_count,
                    quote: PriceQuoteResponse::from_quote(&t.quote, currency),
                })
                .collect(),
        }
    }
}

/// Response for the offers listing
#[derive(Debug, Serialize)]
pub struct OffersResponse {
    pub date: String,
    pub guest_count: i32,
    pub categories: Vec<CategoryOffersResponse>,
}

/// Category code and label
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub code: &'static str,
    pub name: &'static str,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
