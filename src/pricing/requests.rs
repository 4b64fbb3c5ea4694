//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::models::{Resource, TimeSlot};

/// Request to price inline resource/time-slot data (no catalog lookup)
#[derive(Debug, Deserialize)]
pub struct CalculatePriceRequest {
    pub resource: Resource,
    #[serde(default)]
    pub time_slot: TimeSlot,
    pub reservation_date: String,
    #[serde(default = "default_guest_count")]
    pub guest_count: i32,
}

/// Request to quote a catalog SKU on a date
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub sku_code: String,
    pub reservation_date: String,
    #[serde(default = "default_guest_count")]
    pub guest_count: i32,
}

/// Query parameters for the offers listing
#[derive(Debug, Deserialize)]
pub struct OffersQuery {
    pub date: String,
    #[serde(default = "default_guest_count")]
    pub guests: i32,
}

fn default_guest_count() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculate_request_minimal() {
        let req: CalculatePriceRequest = serde_json::from_str(
            r#"{
                "resource": {"category_code": "PR", "base_price": "100000"},
                "reservation_date": "2025-03-15"
            }"#,
        )
        .unwrap();

        assert_eq!(req.resource.base_price, dec!(100000));
        assert_eq!(req.time_slot, TimeSlot::default());
        assert_eq!(req.guest_count, 1);
    }

    #[test]
    fn test_quote_request() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{"sku_code": "VP01-D", "reservation_date": "2025-03-15", "guest_count": 5}"#,
        )
        .unwrap();
        assert_eq!(req.sku_code, "VP01-D");
        assert_eq!(req.guest_count, 5);
    }
}
