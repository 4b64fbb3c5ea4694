//! Pricing engine module.
//!
//! Dynamic pricing for camping/BBQ SKUs: base price × time-of-day or weekend
//! multiplier plus per-extra-guest fees, capped by maximum occupancy.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_price, is_weekend, round_money, select_multiplier};
pub use models::{PriceChange, PriceQuote, Resource, TimeSlot};
pub use routes::router;
pub use services::{CategoryOffers, PricingError, SkuQuote, TimeSlotOffer};

pub use crate::models::category_display_name;
