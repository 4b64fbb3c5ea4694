//! HTTP handlers for the pricing API.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::models::CategoryCode;
use crate::AppState;

use super::calculators::compute_price;
use super::requests::{CalculatePriceRequest, OffersQuery, QuoteRequest};
use super::responses::{
    CategoryOffersResponse, CategoryResponse, OffersResponse, PriceQuoteResponse, SkuQuoteResponse,
};
use super::services::{self, parse_reservation_date, validate_guest_count};

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/quote", post(quote))
        .route("/offers", get(offers))
        .route("/categories", get(categories))
}

/// Price inline data with the engine; no catalog or availability lookup
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculatePriceRequest>,
) -> Result<Json<PriceQuoteResponse>> {
    let date = parse_reservation_date(&req.reservation_date)?;
    validate_guest_count(req.guest_count)?;
    req.resource.validate()?;

    let quote = compute_price(&req.resource, &req.time_slot, date, req.guest_count)?;

    Ok(Json(PriceQuoteResponse::from_quote(&quote, &state.config.currency)))
}

/// Quote a catalog SKU after checking it is bookable
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<SkuQuoteResponse>> {
    let date = parse_reservation_date(&req.reservation_date)?;

    let priced =
        services::quote_sku(&state.db, &state.cache, &req.sku_code, date, req.guest_count).await?;

    Ok(Json(SkuQuoteResponse::from_sku_quote(&priced, &state.config.currency)))
}

/// Offers for a date, grouped by category and time slot
async fn offers(
    State(state): State<AppState>,
    Query(query): Query<OffersQuery>,
) -> Result<Json<OffersResponse>> {
    let date = parse_reservation_date(&query.date)?;

    let offers = services::available_offers(&state.db, &state.cache, date, query.guests).await?;

    Ok(Json(OffersResponse {
        date: date.to_string(),
        guest_count: query.guests,
        categories: offers
            .iter()
            .map(|o| CategoryOffersResponse::from_offers(o, &state.config.currency))
            .collect(),
    }))
}

/// Category code to label table
async fn categories() -> Json<Vec<CategoryResponse>> {
    Json(
        CategoryCode::ALL
            .iter()
            .map(|c| CategoryResponse {
                code: c.as_code(),
                name: c.display_name(),
            })
            .collect(),
    )
}
