//! Reservation route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    generate_reservation_number, ModificationRequest, ModificationStatus, ModificationType,
    NewModificationRequest, NewReservation, Reservation, ReservationStatus,
};
use crate::pricing::responses::PriceQuoteResponse;
use crate::pricing::services::{self, parse_reservation_date, PricingError, SkuQuote};
use crate::pricing::PriceChange;
use crate::AppState;

/// Reservation routes, mounted under `/api/reservations`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/lookup", get(lookup))
        .route("/:id/confirm", post(confirm))
        .route("/:id/cancel", post(cancel))
        .route("/:id/modifications", post(request_modification))
}

/// Booking form submission
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub reservation_date: String,
    /// Exact SKU; when absent the first free SKU of `category_code` + `slot_name` is used
    #[serde(default)]
    pub sku_code: Option<String>,
    #[serde(default)]
    pub category_code: Option<String>,
    #[serde(default)]
    pub slot_name: Option<String>,
    pub guest_count: i32,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Query parameters for customer lookup
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub reservation_number: String,
    pub phone: String,
}

/// Customer change request
#[derive(Debug, Deserialize)]
pub struct ModificationBody {
    pub modification_type: ModificationType,
    pub phone: String,
    #[serde(default)]
    pub new_reservation_date: Option<String>,
    #[serde(default)]
    pub new_sku_code: Option<String>,
    #[serde(default)]
    pub new_guest_count: Option<i32>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<PriceQuoteResponse>,
}

impl ReservationResponse {
    fn new(reservation: Reservation, quote: Option<PriceQuoteResponse>) -> Self {
        let status_label = reservation
            .status()
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|_| reservation.status.clone());
        Self {
            reservation,
            status_label,
            quote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModificationResponse {
    pub request: ModificationRequest,
    pub type_label: &'static str,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change: Option<PriceChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<PriceQuoteResponse>,
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Create a pending reservation priced at submission time
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>)> {
    let name = required(&req.name, "name")?;
    let phone = required(&req.phone, "phone")?;
    let date = parse_reservation_date(&req.reservation_date)?;

    let sku_code = match optional(req.sku_code) {
        Some(code) => code,
        None => {
            let (Some(category), Some(slot_name)) = (req.category_code, req.slot_name) else {
                return Err(AppError::BadRequest(
                    "sku_code or category_code and slot_name are required".to_string(),
                ));
            };
            let offers =
                services::available_offers(&state.db, &state.cache, date, req.guest_count).await?;
            services::find_available_sku(&offers, &category, &slot_name)
                .map(str::to_string)
                .ok_or_else(|| PricingError::SlotUnavailable {
                    sku_code: format!("{}/{}", category, slot_name),
                    date: date.to_string(),
                })?
        }
    };

    let priced =
        services::quote_sku(&state.db, &state.cache, &sku_code, date, req.guest_count).await?;

    let new = NewReservation {
        reservation_number: generate_reservation_number(date),
        name,
        phone,
        email: optional(req.email),
        reservation_date: date,
        sku_code,
        guest_count: req.guest_count,
        total_amount: priced.quote.final_price,
        special_requests: optional(req.special_requests),
    };

    let reservation = db::create_reservation(&state.db, new).await?;
    tracing::info!(
        "Reservation {} created for {} on {} ({})",
        reservation.reservation_number,
        reservation.sku_code,
        reservation.reservation_date,
        reservation.total_amount
    );

    let quote = PriceQuoteResponse::from_quote(&priced.quote, &state.config.currency);
    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::new(reservation, Some(quote))),
    ))
}

/// Customer lookup by reservation number and phone
async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ReservationResponse>> {
    let reservation = db::lookup_reservation(
        &state.db,
        query.reservation_number.trim(),
        query.phone.trim(),
    )
    .await?;

    Ok(Json(ReservationResponse::new(reservation, None)))
}

/// Admin confirmation; claims capacity
async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = db::confirm_reservation(&state.db, id).await?;
    Ok(Json(ReservationResponse::new(reservation, None)))
}

/// Admin cancellation; releases capacity if it was claimed
async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = db::cancel_reservation(&state.db, id).await?;
    Ok(Json(ReservationResponse::new(reservation, None)))
}

/// File a change request. Price-affecting changes are re-quoted; nothing is applied until an admin approves.
async fn request_modification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ModificationBody>,
) -> Result<(StatusCode, Json<ModificationResponse>)> {
    let reservation = db::get_reservation(&state.db, id).await?;

    if reservation.phone != body.phone.trim() {
        return Err(AppError::NotFound(format!("Reservation {}", id)));
    }
    if reservation.status() == Ok(ReservationStatus::Cancelled) {
        return Err(AppError::Conflict(format!(
            "Reservation {} is already cancelled",
            reservation.reservation_number
        )));
    }

    let repriced: Option<(SkuQuote, PriceChange)> = match body.modification_type {
        ModificationType::ChangeGuests => {
            let guests = body.new_guest_count.ok_or_else(|| {
                AppError::BadRequest("new_guest_count is required".to_string())
            })?;
            Some(services::reprice_guest_change(&state.db, &state.cache, &reservation, guests).await?)
        }
        ModificationType::ChangeDate | ModificationType::ChangeTime => {
            let new_date = match body.new_reservation_date.as_deref() {
                Some(value) => parse_reservation_date(value)?,
                None if body.modification_type == ModificationType::ChangeTime => {
                    reservation.reservation_date
                }
                None => {
                    return Err(AppError::BadRequest(
                        "new_reservation_date is required".to_string(),
                    ))
                }
            };
            if body.modification_type == ModificationType::ChangeTime && body.new_sku_code.is_none() {
                return Err(AppError::BadRequest("new_sku_code is required".to_string()));
            }
            Some(
                services::reprice_date_change(
                    &state.db,
                    &state.cache,
                    &reservation,
                    new_date,
                    body.new_sku_code.as_deref(),
                )
                .await?,
            )
        }
        ModificationType::Cancel | ModificationType::PartialRefund => None,
    };

    let new = NewModificationRequest {
        reservation_id: reservation.id,
        modification_type: body.modification_type,
        new_reservation_date: repriced.as_ref().map(|(q, _)| q.date),
        new_sku_code: repriced.as_ref().map(|(q, _)| q.sku.sku_code.clone()),
        new_guest_count: repriced.as_ref().map(|(q, _)| q.quote.guest_count),
        new_total_amount: repriced.as_ref().map(|(_, c)| c.new_total),
        price_difference: repriced.as_ref().map(|(_, c)| c.difference),
        reason: optional(body.reason),
    };

    let request = db::insert_modification_request(&state.db, &new).await?;
    tracing::info!(
        "Modification {} ({}) requested for reservation {}",
        request.id,
        body.modification_type.as_str(),
        reservation.reservation_number
    );

    let currency = &state.config.currency;
    Ok((
        StatusCode::CREATED,
        Json(ModificationResponse {
            request,
            type_label: body.modification_type.display_name(),
            status_label: ModificationStatus::Pending.display_name(),
            quote: repriced
                .as_ref()
                .map(|(q, _)| PriceQuoteResponse::from_quote(&q.quote, currency)),
            price_change: repriced.map(|(_, c)| c),
        }),
    ))
}
