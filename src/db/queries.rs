//! Database queries for reservations and modification requests
//!
//! Multi-step workflows run inside one transaction so a failure at any step
//! leaves nothing behind.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    generate_reservation_number, ModificationRequest, ModificationStatus, NewModificationRequest,
    NewReservation, Reservation, ReservationStatus,
};
use crate::pricing::PricingError;

const RESERVATION_COLUMNS: &str = r#"
    id, reservation_number, name, phone, email, reservation_date,
    sku_code, guest_count, total_amount, status, special_requests, created_at
"#;

/// Get a reservation by id
pub async fn get_reservation(pool: &PgPool, id: Uuid) -> Result<Reservation> {
    let sql = format!("SELECT {} FROM reservations WHERE id = $1", RESERVATION_COLUMNS);

    sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))
}

/// Customer lookup by reservation number and phone
pub async fn lookup_reservation(
    pool: &PgPool,
    reservation_number: &str,
    phone: &str,
) -> Result<Reservation> {
    let sql = format!(
        "SELECT {} FROM reservations WHERE reservation_number = $1 AND phone = $2",
        RESERVATION_COLUMNS
    );

    sqlx::query_as::<_, Reservation>(&sql)
        .bind(reservation_number)
        .bind(phone)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {}", reservation_number)))
}

/// Attempts at a fresh reservation number before giving up
const RESERVATION_NUMBER_ATTEMPTS: usize = 5;

/// Insert a new pending reservation, drawing a new number whenever the
/// current one is already taken
pub async fn create_reservation(pool: &PgPool, mut new: NewReservation) -> Result<Reservation> {
    for attempt in 1..=RESERVATION_NUMBER_ATTEMPTS {
        match insert_reservation(pool, &new).await {
            Err(AppError::Database(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                tracing::warn!(
                    "Reservation number {} already taken (attempt {})",
                    new.reservation_number,
                    attempt
                );
                new.reservation_number = generate_reservation_number(new.reservation_date);
            }
            other => return other,
        }
    }

    Err(AppError::Conflict(format!(
        "No free reservation number for {}",
        new.reservation_date
    )))
}

/// Insert a new pending reservation with the number it carries
async fn insert_reservation(pool: &PgPool, new: &NewReservation) -> Result<Reservation> {
    let sql = format!(
        r#"
        INSERT INTO reservations (
            reservation_number, name, phone, email, reservation_date,
            sku_code, guest_count, total_amount, status, special_requests
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        RESERVATION_COLUMNS
    );

    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(&new.reservation_number)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(new.reservation_date)
        .bind(&new.sku_code)
        .bind(new.guest_count)
        .bind(new.total_amount)
        .bind(ReservationStatus::Pending.as_str())
        .bind(&new.special_requests)
        .fetch_one(pool)
        .await?;

    Ok(reservation)
}

/// Lock a reservation row and check that it may move to `next`
async fn lock_for_transition(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    next: ReservationStatus,
) -> Result<(Reservation, ReservationStatus)> {
    let sql = format!(
        "SELECT {} FROM reservations WHERE id = $1 FOR UPDATE",
        RESERVATION_COLUMNS
    );

    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))?;

    let current = reservation
        .status()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !current.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Reservation {} cannot move from {} to {}",
            reservation.reservation_number, current, next
        )));
    }

    Ok((reservation, current))
}

async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: ReservationStatus,
) -> Result<Reservation> {
    let sql = format!(
        "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {}",
        RESERVATION_COLUMNS
    );

    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&mut **tx)
        .await?;

    Ok(reservation)
}

/// Confirm a pending reservation and claim its unit of capacity.
///
/// The capacity claim is a single conditional update, so two confirmations
/// racing for the last unit cannot both succeed.
pub async fn confirm_reservation(pool: &PgPool, id: Uuid) -> Result<Reservation> {
    let mut tx = pool.begin().await?;

    let (reservation, _) = lock_for_transition(&mut tx, id, ReservationStatus::Confirmed).await?;

    let claimed = sqlx::query(
        r#"
        UPDATE availability
        SET booked_slots = booked_slots + 1
        WHERE sku_code = $1
          AND date = $2
          AND blocked = false
          AND booked_slots < available_slots
          AND EXISTS (
              SELECT 1
              FROM sku_catalog s
              JOIN resource_catalog r ON r.internal_code = s.resource_code
              WHERE s.sku_code = availability.sku_code
                AND s.active = true
                AND r.active = true
          )
        "#,
    )
    .bind(&reservation.sku_code)
    .bind(reservation.reservation_date)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        // Dropping the transaction rolls it back
        return Err(PricingError::SlotUnavailable {
            sku_code: reservation.sku_code,
            date: reservation.reservation_date.to_string(),
        }
        .into());
    }

    let confirmed = set_status(&mut tx, id, ReservationStatus::Confirmed).await?;
    tx.commit().await?;

    tracing::info!("Reservation {} confirmed", confirmed.reservation_number);
    Ok(confirmed)
}

/// Cancel a reservation, releasing its unit if it had been confirmed
pub async fn cancel_reservation(pool: &PgPool, id: Uuid) -> Result<Reservation> {
    let mut tx = pool.begin().await?;

    let (reservation, current) =
        lock_for_transition(&mut tx, id, ReservationStatus::Cancelled).await?;

    if current == ReservationStatus::Confirmed {
        sqlx::query(
            r#"
            UPDATE availability
            SET booked_slots = booked_slots - 1
            WHERE sku_code = $1
              AND date = $2
              AND booked_slots > 0
            "#,
        )
        .bind(&reservation.sku_code)
        .bind(reservation.reservation_date)
        .execute(&mut *tx)
        .await?;
    }

    let cancelled = set_status(&mut tx, id, ReservationStatus::Cancelled).await?;
    tx.commit().await?;

    tracing::info!(
        "Reservation {} cancelled (was {})",
        cancelled.reservation_number,
        current
    );
    Ok(cancelled)
}

/// Store a modification request for admin review. The reservation itself is untouched.
pub async fn insert_modification_request(
    pool: &PgPool,
    new: &NewModificationRequest,
) -> Result<ModificationRequest> {
    let request = sqlx::query_as::<_, ModificationRequest>(
        r#"
        INSERT INTO reservation_modifications (
            reservation_id, modification_type, status,
            new_reservation_date, new_sku_code, new_guest_count,
            new_total_amount, price_difference, reason
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING
            id, reservation_id, modification_type, status,
            new_reservation_date, new_sku_code, new_guest_count,
            new_total_amount, price_difference, reason, created_at
        "#,
    )
    .bind(new.reservation_id)
    .bind(new.modification_type.as_str())
    .bind(ModificationStatus::Pending.as_str())
    .bind(new.new_reservation_date)
    .bind(&new.new_sku_code)
    .bind(new.new_guest_count)
    .bind(new.new_total_amount)
    .bind(new.price_difference)
    .bind(&new.reason)
    .fetch_one(pool)
    .await?;

    Ok(request)
}
