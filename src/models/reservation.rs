//! Reservation and modification-request models

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reservation lifecycle: `pending -> confirmed | cancelled`, `confirmed -> cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "대기",
            ReservationStatus::Confirmed => "확정",
            ReservationStatus::Cancelled => "취소",
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for status strings the database should never contain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for ReservationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(UnknownVariant {
                kind: "reservation status",
                value: other.to_string(),
            }),
        }
    }
}

/// Reservation from `reservations`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: Uuid,
    pub reservation_number: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub reservation_date: NaiveDate,
    pub sku_code: String,
    pub guest_count: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    pub status: String,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn status(&self) -> Result<ReservationStatus, UnknownVariant> {
        self.status.parse()
    }
}

/// Fields needed to insert a new reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub reservation_number: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub reservation_date: NaiveDate,
    pub sku_code: String,
    pub guest_count: i32,
    pub total_amount: Decimal,
    pub special_requests: Option<String>,
}

/// Human-friendly reservation number: `OSO` + date + four random digits
pub fn generate_reservation_number(date: NaiveDate) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("OSO{}{:04}", date.format("%y%m%d"), suffix)
}

/// Kinds of change a customer can request on an existing reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    ChangeDate,
    ChangeTime,
    ChangeGuests,
    Cancel,
    PartialRefund,
}

impl ModificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationType::ChangeDate => "change_date",
            ModificationType::ChangeTime => "change_time",
            ModificationType::ChangeGuests => "change_guests",
            ModificationType::Cancel => "cancel",
            ModificationType::PartialRefund => "partial_refund",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModificationType::ChangeDate => "날짜 변경",
            ModificationType::ChangeTime => "시간 변경",
            ModificationType::ChangeGuests => "인원 변경",
            ModificationType::Cancel => "예약 취소",
            ModificationType::PartialRefund => "부분 환불",
        }
    }

    /// Whether the change needs a fresh quote from the pricing engine
    pub fn requires_reprice(&self) -> bool {
        matches!(
            self,
            ModificationType::ChangeDate | ModificationType::ChangeTime | ModificationType::ChangeGuests
        )
    }
}

/// Admin workflow state of a modification request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationStatus {
    Pending,
    Approved,
    Rejected,
    Processing,
    Completed,
}

impl ModificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationStatus::Pending => "pending",
            ModificationStatus::Approved => "approved",
            ModificationStatus::Rejected => "rejected",
            ModificationStatus::Processing => "processing",
            ModificationStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModificationStatus::Pending => "승인 대기",
            ModificationStatus::Approved => "승인됨",
            ModificationStatus::Rejected => "거부됨",
            ModificationStatus::Processing => "처리 중",
            ModificationStatus::Completed => "완료",
        }
    }
}

/// Modification request from `reservation_modifications`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModificationRequest {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub modification_type: String,
    pub status: String,
    pub new_reservation_date: Option<NaiveDate>,
    pub new_sku_code: Option<String>,
    pub new_guest_count: Option<i32>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub new_total_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub price_difference: Option<Decimal>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a modification request
#[derive(Debug, Clone)]
pub struct NewModificationRequest {
    pub reservation_id: Uuid,
    pub modification_type: ModificationType,
    pub new_reservation_date: Option<NaiveDate>,
    pub new_sku_code: Option<String>,
    pub new_guest_count: Option<i32>,
    pub new_total_amount: Option<Decimal>,
    pub price_difference: Option<Decimal>,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<ReservationStatus>(), Ok(ReservationStatus::Pending));
        assert_eq!("confirmed".parse::<ReservationStatus>(), Ok(ReservationStatus::Confirmed));
        assert_eq!("cancelled".parse::<ReservationStatus>(), Ok(ReservationStatus::Cancelled));

        let err = "completed".parse::<ReservationStatus>().unwrap_err();
        assert_eq!(err.value, "completed");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ReservationStatus::Pending.display_name(), "대기");
        assert_eq!(ReservationStatus::Confirmed.display_name(), "확정");
        assert_eq!(ReservationStatus::Cancelled.display_name(), "취소");
        assert_eq!(ReservationStatus::Confirmed.to_string(), "confirmed");
    }

    #[test]
    fn test_modification_labels() {
        assert_eq!(ModificationType::ChangeGuests.display_name(), "인원 변경");
        assert_eq!(ModificationType::PartialRefund.as_str(), "partial_refund");
        assert_eq!(ModificationStatus::Pending.display_name(), "승인 대기");
        assert_eq!(ModificationStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_modification_reprice() {
        assert!(ModificationType::ChangeGuests.requires_reprice());
        assert!(ModificationType::ChangeDate.requires_reprice());
        assert!(!ModificationType::Cancel.requires_reprice());
        assert!(!ModificationType::PartialRefund.requires_reprice());
    }

    #[test]
    fn test_modification_type_json() {
        let t: ModificationType = serde_json::from_str(r#""change_guests""#).unwrap();
        assert_eq!(t, ModificationType::ChangeGuests);
    }

    #[test]
    fn test_reservation_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let number = generate_reservation_number(date);
        assert!(number.starts_with("OSO250809"));
        assert_eq!(number.len(), 13);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
