//! Database models

pub mod availability;
pub mod catalog;
pub mod reservation;

pub use availability::AvailabilitySlot;
pub use catalog::{category_display_name, format_time_slot, CategoryCode, SkuPricingRow};
pub use reservation::{
    generate_reservation_number, ModificationRequest, ModificationStatus, ModificationType,
    NewModificationRequest, NewReservation, Reservation, ReservationStatus,
};
