//! Database access for reservations

pub mod queries;

pub use queries::*;
