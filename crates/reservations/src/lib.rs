//! `motoreserve-reservations` — the reservation engine.
//!
//! Owns the reservation state machine (`pending → confirmed | cancelled`) and
//! its coupling to the stock ledger: creation holds a unit, cancellation
//! releases it, confirmation keeps it held. Transitions are serialized
//! per-reservation so a held unit is released at most once.

pub mod engine;
pub mod reservation;

pub use engine::ReservationEngine;
pub use reservation::{Reservation, ReservationStatus};
