//! `motoreserve-query` — read-side aggregation.
//!
//! Joins the catalog, the stock ledger and the reservation engine into the
//! rows reporting/admin consumers display: availability listings, per-vehicle
//! reservation counts and the denormalized vehicle overview.

pub mod facade;

pub use facade::{AvailabilityFilter, QueryFacade, VehicleOverview};
