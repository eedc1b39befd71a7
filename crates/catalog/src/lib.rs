//! `motoreserve-catalog` — Brand → Model → Vehicle catalog.
//!
//! Lookup and filtering of catalog records, with explicit soft-delete scoping.
//! Reads are pure; stock accounting lives in `motoreserve-stock` and never
//! goes through this crate.

pub mod brand;
pub mod image;
pub mod store;
pub mod vehicle;

pub use brand::{Brand, Model};
pub use image::{ImageRef, ImageStore, InMemoryImageStore};
pub use store::{CatalogStore, VehicleScope};
pub use vehicle::{Color, Vehicle, VehicleSpec};
