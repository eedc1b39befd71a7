//! `motoreserve-core` — foundation of the reservation core.
//!
//! Pure domain primitives: typed identifiers, the error model and the
//! `Entity`/`ValueObject` traits, plus process-level telemetry setup. No
//! storage or transport concerns live here.

pub mod entity;
pub mod error;
pub mod id;
pub mod telemetry;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BrandId, CustomerId, ModelId, ReservationId, VehicleId};
pub use value_object::ValueObject;
