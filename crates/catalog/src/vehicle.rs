use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use motoreserve_core::{DomainError, DomainResult, Entity, ModelId, ValueObject, VehicleId};

use crate::image::ImageRef;

/// Closed set of catalog colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Yellow,
    Red,
    Blue,
    Green,
    Other,
}

impl ValueObject for Color {}

/// Input for registering a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub model_id: ModelId,
    pub color: Color,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Engine displacement in cm3.
    pub displacement_cc: u32,
    /// Fuel/cargo capacity.
    pub capacity: u32,
    pub description: String,
    pub image: Option<ImageRef>,
}

/// A catalog vehicle.
///
/// Descriptive record only: the stock quantity lives in the stock ledger's
/// per-vehicle cell, so no code path can write it through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    model_id: ModelId,
    color: Color,
    price: u64,
    displacement_cc: u32,
    capacity: u32,
    description: String,
    image: Option<ImageRef>,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleId, spec: VehicleSpec, now: DateTime<Utc>) -> DomainResult<Self> {
        if spec.price == 0 {
            return Err(DomainError::validation("price must be positive"));
        }
        if spec.displacement_cc == 0 {
            return Err(DomainError::validation("displacement must be positive"));
        }
        if spec.capacity == 0 {
            return Err(DomainError::validation("capacity must be positive"));
        }
        if spec.description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }

        Ok(Self {
            id,
            model_id: spec.model_id,
            color: spec.color,
            price: spec.price,
            displacement_cc: spec.displacement_cc,
            capacity: spec.capacity,
            description: spec.description.trim().to_string(),
            image: spec.image,
            deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> VehicleId {
        self.id
    }

    pub fn model_id(&self) -> ModelId {
        self.model_id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn displacement_cc(&self) -> u32 {
        self.displacement_cc
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = now;
    }

    pub(crate) fn restore(&mut self, now: DateTime<Utc>) {
        self.deleted = false;
        self.updated_at = now;
    }

    pub(crate) fn set_image(&mut self, image: ImageRef, now: DateTime<Utc>) {
        self.image = Some(image);
        self.updated_at = now;
    }
}

impl Entity for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> VehicleSpec {
        VehicleSpec {
            model_id: ModelId::new(),
            color: Color::Red,
            price: 1_250_000,
            displacement_cc: 689,
            capacity: 14,
            description: "Naked twin, one owner".to_string(),
            image: None,
        }
    }

    #[test]
    fn new_vehicle_starts_live() {
        let v = Vehicle::new(VehicleId::new(), spec(), Utc::now()).unwrap();
        assert!(!v.is_deleted());
        assert_eq!(v.color(), Color::Red);
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut s = spec();
        s.price = 0;
        let err = Vehicle::new(VehicleId::new(), s, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut s = spec();
        s.description = " \n".to_string();
        let err = Vehicle::new(VehicleId::new(), s, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn color_serializes_lowercase() {
        let json = serde_json::to_string(&Color::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
    }
}
