use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use motoreserve_core::{BrandId, DomainError, DomainResult, ModelId, VehicleId};

use crate::brand::{Brand, Model};
use crate::image::ImageRef;
use crate::vehicle::{Vehicle, VehicleSpec};

/// Soft-delete scoping for vehicle lookups.
///
/// `Active` is the normal read path; `IncludeDeleted` is the explicit opt-in
/// for administrative recovery views. There is no implicit query-time scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VehicleScope {
    Active,
    IncludeDeleted,
}

/// In-memory catalog of brands, models and vehicles.
///
/// Reads return cloned snapshots; the store never exposes its records by
/// reference, so callers cannot mutate catalog state behind its back.
#[derive(Debug, Default)]
pub struct CatalogStore {
    brands: RwLock<HashMap<BrandId, Brand>>,
    models: RwLock<HashMap<ModelId, Model>>,
    vehicles: RwLock<HashMap<VehicleId, Vehicle>>,
}

fn poisoned(what: &str) -> DomainError {
    DomainError::conflict(format!("{what} lock poisoned"))
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a brand.
    pub fn add_brand(&self, name: &str) -> DomainResult<Brand> {
        let brand = Brand::new(BrandId::new(), name, Utc::now())?;
        let mut brands = self.brands.write().map_err(|_| poisoned("brands"))?;
        brands.insert(brand.id_typed(), brand.clone());
        tracing::info!(brand = %brand.id_typed(), name = brand.name(), "brand registered");
        Ok(brand)
    }

    /// Register a model under an existing brand.
    pub fn add_model(&self, brand_id: BrandId, name: &str) -> DomainResult<Model> {
        {
            let brands = self.brands.read().map_err(|_| poisoned("brands"))?;
            if !brands.contains_key(&brand_id) {
                return Err(DomainError::not_found());
            }
        }

        let model = Model::new(ModelId::new(), brand_id, name, Utc::now())?;
        let mut models = self.models.write().map_err(|_| poisoned("models"))?;
        models.insert(model.id_typed(), model.clone());
        tracing::info!(model = %model.id_typed(), brand = %brand_id, name = model.name(), "model registered");
        Ok(model)
    }

    /// Register a vehicle under an existing model.
    pub fn add_vehicle(&self, spec: VehicleSpec) -> DomainResult<Vehicle> {
        {
            let models = self.models.read().map_err(|_| poisoned("models"))?;
            if !models.contains_key(&spec.model_id) {
                return Err(DomainError::not_found());
            }
        }

        let vehicle = Vehicle::new(VehicleId::new(), spec, Utc::now())?;
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned("vehicles"))?;
        vehicles.insert(vehicle.id_typed(), vehicle.clone());
        tracing::info!(vehicle = %vehicle.id_typed(), model = %vehicle.model_id(), "vehicle registered");
        Ok(vehicle)
    }

    pub fn get_brand(&self, brand_id: BrandId) -> DomainResult<Brand> {
        let brands = self.brands.read().map_err(|_| poisoned("brands"))?;
        brands.get(&brand_id).cloned().ok_or(DomainError::NotFound)
    }

    pub fn get_model(&self, model_id: ModelId) -> DomainResult<Model> {
        let models = self.models.read().map_err(|_| poisoned("models"))?;
        models.get(&model_id).cloned().ok_or(DomainError::NotFound)
    }

    /// List a brand's models, ordered by name.
    ///
    /// Unknown brand is `NotFound`; a brand without models yields an empty
    /// vec, which is not an error.
    pub fn list_models_for_brand(&self, brand_id: BrandId) -> DomainResult<Vec<Model>> {
        {
            let brands = self.brands.read().map_err(|_| poisoned("brands"))?;
            if !brands.contains_key(&brand_id) {
                return Err(DomainError::not_found());
            }
        }

        let models = self.models.read().map_err(|_| poisoned("models"))?;
        let mut out: Vec<Model> = models
            .values()
            .filter(|m| m.brand_id() == brand_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.id_typed().as_uuid().cmp(b.id_typed().as_uuid()))
        });
        Ok(out)
    }

    /// Look up a vehicle under the given soft-delete scope.
    ///
    /// A soft-deleted vehicle under `Active` scope is indistinguishable from
    /// an absent one: both are `NotFound`.
    pub fn get_vehicle(&self, vehicle_id: VehicleId, scope: VehicleScope) -> DomainResult<Vehicle> {
        let vehicles = self.vehicles.read().map_err(|_| poisoned("vehicles"))?;
        let vehicle = vehicles.get(&vehicle_id).ok_or(DomainError::NotFound)?;

        if vehicle.is_deleted() && scope == VehicleScope::Active {
            return Err(DomainError::not_found());
        }
        Ok(vehicle.clone())
    }

    /// Snapshot of all vehicles under the given scope.
    pub fn list_vehicles(&self, scope: VehicleScope) -> DomainResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().map_err(|_| poisoned("vehicles"))?;
        Ok(vehicles
            .values()
            .filter(|v| scope == VehicleScope::IncludeDeleted || !v.is_deleted())
            .cloned()
            .collect())
    }

    /// Soft-delete a vehicle. The record stays recoverable via
    /// `VehicleScope::IncludeDeleted` and `restore_vehicle`.
    pub fn soft_delete_vehicle(&self, vehicle_id: VehicleId) -> DomainResult<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned("vehicles"))?;
        let vehicle = vehicles.get_mut(&vehicle_id).ok_or(DomainError::NotFound)?;
        vehicle.mark_deleted(Utc::now());
        tracing::info!(vehicle = %vehicle_id, "vehicle soft-deleted");
        Ok(())
    }

    /// Bring a soft-deleted vehicle back into the active catalog.
    pub fn restore_vehicle(&self, vehicle_id: VehicleId) -> DomainResult<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned("vehicles"))?;
        let vehicle = vehicles.get_mut(&vehicle_id).ok_or(DomainError::NotFound)?;
        vehicle.restore(Utc::now());
        tracing::info!(vehicle = %vehicle_id, "vehicle restored");
        Ok(())
    }

    /// Attach a stored image reference to a vehicle.
    pub fn attach_image(&self, vehicle_id: VehicleId, image: ImageRef) -> DomainResult<()> {
        let mut vehicles = self.vehicles.write().map_err(|_| poisoned("vehicles"))?;
        let vehicle = vehicles.get_mut(&vehicle_id).ok_or(DomainError::NotFound)?;
        tracing::debug!(vehicle = %vehicle_id, image = image.as_str(), "image attached");
        vehicle.set_image(image, Utc::now());
        Ok(())
    }
}
