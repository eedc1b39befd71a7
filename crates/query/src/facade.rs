use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;

use motoreserve_catalog::{CatalogStore, Color, Vehicle, VehicleScope};
use motoreserve_core::{BrandId, DomainError, DomainResult, ModelId, VehicleId};
use motoreserve_reservations::ReservationEngine;
use motoreserve_stock::StockLedger;

/// Optional brand/model narrowing for availability listings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityFilter {
    pub brand_id: Option<BrandId>,
    pub model_id: Option<ModelId>,
}

/// Denormalized per-vehicle row for reporting/admin tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleOverview {
    pub vehicle_id: VehicleId,
    pub brand_name: String,
    pub model_name: String,
    pub color: Color,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub stock_quantity: u32,
    /// Historical total across every status, cancelled included.
    pub reservation_count: u64,
    pub available: bool,
}

/// Read-only aggregation over catalog, ledger and reservation state.
///
/// Every call recomputes from current state: re-querying yields the current
/// snapshot, never a cached one.
#[derive(Debug)]
pub struct QueryFacade {
    catalog: Arc<CatalogStore>,
    ledger: Arc<StockLedger>,
    engine: Arc<ReservationEngine>,
}

impl QueryFacade {
    pub fn new(
        catalog: Arc<CatalogStore>,
        ledger: Arc<StockLedger>,
        engine: Arc<ReservationEngine>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            engine,
        }
    }

    /// Historical reservation total for a vehicle, any status.
    ///
    /// Mirrors a denormalized counter: a vehicle nobody ever reserved (or
    /// that does not exist) counts zero.
    pub fn count_reservations_for_vehicle(&self, vehicle_id: VehicleId) -> DomainResult<u64> {
        Ok(self.engine.list_for_vehicle(vehicle_id)?.len() as u64)
    }

    /// Vehicles with stock to sell, newest first.
    ///
    /// Keeps vehicles that are not soft-deleted and have `stock_quantity > 0`.
    /// Unknown filter ids fail with `NotFound`.
    pub fn list_available_vehicles(
        &self,
        filter: AvailabilityFilter,
    ) -> DomainResult<Vec<Vehicle>> {
        if let Some(brand_id) = filter.brand_id {
            self.catalog.get_brand(brand_id)?;
        }
        if let Some(model_id) = filter.model_id {
            self.catalog.get_model(model_id)?;
        }

        let mut out = Vec::new();
        for vehicle in self.catalog.list_vehicles(VehicleScope::Active)? {
            if let Some(model_id) = filter.model_id {
                if vehicle.model_id() != model_id {
                    continue;
                }
            }
            if let Some(brand_id) = filter.brand_id {
                let model = self.catalog.get_model(vehicle.model_id())?;
                if model.brand_id() != brand_id {
                    continue;
                }
            }
            if self.quantity_or_zero(vehicle.id_typed())? == 0 {
                continue;
            }
            out.push(vehicle);
        }

        out.sort_by_key(|v| (Reverse(v.created_at()), *v.id_typed().as_uuid()));
        Ok(out)
    }

    /// The admin table row for one vehicle: brand and model names, price,
    /// color, current stock, historical reservation count, availability.
    ///
    /// Soft-deleted vehicles are visible here (administrative view); they
    /// simply report `available: false`.
    pub fn vehicle_overview(&self, vehicle_id: VehicleId) -> DomainResult<VehicleOverview> {
        let vehicle = self
            .catalog
            .get_vehicle(vehicle_id, VehicleScope::IncludeDeleted)?;
        let model = self.catalog.get_model(vehicle.model_id())?;
        let brand = self.catalog.get_brand(model.brand_id())?;

        let stock_quantity = self.quantity_or_zero(vehicle_id)?;
        let reservation_count = self.count_reservations_for_vehicle(vehicle_id)?;

        Ok(VehicleOverview {
            vehicle_id,
            brand_name: brand.name().to_string(),
            model_name: model.name().to_string(),
            color: vehicle.color(),
            price: vehicle.price(),
            stock_quantity,
            reservation_count,
            available: stock_quantity > 0 && !vehicle.is_deleted(),
        })
    }

    // A vehicle without a stock cell has nothing to sell.
    fn quantity_or_zero(&self, vehicle_id: VehicleId) -> DomainResult<u32> {
        match self.ledger.quantity(vehicle_id) {
            Ok(q) => Ok(q),
            Err(DomainError::NotFound) => Ok(0),
            Err(e) => Err(e),
        }
    }
}
