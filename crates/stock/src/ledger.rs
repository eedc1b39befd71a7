use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use motoreserve_core::{DomainError, DomainResult, VehicleId};

/// Per-vehicle stock cell. All reads and writes happen under the cell mutex.
#[derive(Debug)]
struct StockCell {
    quantity: u32,
}

/// The stock ledger: sole writer of vehicle stock quantities.
///
/// Layout: an outer map from vehicle to its cell, each cell behind its own
/// mutex. The outer lock is held only long enough to fetch the cell, so
/// operations on different vehicles never contend and every check-and-write
/// on one vehicle is serialized through the same guard.
#[derive(Debug, Default)]
pub struct StockLedger {
    cells: RwLock<HashMap<VehicleId, Arc<Mutex<StockCell>>>>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the stock cell for a vehicle with its initial intake.
    pub fn register(&self, vehicle_id: VehicleId, initial_quantity: u32) -> DomainResult<()> {
        let mut cells = self
            .cells
            .write()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;

        if cells.contains_key(&vehicle_id) {
            return Err(DomainError::conflict("vehicle already registered"));
        }

        cells.insert(
            vehicle_id,
            Arc::new(Mutex::new(StockCell {
                quantity: initial_quantity,
            })),
        );
        tracing::info!(vehicle = %vehicle_id, quantity = initial_quantity, "stock cell opened");
        Ok(())
    }

    fn cell(&self, vehicle_id: VehicleId) -> DomainResult<Arc<Mutex<StockCell>>> {
        let cells = self
            .cells
            .read()
            .map_err(|_| DomainError::conflict("ledger lock poisoned"))?;
        cells.get(&vehicle_id).cloned().ok_or(DomainError::NotFound)
    }

    /// Atomic check-and-decrement: consume one unit of stock.
    ///
    /// The only path by which stock decreases. Succeeds only if the quantity
    /// is positive at the instant of the check; returns the new quantity.
    pub fn reserve_unit(&self, vehicle_id: VehicleId) -> DomainResult<u32> {
        let cell = self.cell(vehicle_id)?;
        let mut cell = cell
            .lock()
            .map_err(|_| DomainError::conflict("stock guard poisoned"))?;

        if cell.quantity == 0 {
            return Err(DomainError::out_of_stock());
        }
        cell.quantity -= 1;
        tracing::debug!(vehicle = %vehicle_id, quantity = cell.quantity, "unit reserved");
        Ok(cell.quantity)
    }

    /// Return one held unit to stock; returns the new quantity.
    ///
    /// Not idempotent: the reservation engine's terminal-state rule guarantees
    /// at most one release per reservation.
    pub fn release_unit(&self, vehicle_id: VehicleId) -> DomainResult<u32> {
        let cell = self.cell(vehicle_id)?;
        let mut cell = cell
            .lock()
            .map_err(|_| DomainError::conflict("stock guard poisoned"))?;

        cell.quantity = cell
            .quantity
            .checked_add(1)
            .ok_or_else(|| DomainError::conflict("stock quantity overflow"))?;
        tracing::debug!(vehicle = %vehicle_id, quantity = cell.quantity, "unit released");
        Ok(cell.quantity)
    }

    /// Administrative restock, outside the reservation protocol.
    ///
    /// `delta` must be strictly positive; returns the new quantity.
    pub fn adjust_intake(&self, vehicle_id: VehicleId, delta: i64) -> DomainResult<u32> {
        if delta <= 0 {
            return Err(DomainError::invalid_delta(format!(
                "restock delta must be positive, got {delta}"
            )));
        }
        let delta = u32::try_from(delta)
            .map_err(|_| DomainError::invalid_delta(format!("restock delta too large: {delta}")))?;

        let cell = self.cell(vehicle_id)?;
        let mut cell = cell
            .lock()
            .map_err(|_| DomainError::conflict("stock guard poisoned"))?;

        cell.quantity = cell
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::conflict("stock quantity overflow"))?;
        tracing::info!(vehicle = %vehicle_id, delta, quantity = cell.quantity, "intake adjusted");
        Ok(cell.quantity)
    }

    /// Current quantity for a vehicle.
    pub fn quantity(&self, vehicle_id: VehicleId) -> DomainResult<u32> {
        let cell = self.cell(vehicle_id)?;
        let cell = cell
            .lock()
            .map_err(|_| DomainError::conflict("stock guard poisoned"))?;
        Ok(cell.quantity)
    }
}
