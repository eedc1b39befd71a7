use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{NaiveDate, Utc};

use motoreserve_catalog::{CatalogStore, VehicleScope};
use motoreserve_core::{CustomerId, DomainError, DomainResult, ReservationId, VehicleId};
use motoreserve_stock::StockLedger;

use crate::reservation::{Reservation, ReservationStatus};

/// The reservation engine.
///
/// Owns all reservations and enforces the state machine. Each reservation
/// sits behind its own mutex; the transition check, the ledger call and the
/// status write for one reservation all happen under that guard, so no
/// partial state change is ever observable and a held unit is released at
/// most once.
#[derive(Debug)]
pub struct ReservationEngine {
    catalog: Arc<CatalogStore>,
    ledger: Arc<StockLedger>,
    reservations: RwLock<HashMap<ReservationId, Arc<Mutex<Reservation>>>>,
}

fn poisoned(what: &str) -> DomainError {
    DomainError::conflict(format!("{what} lock poisoned"))
}

impl ReservationEngine {
    pub fn new(catalog: Arc<CatalogStore>, ledger: Arc<StockLedger>) -> Self {
        Self {
            catalog,
            ledger,
            reservations: RwLock::new(HashMap::new()),
        }
    }

    /// Place a reservation: hold one unit of the vehicle's stock and persist
    /// a `pending` reservation.
    ///
    /// The ledger hold happens first; if it fails (`OutOfStock`, `NotFound`)
    /// nothing is persisted and the error surfaces unchanged.
    pub fn create_reservation(
        &self,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        reserved_for: NaiveDate,
    ) -> DomainResult<Reservation> {
        let today = Utc::now().date_naive();
        if reserved_for < today {
            return Err(DomainError::invalid_date(format!(
                "reservation date {reserved_for} is in the past"
            )));
        }

        // Existence check against the active catalog; soft-deleted vehicles
        // are not reservable.
        self.catalog.get_vehicle(vehicle_id, VehicleScope::Active)?;

        self.ledger.reserve_unit(vehicle_id)?;

        let reservation = Reservation::new(
            ReservationId::new(),
            vehicle_id,
            customer_id,
            reserved_for,
            Utc::now(),
        );

        // If the map is unusable the hold must not outlive the failed
        // persist: give the unit back before surfacing the error.
        let mut reservations = match self.reservations.write() {
            Ok(guard) => guard,
            Err(_) => {
                let _ = self.ledger.release_unit(vehicle_id);
                return Err(poisoned("reservations"));
            }
        };
        reservations.insert(
            reservation.id_typed(),
            Arc::new(Mutex::new(reservation.clone())),
        );

        tracing::info!(
            reservation = %reservation.id_typed(),
            vehicle = %vehicle_id,
            customer = %customer_id,
            %reserved_for,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Confirm a pending reservation. The held unit stays held; no ledger
    /// call is made.
    pub fn confirm(&self, reservation_id: ReservationId) -> DomainResult<Reservation> {
        let cell = self.cell(reservation_id)?;
        let mut reservation = cell.lock().map_err(|_| poisoned("reservation"))?;

        self.check_transition(&reservation, ReservationStatus::Confirmed)?;
        reservation.set_status(ReservationStatus::Confirmed, Utc::now());

        tracing::info!(reservation = %reservation_id, "reservation confirmed");
        Ok(reservation.clone())
    }

    /// Cancel a pending reservation, releasing its held unit.
    ///
    /// The ledger release and the status write form one logical operation:
    /// if the release fails the reservation stays in its prior state.
    pub fn cancel(&self, reservation_id: ReservationId) -> DomainResult<Reservation> {
        let cell = self.cell(reservation_id)?;
        let mut reservation = cell.lock().map_err(|_| poisoned("reservation"))?;

        self.check_transition(&reservation, ReservationStatus::Cancelled)?;

        // Release before the status write; on failure nothing has changed.
        self.ledger.release_unit(reservation.vehicle_id())?;
        reservation.set_status(ReservationStatus::Cancelled, Utc::now());

        tracing::info!(
            reservation = %reservation_id,
            vehicle = %reservation.vehicle_id(),
            "reservation cancelled, unit released"
        );
        Ok(reservation.clone())
    }

    /// Snapshot of one reservation.
    pub fn get(&self, reservation_id: ReservationId) -> DomainResult<Reservation> {
        let cell = self.cell(reservation_id)?;
        let reservation = cell.lock().map_err(|_| poisoned("reservation"))?;
        Ok(reservation.clone())
    }

    /// All reservations for a vehicle (any status), oldest first.
    pub fn list_for_vehicle(&self, vehicle_id: VehicleId) -> DomainResult<Vec<Reservation>> {
        self.list_where(|r| r.vehicle_id() == vehicle_id)
    }

    /// All reservations placed by a customer (any status), oldest first.
    pub fn list_for_customer(&self, customer_id: CustomerId) -> DomainResult<Vec<Reservation>> {
        self.list_where(|r| r.customer_id() == customer_id)
    }

    fn list_where(&self, pred: impl Fn(&Reservation) -> bool) -> DomainResult<Vec<Reservation>> {
        let reservations = self
            .reservations
            .read()
            .map_err(|_| poisoned("reservations"))?;

        let mut out = Vec::new();
        for cell in reservations.values() {
            let reservation = cell.lock().map_err(|_| poisoned("reservation"))?;
            if pred(&reservation) {
                out.push(reservation.clone());
            }
        }
        out.sort_by_key(|r| (r.created_at(), *r.id_typed().as_uuid()));
        Ok(out)
    }

    fn cell(&self, reservation_id: ReservationId) -> DomainResult<Arc<Mutex<Reservation>>> {
        let reservations = self
            .reservations
            .read()
            .map_err(|_| poisoned("reservations"))?;
        reservations
            .get(&reservation_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn check_transition(
        &self,
        reservation: &Reservation,
        next: ReservationStatus,
    ) -> DomainResult<()> {
        let current = reservation.status();
        if !current.can_transition_to(next) {
            return Err(DomainError::invalid_transition(format!(
                "{current:?} -> {next:?} is not allowed"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use motoreserve_catalog::{Color, VehicleSpec};

    struct Fixture {
        catalog: Arc<CatalogStore>,
        ledger: Arc<StockLedger>,
        engine: ReservationEngine,
        vehicle_id: VehicleId,
    }

    fn fixture(initial_stock: u32) -> Fixture {
        let catalog = Arc::new(CatalogStore::new());
        let ledger = Arc::new(StockLedger::new());

        let brand = catalog.add_brand("Yamaha").unwrap();
        let model = catalog.add_model(brand.id_typed(), "MT-07").unwrap();
        let vehicle = catalog
            .add_vehicle(VehicleSpec {
                model_id: model.id_typed(),
                color: Color::Blue,
                price: 1_250_000,
                displacement_cc: 689,
                capacity: 14,
                description: "Showroom unit".to_string(),
                image: None,
            })
            .unwrap();
        let vehicle_id = vehicle.id_typed();
        ledger.register(vehicle_id, initial_stock).unwrap();

        let engine = ReservationEngine::new(Arc::clone(&catalog), Arc::clone(&ledger));
        Fixture {
            catalog,
            ledger,
            engine,
            vehicle_id,
        }
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Days::new(1)
    }

    fn yesterday() -> NaiveDate {
        Utc::now().date_naive() - Days::new(1)
    }

    #[test]
    fn create_holds_one_unit_and_starts_pending() {
        let f = fixture(3);
        let reservation = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();

        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(reservation.vehicle_id(), f.vehicle_id);
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 2);
    }

    #[test]
    fn create_for_today_is_allowed() {
        let f = fixture(1);
        let today = Utc::now().date_naive();
        assert!(
            f.engine
                .create_reservation(f.vehicle_id, CustomerId::new(), today)
                .is_ok()
        );
    }

    #[test]
    fn past_date_fails_and_leaves_stock_unchanged() {
        let f = fixture(2);
        let err = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), yesterday())
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidDate(_)));
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 2);
        assert!(f.engine.list_for_vehicle(f.vehicle_id).unwrap().is_empty());
    }

    #[test]
    fn unknown_vehicle_fails_and_persists_nothing() {
        let f = fixture(1);
        let ghost = VehicleId::new();
        let err = f
            .engine
            .create_reservation(ghost, CustomerId::new(), tomorrow())
            .unwrap_err();

        assert_eq!(err, DomainError::NotFound);
        assert!(f.engine.list_for_vehicle(ghost).unwrap().is_empty());
    }

    #[test]
    fn soft_deleted_vehicle_is_not_reservable() {
        let f = fixture(5);
        f.catalog.soft_delete_vehicle(f.vehicle_id).unwrap();

        let err = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap_err();

        assert_eq!(err, DomainError::NotFound);
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 5);
    }

    #[test]
    fn out_of_stock_surfaces_unchanged_and_persists_nothing() {
        let f = fixture(1);
        f.engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();

        let err = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap_err();

        assert_eq!(err, DomainError::OutOfStock);
        assert_eq!(f.engine.list_for_vehicle(f.vehicle_id).unwrap().len(), 1);
    }

    #[test]
    fn confirm_keeps_the_unit_held() {
        let f = fixture(1);
        let reservation = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();

        let confirmed = f.engine.confirm(reservation.id_typed()).unwrap();
        assert_eq!(confirmed.status(), ReservationStatus::Confirmed);
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 0);
    }

    #[test]
    fn cancel_releases_the_unit() {
        let f = fixture(1);
        let reservation = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 0);

        let cancelled = f.engine.cancel(reservation.id_typed()).unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 1);
    }

    #[test]
    fn terminal_states_admit_no_further_transition() {
        let f = fixture(2);

        let confirmed = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();
        f.engine.confirm(confirmed.id_typed()).unwrap();

        let cancelled = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();
        f.engine.cancel(cancelled.id_typed()).unwrap();
        let quantity = f.ledger.quantity(f.vehicle_id).unwrap();

        for id in [confirmed.id_typed(), cancelled.id_typed()] {
            assert!(matches!(
                f.engine.confirm(id).unwrap_err(),
                DomainError::InvalidTransition(_)
            ));
            assert!(matches!(
                f.engine.cancel(id).unwrap_err(),
                DomainError::InvalidTransition(_)
            ));
        }

        // No terminal-state attempt touched the ledger.
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), quantity);
    }

    #[test]
    fn unknown_reservation_is_not_found() {
        let f = fixture(1);
        let ghost = ReservationId::new();

        assert_eq!(f.engine.confirm(ghost).unwrap_err(), DomainError::NotFound);
        assert_eq!(f.engine.cancel(ghost).unwrap_err(), DomainError::NotFound);
        assert_eq!(f.engine.get(ghost).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn failed_release_leaves_reservation_in_prior_state() {
        // Saturate the cell so the release inside cancel overflows and fails.
        let f = fixture(u32::MAX);
        let reservation = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap();
        f.ledger.adjust_intake(f.vehicle_id, 1).unwrap();

        let err = f.engine.cancel(reservation.id_typed()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let unchanged = f.engine.get(reservation.id_typed()).unwrap();
        assert_eq!(unchanged.status(), ReservationStatus::Pending);
    }

    #[test]
    fn poisoned_reservation_map_returns_the_held_unit() {
        let f = fixture(2);

        // Poison the reservation map's lock via a panic while holding it.
        std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = f.engine.reservations.write().unwrap();
                panic!("poisoning reservations lock");
            });
            assert!(handle.join().is_err());
        });

        let err = f
            .engine
            .create_reservation(f.vehicle_id, CustomerId::new(), tomorrow())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // The hold taken before the failed persist was given back.
        assert_eq!(f.ledger.quantity(f.vehicle_id).unwrap(), 2);
    }

    #[test]
    fn listings_filter_by_vehicle_and_customer() {
        let f = fixture(3);
        let alice = CustomerId::new();
        let bob = CustomerId::new();

        f.engine
            .create_reservation(f.vehicle_id, alice, tomorrow())
            .unwrap();
        f.engine
            .create_reservation(f.vehicle_id, alice, tomorrow())
            .unwrap();
        f.engine
            .create_reservation(f.vehicle_id, bob, tomorrow())
            .unwrap();

        assert_eq!(f.engine.list_for_vehicle(f.vehicle_id).unwrap().len(), 3);
        assert_eq!(f.engine.list_for_customer(alice).unwrap().len(), 2);
        assert_eq!(f.engine.list_for_customer(bob).unwrap().len(), 1);
    }
}
