use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use motoreserve_core::{CustomerId, Entity, ReservationId, VehicleId};

/// Reservation lifecycle.
///
/// `Pending` is the only non-terminal state. All transition rules live here,
/// not at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// `Confirmed` and `Cancelled` are terminal: no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether the state machine permits `self -> next`.
    ///
    /// Only `Pending` can move; `Confirmed` and `Cancelled` admit nothing,
    /// including repeat transitions to themselves.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Cancelled)
        )
    }

    /// Whether a reservation in this state holds a stock unit.
    pub fn holds_stock(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// A customer's reservation of one unit of one vehicle.
///
/// The vehicle reference is immutable after creation: there is no setter, and
/// cancellation releases the unit back to that same vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    vehicle_id: VehicleId,
    customer_id: CustomerId,
    reserved_for: NaiveDate,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    pub(crate) fn new(
        id: ReservationId,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        reserved_for: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            customer_id,
            reserved_for,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_typed(&self) -> ReservationId {
        self.id
    }

    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn reserved_for(&self) -> NaiveDate {
        self.reserved_for
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_status(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
