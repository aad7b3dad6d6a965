//! Reservation store (C6): an in-memory, mutex-protected list with overlap
//! checking, add/update, and a blocking log. One mutex protects both lists;
//! the critical section of `add` is `has_conflict` -> `append`.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use shared::{DomainError, EmployeeId, EquipmentId, ReservationId};

use crate::blocking_log::{NewOperationalBlocking, OperationalBlocking};
use crate::reservation::{NewReservation, Reservation, ReservationState, ReservationUpdate};

#[derive(Default)]
struct StoreState {
    reservations: Vec<Reservation>,
    blockings: Vec<OperationalBlocking>,
}

/// Process-wide reservation and blocking log, guarded by a single mutex.
pub struct ReservationStore {
    state: Mutex<StoreState>,
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(StoreState::default()) }
    }

    pub fn list_reservations(&self) -> Vec<Reservation> {
        self.state.lock().expect("reservation store mutex poisoned").reservations.clone()
    }

    pub fn list_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Reservation> {
        self.state
            .lock()
            .expect("reservation store mutex poisoned")
            .reservations
            .iter()
            .filter(|r| start < r.end && end > r.start)
            .cloned()
            .collect()
    }

    pub fn has_conflict(
        &self,
        employee_id: EmployeeId,
        equipment_id: Option<EquipmentId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        let guard = self.state.lock().expect("reservation store mutex poisoned");
        Self::conflicts(&guard.reservations, employee_id, equipment_id, start, end)
    }

    fn conflicts(
        reservations: &[Reservation],
        employee_id: EmployeeId,
        equipment_id: Option<EquipmentId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        reservations.iter().any(|r| {
            if !r.overlaps(start, end) {
                return false;
            }
            if r.matches_employee(employee_id) {
                return true;
            }
            if let Some(eq) = equipment_id {
                if r.matches_equipment(eq) {
                    return true;
                }
            }
            false
        })
    }

    /// Re-checks the conflict under the lock and appends if clear.
    pub fn add(&self, new: NewReservation) -> Result<Reservation, DomainError> {
        let mut guard = self.state.lock().expect("reservation store mutex poisoned");
        if Self::conflicts(&guard.reservations, new.employee_id, new.equipment_id, new.start, new.end) {
            return Err(DomainError::Conflict);
        }
        let reservation = Reservation {
            id: ReservationId::new(),
            service_id: new.service_id,
            employee_id: new.employee_id,
            equipment_id: new.equipment_id,
            start: new.start,
            end: new.end,
            created_at: Utc::now(),
            state: ReservationState::Confirmed,
            version: 1,
            scenario_id: new.scenario_id,
        };
        guard.reservations.push(reservation.clone());
        Ok(reservation)
    }

    pub fn update(&self, id: ReservationId, patch: ReservationUpdate) -> Option<Reservation> {
        let mut guard = self.state.lock().expect("reservation store mutex poisoned");
        let reservation = guard.reservations.iter_mut().find(|r| r.id == id)?;
        if let Some(employee_id) = patch.employee_id {
            reservation.employee_id = employee_id;
        }
        if let Some(equipment_id) = patch.equipment_id {
            reservation.equipment_id = equipment_id;
        }
        if let Some(state) = patch.state {
            reservation.state = state;
        }
        reservation.version += 1;
        Some(reservation.clone())
    }

    pub fn add_blocking(&self, new: NewOperationalBlocking) -> OperationalBlocking {
        let mut guard = self.state.lock().expect("reservation store mutex poisoned");
        let blocking = OperationalBlocking {
            id: shared::BlockingId::new(),
            scope: new.scope,
            start: new.start,
            end: new.end,
            reason: new.reason,
        };
        guard.blockings.push(blocking.clone());
        blocking
    }

    pub fn list_blockings_intersecting(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<OperationalBlocking> {
        self.state
            .lock()
            .expect("reservation store mutex poisoned")
            .blockings
            .iter()
            .filter(|b| b.overlaps(start, end))
            .cloned()
            .collect()
    }
}
