//! Blocking cascade manager (C8): registers an operational blocking, then
//! reassigns or flags every reservation it invalidates.

use domain::{
    availability, AvailabilityContext, AvailabilityRequest, BlockingScope, DayWindow, EmployeeSchedule,
    Scenario, Service, ServiceWindowPolicy,
};
use shared::{EmployeeId, EquipmentId, ReservationId};

use crate::blocking_log::NewOperationalBlocking;
use crate::reservation::{Reservation, ReservationState, ReservationUpdate};
use crate::reservation_store::ReservationStore;

/// Outcome of processing one reservation against a newly applied blocking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedReservation {
    pub reservation_id: ReservationId,
    pub state: ReservationState,
    pub employee_id: Option<EmployeeId>,
    pub equipment_id: Option<EquipmentId>,
}

pub struct CascadeManager<'a> {
    store: &'a ReservationStore,
}

impl<'a> CascadeManager<'a> {
    pub fn new(store: &'a ReservationStore) -> Self {
        Self { store }
    }

    /// Runs the create-blocking flow (§4.8): persist, then reassign or flag
    /// every reservation the blocking invalidates. `service_lookup` resolves
    /// a reservation's `service_id` to its [`Service`] definition (scenario
    /// first, else repository, mirroring the availability manager's own
    /// resolution order); `scenario_lookup` resolves each reservation's own
    /// persisted `scenario_id` to the [`Scenario`] that supplies its roster,
    /// windows and the conservative fallback employee scan — every affected
    /// reservation is resolved against its own scenario, not a single one
    /// shared across the whole blocking.
    pub fn create_blocking(
        &self,
        new_blocking: NewOperationalBlocking,
        service_lookup: impl Fn(&shared::ServiceId) -> Option<Service>,
        scenario_lookup: impl Fn(Option<&str>) -> Option<Scenario>,
    ) -> (shared::BlockingId, Vec<ProcessedReservation>) {
        let scope = new_blocking.scope.clone();
        let (start, end) = (new_blocking.start, new_blocking.end);
        let blocking = self.store.add_blocking(new_blocking);

        let snapshot = self.store.list_reservations();
        let mut outcomes = Vec::new();

        for reservation in snapshot.iter().filter(|r| r.overlaps(start, end)) {
            if !scope_matches(&scope, reservation) {
                continue;
            }
            let outcome = match &scope {
                BlockingScope::Business => self.mark_pending(reservation),
                _ => {
                    let scenario = scenario_lookup(reservation.scenario_id.as_deref());
                    self.reassign_or_flag(reservation, &scope, &service_lookup, scenario.as_ref())
                }
            };
            outcomes.push(outcome);
        }

        (blocking.id, outcomes)
    }

    fn mark_pending(&self, reservation: &Reservation) -> ProcessedReservation {
        self.store.update(
            reservation.id,
            ReservationUpdate { employee_id: None, equipment_id: None, state: Some(ReservationState::PendingReschedule) },
        );
        ProcessedReservation {
            reservation_id: reservation.id,
            state: ReservationState::PendingReschedule,
            employee_id: None,
            equipment_id: None,
        }
    }

    fn reassign_or_flag(
        &self,
        reservation: &Reservation,
        scope: &BlockingScope,
        service_lookup: &impl Fn(&shared::ServiceId) -> Option<Service>,
        scenario: Option<&Scenario>,
    ) -> ProcessedReservation {
        let service = scenario
            .and_then(|s| s.service(&reservation.service_id).cloned())
            .or_else(|| service_lookup(&reservation.service_id));
        let Some(service) = service else {
            return self.mark_pending(reservation);
        };

        let equipment_id = match scope {
            BlockingScope::Equipment { .. } if reservation.equipment_id.map(|e| scope.matches_equipment(&e)).unwrap_or(false) => None,
            _ => reservation.equipment_id,
        };

        if let Some(candidate) = self.find_reassignment_via_search(reservation, &service, equipment_id, scenario) {
            self.store.update(
                reservation.id,
                ReservationUpdate {
                    employee_id: Some(candidate.0),
                    equipment_id: Some(candidate.1),
                    state: Some(ReservationState::Reassigned),
                },
            );
            return ProcessedReservation {
                reservation_id: reservation.id,
                state: ReservationState::Reassigned,
                employee_id: Some(candidate.0),
                equipment_id: candidate.1,
            };
        }

        if let Some(employee_id) = self.fallback_scan(reservation, &service, equipment_id, scenario) {
            self.store.update(
                reservation.id,
                ReservationUpdate {
                    employee_id: Some(employee_id),
                    equipment_id,
                    state: Some(ReservationState::Reassigned),
                },
            );
            return ProcessedReservation {
                reservation_id: reservation.id,
                state: ReservationState::Reassigned,
                employee_id: Some(employee_id),
                equipment_id,
            };
        }

        self.mark_pending(reservation)
    }

    fn find_reassignment_via_search(
        &self,
        reservation: &Reservation,
        service: &Service,
        equipment_id: Option<EquipmentId>,
        scenario: Option<&Scenario>,
    ) -> Option<(EmployeeId, Option<EquipmentId>)> {
        let employees: &[EmployeeSchedule] = scenario.map(|s| s.employees.as_slice()).unwrap_or(&[]);
        let equipment = scenario.map(|s| s.equipment.as_slice()).unwrap_or(&[]);
        let business_window: Option<DayWindow> = scenario.and_then(|s| s.business_attention_window);
        let empty_emp_occ = Default::default();
        let empty_eq_occ = Default::default();
        let employee_occupations = scenario.map(|s| &s.employee_occupations).unwrap_or(&empty_emp_occ);
        let equipment_occupations = scenario.map(|s| &s.equipment_occupations).unwrap_or(&empty_eq_occ);
        let exceptions = scenario.map(|s| s.exceptions.as_slice()).unwrap_or(&[]);

        // The search window is the reservation's own (start, end) projected
        // onto its own day's minute axis, so it lines up with day-minute
        // windows (business hours, work windows, exceptions) the same way a
        // live request would; live reservations elsewhere in the day don't
        // need to be replayed here, the fallback scan below re-checks the
        // store directly.
        let base_midnight = domain::axis::midnight_of(reservation.start);
        let window = domain::axis::to_minute_range(base_midnight, reservation.start, reservation.end);
        let ctx = AvailabilityContext {
            employees,
            equipment,
            business_window,
            employee_occupations,
            equipment_occupations,
            exceptions,
            reservations: &[],
            operational_blockings: &[],
        };
        let req = AvailabilityRequest {
            request_window: window,
            service,
            employee_filter: None,
            equipment_filter: equipment_id,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: Some(reservation.employee_id),
        };
        let candidates = availability::search(&req, &ctx).ok()?;
        candidates
            .into_iter()
            .find(|c| c.start_min == window.start && c.end_min == window.end && c.employee_id != reservation.employee_id)
            .map(|c| (c.employee_id, c.equipment_id))
    }

    fn fallback_scan(
        &self,
        reservation: &Reservation,
        service: &Service,
        equipment_id: Option<EquipmentId>,
        scenario: Option<&Scenario>,
    ) -> Option<EmployeeId> {
        let scenario = scenario?;
        scenario
            .employees
            .iter()
            .filter(|e| e.employee_id != reservation.employee_id)
            .filter(|e| e.assigned_to_service(&service.id))
            .find(|e| {
                !self.store.has_conflict(e.employee_id, equipment_id, reservation.start, reservation.end)
            })
            .map(|e| e.employee_id)
    }
}

fn scope_matches(scope: &BlockingScope, reservation: &Reservation) -> bool {
    match scope {
        BlockingScope::Business => true,
        BlockingScope::Employee { .. } => scope.matches_employee(&reservation.employee_id),
        BlockingScope::Equipment { .. } => reservation.equipment_id.map(|e| scope.matches_equipment(&e)).unwrap_or(false),
        BlockingScope::Service { targets } => targets.contains(&reservation.service_id),
    }
}
