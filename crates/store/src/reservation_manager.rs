//! Reservation manager (C7): validates request coherence, performs the
//! double-check (conflict probe -> availability confirm -> conflict
//! re-probe), and inserts through the reservation store.

use chrono::{DateTime, Utc};

use domain::{availability, AvailabilityContext, AvailabilityRequest, Service, ServiceWindowPolicy};
use shared::{DomainError, EmployeeId, EquipmentId};

use crate::reservation::{NewReservation, Reservation};
use crate::reservation_store::ReservationStore;

/// The caller-supplied shape of a create-reservation request.
pub struct CreateReservationRequest {
    pub service: Service,
    pub employee_id: Option<EmployeeId>,
    pub equipment_id: Option<EquipmentId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub scenario_id: Option<String>,
    pub service_window_policy: ServiceWindowPolicy,
}

pub struct ReservationManager<'a> {
    store: &'a ReservationStore,
}

impl<'a> ReservationManager<'a> {
    pub fn new(store: &'a ReservationStore) -> Self {
        Self { store }
    }

    /// Runs the create flow described in §4.7. `request_window` is the
    /// caller-resolved minute-axis span of `(req.start, req.end)`; callers
    /// own `base_midnight` selection (see [`domain::axis`]).
    pub fn create(
        &self,
        req: CreateReservationRequest,
        ctx: &AvailabilityContext<'_>,
        request_window: domain::Interval,
    ) -> Result<Reservation, DomainError> {
        if req.end <= req.start {
            return Err(DomainError::InvalidRange);
        }
        let total_slot = req.service.total_slot();
        if (req.end - req.start).num_minutes() != total_slot {
            return Err(DomainError::InvalidSlotLength);
        }

        if let Some(employee_id) = req.employee_id {
            if self.store.has_conflict(employee_id, req.equipment_id, req.start, req.end) {
                return Err(DomainError::Conflict);
            }
        }

        let availability_req = AvailabilityRequest {
            request_window,
            service: &req.service,
            employee_filter: req.employee_id,
            equipment_filter: req.equipment_id,
            service_window_policy: req.service_window_policy,
            exclude_employee: None,
        };
        let candidates = availability::search(&availability_req, ctx)?;

        let exact = candidates.iter().find(|c| {
            c.start_min == request_window.start
                && c.end_min == request_window.end
                && req.employee_id.map(|id| id == c.employee_id).unwrap_or(true)
                && req.equipment_id.map(|id| Some(id) == c.equipment_id).unwrap_or(true)
        });

        let (employee_id, equipment_id) = match exact {
            Some(c) => (c.employee_id, c.equipment_id),
            None => {
                if let Some(employee_id) = req.employee_id {
                    if self.store.has_conflict(employee_id, req.equipment_id, req.start, req.end) {
                        return Err(DomainError::Conflict);
                    }
                }
                return Err(DomainError::SlotUnavailable);
            }
        };

        self.store.add(NewReservation {
            service_id: req.service.id,
            employee_id,
            equipment_id,
            start: req.start,
            end: req.end,
            scenario_id: req.scenario_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::{DayWindow, EmployeeSchedule};
    use shared::ServiceId;
    use std::collections::HashMap;

    fn dt(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 31, h, m, 0).unwrap()
    }

    fn service() -> Service {
        Service {
            id: ServiceId::new(),
            duration_min: 30,
            buffer_before_min: 0,
            buffer_after_min: 0,
            attention_window: None,
            compatible_equipment: vec![],
            equipment_selection_policy: Default::default(),
        }
    }

    #[test]
    fn test_invalid_range_rejected_before_touching_store() {
        let store = ReservationStore::new();
        let manager = ReservationManager::new(&store);
        let svc = service();
        let req = CreateReservationRequest {
            service: svc,
            employee_id: None,
            equipment_id: None,
            start: dt(9, 0),
            end: dt(9, 0),
            scenario_id: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
        };
        let ctx = AvailabilityContext {
            employees: &[],
            equipment: &[],
            business_window: None,
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let result = manager.create(req, &ctx, domain::Interval::new(540, 540));
        assert_eq!(result.unwrap_err(), DomainError::InvalidRange);
    }

    #[test]
    fn test_slot_length_mismatch_rejected() {
        let store = ReservationStore::new();
        let manager = ReservationManager::new(&store);
        let svc = service();
        let req = CreateReservationRequest {
            service: svc,
            employee_id: None,
            equipment_id: None,
            start: dt(9, 0),
            end: dt(9, 45),
            scenario_id: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
        };
        let ctx = AvailabilityContext {
            employees: &[],
            equipment: &[],
            business_window: None,
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let result = manager.create(req, &ctx, domain::Interval::new(540, 585));
        assert_eq!(result.unwrap_err(), DomainError::InvalidSlotLength);
    }

    #[test]
    fn test_create_succeeds_when_availability_confirms_exact_slot() {
        let store = ReservationStore::new();
        let manager = ReservationManager::new(&store);
        let svc = service();
        let emp = EmployeeSchedule {
            employee_id: EmployeeId::new(),
            work_window: DayWindow::new(0, 1440),
            assigned_services: vec![],
            assigned_equipment: vec![],
        };
        let emp_id = emp.employee_id;
        let req = CreateReservationRequest {
            service: svc,
            employee_id: Some(emp_id),
            equipment_id: None,
            start: dt(9, 0),
            end: dt(9, 30),
            scenario_id: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
        };
        let employees = vec![emp.clone()];
        let ctx = AvailabilityContext {
            employees: &employees,
            equipment: &[],
            business_window: None,
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let result = manager.create(req, &ctx, domain::Interval::new(9 * 60, 9 * 60 + 30));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().employee_id, emp_id);
    }
}
