//! Resolves the scenario/repository inputs an availability or reservation
//! request needs: a scenario by id when one is given, else the repository
//! contracts (§6.1) served by [`store::FixtureRepositories`] scanning across
//! every loaded fixture. Owns the data so callers can borrow an
//! [`AvailabilityContext`] from it without fighting lifetimes against the
//! request handler's locals.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use domain::blocking::{OperationalBlockingSpan, ReservationSpan};
use domain::repository::{EmployeeScheduleRepository, OccupationRepository, ScheduleFilter, ServiceRepository};
use domain::{AvailabilityContext, DayWindow, EmployeeSchedule, Equipment, Exception, Occupation, Service};
use shared::{DomainError, EmployeeId, EquipmentId, ServiceId};
use store::{FixtureRepositories, OperationalBlocking, Reservation, ReservationStore};

pub struct ResolvedData {
    pub service: Service,
    pub employees: Vec<EmployeeSchedule>,
    pub equipment: Vec<Equipment>,
    pub business_window: Option<DayWindow>,
    pub employee_occupations: HashMap<EmployeeId, Vec<Occupation>>,
    pub equipment_occupations: HashMap<EquipmentId, Vec<Occupation>>,
    pub exceptions: Vec<Exception>,
}

impl ResolvedData {
    pub fn context<'a>(
        &'a self,
        reservations: &'a [ReservationSpan],
        operational_blockings: &'a [OperationalBlockingSpan],
    ) -> AvailabilityContext<'a> {
        AvailabilityContext {
            employees: &self.employees,
            equipment: &self.equipment,
            business_window: self.business_window,
            employee_occupations: &self.employee_occupations,
            equipment_occupations: &self.equipment_occupations,
            exceptions: &self.exceptions,
            reservations,
            operational_blockings,
        }
    }
}

/// Resolves a service and its supporting schedule/occupation/exception data,
/// preferring `scenario_id` when supplied, else falling back to the
/// repository contracts (§6.1). There is no repository source for equipment
/// outside a scenario in the reference implementation (§9), so the fallback
/// path always returns an empty equipment list.
pub fn resolve(
    repositories: &FixtureRepositories,
    service_id: &ServiceId,
    scenario_id: Option<&str>,
    base_day: DateTime<Utc>,
) -> Result<ResolvedData, DomainError> {
    if let Some(id) = scenario_id {
        if let Some(scenario) = repositories.scenario(id) {
            let service = scenario
                .service(service_id)
                .cloned()
                .ok_or_else(|| DomainError::ServiceNotFound(service_id.to_string()))?;
            return Ok(ResolvedData {
                service,
                employees: scenario.employees.clone(),
                equipment: scenario.equipment.clone(),
                business_window: scenario.business_attention_window,
                employee_occupations: scenario.employee_occupations.clone(),
                equipment_occupations: scenario.equipment_occupations.clone(),
                exceptions: scenario.exceptions.clone(),
            });
        }
    }

    let service = repositories
        .get_service(service_id)
        .ok_or_else(|| DomainError::ServiceNotFound(service_id.to_string()))?;
    let employees = repositories.get_employee_schedules(
        base_day,
        &ScheduleFilter { service_id: Some(*service_id), equipment_id: None },
    );
    let employee_ids: Vec<EmployeeId> = employees.iter().map(|e| e.employee_id).collect();
    let occupation_pairs = repositories.get_occupations(&employee_ids, base_day, base_day + Duration::days(2));
    let mut employee_occupations: HashMap<EmployeeId, Vec<Occupation>> = HashMap::new();
    for (id, occupation) in occupation_pairs {
        employee_occupations.entry(id).or_default().push(occupation);
    }

    Ok(ResolvedData {
        service,
        employees,
        equipment: Vec::new(),
        business_window: None,
        employee_occupations,
        equipment_occupations: HashMap::new(),
        exceptions: Vec::new(),
    })
}

/// Live reservations overlapping `window`, converted to the minute axis
/// anchored at `base_midnight`, restricted to the requested employees.
pub fn reservation_spans(
    store: &ReservationStore,
    base_midnight: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<ReservationSpan> {
    store
        .list_in_range(window_start, window_end)
        .into_iter()
        .filter(|r| r.state != store::ReservationState::PendingReschedule)
        .map(|r: Reservation| ReservationSpan {
            employee_id: r.employee_id,
            equipment_id: r.equipment_id,
            start_min: domain::axis::to_minute(base_midnight, r.start),
            end_min: domain::axis::to_minute(base_midnight, r.end),
        })
        .collect()
}

/// Persisted operational blockings intersecting `window`, on the minute axis.
pub fn operational_blocking_spans(
    store: &ReservationStore,
    base_midnight: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<OperationalBlockingSpan> {
    store
        .list_blockings_intersecting(window_start, window_end)
        .into_iter()
        .map(|b: OperationalBlocking| OperationalBlockingSpan {
            scope: b.scope,
            start_min: domain::axis::to_minute(base_midnight, b.start),
            end_min: domain::axis::to_minute(base_midnight, b.end),
        })
        .collect()
}
