//! Repository contracts consumed by the availability manager (§6.1).
//!
//! Deliberately synchronous: per the concurrency model, the core has no
//! long-lived suspension points, so a repository that blocks on I/O simply
//! blocks its caller rather than forcing async coloring throughout the core.

use chrono::{DateTime, Utc};

use shared::{EmployeeId, ServiceId};

use crate::model::{EmployeeSchedule, Occupation, Scenario, Service};

/// Optional filters applied when listing employee schedules.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub service_id: Option<ServiceId>,
    pub equipment_id: Option<shared::EquipmentId>,
}

/// Looks up a service definition by id.
pub trait ServiceRepository {
    fn get_service(&self, id: &ServiceId) -> Option<Service>;
}

/// Lists employee schedules for a base day, optionally filtered.
pub trait EmployeeScheduleRepository {
    fn get_employee_schedules(
        &self,
        base_day: DateTime<Utc>,
        filter: &ScheduleFilter,
    ) -> Vec<EmployeeSchedule>;
}

/// Supplies prior busy intervals for a set of employees.
pub trait OccupationRepository {
    fn get_occupations(
        &self,
        employee_ids: &[EmployeeId],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<(EmployeeId, Occupation)>;
}

/// Loads an optional scenario fixture by id, overriding repository lookups
/// wherever it supplies data (see §2 and §4).
pub trait ScenarioRepository {
    fn load_scenario(&self, id: &str) -> Option<Scenario>;
}

/// The bundle of repository contracts the availability manager depends on.
pub trait Repositories: ServiceRepository + EmployeeScheduleRepository + OccupationRepository + ScenarioRepository {}

impl<T> Repositories for T where
    T: ServiceRepository + EmployeeScheduleRepository + OccupationRepository + ScenarioRepository
{
}
