//! Entity types from the booking engine's data model (see §3 of the design
//! this crate implements).

use serde::{Deserialize, Serialize};

use shared::{EmployeeId, EquipmentId, ServiceId};

/// How a service's `compatible_equipment` list resolves ties when the
/// dedup key in the load-balancing selector ignores equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSelectionPolicy {
    ServiceOrder,
    LeastLoaded,
}

impl Default for EquipmentSelectionPolicy {
    fn default() -> Self {
        Self::ServiceOrder
    }
}

/// How a service's attention window bounds an emitted slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceWindowPolicy {
    StartOnly,
    FullSlot,
}

impl Default for ServiceWindowPolicy {
    fn default() -> Self {
        Self::StartOnly
    }
}

/// A `[start_min, end_min)` day-local window, relative to `baseMidnight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start_min: i64,
    pub end_min: i64,
}

impl DayWindow {
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub duration_min: i64,
    pub buffer_before_min: i64,
    pub buffer_after_min: i64,
    pub attention_window: Option<DayWindow>,
    pub compatible_equipment: Vec<EquipmentId>,
    #[serde(default)]
    pub equipment_selection_policy: EquipmentSelectionPolicy,
}

impl Service {
    /// `buffer_before + duration + buffer_after`. Invariant: `>= 1`.
    pub fn total_slot(&self) -> i64 {
        self.buffer_before_min + self.duration_min + self.buffer_after_min
    }

    pub fn requires_equipment(&self) -> bool {
        !self.compatible_equipment.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSchedule {
    pub employee_id: EmployeeId,
    pub work_window: DayWindow,
    pub assigned_services: Vec<ServiceId>,
    pub assigned_equipment: Vec<EquipmentId>,
}

impl EmployeeSchedule {
    pub fn assigned_to_service(&self, service_id: &ServiceId) -> bool {
        self.assigned_services.is_empty() || self.assigned_services.contains(service_id)
    }

    pub fn assigned_to_equipment(&self, equipment_id: &EquipmentId) -> bool {
        self.assigned_equipment.is_empty() || self.assigned_equipment.contains(equipment_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: EquipmentId,
    pub operating_window: Option<DayWindow>,
}

/// A pre-existing busy interval tied to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupation {
    pub start_min: i64,
    pub end_min: i64,
}

/// The target class of a scoped blocking source. Empty lists in
/// [`BlockingScope::Employee`]/[`BlockingScope::Equipment`] mean "applies to
/// all" when used as an operational blocking (see §4.2); [`Exception`]
/// always carries an explicit, non-empty target list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum BlockingScope {
    Business,
    Employee { targets: Vec<EmployeeId> },
    Equipment { targets: Vec<EquipmentId> },
    Service { targets: Vec<ServiceId> },
}

impl BlockingScope {
    pub fn matches_employee(&self, id: &EmployeeId) -> bool {
        match self {
            BlockingScope::Employee { targets } => targets.is_empty() || targets.contains(id),
            _ => false,
        }
    }

    pub fn matches_equipment(&self, id: &EquipmentId) -> bool {
        match self {
            BlockingScope::Equipment { targets } => targets.is_empty() || targets.contains(id),
            _ => false,
        }
    }

    pub fn matches_service(&self, id: &ServiceId) -> bool {
        match self {
            BlockingScope::Service { targets } => targets.contains(id),
            _ => false,
        }
    }
}

/// A scoped exception interval: a neutral blocking regardless of reason.
/// Targets are always explicit, per the engine's data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    #[serde(flatten)]
    pub scope: BlockingScope,
    pub start_min: i64,
    pub end_min: i64,
}

/// A test fixture packaging services, employees, equipment, occupations and
/// exceptions, read-only during a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub business_attention_window: Option<DayWindow>,
    pub services: std::collections::HashMap<String, Service>,
    pub employees: Vec<EmployeeSchedule>,
    pub equipment: Vec<Equipment>,
    pub employee_occupations: std::collections::HashMap<EmployeeId, Vec<Occupation>>,
    pub equipment_occupations: std::collections::HashMap<EquipmentId, Vec<Occupation>>,
    pub exceptions: Vec<Exception>,
}

impl Scenario {
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.values().find(|s| &s.id == id)
    }

    pub fn equipment(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|e| &e.equipment_id == id)
    }
}
