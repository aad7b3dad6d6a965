//! Reservation entity and its lifecycle states (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::{EmployeeId, EquipmentId, ReservationId, ServiceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationState {
    Confirmed,
    Reassigned,
    PendingReschedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub service_id: ServiceId,
    pub employee_id: EmployeeId,
    pub equipment_id: Option<EquipmentId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub state: ReservationState,
    pub version: u32,
    pub scenario_id: Option<String>,
}

impl Reservation {
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    pub fn matches_employee(&self, employee_id: EmployeeId) -> bool {
        self.employee_id == employee_id
    }

    pub fn matches_equipment(&self, equipment_id: EquipmentId) -> bool {
        self.equipment_id == Some(equipment_id)
    }
}

/// The fields needed to insert a new reservation; identity, timestamps and
/// state are assigned by [`crate::reservation_store::ReservationStore::add`].
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub service_id: ServiceId,
    pub employee_id: EmployeeId,
    pub equipment_id: Option<EquipmentId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub scenario_id: Option<String>,
}

/// Fields an update can change; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ReservationUpdate {
    pub employee_id: Option<EmployeeId>,
    pub equipment_id: Option<Option<EquipmentId>>,
    pub state: Option<ReservationState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 31, h, 0, 0).unwrap()
    }

    #[test]
    fn test_overlaps_detects_half_open_overlap() {
        let r = Reservation {
            id: ReservationId::new(),
            service_id: ServiceId::new(),
            employee_id: EmployeeId::new(),
            equipment_id: None,
            start: dt(9),
            end: dt(10),
            created_at: dt(8),
            state: ReservationState::Confirmed,
            version: 1,
            scenario_id: None,
        };
        assert!(r.overlaps(dt(9), dt(11)));
        assert!(!r.overlaps(dt(10), dt(11)));
    }
}
