//! Blocking aggregator (C2): assembles `(blocksByEmployee, blocksByEquipment,
//! globalBlocks)` from occupations, scoped exceptions, live reservations, and
//! persisted operational blockings.
//!
//! Occupation resolution (scenario vs. repository) happens in the caller
//! ([`crate::availability`]); this module only combines already-resolved data.
//! Per the design note on avoiding re-aggregation, the employee/global pass
//! is computed once per request and equipment blocks are computed lazily,
//! one call per distinct equipment id, so callers can cache the result across
//! the per-employee loop.

use std::collections::HashMap;

use shared::{EmployeeId, EquipmentId, ServiceId};

use crate::interval::{Interval, IntervalSet};
use crate::model::{BlockingScope, Exception, Occupation};

/// A confirmed reservation's busy span, as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationSpan {
    pub employee_id: EmployeeId,
    pub equipment_id: Option<EquipmentId>,
    pub start_min: i64,
    pub end_min: i64,
}

/// A persisted operational blocking's busy span, as seen by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalBlockingSpan {
    pub scope: BlockingScope,
    pub start_min: i64,
    pub end_min: i64,
}

fn overlaps(window: Interval, start: i64, end: i64) -> bool {
    start < window.end && end > window.start
}

/// Computes `blocksByEmployee` (restricted to `employee_ids`) and
/// `globalBlocks` in a single pass.
pub fn employee_and_global_blocks(
    request_window: Interval,
    employee_ids: &[EmployeeId],
    service_id: Option<&ServiceId>,
    exceptions: &[Exception],
    employee_occupations: &HashMap<EmployeeId, Vec<Occupation>>,
    reservations: &[ReservationSpan],
    operational_blockings: &[OperationalBlockingSpan],
) -> (HashMap<EmployeeId, IntervalSet>, IntervalSet) {
    let mut by_employee: HashMap<EmployeeId, Vec<Interval>> =
        employee_ids.iter().map(|id| (*id, Vec::new())).collect();
    let mut globals: Vec<Interval> = Vec::new();

    for eid in employee_ids {
        if let Some(occs) = employee_occupations.get(eid) {
            let bucket = by_employee.get_mut(eid).unwrap();
            bucket.extend(
                occs.iter()
                    .filter(|o| overlaps(request_window, o.start_min, o.end_min))
                    .map(|o| Interval::new(o.start_min, o.end_min)),
            );
        }
    }

    for exc in exceptions {
        if !overlaps(request_window, exc.start_min, exc.end_min) {
            continue;
        }
        match &exc.scope {
            BlockingScope::Business => globals.push(Interval::new(exc.start_min, exc.end_min)),
            BlockingScope::Service { .. } => {
                if let Some(sid) = service_id {
                    if exc.scope.matches_service(sid) {
                        globals.push(Interval::new(exc.start_min, exc.end_min));
                    }
                }
            }
            BlockingScope::Employee { .. } => {
                for eid in employee_ids {
                    if exc.scope.matches_employee(eid) {
                        by_employee
                            .get_mut(eid)
                            .unwrap()
                            .push(Interval::new(exc.start_min, exc.end_min));
                    }
                }
            }
            BlockingScope::Equipment { .. } => {}
        }
    }

    for r in reservations {
        if !overlaps(request_window, r.start_min, r.end_min) {
            continue;
        }
        if let Some(bucket) = by_employee.get_mut(&r.employee_id) {
            bucket.push(Interval::new(r.start_min, r.end_min));
        }
    }

    for b in operational_blockings {
        if !overlaps(request_window, b.start_min, b.end_min) {
            continue;
        }
        match &b.scope {
            BlockingScope::Business => globals.push(Interval::new(b.start_min, b.end_min)),
            BlockingScope::Service { .. } => {
                if let Some(sid) = service_id {
                    if b.scope.matches_service(sid) {
                        globals.push(Interval::new(b.start_min, b.end_min));
                    }
                }
            }
            BlockingScope::Employee { targets } => {
                for eid in employee_ids {
                    if targets.is_empty() || targets.contains(eid) {
                        by_employee
                            .get_mut(eid)
                            .unwrap()
                            .push(Interval::new(b.start_min, b.end_min));
                    }
                }
            }
            BlockingScope::Equipment { .. } => {}
        }
    }

    let by_employee = by_employee
        .into_iter()
        .map(|(id, raw)| (id, IntervalSet::new(raw)))
        .collect();
    (by_employee, IntervalSet::new(globals))
}

/// Computes `blocksByEquipment` for a single equipment id. Callers that loop
/// over several employees sharing the same equipment should call this once
/// per distinct id and cache the result.
pub fn equipment_blocks(
    equipment_id: &EquipmentId,
    request_window: Interval,
    service_id: Option<&ServiceId>,
    exceptions: &[Exception],
    equipment_occupations: &[Occupation],
    reservations: &[ReservationSpan],
    operational_blockings: &[OperationalBlockingSpan],
) -> IntervalSet {
    let mut raw: Vec<Interval> = equipment_occupations
        .iter()
        .filter(|o| overlaps(request_window, o.start_min, o.end_min))
        .map(|o| Interval::new(o.start_min, o.end_min))
        .collect();

    for exc in exceptions {
        if !overlaps(request_window, exc.start_min, exc.end_min) {
            continue;
        }
        if exc.scope.matches_equipment(equipment_id) {
            raw.push(Interval::new(exc.start_min, exc.end_min));
        }
        // Business/service-scope exceptions contribute to globals, not here;
        // the caller intersects globals separately.
        let _ = service_id;
    }

    for r in reservations {
        if r.equipment_id.as_ref() == Some(equipment_id)
            && overlaps(request_window, r.start_min, r.end_min)
        {
            raw.push(Interval::new(r.start_min, r.end_min));
        }
    }

    for b in operational_blockings {
        if !overlaps(request_window, b.start_min, b.end_min) {
            continue;
        }
        if b.scope.matches_equipment(equipment_id) {
            raw.push(Interval::new(b.start_min, b.end_min));
        }
    }

    IntervalSet::new(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eid() -> EmployeeId {
        EmployeeId::new()
    }

    #[test]
    fn test_employee_occupations_outside_window_are_ignored() {
        let e1 = eid();
        let mut occs = HashMap::new();
        occs.insert(e1, vec![Occupation { start_min: 2000, end_min: 2100 }]);
        let (by_emp, globals) = employee_and_global_blocks(
            Interval::new(0, 100),
            &[e1],
            None,
            &[],
            &occs,
            &[],
            &[],
        );
        assert!(by_emp[&e1].is_empty());
        assert!(globals.is_empty());
    }

    #[test]
    fn test_business_exception_contributes_to_globals() {
        let e1 = eid();
        let exc = Exception {
            scope: BlockingScope::Business,
            start_min: 50,
            end_min: 70,
        };
        let (_, globals) = employee_and_global_blocks(
            Interval::new(0, 100),
            &[e1],
            None,
            &[exc],
            &HashMap::new(),
            &[],
            &[],
        );
        assert_eq!(globals.as_slice(), &[Interval::new(50, 70)]);
    }

    #[test]
    fn test_operational_blocking_employee_scope_empty_targets_applies_to_all() {
        let e1 = eid();
        let e2 = eid();
        let blocking = OperationalBlockingSpan {
            scope: BlockingScope::Employee { targets: vec![] },
            start_min: 10,
            end_min: 20,
        };
        let (by_emp, _) = employee_and_global_blocks(
            Interval::new(0, 100),
            &[e1, e2],
            None,
            &[],
            &HashMap::new(),
            &[],
            &[blocking],
        );
        assert_eq!(by_emp[&e1].as_slice(), &[Interval::new(10, 20)]);
        assert_eq!(by_emp[&e2].as_slice(), &[Interval::new(10, 20)]);
    }

    #[test]
    fn test_operational_blocking_employee_scope_explicit_targets_only_those() {
        let e1 = eid();
        let e2 = eid();
        let blocking = OperationalBlockingSpan {
            scope: BlockingScope::Employee { targets: vec![e1] },
            start_min: 10,
            end_min: 20,
        };
        let (by_emp, _) = employee_and_global_blocks(
            Interval::new(0, 100),
            &[e1, e2],
            None,
            &[],
            &HashMap::new(),
            &[],
            &[blocking],
        );
        assert_eq!(by_emp[&e1].as_slice(), &[Interval::new(10, 20)]);
        assert!(by_emp[&e2].is_empty());
    }

    #[test]
    fn test_reservation_only_blocks_its_own_employee() {
        let e1 = eid();
        let e2 = eid();
        let span = ReservationSpan {
            employee_id: e1,
            equipment_id: None,
            start_min: 30,
            end_min: 60,
        };
        let (by_emp, _) =
            employee_and_global_blocks(Interval::new(0, 100), &[e1, e2], None, &[], &HashMap::new(), &[span], &[]);
        assert_eq!(by_emp[&e1].as_slice(), &[Interval::new(30, 60)]);
        assert!(by_emp[&e2].is_empty());
    }

    #[test]
    fn test_equipment_blocks_respects_equipment_scope_targets() {
        let eq1 = EquipmentId::new();
        let eq2 = EquipmentId::new();
        let exc = Exception {
            scope: BlockingScope::Equipment { targets: vec![eq1] },
            start_min: 0,
            end_min: 50,
        };
        let blocks_eq1 = equipment_blocks(&eq1, Interval::new(0, 100), None, &[exc.clone()], &[], &[], &[]);
        let blocks_eq2 = equipment_blocks(&eq2, Interval::new(0, 100), None, &[exc], &[], &[], &[]);
        assert_eq!(blocks_eq1.as_slice(), &[Interval::new(0, 50)]);
        assert!(blocks_eq2.is_empty());
    }

    #[test]
    fn test_equipment_blocks_reservation_matches_by_equipment_id() {
        let eq1 = EquipmentId::new();
        let span = ReservationSpan {
            employee_id: eid(),
            equipment_id: Some(eq1),
            start_min: 10,
            end_min: 40,
        };
        let blocks = equipment_blocks(&eq1, Interval::new(0, 100), None, &[], &[], &[span], &[]);
        assert_eq!(blocks.as_slice(), &[Interval::new(10, 40)]);
    }
}
