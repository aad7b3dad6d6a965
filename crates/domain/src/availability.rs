//! Availability manager (C4): orchestrates C1–C3 across the three filter
//! regimes (pool / by-employee / by-equipment), applying the service-window
//! policy and emitting candidate slots for C5 to deduplicate and select.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::{EmployeeId, EquipmentId};

use crate::blocking::{self, OperationalBlockingSpan, ReservationSpan};
use crate::interval::{intersect, normalize, subtract, Interval, IntervalSet};
use crate::model::{DayWindow, EmployeeSchedule, Equipment, Exception, Occupation, Service, ServiceWindowPolicy};
use shared::DomainError;

/// A single emitted slot, on the minute axis. Callers convert to UTC
/// instants via [`crate::axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub start_min: i64,
    pub end_min: i64,
    pub employee_id: EmployeeId,
    pub equipment_id: Option<EquipmentId>,
}

/// The request-shaped inputs to a search.
pub struct AvailabilityRequest<'a> {
    pub request_window: Interval,
    pub service: &'a Service,
    pub employee_filter: Option<EmployeeId>,
    pub equipment_filter: Option<EquipmentId>,
    pub service_window_policy: ServiceWindowPolicy,
    /// Set by the cascade manager (C8) to exclude the originally blocked
    /// employee from the candidate pool.
    pub exclude_employee: Option<EmployeeId>,
}

/// Domain data the search consumes, already resolved by the caller from
/// either a scenario or the repository contracts (see §6.1).
pub struct AvailabilityContext<'a> {
    pub employees: &'a [EmployeeSchedule],
    pub equipment: &'a [Equipment],
    pub business_window: Option<DayWindow>,
    pub employee_occupations: &'a HashMap<EmployeeId, Vec<Occupation>>,
    pub equipment_occupations: &'a HashMap<EquipmentId, Vec<Occupation>>,
    pub exceptions: &'a [Exception],
    pub reservations: &'a [ReservationSpan],
    pub operational_blockings: &'a [OperationalBlockingSpan],
}

fn expand(window: DayWindow, offsets: &[i64]) -> Vec<Interval> {
    offsets
        .iter()
        .map(|d| Interval::new(window.start_min + d, window.end_min + d))
        .collect()
}

fn work_window_abs(work_window: DayWindow, offsets: &[i64]) -> Vec<Interval> {
    normalize(expand(work_window, offsets))
}

fn operating_window_abs(
    operating_window: Option<DayWindow>,
    request_window: Interval,
    offsets: &[i64],
) -> Vec<Interval> {
    match operating_window {
        Some(w) => normalize(expand(w, offsets)),
        None => vec![request_window],
    }
}

/// Per-(employee, equipment?) candidate generation shared by all three
/// regimes. `eq_blocks` is `None` when no equipment applies to this pairing.
#[allow(clippy::too_many_arguments)]
fn candidates_for_pairing(
    employee: &EmployeeSchedule,
    equipment: Option<&Equipment>,
    eq_blocks: Option<&IntervalSet>,
    emp_blocks: &IntervalSet,
    globals: &IntervalSet,
    request_window: Interval,
    start_constraint: &[Interval],
    service: &Service,
    policy: ServiceWindowPolicy,
    day_offsets_: &[i64],
) -> Vec<Candidate> {
    let busy_emp = emp_blocks.union(globals);
    let work_abs = work_window_abs(employee.work_window, day_offsets_);
    let free_emp = subtract(&work_abs, busy_emp.as_slice());

    let free_common = match (equipment, eq_blocks) {
        (Some(eq), Some(eq_blocks)) => {
            let busy_eq = eq_blocks.union(globals);
            let op_abs = operating_window_abs(eq.operating_window, request_window, day_offsets_);
            let free_eq = subtract(&op_abs, busy_eq.as_slice());
            let restricted_emp = intersect(&free_emp, &[request_window]);
            intersect(&restricted_emp, &free_eq)
        }
        _ => intersect(&free_emp, &[request_window]),
    };

    let total_slot = service.total_slot();
    let mut candidates = Vec::new();
    for sc in start_constraint {
        let free_pack = if policy == ServiceWindowPolicy::FullSlot {
            match service.attention_window {
                Some(attn) => intersect(&free_common, &expand(attn, day_offsets_)),
                None => free_common.clone(),
            }
        } else {
            free_common.clone()
        };
        let pre_starts = crate::interval::pack_slots(
            *sc,
            &free_pack,
            total_slot,
            service.buffer_before_min,
            service.buffer_after_min,
        );
        for p in pre_starts {
            candidates.push(Candidate {
                start_min: p,
                end_min: p + total_slot,
                employee_id: employee.employee_id,
                equipment_id: equipment.map(|e| e.equipment_id),
            });
        }
    }
    candidates
}

fn day_offsets(request_window: Interval) -> Vec<i64> {
    crate::window::day_offsets(request_window)
}

fn eligible_employees<'a>(
    employees: &'a [EmployeeSchedule],
    service: &Service,
    exclude: Option<EmployeeId>,
    only: Option<EmployeeId>,
) -> Vec<&'a EmployeeSchedule> {
    employees
        .iter()
        .filter(|e| only.map(|id| id == e.employee_id).unwrap_or(true))
        .filter(|e| exclude.map(|id| id != e.employee_id).unwrap_or(true))
        .filter(|e| e.assigned_to_service(&service.id))
        .collect()
}

/// Runs the search described by `req` against `ctx`, returning raw
/// (undeduplicated, unselected) candidates in enumeration order: employees
/// in input order, equipment in service order, candidates in packing order.
pub fn search(
    req: &AvailabilityRequest<'_>,
    ctx: &AvailabilityContext<'_>,
) -> Result<Vec<Candidate>, DomainError> {
    if req.request_window.is_empty() {
        return Err(DomainError::InvalidRange);
    }

    let start_constraint = crate::window::start_constraint(
        req.request_window,
        ctx.business_window,
        req.service.attention_window,
    );
    if start_constraint.is_empty() {
        return Ok(Vec::new());
    }
    let offsets = day_offsets(req.request_window);

    if let Some(eq_id) = req.equipment_filter {
        if req.service.requires_equipment() && !req.service.compatible_equipment.contains(&eq_id) {
            return Err(DomainError::InvalidEquipment(eq_id.to_string()));
        }
        let equipment = ctx.equipment.iter().find(|e| e.equipment_id == eq_id);
        let candidates_employees =
            eligible_employees(ctx.employees, req.service, req.exclude_employee, req.employee_filter)
                .into_iter()
                .filter(|e| e.assigned_to_equipment(&eq_id));

        let employee_ids: Vec<EmployeeId> = ctx.employees.iter().map(|e| e.employee_id).collect();
        let (by_employee, globals) = blocking::employee_and_global_blocks(
            req.request_window,
            &employee_ids,
            Some(&req.service.id),
            ctx.exceptions,
            ctx.employee_occupations,
            ctx.reservations,
            ctx.operational_blockings,
        );
        let eq_occ = ctx
            .equipment_occupations
            .get(&eq_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let eq_blocks = blocking::equipment_blocks(
            &eq_id,
            req.request_window,
            Some(&req.service.id),
            ctx.exceptions,
            eq_occ,
            ctx.reservations,
            ctx.operational_blockings,
        );

        let mut out = Vec::new();
        for employee in candidates_employees {
            let emp_blocks = by_employee
                .get(&employee.employee_id)
                .cloned()
                .unwrap_or_default();
            out.extend(candidates_for_pairing(
                employee,
                equipment,
                Some(&eq_blocks),
                &emp_blocks,
                &globals,
                req.request_window,
                &start_constraint,
                req.service,
                req.service_window_policy,
                &offsets,
            ));
        }
        return Ok(out);
    }

    if let Some(emp_id) = req.employee_filter {
        let Some(employee) = ctx.employees.iter().find(|e| e.employee_id == emp_id) else {
            return Ok(Vec::new());
        };
        if req.exclude_employee == Some(emp_id) || !employee.assigned_to_service(&req.service.id) {
            return Ok(Vec::new());
        }

        let employee_ids = vec![emp_id];
        let (by_employee, globals) = blocking::employee_and_global_blocks(
            req.request_window,
            &employee_ids,
            Some(&req.service.id),
            ctx.exceptions,
            ctx.employee_occupations,
            ctx.reservations,
            ctx.operational_blockings,
        );
        let emp_blocks = by_employee.get(&emp_id).cloned().unwrap_or_default();

        if !req.service.requires_equipment() {
            return Ok(candidates_for_pairing(
                employee,
                None,
                None,
                &emp_blocks,
                &globals,
                req.request_window,
                &start_constraint,
                req.service,
                req.service_window_policy,
                &offsets,
            ));
        }

        let mut eq_cache: HashMap<EquipmentId, IntervalSet> = HashMap::new();
        let mut out = Vec::new();
        for eq_id in &req.service.compatible_equipment {
            if !employee.assigned_to_equipment(eq_id) {
                continue;
            }
            let equipment = ctx.equipment.iter().find(|e| e.equipment_id == *eq_id);
            let eq_blocks = eq_cache.entry(*eq_id).or_insert_with(|| {
                let occ = ctx.equipment_occupations.get(eq_id).map(Vec::as_slice).unwrap_or(&[]);
                blocking::equipment_blocks(
                    eq_id,
                    req.request_window,
                    Some(&req.service.id),
                    ctx.exceptions,
                    occ,
                    ctx.reservations,
                    ctx.operational_blockings,
                )
            });
            out.extend(candidates_for_pairing(
                employee,
                equipment,
                Some(eq_blocks),
                &emp_blocks,
                &globals,
                req.request_window,
                &start_constraint,
                req.service,
                req.service_window_policy,
                &offsets,
            ));
        }
        return Ok(out);
    }

    // Pool regime.
    let candidate_employees = eligible_employees(ctx.employees, req.service, req.exclude_employee, None);
    let employee_ids: Vec<EmployeeId> = candidate_employees.iter().map(|e| e.employee_id).collect();
    let (by_employee, globals) = blocking::employee_and_global_blocks(
        req.request_window,
        &employee_ids,
        Some(&req.service.id),
        ctx.exceptions,
        ctx.employee_occupations,
        ctx.reservations,
        ctx.operational_blockings,
    );

    let mut eq_cache: HashMap<EquipmentId, IntervalSet> = HashMap::new();
    let mut out = Vec::new();
    for employee in candidate_employees {
        let emp_blocks = by_employee.get(&employee.employee_id).cloned().unwrap_or_default();
        if !req.service.requires_equipment() {
            out.extend(candidates_for_pairing(
                employee,
                None,
                None,
                &emp_blocks,
                &globals,
                req.request_window,
                &start_constraint,
                req.service,
                req.service_window_policy,
                &offsets,
            ));
            continue;
        }
        for eq_id in &req.service.compatible_equipment {
            if !employee.assigned_to_equipment(eq_id) {
                continue;
            }
            let equipment = ctx.equipment.iter().find(|e| e.equipment_id == *eq_id);
            let eq_blocks = eq_cache.entry(*eq_id).or_insert_with(|| {
                let occ = ctx.equipment_occupations.get(eq_id).map(Vec::as_slice).unwrap_or(&[]);
                blocking::equipment_blocks(
                    eq_id,
                    req.request_window,
                    Some(&req.service.id),
                    ctx.exceptions,
                    occ,
                    ctx.reservations,
                    ctx.operational_blockings,
                )
            });
            out.extend(candidates_for_pairing(
                employee,
                equipment,
                Some(eq_blocks),
                &emp_blocks,
                &globals,
                req.request_window,
                &start_constraint,
                req.service,
                req.service_window_policy,
                &offsets,
            ));
        }
    }
    Ok(out)
}

/// Runs the search (C4) and feeds its output straight into the load-balancing
/// selector (C5), recomputing the blocking maps C5 needs for its load figure.
/// The recomputation mirrors what `search` already aggregates internally
/// rather than threading the maps back out of it, so C4's three regime
/// branches above stay free of C5's concerns.
pub fn search_and_select(
    req: &AvailabilityRequest<'_>,
    ctx: &AvailabilityContext<'_>,
) -> Result<Vec<Candidate>, DomainError> {
    let candidates = search(req, ctx)?;
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let regime = if req.equipment_filter.is_some() {
        crate::balancing::Regime::ByEquipment
    } else if req.employee_filter.is_some() {
        crate::balancing::Regime::ByEmployee
    } else {
        crate::balancing::Regime::Pool
    };

    let employee_ids: Vec<EmployeeId> = ctx.employees.iter().map(|e| e.employee_id).collect();
    let (employee_blocks, _) = blocking::employee_and_global_blocks(
        req.request_window,
        &employee_ids,
        Some(&req.service.id),
        ctx.exceptions,
        ctx.employee_occupations,
        ctx.reservations,
        ctx.operational_blockings,
    );

    let mut equipment_blocks: HashMap<EquipmentId, IntervalSet> = HashMap::new();
    for eq_id in &req.service.compatible_equipment {
        let occ = ctx.equipment_occupations.get(eq_id).map(Vec::as_slice).unwrap_or(&[]);
        let blocks = blocking::equipment_blocks(
            eq_id,
            req.request_window,
            Some(&req.service.id),
            ctx.exceptions,
            occ,
            ctx.reservations,
            ctx.operational_blockings,
        );
        equipment_blocks.insert(*eq_id, blocks);
    }

    Ok(crate::balancing::select(&candidates, regime, req.service, req.request_window, &employee_blocks, &equipment_blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ServiceId;

    fn service(duration: i64, before: i64, after: i64, compatible: Vec<EquipmentId>) -> Service {
        Service {
            id: ServiceId::new(),
            duration_min: duration,
            buffer_before_min: before,
            buffer_after_min: after,
            attention_window: None,
            compatible_equipment: compatible,
            equipment_selection_policy: Default::default(),
        }
    }

    fn schedule(work: DayWindow) -> EmployeeSchedule {
        EmployeeSchedule {
            employee_id: EmployeeId::new(),
            work_window: work,
            assigned_services: vec![],
            assigned_equipment: vec![],
        }
    }

    #[test]
    fn test_pool_search_with_no_equipment_requirement_emits_slots() {
        let svc = service(30, 0, 0, vec![]);
        let emp = schedule(DayWindow::new(540, 1020));
        let ctx = AvailabilityContext {
            employees: std::slice::from_ref(&emp),
            equipment: &[],
            business_window: None,
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let req = AvailabilityRequest {
            request_window: Interval::new(540, 600),
            service: &svc,
            employee_filter: None,
            equipment_filter: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: None,
        };
        let out = search(&req, &ctx).unwrap();
        assert!(!out.is_empty());
        assert!(out.iter().all(|c| c.equipment_id.is_none()));
    }

    #[test]
    fn test_by_equipment_rejects_incompatible_equipment() {
        let other_eq = EquipmentId::new();
        let svc = service(30, 0, 0, vec![EquipmentId::new()]);
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
        let req = AvailabilityRequest {
            request_window: Interval::new(540, 600),
            service: &svc,
            employee_filter: None,
            equipment_filter: Some(other_eq),
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: None,
        };
        assert_eq!(search(&req, &ctx).unwrap_err(), DomainError::InvalidEquipment(other_eq.to_string()));
    }

    #[test]
    fn test_empty_request_window_is_invalid_range() {
        let svc = service(30, 0, 0, vec![]);
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
        let req = AvailabilityRequest {
            request_window: Interval::new(540, 540),
            service: &svc,
            employee_filter: None,
            equipment_filter: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: None,
        };
        assert_eq!(search(&req, &ctx).unwrap_err(), DomainError::InvalidRange);
    }

    #[test]
    fn test_business_exception_covering_request_yields_empty_result() {
        let svc = service(30, 0, 0, vec![]);
        let emp = schedule(DayWindow::new(0, 1440));
        let ctx = AvailabilityContext {
            employees: std::slice::from_ref(&emp),
            equipment: &[],
            business_window: Some(DayWindow::new(600, 1000)),
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let req = AvailabilityRequest {
            request_window: Interval::new(480, 540),
            service: &svc,
            employee_filter: None,
            equipment_filter: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: None,
        };
        assert!(search(&req, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_exclude_employee_hint_removes_candidate_from_pool() {
        let svc = service(30, 0, 0, vec![]);
        let emp = schedule(DayWindow::new(540, 1020));
        let excluded = emp.employee_id;
        let ctx = AvailabilityContext {
            employees: std::slice::from_ref(&emp),
            equipment: &[],
            business_window: None,
            employee_occupations: &HashMap::new(),
            equipment_occupations: &HashMap::new(),
            exceptions: &[],
            reservations: &[],
            operational_blockings: &[],
        };
        let req = AvailabilityRequest {
            request_window: Interval::new(540, 600),
            service: &svc,
            employee_filter: None,
            equipment_filter: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: Some(excluded),
        };
        assert!(search(&req, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_search_and_select_dedups_pool_candidates_to_one_slot_per_start() {
        let svc = service(30, 0, 0, vec![]);
        let emp_a = schedule(DayWindow::new(540, 1020));
        let emp_b = schedule(DayWindow::new(540, 1020));
        let employees = vec![emp_a, emp_b];
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
        let req = AvailabilityRequest {
            request_window: Interval::new(540, 600),
            service: &svc,
            employee_filter: None,
            equipment_filter: None,
            service_window_policy: ServiceWindowPolicy::StartOnly,
            exclude_employee: None,
        };
        let searched = search(&req, &ctx).unwrap();
        assert_eq!(searched.len(), 2);

        let selected = search_and_select(&req, &ctx).unwrap();
        assert_eq!(selected.len(), 1);
    }
}
