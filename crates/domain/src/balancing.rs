//! Load-balancing selector (C5): deduplicates candidates by slot key and
//! picks a single winner per group, with deterministic tie-breaking.

use std::collections::HashMap;

use shared::{EmployeeId, EquipmentId};

use crate::availability::Candidate;
use crate::interval::{intersect, Interval, IntervalSet};
use crate::model::{EquipmentSelectionPolicy, Service};

/// Which fields participate in the dedup key, per regime (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Pool,
    ByEquipment,
    ByEmployee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SlotKey {
    start: i64,
    end: i64,
    equipment: Option<EquipmentId>,
}

fn slot_key(c: &Candidate, regime: Regime) -> SlotKey {
    match regime {
        Regime::ByEquipment => SlotKey { start: c.start_min, end: c.end_min, equipment: c.equipment_id },
        Regime::Pool | Regime::ByEmployee => SlotKey { start: c.start_min, end: c.end_min, equipment: None },
    }
}

/// An employee's total blocked minutes intersecting the measurement window,
/// used as the load figure for selection.
fn load(blocks: &IntervalSet, measurement_window: Interval) -> i64 {
    intersect(blocks.as_slice(), &[measurement_window])
        .iter()
        .map(|iv| iv.len())
        .sum()
}

/// Selects a winning candidate (and, when the dedup key ignored equipment, a
/// winning equipment) for every distinct slot key, sorted ascending by start.
pub fn select(
    candidates: &[Candidate],
    regime: Regime,
    service: &Service,
    request_window: Interval,
    employee_blocks: &HashMap<EmployeeId, IntervalSet>,
    equipment_blocks: &HashMap<EquipmentId, IntervalSet>,
) -> Vec<Candidate> {
    let mut groups: HashMap<SlotKey, Vec<&Candidate>> = HashMap::new();
    for c in candidates {
        groups.entry(slot_key(c, regime)).or_default().push(c);
    }

    let mut winners = Vec::new();
    for (key, group) in groups {
        let empty = IntervalSet::empty();
        let mut best: Option<&Candidate> = None;
        let mut best_load = i64::MAX;
        for c in &group {
            let blocks = employee_blocks.get(&c.employee_id).unwrap_or(&empty);
            let l = load(blocks, request_window);
            let better = match best {
                None => true,
                Some(b) => (l, c.employee_id) < (best_load, b.employee_id),
            };
            if better {
                best = Some(c);
                best_load = l;
            }
        }
        let Some(winner) = best else { continue };

        let equipment_id = if key.equipment.is_some() {
            winner.equipment_id
        } else if service.requires_equipment() {
            Some(pick_equipment(service, winner.employee_id, &group, equipment_blocks))
        } else {
            None
        };

        winners.push(Candidate {
            start_min: winner.start_min,
            end_min: winner.end_min,
            employee_id: winner.employee_id,
            equipment_id,
        });
    }

    winners.sort_by_key(|c| c.start_min);
    winners
}

fn pick_equipment(
    service: &Service,
    winning_employee: EmployeeId,
    group: &[&Candidate],
    equipment_blocks: &HashMap<EquipmentId, IntervalSet>,
) -> EquipmentId {
    let options: Vec<EquipmentId> = group
        .iter()
        .filter(|c| c.employee_id == winning_employee)
        .filter_map(|c| c.equipment_id)
        .collect();

    match service.equipment_selection_policy {
        EquipmentSelectionPolicy::ServiceOrder => service
            .compatible_equipment
            .iter()
            .find(|eq| options.contains(eq))
            .copied()
            .unwrap_or_else(|| {
                options.iter().min().copied().expect("at least one equipment option")
            }),
        EquipmentSelectionPolicy::LeastLoaded => {
            let empty = IntervalSet::empty();
            let full_day = Interval::new(0, 1440);
            options
                .into_iter()
                .map(|eq| {
                    let blocks = equipment_blocks.get(&eq).unwrap_or(&empty);
                    (load(blocks, full_day), eq)
                })
                .min()
                .map(|(_, eq)| eq)
                .expect("at least one equipment option")
        }
    }
}
