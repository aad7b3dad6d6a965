//! Scenario fixture loading (§6.3) and the repository implementations that
//! back the availability manager when no live data source is wired in.
//!
//! The wire format uses the Spanish container keys documented in the
//! scenario fixture schema; everything below the container keys converts
//! into the English-named domain model so the core stays wire-format
//! agnostic.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use domain::repository::{EmployeeScheduleRepository, OccupationRepository, ScenarioRepository, ScheduleFilter, ServiceRepository};
use domain::{BlockingScope, DayWindow, EmployeeSchedule, Equipment, Exception, Occupation, Scenario, Service};
use shared::{EmployeeId, EquipmentId, ServiceId};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read scenario fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    scenarios: HashMap<String, ScenarioWire>,
}

#[derive(Debug, Deserialize)]
struct ScenarioWire {
    #[serde(default)]
    horario_atencion_negocio: Option<(i64, i64)>,
    servicios: HashMap<String, Service>,
    empleados: Vec<EmployeeSchedule>,
    #[serde(default)]
    equipos: Vec<EquipoWire>,
    #[serde(default)]
    ocupaciones: Vec<OcupacionWire>,
    #[serde(default)]
    ocupaciones_equipo: Vec<OcupacionEquipoWire>,
    #[serde(default)]
    excepciones: Vec<ExcepcionWire>,
}

#[derive(Debug, Deserialize)]
struct EquipoWire {
    equipo_id: EquipmentId,
    #[serde(default)]
    horario_operativo: Option<(i64, i64)>,
}

#[derive(Debug, Deserialize)]
struct OcupacionWire {
    empleado_id: EmployeeId,
    inicio: i64,
    fin: i64,
}

#[derive(Debug, Deserialize)]
struct OcupacionEquipoWire {
    equipo_id: EquipmentId,
    inicio: i64,
    fin: i64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
enum ExcepcionWire {
    Business { start: i64, end: i64 },
    Employee { start: i64, end: i64, #[serde(default)] targets: Vec<EmployeeId> },
    Equipment { start: i64, end: i64, #[serde(default)] targets: Vec<EquipmentId> },
    Service { start: i64, end: i64, #[serde(default)] targets: Vec<ServiceId> },
}

impl From<ExcepcionWire> for Exception {
    fn from(w: ExcepcionWire) -> Self {
        match w {
            ExcepcionWire::Business { start, end } => Exception {
                scope: BlockingScope::Business,
                start_min: start,
                end_min: end,
            },
            ExcepcionWire::Employee { start, end, targets } => Exception {
                scope: BlockingScope::Employee { targets },
                start_min: start,
                end_min: end,
            },
            ExcepcionWire::Equipment { start, end, targets } => Exception {
                scope: BlockingScope::Equipment { targets },
                start_min: start,
                end_min: end,
            },
            ExcepcionWire::Service { start, end, targets } => Exception {
                scope: BlockingScope::Service { targets },
                start_min: start,
                end_min: end,
            },
        }
    }
}

impl From<ScenarioWire> for Scenario {
    fn from(w: ScenarioWire) -> Self {
        let mut employee_occupations: HashMap<EmployeeId, Vec<Occupation>> = HashMap::new();
        for o in w.ocupaciones {
            employee_occupations
                .entry(o.empleado_id)
                .or_default()
                .push(Occupation { start_min: o.inicio, end_min: o.fin });
        }

        let mut equipment_occupations: HashMap<EquipmentId, Vec<Occupation>> = HashMap::new();
        for o in w.ocupaciones_equipo {
            equipment_occupations
                .entry(o.equipo_id)
                .or_default()
                .push(Occupation { start_min: o.inicio, end_min: o.fin });
        }

        Scenario {
            id: String::new(),
            business_attention_window: w
                .horario_atencion_negocio
                .map(|(s, e)| DayWindow::new(s, e)),
            services: w.servicios,
            employees: w.empleados,
            equipment: w
                .equipos
                .into_iter()
                .map(|e| Equipment {
                    equipment_id: e.equipo_id,
                    operating_window: e.horario_operativo.map(|(s, e)| DayWindow::new(s, e)),
                })
                .collect(),
            employee_occupations,
            equipment_occupations,
            exceptions: w.excepciones.into_iter().map(Exception::from).collect(),
        }
    }
}

/// Holds loaded scenarios in memory and doubles as the default repository
/// implementation: with no persistent database in scope, the fixture corpus
/// is the only data source behind the repository contracts.
#[derive(Debug, Clone, Default)]
pub struct FixtureRepositories {
    scenarios: HashMap<String, Scenario>,
}

impl FixtureRepositories {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::load_from_str(&raw)
    }

    pub fn load_from_str(raw: &str) -> Result<Self, FixtureError> {
        let doc: FixtureDocument = serde_json::from_str(raw)?;
        let scenarios = doc
            .scenarios
            .into_iter()
            .map(|(id, wire)| {
                let mut scenario = Scenario::from(wire);
                scenario.id = id.clone();
                (id, scenario)
            })
            .collect();
        Ok(Self { scenarios })
    }

    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }
}

impl ServiceRepository for FixtureRepositories {
    fn get_service(&self, id: &ServiceId) -> Option<Service> {
        self.scenarios.values().find_map(|s| s.service(id).cloned())
    }
}

impl EmployeeScheduleRepository for FixtureRepositories {
    fn get_employee_schedules(&self, _base_day: DateTime<Utc>, filter: &ScheduleFilter) -> Vec<EmployeeSchedule> {
        self.scenarios
            .values()
            .flat_map(|s| s.employees.iter())
            .filter(|e| filter.service_id.map(|id| e.assigned_to_service(&id)).unwrap_or(true))
            .filter(|e| filter.equipment_id.map(|id| e.assigned_to_equipment(&id)).unwrap_or(true))
            .cloned()
            .collect()
    }
}

impl OccupationRepository for FixtureRepositories {
    fn get_occupations(
        &self,
        employee_ids: &[EmployeeId],
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Vec<(EmployeeId, Occupation)> {
        self.scenarios
            .values()
            .flat_map(|s| s.employee_occupations.iter())
            .filter(|(id, _)| employee_ids.contains(id))
            .flat_map(|(id, occs)| occs.iter().map(move |o| (*id, *o)))
            .collect()
    }
}

impl ScenarioRepository for FixtureRepositories {
    fn load_scenario(&self, id: &str) -> Option<Scenario> {
        self.scenarios.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
      "scenarios": {
        "baseline-pool": {
          "horario_atencion_negocio": [480, 1200],
          "servicios": {
            "s2": {
              "id": "11111111-1111-1111-1111-111111111111",
              "duration_min": 30,
              "buffer_before_min": 10,
              "buffer_after_min": 5,
              "attention_window": null,
              "compatible_equipment": [],
              "equipment_selection_policy": "least_loaded"
            }
          },
          "empleados": [
            {
              "employee_id": "22222222-2222-2222-2222-222222222222",
              "work_window": {"start_min": 540, "end_min": 1020},
              "assigned_services": [],
              "assigned_equipment": []
            }
          ],
          "equipos": [
            {"equipo_id": "33333333-3333-3333-3333-333333333333", "horario_operativo": [540, 1020]}
          ],
          "ocupaciones": [
            {"empleado_id": "22222222-2222-2222-2222-222222222222", "inicio": 600, "fin": 630}
          ],
          "ocupaciones_equipo": [],
          "excepciones": [
            {"scope": "business", "start": 1000, "end": 1010}
          ]
        }
      }
    }
    "#;

    #[test]
    fn test_load_from_str_parses_scenario_and_nested_entities() {
        let repo = FixtureRepositories::load_from_str(SAMPLE).unwrap();
        let scenario = repo.scenario("baseline-pool").unwrap();
        assert_eq!(scenario.services.len(), 1);
        assert_eq!(scenario.employees.len(), 1);
        assert_eq!(scenario.equipment.len(), 1);
        assert_eq!(scenario.exceptions.len(), 1);
        assert_eq!(scenario.business_attention_window, Some(DayWindow::new(480, 1200)));
    }

    #[test]
    fn test_load_from_str_converts_occupations_into_per_employee_map() {
        let repo = FixtureRepositories::load_from_str(SAMPLE).unwrap();
        let scenario = repo.scenario("baseline-pool").unwrap();
        let emp = scenario.employees[0].employee_id;
        assert_eq!(scenario.employee_occupations[&emp], vec![Occupation { start_min: 600, end_min: 630 }]);
    }

    #[test]
    fn test_load_from_str_rejects_malformed_json() {
        assert!(FixtureRepositories::load_from_str("{not json").is_err());
    }

    #[test]
    fn test_service_repository_scans_across_scenarios() {
        let repo = FixtureRepositories::load_from_str(SAMPLE).unwrap();
        let scenario = repo.scenario("baseline-pool").unwrap();
        let svc_id = scenario.services.values().next().unwrap().id;
        assert!(repo.get_service(&svc_id).is_some());
    }
}
