use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::{AvailabilityRequest, ServiceWindowPolicy};
use shared::ServiceId;

use crate::error::ApiResult;
use crate::extract::StrictJson;
use crate::parse::parse_id;
use crate::state::AppState;
use crate::{metrics, resolve};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisponibilidadRequest {
    pub servicio_id: String,
    pub empleado_id: Option<String>,
    pub equipo_id: Option<String>,
    pub fecha_inicio_utc: DateTime<Utc>,
    pub fecha_fin_utc: DateTime<Utc>,
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub service_window_policy: ServiceWindowPolicy,
}

#[derive(Debug, Serialize)]
pub struct DisponibilidadResponse {
    pub horarios_disponibles: Vec<HorarioDisponible>,
}

#[derive(Debug, Serialize)]
pub struct HorarioDisponible {
    pub inicio_slot: DateTime<Utc>,
    pub fin_slot: DateTime<Utc>,
    pub empleado_id_asignado: String,
    pub equipo_id_asignado: Option<String>,
}

pub async fn disponibilidad(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<DisponibilidadRequest>,
) -> ApiResult<Json<DisponibilidadResponse>> {
    let _timer = metrics::Timer::start("disponibilidad");

    let service_id = parse_id::<ServiceId>("servicio_id", &body.servicio_id)?;
    let employee_filter = body.empleado_id.as_deref().map(|s| parse_id("empleado_id", s)).transpose()?;
    let equipment_filter = body.equipo_id.as_deref().map(|s| parse_id("equipo_id", s)).transpose()?;

    let base_midnight = domain::axis::midnight_of(body.fecha_inicio_utc);
    let request_window = domain::axis::to_minute_range(base_midnight, body.fecha_inicio_utc, body.fecha_fin_utc);

    let resolved = resolve::resolve(&state.repositories, &service_id, body.scenario_id.as_deref(), base_midnight)?;

    let reservations = resolve::reservation_spans(&state.store, base_midnight, body.fecha_inicio_utc, body.fecha_fin_utc);
    let operational_blockings =
        resolve::operational_blocking_spans(&state.store, base_midnight, body.fecha_inicio_utc, body.fecha_fin_utc);

    let ctx = resolved.context(&reservations, &operational_blockings);
    let req = AvailabilityRequest {
        request_window,
        service: &resolved.service,
        employee_filter,
        equipment_filter,
        service_window_policy: body.service_window_policy,
        exclude_employee: None,
    };

    let candidates = domain::availability::search_and_select(&req, &ctx)?;
    metrics::record_disponibilidad(candidates.len());

    let horarios_disponibles = candidates
        .into_iter()
        .map(|c| HorarioDisponible {
            inicio_slot: domain::axis::from_minute(base_midnight, c.start_min),
            fin_slot: domain::axis::from_minute(base_midnight, c.end_min),
            empleado_id_asignado: c.employee_id.to_string(),
            equipo_id_asignado: c.equipment_id.map(|e| e.to_string()),
        })
        .collect();

    Ok(Json(DisponibilidadResponse { horarios_disponibles }))
}
