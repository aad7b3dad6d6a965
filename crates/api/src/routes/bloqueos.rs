use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::repository::ServiceRepository;
use domain::BlockingScope;
use shared::{AppError, EmployeeId, EquipmentId, ServiceId};
use store::NewOperationalBlocking;

use crate::error::ApiResult;
use crate::extract::StrictJson;
use crate::parse::parse_id;
use crate::state::AppState;
use crate::wire::estado_str;
use crate::{metrics, resolve};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BloqueoRequest {
    pub inicio_utc: DateTime<Utc>,
    pub fin_utc: DateTime<Utc>,
    pub motivo: String,
    pub scope: String,
    #[serde(default)]
    pub empleado_ids: Vec<String>,
    #[serde(default)]
    pub equipo_ids: Vec<String>,
    #[serde(default)]
    pub servicio_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BloqueoResponse {
    pub bloqueo_id: String,
    pub procesadas: Vec<ReservaProcesada>,
}

#[derive(Debug, Serialize)]
pub struct ReservaProcesada {
    pub reserva_id: String,
    pub estado: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empleado_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipo_id: Option<String>,
}

pub async fn bloqueos(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<BloqueoRequest>,
) -> ApiResult<(StatusCode, Json<BloqueoResponse>)> {
    let _timer = metrics::Timer::start("bloqueos");

    if body.fin_utc <= body.inicio_utc {
        return Err(AppError::Domain(shared::DomainError::InvalidRange).into());
    }

    let scope = parse_scope(&body)?;

    let service_repositories = state.repositories.clone();
    let scenario_repositories = state.repositories.clone();

    let cascade = store::CascadeManager::new(state.store.as_ref());
    let (blocking_id, outcomes) = cascade.create_blocking(
        NewOperationalBlocking { scope, start: body.inicio_utc, end: body.fin_utc, reason: body.motivo },
        move |service_id: &ServiceId| service_repositories.get_service(service_id),
        move |scenario_id: Option<&str>| scenario_repositories.scenario(scenario_id?).cloned(),
    );

    let reassigned = outcomes.iter().filter(|o| o.state == store::ReservationState::Reassigned).count();
    let pending = outcomes.iter().filter(|o| o.state == store::ReservationState::PendingReschedule).count();
    metrics::record_bloqueo_applied(reassigned, pending);

    let procesadas = outcomes
        .into_iter()
        .map(|o| ReservaProcesada {
            reserva_id: o.reservation_id.to_string(),
            estado: estado_str(o.state),
            empleado_id: o.employee_id.map(|e| e.to_string()),
            equipo_id: o.equipment_id.map(|e| e.to_string()),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(BloqueoResponse { bloqueo_id: blocking_id.to_string(), procesadas })))
}

fn parse_scope(body: &BloqueoRequest) -> ApiResult<BlockingScope> {
    match body.scope.as_str() {
        "business" => Ok(BlockingScope::Business),
        "employee" => Ok(BlockingScope::Employee { targets: parse_ids::<EmployeeId>("empleado_ids", &body.empleado_ids)? }),
        "equipment" => Ok(BlockingScope::Equipment { targets: parse_ids::<EquipmentId>("equipo_ids", &body.equipo_ids)? }),
        "service" => Ok(BlockingScope::Service { targets: parse_ids::<ServiceId>("servicio_ids", &body.servicio_ids)? }),
        other => Err(AppError::Validation(format!("unknown blocking scope: {other}")).into()),
    }
}

fn parse_ids<T: std::str::FromStr>(field: &str, raw: &[String]) -> ApiResult<Vec<T>> {
    raw.iter().map(|s| parse_id(field, s)).collect()
}
