use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::ServiceWindowPolicy;
use shared::{AppError, DomainError, ServiceId};
use store::{CreateReservationRequest, ReservationManager};

use crate::error::ApiResult;
use crate::extract::StrictJson;
use crate::parse::parse_id;
use crate::state::AppState;
use crate::wire::estado_str;
use crate::{metrics, resolve};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservaRequest {
    pub servicio_id: String,
    pub empleado_id: Option<String>,
    pub equipo_id: Option<String>,
    pub inicio_slot: DateTime<Utc>,
    pub fin_slot: DateTime<Utc>,
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub service_window_policy: ServiceWindowPolicy,
}

#[derive(Debug, Serialize)]
pub struct ReservaResponse {
    pub reserva_id: String,
    pub servicio_id: String,
    pub empleado_id: String,
    pub equipo_id: Option<String>,
    pub inicio: DateTime<Utc>,
    pub fin: DateTime<Utc>,
    pub estado: String,
}

pub async fn reservas(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<ReservaRequest>,
) -> ApiResult<(StatusCode, Json<ReservaResponse>)> {
    let _timer = metrics::Timer::start("reservas");

    if body.fin_slot <= body.inicio_slot {
        return Err(AppError::Domain(DomainError::InvalidRange).into());
    }

    let service_id = parse_id::<ServiceId>("servicio_id", &body.servicio_id)?;
    let employee_id = body.empleado_id.as_deref().map(|s| parse_id("empleado_id", s)).transpose()?;
    let equipment_id = body.equipo_id.as_deref().map(|s| parse_id("equipo_id", s)).transpose()?;

    let base_midnight = domain::axis::midnight_of(body.inicio_slot);
    let request_window = domain::axis::to_minute_range(base_midnight, body.inicio_slot, body.fin_slot);

    let resolved = resolve::resolve(&state.repositories, &service_id, body.scenario_id.as_deref(), base_midnight)?;
    let reservations = resolve::reservation_spans(&state.store, base_midnight, body.inicio_slot, body.fin_slot);
    let operational_blockings =
        resolve::operational_blocking_spans(&state.store, base_midnight, body.inicio_slot, body.fin_slot);
    let ctx = resolved.context(&reservations, &operational_blockings);

    let manager = ReservationManager::new(state.store.as_ref());
    let result = manager.create(
        CreateReservationRequest {
            service: resolved.service,
            employee_id,
            equipment_id,
            start: body.inicio_slot,
            end: body.fin_slot,
            scenario_id: body.scenario_id,
            service_window_policy: body.service_window_policy,
        },
        &ctx,
        request_window,
    );

    let reservation = match result {
        Ok(r) => r,
        Err(err) => {
            if err == DomainError::Conflict {
                metrics::record_reserva_conflict();
            }
            return Err(AppError::Domain(err).into());
        }
    };
    metrics::record_reserva_created();

    Ok((
        StatusCode::CREATED,
        Json(ReservaResponse {
            reserva_id: reservation.id.to_string(),
            servicio_id: reservation.service_id.to_string(),
            empleado_id: reservation.employee_id.to_string(),
            equipo_id: reservation.equipment_id.map(|e| e.to_string()),
            inicio: reservation.start,
            fin: reservation.end,
            estado: estado_str(reservation.state),
        }),
    ))
}
