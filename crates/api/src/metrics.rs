//! Prometheus metric names and the exporter init, following the teacher's
//! `metrics.rs` pattern (a names module plus a thin `init_metrics`).

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

pub mod names {
    pub const DISPONIBILIDAD_REQUESTS: &str = "disponibilidad_requests_total";
    pub const DISPONIBILIDAD_CANDIDATES: &str = "disponibilidad_candidates_returned";
    pub const RESERVAS_CREATED: &str = "reservas_created_total";
    pub const RESERVAS_CONFLICTS: &str = "reservas_conflicts_total";
    pub const BLOQUEOS_APPLIED: &str = "bloqueos_applied_total";
    pub const CASCADE_REASSIGNED: &str = "cascade_reassigned_total";
    pub const CASCADE_PENDING: &str = "cascade_pending_total";
    pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
}

pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    builder.install_recorder().expect("failed to install Prometheus metrics recorder")
}

/// Measures a handler's wall-clock time and records it under `route` on drop.
pub struct Timer {
    route: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(route: &'static str) -> Self {
        Self { route, started: Instant::now() }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        histogram!(names::REQUEST_DURATION, "route" => self.route).record(self.started.elapsed().as_secs_f64());
    }
}

pub fn record_disponibilidad(candidate_count: usize) {
    counter!(names::DISPONIBILIDAD_REQUESTS).increment(1);
    histogram!(names::DISPONIBILIDAD_CANDIDATES).record(candidate_count as f64);
}

pub fn record_reserva_created() {
    counter!(names::RESERVAS_CREATED).increment(1);
}

pub fn record_reserva_conflict() {
    counter!(names::RESERVAS_CONFLICTS).increment(1);
}

pub fn record_bloqueo_applied(reassigned: usize, pending: usize) {
    counter!(names::BLOQUEOS_APPLIED).increment(1);
    counter!(names::CASCADE_REASSIGNED).increment(reassigned as u64);
    counter!(names::CASCADE_PENDING).increment(pending as u64);
}
