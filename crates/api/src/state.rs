use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use store::{FixtureRepositories, ReservationStore};

/// Shared application state, cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReservationStore>,
    pub repositories: Arc<FixtureRepositories>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(repositories: FixtureRepositories, metrics_handle: PrometheusHandle) -> Self {
        Self {
            store: Arc::new(ReservationStore::new()),
            repositories: Arc::new(repositories),
            metrics_handle,
        }
    }
}
