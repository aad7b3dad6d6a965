pub mod error;
pub mod extract;
pub mod metrics;
pub mod parse;
pub mod resolve;
pub mod routes;
pub mod state;
pub mod wire;

pub use error::ApiError;
pub use metrics::init_metrics;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router: the three booking endpoints plus health
/// and metrics, wrapped in the same CORS/tracing layers the teacher wraps
/// its much larger route table in.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/metrics", get(routes::health::metrics))
        .route("/api/v1/disponibilidad", post(routes::disponibilidad::disponibilidad))
        .route("/api/v1/reservas", post(routes::reservas::reservas))
        .route("/api/v1/bloqueos", post(routes::bloqueos::bloqueos))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
