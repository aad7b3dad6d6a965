use std::net::SocketAddr;

use api::{create_app, init_metrics, AppState};
use store::FixtureRepositories;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let metrics_handle = init_metrics();
    tracing::info!("Prometheus metrics initialized");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fixtures_path = std::env::var("SCENARIO_FIXTURES_PATH").unwrap_or_else(|_| "docs/test_scenarios.json".to_string());
    let repositories = match FixtureRepositories::load_from_file(&fixtures_path) {
        Ok(repositories) => {
            tracing::info!(path = %fixtures_path, "loaded scenario fixtures");
            repositories
        }
        Err(err) => {
            tracing::warn!(path = %fixtures_path, error = %err, "no scenario fixtures loaded, starting with an empty repository");
            FixtureRepositories::empty()
        }
    };

    let state = AppState::new(repositories, metrics_handle);
    let app = create_app(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
