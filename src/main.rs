// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use incline_telemetry::application::ingest_service::IngestService;
use incline_telemetry::application::map_service::MapService;
use incline_telemetry::infrastructure::batch_store::FsBatchStore;
use incline_telemetry::infrastructure::config::load_server_config;
use incline_telemetry::infrastructure::leaflet_renderer::LeafletRenderer;
use incline_telemetry::presentation::app_state::AppState;
use incline_telemetry::presentation::handlers::{collect_data, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_server_config()?;
    let mode = config.placement_mode()?;

    // Wire up the pipeline (infrastructure + application layers)
    let store = FsBatchStore::new(config.received_dir.clone());
    let map_service = MapService::new(Arc::new(LeafletRenderer));
    let ingest_service = IngestService::new(
        store,
        map_service,
        config.created_dir.clone(),
        mode,
        config.base_offset,
    );

    // Create application state
    let state = Arc::new(AppState { ingest_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/data_collector", post(collect_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.listen_addr.parse()?;
    println!("Starting incline-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
