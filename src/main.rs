use axum::Router;
use roundtrip::config::Config;
use roundtrip::db::{PgSpatialEngine, SpatialEngine};
use roundtrip::services::roundtrip::RoundTripGenerator;
use roundtrip::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roundtrip=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting round trip API server");
    tracing::info!(
        network_table = %config.engine.network_table,
        query_timeout_ms = config.engine.query_timeout.as_millis() as u64,
        parallel_sectors = config.round_trip.parallel_sectors,
        "Configuration loaded successfully"
    );

    // Connect to the spatial engine
    tracing::info!("Connecting to spatial engine...");
    let db_pool = roundtrip::db::create_pool(&config.database_url, &config.engine).await?;
    tracing::info!("Spatial engine connection established");

    let engine: Arc<dyn SpatialEngine> = Arc::new(PgSpatialEngine::new(db_pool, &config.engine));
    let route_generator = RoundTripGenerator::new(engine, config.round_trip.clone());

    let state = Arc::new(AppState { route_generator });

    // Build router with CORS and tracing
    let app = Router::new()
        .merge(roundtrip::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
