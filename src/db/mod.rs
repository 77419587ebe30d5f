use crate::config::EngineConfig;
use crate::constants::ENGINE_ACQUIRE_TIMEOUT_SECONDS;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub mod engine;
mod engine_queries;

pub use engine::{
    AnnulusQuery, CandidateRow, EngineSession, HealthCheck, MergedGeometry, NetworkNode,
    PathQuery, PathRow, PgSpatialEngine, SpatialEngine,
};

/// Pool for engine sessions. Every connection carries a server-side
/// `statement_timeout` matching the configured query deadline.
pub async fn create_pool(database_url: &str, config: &EngineConfig) -> Result<PgPool, sqlx::Error> {
    let statement_timeout_ms = config.query_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(database_url)?
        .options([("statement_timeout", statement_timeout_ms.as_str())]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(ENGINE_ACQUIRE_TIMEOUT_SECONDS))
        .connect_with(options)
        .await
}
