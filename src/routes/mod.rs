pub mod debug;
pub mod round_trip;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/roundtrip", get(round_trip::create_round_trip))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
