use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if the spatial engine is reachable
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    for check in state.route_generator.engine().health().await {
        match check.status {
            Ok(version) => {
                status["checks"][check.name] = json!(version);
            }
            Err(e) => {
                status["checks"][check.name] = json!({"error": e});
                status["status"] = json!("error");
            }
        }
    }

    Json(status)
}
