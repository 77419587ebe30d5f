use crate::error::{AppError, Result};
use crate::models::{RoundTripQuery, RoundTripResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

/// GET /roundtrip?start_coordinates=<lat>,<lon>&distance_km=<km>
/// Generate a loop that starts and ends at the nearest road node
pub async fn create_round_trip(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoundTripQuery>,
) -> Result<Json<RoundTripResponse>> {
    // Validate before touching the spatial engine
    let request = query.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        lat = request.start.lat,
        lng = request.start.lng,
        distance_km = request.distance_km,
        "Round trip request: ({:.4}, {:.4}), {:.1}km",
        request.start.lat, request.start.lng, request.distance_km
    );

    let route = state.route_generator.generate(&request).await?;

    Ok(Json(route))
}
