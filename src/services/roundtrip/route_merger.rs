use crate::db::EngineSession;
use crate::error::{AppError, Result};
use crate::models::{LoopRoute, RouteCandidate, Sector, SectorFailure, SectorOutcome};
use std::collections::HashSet;

/// Union the reference path with the alternate path into one loop.
///
/// Edges shared by both paths are sent once. A union the engine reports as
/// empty or zero-length fails the sector; unparseable GeoJSON is an engine
/// error.
pub async fn merge_routes(
    session: &mut dyn EngineSession,
    primary: &RouteCandidate,
    alternate: &RouteCandidate,
    sector: Sector,
) -> Result<SectorOutcome> {
    let mut seen: HashSet<i64> = HashSet::new();
    let geometries: Vec<String> = primary
        .segments
        .iter()
        .chain(alternate.segments.iter())
        .filter(|segment| seen.insert(segment.edge_id))
        .map(|segment| segment.geometry.clone())
        .collect();

    let Some(merged) = session.union_length(&geometries).await? else {
        return Ok(SectorOutcome::Failure(SectorFailure::MergeFailed));
    };

    if !merged.length_m.is_finite() || merged.length_m <= 0.0 {
        tracing::debug!(
            sector = %sector,
            length_m = merged.length_m,
            "Merged loop is degenerate"
        );
        return Ok(SectorOutcome::Failure(SectorFailure::MergeFailed));
    }

    let geojson: geojson::Geometry = serde_json::from_str(&merged.geojson).map_err(|e| {
        AppError::MalformedEngineData(format!("merged geometry is not GeoJSON: {}", e))
    })?;

    Ok(SectorOutcome::Route(LoopRoute {
        geojson,
        length_m: merged.length_m,
        sector,
    }))
}
