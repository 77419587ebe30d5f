use crate::models::Sector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One edge of a path, renumbered so each path starts at sequence 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub sequence: usize,
    pub edge_id: i64,
    /// Hex EWKB as handed out by the engine
    pub geometry: String,
}

/// One of the k shortest paths, segments in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub route_id: i64,
    pub segments: Vec<Segment>,
}

impl RouteCandidate {
    pub fn contains_edge(&self, edge_id: i64) -> bool {
        self.segments.iter().any(|segment| segment.edge_id == edge_id)
    }
}

/// Why a sector produced no loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorFailure {
    NoCandidate,
    NoRoutes,
    NoEdgesDisposed,
    NoAlternateRoute,
    MergeFailed,
}

impl fmt::Display for SectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SectorFailure::NoCandidate => "no candidate for sector",
            SectorFailure::NoRoutes => "no routes for sector",
            SectorFailure::NoEdgesDisposed => "no edges disposed",
            SectorFailure::NoAlternateRoute => "no alternate route",
            SectorFailure::MergeFailed => "merge failed",
        };
        f.write_str(reason)
    }
}

/// A merged out-and-back loop for one sector, length not yet rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRoute {
    pub geojson: geojson::Geometry,
    pub length_m: f64,
    pub sector: Sector,
}

/// Final state of one sector pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SectorOutcome {
    Route(LoopRoute),
    Failure(SectorFailure),
}

impl SectorOutcome {
    pub fn route(&self) -> Option<&LoopRoute> {
        match self {
            SectorOutcome::Route(route) => Some(route),
            SectorOutcome::Failure(_) => None,
        }
    }
}

/// Response body for a successful round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundTripResponse {
    pub geojson: geojson::Geometry,
    pub length_m: i64,
    pub sector: Sector,
}

impl From<LoopRoute> for RoundTripResponse {
    fn from(route: LoopRoute) -> Self {
        RoundTripResponse {
            geojson: route.geojson,
            length_m: route.length_m.round() as i64,
            sector: route.sector,
        }
    }
}
