use crate::config::RoundTripConfig;
use crate::constants::LOOP_SQUARE_EDGES;
use crate::db::AnnulusQuery;
use crate::models::{BoundingBox, Coordinates};

/// Straight-line distance from the start to the far corner of a square loop
/// whose perimeter is `route_distance_m`.
pub fn turnaround_range_m(route_distance_m: f64) -> f64 {
    let square_edge = route_distance_m / LOOP_SQUARE_EDGES;
    (square_edge.powi(2) + square_edge.powi(2)).sqrt()
}

/// Radii and boxes derived once per request and shared by every sector.
#[derive(Debug, Clone, Copy)]
pub struct SearchPlan {
    pub requested_distance_m: f64,
    pub center: Coordinates,
    pub optimal_radius_m: f64,
    pub min_radius_m: f64,
    pub max_radius_m: f64,
    /// Clips the turnaround candidate search, centered on the snapped start
    pub candidate_bbox: BoundingBox,
    /// Clips the edges the path searches may use, centered on the raw start
    pub routing_bbox: BoundingBox,
}

impl SearchPlan {
    pub fn new(
        requested_start: &Coordinates,
        start_node: &Coordinates,
        requested_distance_m: f64,
        config: &RoundTripConfig,
    ) -> Self {
        let optimal_radius_m = turnaround_range_m(requested_distance_m);
        let min_radius_m = turnaround_range_m(requested_distance_m * (1.0 - config.distance_margin));
        let max_radius_m = turnaround_range_m(requested_distance_m * (1.0 + config.distance_margin));

        let routing_extent_m =
            requested_distance_m * (1.0 + config.distance_margin) + config.routing_bbox_padding_m;

        SearchPlan {
            requested_distance_m,
            center: *start_node,
            optimal_radius_m,
            min_radius_m,
            max_radius_m,
            candidate_bbox: BoundingBox::around(
                start_node,
                max_radius_m * config.candidate_bbox_factor,
            ),
            routing_bbox: BoundingBox::around(requested_start, routing_extent_m),
        }
    }

    pub fn annulus_query(&self) -> AnnulusQuery {
        AnnulusQuery {
            center: self.center,
            min_radius_m: self.min_radius_m,
            max_radius_m: self.max_radius_m,
            optimal_radius_m: self.optimal_radius_m,
            bbox: self.candidate_bbox,
        }
    }
}
