use crate::models::{LoopRoute, RoundTripResponse, Sector, SectorOutcome};

/// The successful loop whose length is closest to `requested_distance_m`.
/// Exact ties keep the earlier sector.
pub fn select_best_route(
    outcomes: &[(Sector, SectorOutcome)],
    requested_distance_m: f64,
) -> Option<RoundTripResponse> {
    outcomes
        .iter()
        .filter_map(|(_, outcome)| outcome.route())
        .min_by(|a, b| {
            distance_error(a, requested_distance_m).total_cmp(&distance_error(b, requested_distance_m))
        })
        .cloned()
        .map(RoundTripResponse::from)
}

fn distance_error(route: &LoopRoute, requested_distance_m: f64) -> f64 {
    (requested_distance_m - route.length_m).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectorFailure;
    use geojson::{Geometry, Value};

    fn route(sector: Sector, length_m: f64) -> (Sector, SectorOutcome) {
        (
            sector,
            SectorOutcome::Route(LoopRoute {
                geojson: Geometry::new(Value::LineString(vec![
                    vec![24.9, 60.1],
                    vec![25.0, 60.2],
                ])),
                length_m,
                sector,
            }),
        )
    }

    #[test]
    fn test_closest_length_wins() {
        let outcomes = vec![
            route(Sector::NorthEast, 9_800.0),
            route(Sector::SouthEast, 10_500.0),
            route(Sector::SouthWest, 11_200.0),
            (
                Sector::NorthWest,
                SectorOutcome::Failure(SectorFailure::NoEdgesDisposed),
            ),
        ];

        let best = select_best_route(&outcomes, 10_000.0).unwrap();
        assert_eq!(best.sector, Sector::NorthEast);
        assert_eq!(best.length_m, 9_800);
    }

    #[test]
    fn test_longer_route_can_win() {
        let outcomes = vec![
            route(Sector::NorthEast, 7_000.0),
            route(Sector::SouthWest, 10_300.4),
        ];
        let best = select_best_route(&outcomes, 10_000.0).unwrap();
        assert_eq!(best.sector, Sector::SouthWest);
        assert_eq!(best.length_m, 10_300);
    }

    #[test]
    fn test_tie_keeps_first_sector() {
        let outcomes = vec![
            route(Sector::SouthEast, 9_500.0),
            route(Sector::SouthWest, 10_500.0),
        ];
        let best = select_best_route(&outcomes, 10_000.0).unwrap();
        assert_eq!(best.sector, Sector::SouthEast);
    }

    #[test]
    fn test_no_successful_sector() {
        let outcomes = vec![
            (
                Sector::NorthEast,
                SectorOutcome::Failure(SectorFailure::NoCandidate),
            ),
            (
                Sector::SouthEast,
                SectorOutcome::Failure(SectorFailure::MergeFailed),
            ),
        ];
        assert!(select_best_route(&outcomes, 10_000.0).is_none());
        assert!(select_best_route(&[], 10_000.0).is_none());
    }
}
