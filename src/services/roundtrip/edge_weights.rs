//! Edge diversification heuristic.
//!
//! Every edge of the k primary routes is scored by how close to the middle of
//! its route it sits and by how many of the k routes share it. Edges of the
//! reference route that score above the threshold are excluded when searching
//! for the way back, which pushes the return path away from the way out.

use super::path_fetcher::KspResultSet;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeight {
    pub edge_id: i64,
    /// Mean of [`mid_distance_weight`] over every occurrence of the edge
    pub mid_distance_weight_avg: f64,
    /// Share of the returned routes that use the edge
    pub repetition_ratio: f64,
}

impl EdgeWeight {
    pub fn dispose_value(&self) -> f64 {
        self.repetition_ratio * self.mid_distance_weight_avg
    }

    pub fn is_disposable(&self, threshold: f64) -> bool {
        self.dispose_value() > threshold
    }
}

/// 1 at the middle of a route of `segment_count` segments, 0 at its start.
pub fn mid_distance_weight(sequence: usize, segment_count: usize) -> f64 {
    let middle = segment_count as f64 / 2.0;
    1.0 - ((middle - sequence as f64).abs() / middle)
}

/// Weights for every edge used by any of the routes, keyed by edge id.
pub fn edge_weights(result: &KspResultSet) -> BTreeMap<i64, EdgeWeight> {
    let route_count = result.routes().len();
    let mut occurrences: BTreeMap<i64, Vec<f64>> = BTreeMap::new();

    for route in result.routes() {
        let segment_count = route.segments.len();
        for segment in &route.segments {
            occurrences
                .entry(segment.edge_id)
                .or_default()
                .push(mid_distance_weight(segment.sequence, segment_count));
        }
    }

    occurrences
        .into_iter()
        .map(|(edge_id, weights)| {
            let mid_distance_weight_avg = weights.iter().sum::<f64>() / weights.len() as f64;
            let repetition_ratio = result.repetitions(edge_id) as f64 / route_count as f64;
            (
                edge_id,
                EdgeWeight {
                    edge_id,
                    mid_distance_weight_avg,
                    repetition_ratio,
                },
            )
        })
        .collect()
}

/// Edges of the reference route whose dispose value exceeds `threshold`,
/// in ascending id order.
pub fn disposable_edges(result: &KspResultSet, threshold: f64) -> Vec<i64> {
    let Some(reference) = result.primary() else {
        return Vec::new();
    };

    edge_weights(result)
        .into_values()
        .filter(|weight| reference.contains_edge(weight.edge_id))
        .filter(|weight| weight.is_disposable(threshold))
        .map(|weight| weight.edge_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PathRow;

    fn result_from(routes: &[&[i64]]) -> KspResultSet {
        let mut seq = 0;
        let mut rows = Vec::new();
        for (route_id, edges) in routes.iter().enumerate() {
            for edge_id in edges.iter() {
                seq += 1;
                rows.push(PathRow {
                    seq,
                    route_id: route_id as i64 + 1,
                    edge_id: *edge_id,
                    geometry: String::new(),
                });
            }
        }
        KspResultSet::from_rows(rows)
    }

    #[test]
    fn test_mid_distance_weight() {
        assert_eq!(mid_distance_weight(0, 4), 0.0);
        assert_eq!(mid_distance_weight(1, 4), 0.5);
        assert_eq!(mid_distance_weight(2, 4), 1.0);
        assert_eq!(mid_distance_weight(3, 4), 0.5);
        assert_eq!(mid_distance_weight(0, 1), 0.0);
    }

    #[test]
    fn test_dispose_threshold_is_strict() {
        let above = EdgeWeight {
            edge_id: 1,
            mid_distance_weight_avg: 0.41,
            repetition_ratio: 1.0,
        };
        let at = EdgeWeight {
            edge_id: 2,
            mid_distance_weight_avg: 0.4,
            repetition_ratio: 1.0,
        };
        assert!(above.is_disposable(0.4));
        assert!(!at.is_disposable(0.4));
    }

    #[test]
    fn test_weights_average_across_routes() {
        // edge 7 sits at the middle of route 1 (seq 2 of 4) and at the start
        // of route 2 (seq 0 of 2)
        let result = result_from(&[&[1, 2, 7, 3], &[7, 4]]);
        let weights = edge_weights(&result);

        let edge = weights[&7];
        assert!((edge.mid_distance_weight_avg - 0.5).abs() < 1e-12);
        assert!((edge.repetition_ratio - 1.0).abs() < 1e-12);
        assert!((edge.dispose_value() - 0.5).abs() < 1e-12);

        let lone = weights[&4];
        assert!((lone.repetition_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shared_middle_edges_are_disposed() {
        // three routes of four edges sharing edges 2 and 3 at sequences 1 and 2
        let result = result_from(&[&[1, 2, 3, 4], &[5, 2, 3, 6], &[7, 2, 3, 8]]);

        // edge 2: weight 0.5, ratio 1.0 -> 0.5; edge 3: weight 1.0 -> 1.0
        assert_eq!(disposable_edges(&result, 0.4), vec![2, 3]);
        assert_eq!(disposable_edges(&result, 0.5), vec![3]);
    }

    #[test]
    fn test_only_reference_edges_are_eligible() {
        // edge 9 is in the middle of both alternatives but absent from routes[0]
        let result = result_from(&[&[1, 2, 3, 4], &[5, 6, 9, 8], &[5, 6, 9, 8]]);
        let weights = edge_weights(&result);
        assert!(weights[&9].dispose_value() > 0.4);

        let disposed = disposable_edges(&result, 0.4);
        assert!(!disposed.contains(&9));
        assert!(disposed.is_empty());
    }

    #[test]
    fn test_nothing_to_dispose_on_empty_result() {
        assert!(disposable_edges(&KspResultSet::default(), 0.4).is_empty());
    }
}
