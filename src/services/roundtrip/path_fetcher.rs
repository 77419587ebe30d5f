use crate::db::{EngineSession, PathQuery, PathRow};
use crate::error::Result;
use crate::models::{BoundingBox, RouteCandidate, Segment};
use std::collections::{HashMap, HashSet};

/// k shortest paths between one node pair, each renumbered from sequence 0.
#[derive(Debug, Clone, Default)]
pub struct KspResultSet {
    routes: Vec<RouteCandidate>,
    /// edge id -> number of distinct routes using it
    edge_repetitions: HashMap<i64, usize>,
}

impl KspResultSet {
    /// Group globally sequenced engine rows into routes.
    ///
    /// A new route starts whenever `route_id` changes in sequence order; the
    /// first raw sequence of a route becomes its offset.
    pub fn from_rows(mut rows: Vec<PathRow>) -> Self {
        rows.sort_by_key(|row| row.seq);

        let mut routes: Vec<RouteCandidate> = Vec::new();
        let mut offset = 0i64;

        for row in rows {
            match routes.last_mut() {
                Some(route) if route.route_id == row.route_id => {
                    route.segments.push(Segment {
                        sequence: (row.seq - offset) as usize,
                        edge_id: row.edge_id,
                        geometry: row.geometry,
                    });
                }
                _ => {
                    offset = row.seq;
                    routes.push(RouteCandidate {
                        route_id: row.route_id,
                        segments: vec![Segment {
                            sequence: 0,
                            edge_id: row.edge_id,
                            geometry: row.geometry,
                        }],
                    });
                }
            }
        }

        let mut edge_repetitions: HashMap<i64, usize> = HashMap::new();
        for route in &routes {
            let distinct: HashSet<i64> = route.segments.iter().map(|s| s.edge_id).collect();
            for edge_id in distinct {
                *edge_repetitions.entry(edge_id).or_insert(0) += 1;
            }
        }

        KspResultSet {
            routes,
            edge_repetitions,
        }
    }

    pub fn routes(&self) -> &[RouteCandidate] {
        &self.routes
    }

    /// The reference path (`routes[0]`).
    pub fn primary(&self) -> Option<&RouteCandidate> {
        self.routes.first()
    }

    pub fn repetitions(&self, edge_id: i64) -> usize {
        self.edge_repetitions.get(&edge_id).copied().unwrap_or(0)
    }
}

pub async fn fetch_primary_routes(
    session: &mut dyn EngineSession,
    start_node: i64,
    end_node: i64,
    bbox: BoundingBox,
    k: u32,
) -> Result<KspResultSet> {
    let rows = session
        .k_shortest_paths(&PathQuery {
            start_node,
            end_node,
            bbox,
            k,
            excluded_edges: Vec::new(),
        })
        .await?;

    let result = KspResultSet::from_rows(rows);
    tracing::debug!(
        start_node,
        end_node,
        routes = result.routes().len(),
        "Fetched {} primary routes {} -> {}",
        result.routes().len(),
        start_node,
        end_node
    );
    Ok(result)
}

/// Single shortest path avoiding `excluded_edges`, or `None` if the
/// remaining network no longer connects the pair.
pub async fn fetch_alternate_route(
    session: &mut dyn EngineSession,
    start_node: i64,
    end_node: i64,
    bbox: BoundingBox,
    excluded_edges: Vec<i64>,
) -> Result<Option<RouteCandidate>> {
    let excluded = excluded_edges.len();
    let rows = session
        .k_shortest_paths(&PathQuery {
            start_node,
            end_node,
            bbox,
            k: 1,
            excluded_edges,
        })
        .await?;

    let alternate = KspResultSet::from_rows(rows).routes.into_iter().next();
    tracing::debug!(
        start_node,
        end_node,
        excluded,
        found = alternate.is_some(),
        "Alternate route search excluding {} edges",
        excluded
    );
    Ok(alternate)
}
