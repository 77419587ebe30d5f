#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use roundtrip::config::RoundTripConfig;
use roundtrip::db::{
    AnnulusQuery, CandidateRow, EngineSession, HealthCheck, MergedGeometry, NetworkNode,
    PathQuery, PathRow, SpatialEngine,
};
use roundtrip::models::Coordinates;
use roundtrip::services::roundtrip::RoundTripGenerator;
use roundtrip::{AppError, AppState, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const EDGE_LENGTH_M: f64 = 1_000.0;
pub const QUERY_TIMEOUT_MS: u64 = 15_000;

/// Canned road network answering the engine contract from memory.
#[derive(Default, Clone)]
pub struct FakeNetwork {
    pub start_node: Option<NetworkNode>,
    pub candidates: Vec<CandidateRow>,
    /// end node -> rows for the unrestricted k-shortest-paths query
    pub primary_paths: HashMap<i64, Vec<PathRow>>,
    /// end node -> rows for the query with excluded edges
    pub alternate_paths: HashMap<i64, Vec<PathRow>>,
    /// geometry -> length; unlisted geometries are EDGE_LENGTH_M long
    pub edge_lengths: HashMap<String, f64>,
    /// end nodes whose path query fails like a dropped connection
    pub failing_nodes: Vec<i64>,
    /// end nodes whose path query runs past the engine deadline
    pub stalled_nodes: Vec<i64>,
}

#[derive(Default)]
pub struct FakeEngine {
    network: FakeNetwork,
    pub sessions_acquired: AtomicUsize,
    pub excluded_requests: Mutex<Vec<(i64, Vec<i64>)>>,
}

impl FakeEngine {
    pub fn new(network: FakeNetwork) -> Arc<Self> {
        Arc::new(FakeEngine {
            network,
            sessions_acquired: AtomicUsize::new(0),
            excluded_requests: Mutex::new(Vec::new()),
        })
    }

    pub fn acquired(&self) -> usize {
        self.sessions_acquired.load(Ordering::SeqCst)
    }
}

struct FakeSession {
    engine: Arc<FakeEngine>,
}

/// `Arc<FakeEngine>` is what tests hold; the session needs its own handle.
pub struct SharedFakeEngine(pub Arc<FakeEngine>);

#[async_trait]
impl SpatialEngine for SharedFakeEngine {
    async fn acquire(&self) -> Result<Box<dyn EngineSession>> {
        self.0.sessions_acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            engine: Arc::clone(&self.0),
        }))
    }

    async fn health(&self) -> Vec<HealthCheck> {
        vec![
            HealthCheck {
                name: "database",
                status: Ok("ok".to_string()),
            },
            HealthCheck {
                name: "pgrouting",
                status: Ok("3.6.1".to_string()),
            },
        ]
    }
}

#[async_trait]
impl EngineSession for FakeSession {
    async fn nearest_node(&mut self, _point: &Coordinates) -> Result<Option<NetworkNode>> {
        Ok(self.engine.network.start_node)
    }

    fn candidates_in_annulus(
        &mut self,
        _query: &AnnulusQuery,
    ) -> BoxStream<'_, Result<CandidateRow>> {
        stream::iter(self.engine.network.candidates.clone().into_iter().map(Ok)).boxed()
    }

    async fn k_shortest_paths(&mut self, query: &PathQuery) -> Result<Vec<PathRow>> {
        let network = &self.engine.network;
        if network.failing_nodes.contains(&query.end_node) {
            return Err(AppError::Engine(sqlx::Error::PoolTimedOut));
        }
        if network.stalled_nodes.contains(&query.end_node) {
            return Err(AppError::EngineTimeout(QUERY_TIMEOUT_MS));
        }

        let paths = if query.excluded_edges.is_empty() {
            &network.primary_paths
        } else {
            self.engine
                .excluded_requests
                .lock()
                .unwrap()
                .push((query.end_node, query.excluded_edges.clone()));
            &network.alternate_paths
        };
        Ok(paths.get(&query.end_node).cloned().unwrap_or_default())
    }

    async fn union_length(&mut self, geometries: &[String]) -> Result<Option<MergedGeometry>> {
        if geometries.is_empty() {
            return Ok(None);
        }

        let length_m = geometries
            .iter()
            .map(|g| {
                self.engine
                    .network
                    .edge_lengths
                    .get(g)
                    .copied()
                    .unwrap_or(EDGE_LENGTH_M)
            })
            .sum();
        let lines: Vec<String> = (0..geometries.len())
            .map(|i| format!("[[{}.0,60.0],[{}.5,60.1]]", 24 + i, 24 + i))
            .collect();

        Ok(Some(MergedGeometry {
            geojson: format!(
                r#"{{"type":"MultiLineString","coordinates":[{}]}}"#,
                lines.join(",")
            ),
            length_m,
        }))
    }
}

pub fn geometry(edge_id: i64) -> String {
    format!("edge-{}", edge_id)
}

/// Rows for consecutive routes, sequence numbers continuing from `first_seq`.
pub fn path_rows(first_seq: i64, routes: &[&[i64]]) -> Vec<PathRow> {
    let mut seq = first_seq;
    let mut rows = Vec::new();
    for (index, edges) in routes.iter().enumerate() {
        for edge_id in edges.iter() {
            rows.push(PathRow {
                seq,
                route_id: index as i64 + 1,
                edge_id: *edge_id,
                geometry: geometry(*edge_id),
            });
            seq += 1;
        }
    }
    rows
}

pub fn candidate(node_id: i64, lat: f64, lng: f64, way_type: Option<i32>) -> CandidateRow {
    CandidateRow {
        lat,
        lng,
        node_id,
        distance_m: 3_500.0,
        way_type,
    }
}

pub const START_LAT: f64 = 60.0;
pub const START_LNG: f64 = 25.0;

/// Three primary routes sharing edges `base+2` and `base+3` in their middle,
/// and an alternate that avoids them. The merged loop has six distinct
/// edges; `base+10` carries the remainder so the loop totals `loop_length_m`.
pub fn add_loop_sector(network: &mut FakeNetwork, end_node: i64, base: i64, loop_length_m: f64) {
    let b = base;
    network.primary_paths.insert(
        end_node,
        path_rows(
            57,
            &[
                &[b + 1, b + 2, b + 3, b + 4],
                &[b + 5, b + 2, b + 3, b + 6],
                &[b + 7, b + 2, b + 3, b + 8],
            ],
        ),
    );
    network
        .alternate_paths
        .insert(end_node, path_rows(1, &[&[b + 1, b + 9, b + 10, b + 4]]));
    network
        .edge_lengths
        .insert(geometry(b + 10), loop_length_m - 5.0 * EDGE_LENGTH_M);
}

/// NE, SE and SW produce 9800 m, 10500 m and 11200 m loops; NW has a
/// candidate but no path to it.
pub fn four_sector_network() -> FakeNetwork {
    let mut network = FakeNetwork {
        start_node: Some(NetworkNode {
            lat: START_LAT,
            lng: START_LNG,
            node_id: 1,
        }),
        candidates: vec![
            candidate(101, 60.02, 25.03, Some(31)),
            candidate(201, 59.98, 25.03, Some(31)),
            candidate(301, 59.98, 24.97, Some(81)),
            candidate(401, 60.02, 24.97, None),
        ],
        ..FakeNetwork::default()
    };
    add_loop_sector(&mut network, 101, 1_000, 9_800.0);
    add_loop_sector(&mut network, 201, 2_000, 10_500.0);
    add_loop_sector(&mut network, 301, 3_000, 11_200.0);
    network
}

pub fn generator(engine: &Arc<FakeEngine>, config: RoundTripConfig) -> RoundTripGenerator {
    RoundTripGenerator::new(Arc::new(SharedFakeEngine(Arc::clone(engine))), config)
}

pub fn app_state(engine: &Arc<FakeEngine>) -> Arc<AppState> {
    Arc::new(AppState {
        route_generator: generator(engine, RoundTripConfig::default()),
    })
}
