use crate::config::EngineConfig;
use crate::error::{AppError, Result};
use crate::models::{BoundingBox, Coordinates};
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::engine_queries::EngineQueries;

/// Road network vertex closest to a requested point.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct NetworkNode {
    pub lat: f64,
    pub lng: f64,
    pub node_id: i64,
}

impl NetworkNode {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Turnaround search inside the ring `(min_radius_m, max_radius_m)` clipped to `bbox`.
#[derive(Debug, Clone, Copy)]
pub struct AnnulusQuery {
    pub center: Coordinates,
    pub min_radius_m: f64,
    pub max_radius_m: f64,
    pub optimal_radius_m: f64,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CandidateRow {
    pub lat: f64,
    pub lng: f64,
    pub node_id: i64,
    pub distance_m: f64,
    pub way_type: Option<i32>,
}

impl CandidateRow {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathQuery {
    pub start_node: i64,
    pub end_node: i64,
    pub bbox: BoundingBox,
    pub k: u32,
    pub excluded_edges: Vec<i64>,
}

/// One k-shortest-paths row. `seq` is global across the whole result set.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PathRow {
    pub seq: i64,
    pub route_id: i64,
    pub edge_id: i64,
    pub geometry: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedGeometry {
    pub geojson: String,
    pub length_m: f64,
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: std::result::Result<String, String>,
}

/// Road-network spatial engine. A session owns one engine connection for its
/// whole lifetime and gives it back when dropped.
#[async_trait]
pub trait SpatialEngine: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn EngineSession>>;

    async fn health(&self) -> Vec<HealthCheck>;
}

#[async_trait]
pub trait EngineSession: Send {
    async fn nearest_node(&mut self, point: &Coordinates) -> Result<Option<NetworkNode>>;

    /// Rows ordered by `|distance_m - optimal_radius_m|` ascending.
    fn candidates_in_annulus(&mut self, query: &AnnulusQuery)
        -> BoxStream<'_, Result<CandidateRow>>;

    /// Rows ordered by `seq`, grouped by `route_id`.
    async fn k_shortest_paths(&mut self, query: &PathQuery) -> Result<Vec<PathRow>>;

    /// `None` when the union is empty.
    async fn union_length(&mut self, geometries: &[String]) -> Result<Option<MergedGeometry>>;
}

pub struct PgSpatialEngine {
    pool: PgPool,
    queries: Arc<EngineQueries>,
    query_timeout: Duration,
}

impl PgSpatialEngine {
    pub fn new(pool: PgPool, config: &EngineConfig) -> Self {
        Self {
            pool,
            queries: Arc::new(EngineQueries::for_table(&config.network_table)),
            query_timeout: config.query_timeout,
        }
    }

    async fn check(&self, name: &'static str, sql: &str) -> HealthCheck {
        let status = sqlx::query_scalar::<_, String>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.to_string());
        HealthCheck { name, status }
    }
}

#[async_trait]
impl SpatialEngine for PgSpatialEngine {
    async fn acquire(&self) -> Result<Box<dyn EngineSession>> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgEngineSession {
            conn,
            queries: Arc::clone(&self.queries),
            query_timeout: self.query_timeout,
        }))
    }

    async fn health(&self) -> Vec<HealthCheck> {
        vec![
            self.check("database", "SELECT 'ok'::text").await,
            self.check("postgis", "SELECT PostGIS_Version()").await,
            self.check("pgrouting", "SELECT pgr_version()::text").await,
        ]
    }
}

pub struct PgEngineSession {
    conn: PoolConnection<Postgres>,
    queries: Arc<EngineQueries>,
    query_timeout: Duration,
}

async fn with_deadline<T, F>(timeout: Duration, query: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::EngineTimeout(timeout.as_millis() as u64)),
    }
}

/// Bounds the whole scan, not each row: the deadline starts when the stream
/// is created. After expiry the stream yields one `EngineTimeout` and ends.
fn with_stream_deadline<'a, T: Send + 'a>(
    timeout: Duration,
    rows: BoxStream<'a, Result<T>>,
) -> BoxStream<'a, Result<T>> {
    let deadline = Instant::now() + timeout;
    stream::unfold(Some(rows), move |rows| async move {
        let mut rows = rows?;
        match tokio::time::timeout_at(deadline, rows.next()).await {
            Ok(Some(row)) => Some((row, Some(rows))),
            Ok(None) => None,
            Err(_) => Some((
                Err(AppError::EngineTimeout(timeout.as_millis() as u64)),
                None,
            )),
        }
    })
    .boxed()
}

#[async_trait]
impl EngineSession for PgEngineSession {
    async fn nearest_node(&mut self, point: &Coordinates) -> Result<Option<NetworkNode>> {
        let query = sqlx::query_as::<_, NetworkNode>(&self.queries.nearest_node)
            .bind(point.lng)
            .bind(point.lat)
            .fetch_optional(&mut *self.conn);
        with_deadline(self.query_timeout, query).await
    }

    fn candidates_in_annulus(
        &mut self,
        query: &AnnulusQuery,
    ) -> BoxStream<'_, Result<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(&self.queries.candidates_in_annulus)
            .bind(query.center.lng)
            .bind(query.center.lat)
            .bind(query.bbox.min_lng())
            .bind(query.bbox.min_lat())
            .bind(query.bbox.max_lng())
            .bind(query.bbox.max_lat())
            .bind(query.min_radius_m)
            .bind(query.max_radius_m)
            .bind(query.optimal_radius_m)
            .fetch(&mut *self.conn)
            .map_err(AppError::from)
            .boxed();
        with_stream_deadline(self.query_timeout, rows)
    }

    async fn k_shortest_paths(&mut self, query: &PathQuery) -> Result<Vec<PathRow>> {
        let rows = sqlx::query_as::<_, PathRow>(&self.queries.k_shortest_paths)
            .bind(query.bbox.min_lng())
            .bind(query.bbox.min_lat())
            .bind(query.bbox.max_lng())
            .bind(query.bbox.max_lat())
            .bind(&query.excluded_edges)
            .bind(query.start_node)
            .bind(query.end_node)
            .bind(query.k as i32)
            .fetch_all(&mut *self.conn);
        with_deadline(self.query_timeout, rows).await
    }

    async fn union_length(&mut self, geometries: &[String]) -> Result<Option<MergedGeometry>> {
        let row = sqlx::query_as::<_, (Option<String>, Option<f64>)>(&self.queries.union_length)
            .bind(geometries)
            .fetch_one(&mut *self.conn);
        let (geojson, length_m) = with_deadline(self.query_timeout, row).await?;

        Ok(match (geojson, length_m) {
            (Some(geojson), Some(length_m)) => Some(MergedGeometry { geojson, length_m }),
            _ => None,
        })
    }
}
