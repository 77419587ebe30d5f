mod best_route;
pub mod edge_weights;
pub mod path_fetcher;
mod route_merger;
pub mod search_plan;
mod sector_selection;

use crate::config::RoundTripConfig;
use crate::constants::NO_PATH_AVAILABLE_MESSAGE;
use crate::db::{EngineSession, SpatialEngine};
use crate::error::{AppError, Result};
use crate::models::{
    Candidate, RoundTripRequest, RoundTripResponse, RoutePriority, Sector, SectorFailure,
    SectorMap, SectorOutcome,
};
use std::sync::Arc;

pub use best_route::select_best_route;
pub use search_plan::SearchPlan;
pub use sector_selection::select_sector_candidates;

/// Builds round-trip loops: one out-and-back candidate per compass sector,
/// best length match wins.
pub struct RoundTripGenerator {
    engine: Arc<dyn SpatialEngine>,
    config: RoundTripConfig,
    priority: RoutePriority,
}

impl RoundTripGenerator {
    pub fn new(engine: Arc<dyn SpatialEngine>, config: RoundTripConfig) -> Self {
        let priority = RoutePriority::from_config(&config);
        RoundTripGenerator {
            engine,
            config,
            priority,
        }
    }

    pub fn engine(&self) -> &Arc<dyn SpatialEngine> {
        &self.engine
    }

    pub async fn generate(&self, request: &RoundTripRequest) -> Result<RoundTripResponse> {
        let mut session = self.engine.acquire().await?;

        let start_node = session
            .nearest_node(&request.start)
            .await?
            .ok_or_else(|| AppError::NotFound("No road network near the start point.".to_string()))?;

        let snap_distance_m = request.start.distance_to(&start_node.coordinates()) * 1000.0;
        tracing::debug!(
            start_node = start_node.node_id,
            snap_distance_m = %format!("{:.0}", snap_distance_m),
            "Start snapped to node {} ({:.0}m away)",
            start_node.node_id, snap_distance_m
        );

        let plan = SearchPlan::new(
            &request.start,
            &start_node.coordinates(),
            request.distance_m(),
            &self.config,
        );

        tracing::debug!(
            start_node = start_node.node_id,
            optimal_radius_m = %format!("{:.0}", plan.optimal_radius_m),
            min_radius_m = %format!("{:.0}", plan.min_radius_m),
            max_radius_m = %format!("{:.0}", plan.max_radius_m),
            "Searching turnaround candidates {:.0}..{:.0}m from node {}",
            plan.min_radius_m, plan.max_radius_m, start_node.node_id
        );

        let candidates = select_sector_candidates(
            session.candidates_in_annulus(&plan.annulus_query()),
            &plan.center,
            &self.priority,
        )
        .await?;

        if candidates.is_empty() {
            tracing::warn!(
                start_node = start_node.node_id,
                "No turnaround candidates around node {}",
                start_node.node_id
            );
        }
        for (sector, candidate) in candidates.iter() {
            tracing::debug!(
                sector = %sector,
                node_id = candidate.node_id,
                way_type = candidate.way_type,
                distance_m = %format!("{:.0}", candidate.distance_from_center_m),
                "Sector {} turnaround: node {}",
                sector, candidate.node_id
            );
        }

        let outcomes = if self.config.parallel_sectors {
            drop(session);
            self.run_sectors_parallel(start_node.node_id, &plan, &candidates)
                .await?
        } else {
            self.run_sectors_sequential(session.as_mut(), start_node.node_id, &plan, &candidates)
                .await?
        };

        for (sector, outcome) in &outcomes {
            match outcome {
                SectorOutcome::Route(route) => tracing::info!(
                    sector = %sector,
                    length_m = %format!("{:.0}", route.length_m),
                    "Sector {} produced a {:.0}m loop",
                    sector, route.length_m
                ),
                SectorOutcome::Failure(reason) => tracing::warn!(
                    sector = %sector,
                    reason = %reason,
                    "Sector {} failed: {}",
                    sector, reason
                ),
            }
        }

        let best = select_best_route(&outcomes, plan.requested_distance_m)
            .ok_or_else(|| AppError::NotFound(NO_PATH_AVAILABLE_MESSAGE.to_string()))?;

        tracing::info!(
            sector = %best.sector,
            length_m = best.length_m,
            requested_m = %format!("{:.0}", plan.requested_distance_m),
            "Round trip selected: {} {}m (requested {:.0}m)",
            best.sector, best.length_m, plan.requested_distance_m
        );

        Ok(best)
    }

    async fn run_sectors_sequential(
        &self,
        session: &mut dyn EngineSession,
        start_node: i64,
        plan: &SearchPlan,
        candidates: &SectorMap<Candidate>,
    ) -> Result<Vec<(Sector, SectorOutcome)>> {
        let mut outcomes = Vec::with_capacity(Sector::ALL.len());
        for sector in Sector::ALL {
            let outcome = match candidates.get(sector) {
                Some(candidate) => {
                    self.run_sector(&mut *session, sector, candidate, start_node, plan)
                        .await?
                }
                None => SectorOutcome::Failure(SectorFailure::NoCandidate),
            };
            outcomes.push((sector, outcome));
        }
        Ok(outcomes)
    }

    /// Each sector gets its own engine session.
    async fn run_sectors_parallel(
        &self,
        start_node: i64,
        plan: &SearchPlan,
        candidates: &SectorMap<Candidate>,
    ) -> Result<Vec<(Sector, SectorOutcome)>> {
        let pipelines = Sector::ALL.into_iter().map(|sector| async move {
            let outcome = match candidates.get(sector) {
                Some(candidate) => {
                    let mut session = self.engine.acquire().await?;
                    self.run_sector(session.as_mut(), sector, candidate, start_node, plan)
                        .await?
                }
                None => SectorOutcome::Failure(SectorFailure::NoCandidate),
            };
            Ok::<_, AppError>((sector, outcome))
        });

        futures::future::try_join_all(pipelines).await
    }

    /// Primary paths, edge disposal, alternate path, merge. Stage failures
    /// end in a `SectorOutcome::Failure`; engine errors propagate.
    async fn run_sector(
        &self,
        session: &mut dyn EngineSession,
        sector: Sector,
        candidate: &Candidate,
        start_node: i64,
        plan: &SearchPlan,
    ) -> Result<SectorOutcome> {
        let primary = path_fetcher::fetch_primary_routes(
            &mut *session,
            start_node,
            candidate.node_id,
            plan.routing_bbox,
            self.config.k_paths,
        )
        .await?;

        let Some(reference) = primary.primary() else {
            return Ok(SectorOutcome::Failure(SectorFailure::NoRoutes));
        };

        let disposed = edge_weights::disposable_edges(&primary, self.config.dispose_threshold);
        if disposed.is_empty() {
            return Ok(SectorOutcome::Failure(SectorFailure::NoEdgesDisposed));
        }

        tracing::debug!(
            sector = %sector,
            disposed = disposed.len(),
            reference_edges = reference.segments.len(),
            "Disposing {} of {} reference edges",
            disposed.len(),
            reference.segments.len()
        );

        let Some(alternate) = path_fetcher::fetch_alternate_route(
            &mut *session,
            start_node,
            candidate.node_id,
            plan.routing_bbox,
            disposed,
        )
        .await?
        else {
            return Ok(SectorOutcome::Failure(SectorFailure::NoAlternateRoute));
        };

        route_merger::merge_routes(session, reference, &alternate, sector).await
    }
}
