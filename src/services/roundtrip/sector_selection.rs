use crate::db::CandidateRow;
use crate::error::Result;
use crate::models::{Candidate, Coordinates, RoutePriority, Sector, SectorMap};
use futures::{Stream, TryStreamExt};

/// Pick at most one turnaround candidate per sector.
///
/// `rows` must already be ordered closest-to-optimal-radius first, so the
/// first candidate seen in a sector wins unless a later one has a strictly
/// better road class. Stops pulling rows as soon as every sector holds a
/// candidate of the most preferred class.
pub async fn select_sector_candidates<S>(
    mut rows: S,
    center: &Coordinates,
    priority: &RoutePriority,
) -> Result<SectorMap<Candidate>>
where
    S: Stream<Item = Result<CandidateRow>> + Unpin,
{
    let mut sectors: SectorMap<Candidate> = SectorMap::new();
    let best_class = priority.best();
    let mut consumed = 0usize;

    while let Some(row) = rows.try_next().await? {
        consumed += 1;
        let way_type = priority.normalize(row.way_type);
        let sector = Sector::classify(center, &row.coordinates());

        let replace = match sectors.get(sector) {
            None => true,
            Some(current) => priority.is_strictly_better(way_type, current.way_type),
        };

        if replace {
            sectors.insert(
                sector,
                Candidate {
                    coordinates: row.coordinates(),
                    node_id: row.node_id,
                    distance_from_center_m: row.distance_m,
                    way_type,
                },
            );
        }

        if sectors.all(|candidate| candidate.way_type == best_class) {
            tracing::debug!(
                consumed,
                "All sectors hold a class {} candidate, stopping candidate scan",
                best_class
            );
            break;
        }
    }

    tracing::debug!(
        consumed,
        filled = sectors.len(),
        "Candidate scan finished: {} rows consumed, {}/4 sectors filled",
        consumed,
        sectors.len()
    );

    Ok(sectors)
}
