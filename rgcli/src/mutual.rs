//! Mutuality and ranking stage.
//!
//! Runs over the merged phase-one maps. For every object of a partition the
//! neighbor record is turned into edges according to the variant:
//!
//! - kNN: every neighbor.
//! - mutual kNN: neighbors that list the object back.
//! - GBILI / RGCLI: mutual neighbors ranked by `d(o, n) + proximity(n)`,
//!   keeping the `ki` best. Weights always come from the raw `d(o, n)`.

use std::ops::Range;

use crate::config::Variant;
use crate::dataset::ObjectId;
use crate::edge::Edge;
use crate::error::{GraphError, Result};
use crate::index::Neighbor;
use crate::neighbors::NeighborMap;
use crate::proximity::ProximityMap;

/// A mutual neighbor pair before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEdge {
    pub source: ObjectId,
    pub target: ObjectId,
    pub distance: f64,
}

impl CandidateEdge {
    fn into_edge(self) -> Edge {
        Edge::from_distance(self.source, self.target, self.distance)
    }
}

fn record(neighbors: &NeighborMap, object: ObjectId) -> Result<&[Neighbor]> {
    neighbors
        .get(&object)
        .map(Vec::as_slice)
        .ok_or_else(|| GraphError::Worker(format!("no neighbor record for object {object}")))
}

/// Neighbors of `object` whose own record contains `object`, in record order.
pub fn mutual_candidates(object: ObjectId, neighbors: &NeighborMap) -> Result<Vec<CandidateEdge>> {
    let mut candidates = Vec::new();

    for n in record(neighbors, object)? {
        if n.id == object {
            continue;
        }
        if record(neighbors, n.id)?.iter().any(|back| back.id == object) {
            candidates.push(CandidateEdge {
                source: object,
                target: n.id,
                distance: n.distance,
            });
        }
    }

    Ok(candidates)
}

/// Keeps the `ki` candidates with the smallest `distance + proximity(target)`.
///
/// Equal scores keep their original candidate order.
pub fn rank_candidates(
    candidates: Vec<CandidateEdge>,
    proximity: &ProximityMap,
    ki: usize,
) -> Result<Vec<CandidateEdge>> {
    let mut scored = Vec::with_capacity(candidates.len());
    for (position, candidate) in candidates.into_iter().enumerate() {
        let closest = proximity.get(&candidate.target).ok_or_else(|| {
            GraphError::Worker(format!("no label proximity for object {}", candidate.target))
        })?;
        scored.push((candidate.distance + closest.distance, position, candidate));
    }

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    scored.truncate(ki);

    Ok(scored.into_iter().map(|(_, _, candidate)| candidate).collect())
}

/// Edges of every object in `objects`, in object-id order.
pub fn partition_edges(
    variant: Variant,
    ki: usize,
    objects: Range<ObjectId>,
    neighbors: &NeighborMap,
    proximity: &ProximityMap,
) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();

    for object in objects {
        match variant {
            Variant::Knn => {
                edges.extend(
                    record(neighbors, object)?
                        .iter()
                        .filter(|n| n.id != object)
                        .map(|n| Edge::from_distance(object, n.id, n.distance)),
                );
            }
            Variant::MutualKnn => {
                edges.extend(
                    mutual_candidates(object, neighbors)?
                        .into_iter()
                        .map(CandidateEdge::into_edge),
                );
            }
            Variant::Gbili | Variant::Rgcli => {
                let candidates = mutual_candidates(object, neighbors)?;
                edges.extend(
                    rank_candidates(candidates, proximity, ki)?
                        .into_iter()
                        .map(CandidateEdge::into_edge),
                );
            }
        }
    }

    Ok(edges)
}
