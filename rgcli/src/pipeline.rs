//! Two-phase parallel graph construction.
//!
//! ```text
//! partition [0, N) ──┬─ worker 0 ─┐                     ┌─ worker 0 ─┐
//!                    ├─ worker 1 ─┼─ merge maps ─ ║ ─ ─ ┼─ worker 1 ─┼─ concat edges
//!                    └─ worker P ─┘   (phase 1)   ║     └─ worker P ─┘   (phase 2)
//!                                              barrier
//! ```
//!
//! Phase one computes, per partition, the label proximity and neighbor
//! record of every object. Phase two turns the merged records into edges.
//! Each phase spawns one blocking task per partition on a tokio blocking
//! pool of up to `threads` threads and waits for all of them before merging; the merged
//! maps are shared read-only with the phase-two tasks through an `Arc`.
//!
//! Any failing or panicking task aborts the whole build.

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{debug, info};
use tokio::runtime::Runtime;

use crate::config::GraphConfig;
use crate::dataset::{Dataset, ObjectId};
use crate::edge::{Edge, EdgeList};
use crate::error::{GraphError, Result};
use crate::index::KdTree;
use crate::mutual::partition_edges;
use crate::neighbors::{neighbor_records, NeighborMap};
use crate::partition::partition;
use crate::proximity::{label_proximity, ProximityMap};

/// Merged phase-one output.
#[derive(Debug, Clone, Default)]
pub struct NeighborData {
    /// Closest labeled object of every object (empty for label-free variants)
    pub proximity: ProximityMap,
    /// Neighbor record of every object
    pub neighbors: NeighborMap,
}

/// Builds similarity graphs according to a [`GraphConfig`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    /// Creates a builder, validating the configuration.
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(GraphBuilder { config })
    }

    /// Runs both phases and returns the aggregated edge list.
    pub fn build(&self, data: Arc<Dataset>, labeled: &[ObjectId]) -> Result<EdgeList> {
        self.check_inputs(&data, labeled)?;
        let runtime = self.runtime(data.len())?;
        let partitions = partition(data.len() as ObjectId, self.config.threads);

        info!(
            "building {} graph: {} objects, {} dimensions, {} labeled, k={}, ki={}, {} partitions",
            self.config.variant,
            data.len(),
            data.dimensions(),
            labeled.len(),
            self.config.k,
            self.config.ki,
            partitions.len()
        );

        let maps = self.phase_one(&runtime, data, labeled, &partitions)?;
        self.phase_two(&runtime, maps, &partitions)
    }

    /// Runs phase one only and returns the merged proximity and neighbor maps.
    pub fn neighbor_data(&self, data: Arc<Dataset>, labeled: &[ObjectId]) -> Result<NeighborData> {
        self.check_inputs(&data, labeled)?;
        let runtime = self.runtime(data.len())?;
        let partitions = partition(data.len() as ObjectId, self.config.threads);
        self.phase_one(&runtime, data, labeled, &partitions)
    }

    fn check_inputs(&self, data: &Dataset, labeled: &[ObjectId]) -> Result<()> {
        if data.is_empty() {
            return Err(GraphError::EmptyDataset);
        }
        data.check_labeled(labeled)?;
        if self.config.variant.uses_labels() && labeled.is_empty() {
            return Err(GraphError::EmptyLabeledSet(self.config.variant.to_string()));
        }
        Ok(())
    }

    /// All partition work runs on the blocking pool; a single async worker
    /// only drives the joins. At most `objects` partitions are non-empty.
    fn runtime(&self, objects: usize) -> Result<Runtime> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(self.config.threads.min(objects).max(1))
            .thread_name("rgcli-worker")
            .build()?;
        Ok(runtime)
    }

    fn phase_one(
        &self,
        runtime: &Runtime,
        data: Arc<Dataset>,
        labeled: &[ObjectId],
        partitions: &[Range<ObjectId>],
    ) -> Result<NeighborData> {
        let start = Instant::now();
        let index = Arc::new(KdTree::build(data));
        debug!("index built over {} objects in {:?}", index.len(), start.elapsed());

        // Label-free variants skip the proximity scan
        let labeled: Arc<[ObjectId]> = if self.config.variant.uses_labels() {
            Arc::from(labeled)
        } else {
            Arc::from(Vec::new())
        };
        let k = self.config.k;

        let chunks = run_phase(runtime, "neighbors", partitions, move |objects| {
            Ok(NeighborData {
                proximity: label_proximity(index.dataset(), &labeled, objects.clone()),
                neighbors: neighbor_records(&index, k, objects),
            })
        })?;

        let merged = merge_neighbor_data(chunks);
        info!(
            "phase one: {} neighbor records, {} proximities in {:?}",
            merged.neighbors.len(),
            merged.proximity.len(),
            start.elapsed()
        );
        Ok(merged)
    }

    fn phase_two(
        &self,
        runtime: &Runtime,
        maps: NeighborData,
        partitions: &[Range<ObjectId>],
    ) -> Result<EdgeList> {
        let start = Instant::now();
        let maps = Arc::new(maps);
        let variant = self.config.variant;
        let ki = self.config.ki;

        let chunks = run_phase(runtime, "edges", partitions, move |objects| {
            partition_edges(variant, ki, objects, &maps.neighbors, &maps.proximity)
        })?;

        let edges = merge_edges(chunks);
        info!("phase two: {} edges in {:?}", edges.len(), start.elapsed());
        Ok(edges)
    }
}

/// Convenience wrapper around [`GraphBuilder`].
pub fn build_graph(data: Dataset, labeled: &[ObjectId], config: &GraphConfig) -> Result<EdgeList> {
    GraphBuilder::new(config.clone())?.build(Arc::new(data), labeled)
}

/// Spawns one blocking task per partition and waits for every one of them.
///
/// Results are returned in partition order. The first failure (error or
/// panic) is returned once all tasks have finished.
fn run_phase<T, F>(
    runtime: &Runtime,
    phase: &'static str,
    partitions: &[Range<ObjectId>],
    work: F,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(Range<ObjectId>) -> Result<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);

    let joined = runtime.block_on(async {
        let tasks = partitions.iter().cloned().enumerate().map(|(worker, objects)| {
            let work = Arc::clone(&work);
            tokio::task::spawn_blocking(move || {
                debug!("[Worker {worker}] {phase} start: objects {}..{}", objects.start, objects.end);
                let result = work(objects);
                debug!("[Worker {worker}] {phase} end");
                result
            })
        });
        join_all(tasks).await
    });

    joined
        .into_iter()
        .enumerate()
        .map(|(worker, result)| match result {
            Ok(output) => output,
            Err(e) => Err(GraphError::Worker(format!("{phase} worker {worker}: {e}"))),
        })
        .collect()
}

/// Key union of per-partition maps. Keys are disjoint across partitions.
fn merge_neighbor_data(chunks: Vec<NeighborData>) -> NeighborData {
    let mut merged = NeighborData::default();
    merged.proximity.reserve(chunks.iter().map(|c| c.proximity.len()).sum());
    merged.neighbors.reserve(chunks.iter().map(|c| c.neighbors.len()).sum());

    for chunk in chunks {
        merged.proximity.extend(chunk.proximity);
        merged.neighbors.extend(chunk.neighbors);
    }
    merged
}

/// Concatenation of per-partition edge lists, each keeping its own order.
fn merge_edges(chunks: Vec<Vec<Edge>>) -> EdgeList {
    let mut edges = EdgeList::new();
    for chunk in chunks {
        edges.append(chunk);
    }
    edges
}
