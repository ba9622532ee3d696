//! Exact nearest-neighbor index.
//!
//! A bucketed K-D tree over the shared [`Dataset`]. Each split picks the axis
//! with the widest spread and partitions at the median, leaves hold up to
//! [`LEAF_SIZE`] objects.
//!
//! Queries are exact: candidates are ordered by `(squared distance, id)`, and a
//! subtree is only skipped when its bounding plane is *strictly* farther than
//! the current k-th candidate, so an equidistant object with a smaller id is
//! never missed. Ties are therefore broken by construction order (row order).
//!
//! The tree is immutable after construction and is shared across workers
//! behind an `Arc`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::dataset::{squared_euclidean, Dataset, ObjectId};

/// Maximum number of objects stored in a leaf.
pub const LEAF_SIZE: usize = 16;

/// A query result: an object and its Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: ObjectId,
    pub distance: f64,
}

enum KdNode {
    /// Range into `KdTree::order`
    Leaf { start: usize, end: usize },
    /// Objects with `point[axis] <= value` on the left, `>= value` on the right
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// Candidate kept in the bounded max-heap during a query.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist_sq: f64,
    id: ObjectId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Exact k-nearest-neighbor index by Euclidean distance.
pub struct KdTree {
    data: Arc<Dataset>,
    /// Object ids permuted so that every leaf covers a contiguous range
    order: Vec<ObjectId>,
    nodes: Vec<KdNode>,
    root: usize,
}

impl KdTree {
    /// Builds the index over every object of `data`.
    pub fn build(data: Arc<Dataset>) -> Self {
        let mut order: Vec<ObjectId> = (0..data.len() as ObjectId).collect();
        let mut nodes = Vec::with_capacity(2 * data.len() / LEAF_SIZE + 1);
        let root = build_node(&data, &mut order, 0, &mut nodes);

        KdTree {
            data,
            order,
            nodes,
            root,
        }
    }

    /// The indexed dataset.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the `m` objects closest to `query`, ascending by distance, ties
    /// broken by object id. Fewer are returned when the index holds fewer than
    /// `m` objects.
    pub fn nearest(&self, query: &[f64], m: usize) -> Vec<Neighbor> {
        if m == 0 || self.order.is_empty() {
            return Vec::new();
        }

        let mut heap = BinaryHeap::with_capacity(m + 1);
        self.search(self.root, query, m, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                id: c.id,
                distance: c.dist_sq.sqrt(),
            })
            .collect()
    }

    fn search(&self, node: usize, query: &[f64], m: usize, heap: &mut BinaryHeap<Candidate>) {
        match &self.nodes[node] {
            KdNode::Leaf { start, end } => {
                for &id in &self.order[*start..*end] {
                    let candidate = Candidate {
                        dist_sq: squared_euclidean(query, self.data.point(id)),
                        id,
                    };
                    if heap.len() < m {
                        heap.push(candidate);
                    } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                        heap.pop();
                        heap.push(candidate);
                    }
                }
            }
            KdNode::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[*axis] - value;
                let (near, far) = if diff < 0.0 {
                    (*left, *right)
                } else {
                    (*right, *left)
                };

                self.search(near, query, m, heap);

                let bound = diff * diff;
                let visit_far = heap.len() < m || heap.peek().is_some_and(|worst| bound <= worst.dist_sq);
                if visit_far {
                    self.search(far, query, m, heap);
                }
            }
        }
    }
}

fn build_node(data: &Dataset, order: &mut [ObjectId], offset: usize, nodes: &mut Vec<KdNode>) -> usize {
    let len = order.len();

    if len > LEAF_SIZE {
        if let Some(axis) = widest_axis(data, order) {
            let mid = len / 2;
            order.select_nth_unstable_by(mid, |&a, &b| {
                data.point(a)[axis].total_cmp(&data.point(b)[axis])
            });
            let value = data.point(order[mid])[axis];

            let (lo, hi) = order.split_at_mut(mid);
            let left = build_node(data, lo, offset, nodes);
            let right = build_node(data, hi, offset + mid, nodes);

            nodes.push(KdNode::Split {
                axis,
                value,
                left,
                right,
            });
            return nodes.len() - 1;
        }
    }

    // Small range, or every object sits on the same point
    nodes.push(KdNode::Leaf {
        start: offset,
        end: offset + len,
    });
    nodes.len() - 1
}

/// Axis with the largest spread, `None` when all objects coincide.
fn widest_axis(data: &Dataset, order: &[ObjectId]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for axis in 0..data.dimensions() {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &id in order {
            let v = data.point(id)[axis];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let spread = hi - lo;
        if spread > 0.0 && best.map_or(true, |(_, s)| spread > s) {
            best = Some((axis, spread));
        }
    }

    best.map(|(axis, _)| axis)
}
