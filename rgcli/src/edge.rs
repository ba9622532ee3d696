//! Weighted edges and edge lists.

use ahash::AHashSet;

use crate::dataset::ObjectId;

/// Converts a distance into a similarity weight in `(0, 1]`.
///
/// `weight(0) == 1` and the weight decreases strictly towards 0 as the
/// distance grows.
#[inline]
pub fn weight(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// A directed weighted edge `(source, target, weight)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: ObjectId,
    pub target: ObjectId,
    pub weight: f64,
}

impl Edge {
    /// Edge between two objects at the given distance.
    pub fn from_distance(source: ObjectId, target: ObjectId, distance: f64) -> Self {
        Edge {
            source,
            target,
            weight: weight(distance),
        }
    }
}

/// Ordered edge list as produced by the graph builder.
///
/// Order is partition order, then object-id order inside each partition.
/// `(u, v)` and `(v, u)` are both kept unless [`EdgeList::simplified`] is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    pub fn new() -> Self {
        EdgeList { edges: Vec::new() }
    }

    /// Appends another list, keeping its internal order.
    pub fn append(&mut self, other: Vec<Edge>) {
        self.edges.extend(other);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Undirected simple graph: one edge per unordered pair, first occurrence
    /// wins (orientation and weight), self loops dropped.
    pub fn simplified(&self) -> EdgeList {
        let mut seen = AHashSet::with_capacity(self.edges.len());
        let edges = self
            .edges
            .iter()
            .filter(|e| e.source != e.target)
            .filter(|e| seen.insert((e.source.min(e.target), e.source.max(e.target))))
            .copied()
            .collect();
        EdgeList { edges }
    }
}

impl From<Vec<Edge>> for EdgeList {
    fn from(edges: Vec<Edge>) -> Self {
        EdgeList { edges }
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
