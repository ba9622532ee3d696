//! Neighbor stage: the k nearest neighbors of every object.

use std::ops::Range;

use ahash::AHashMap;

use crate::dataset::ObjectId;
use crate::index::{KdTree, Neighbor};

/// Object id -> neighbors, ascending by distance, at most k, never the object itself.
pub type NeighborMap = AHashMap<ObjectId, Vec<Neighbor>>;

/// The `k` nearest neighbors of `object`, excluding the object itself.
///
/// Queries `k + 1` results and drops the querying object by identifier. An
/// exact duplicate of the object is a genuine neighbor at distance 0 and is
/// kept, whatever position it comes back at.
pub fn neighbor_record(index: &KdTree, k: usize, object: ObjectId) -> Vec<Neighbor> {
    let point = index.dataset().point(object);
    let mut record: Vec<Neighbor> = index
        .nearest(point, k + 1)
        .into_iter()
        .filter(|n| n.id != object)
        .collect();
    record.truncate(k);
    record
}

/// Neighbor records of every object in `objects`.
pub fn neighbor_records(index: &KdTree, k: usize, objects: Range<ObjectId>) -> NeighborMap {
    let mut map = NeighborMap::with_capacity(objects.len());
    for object in objects {
        map.insert(object, neighbor_record(index, k, object));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use std::sync::Arc;

    fn tree(positions: &[f64]) -> KdTree {
        let data = Dataset::from_rows(positions.iter().map(|&p| vec![p]).collect()).unwrap();
        KdTree::build(Arc::new(data))
    }

    fn ids(record: &[Neighbor]) -> Vec<ObjectId> {
        record.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_line_k1() {
        let index = tree(&[0.0, 1.0, 2.0, 10.0]);
        let map = neighbor_records(&index, 1, 0..4);

        assert_eq!(ids(&map[&0]), vec![1]);
        assert_eq!(ids(&map[&1]), vec![0], "tie between 0 and 2 goes to the smaller id");
        assert_eq!(ids(&map[&2]), vec![1]);
        assert_eq!(ids(&map[&3]), vec![2]);
        assert_eq!(map[&3][0].distance, 8.0);
    }

    #[test]
    fn test_duplicate_point_kept_as_neighbor() {
        // Object 1 duplicates object 0; for object 1 the index returns 0 first
        let index = tree(&[4.0, 4.0, 6.0]);

        let record = neighbor_record(&index, 1, 1);
        assert_eq!(ids(&record), vec![0], "duplicate at distance 0 is a real neighbor");
        assert_eq!(record[0].distance, 0.0);

        let record = neighbor_record(&index, 2, 0);
        assert_eq!(ids(&record), vec![1, 2]);
    }

    #[test]
    fn test_many_duplicates_never_include_self() {
        let index = tree(&[1.0; 6]);
        for object in 0..6 {
            let record = neighbor_record(&index, 3, object);
            assert_eq!(record.len(), 3);
            assert!(record.iter().all(|n| n.id != object && n.distance == 0.0));
        }
    }

    #[test]
    fn test_k_larger_than_dataset() {
        let index = tree(&[0.0, 1.0, 3.0]);
        let record = neighbor_record(&index, 10, 1);
        assert_eq!(ids(&record), vec![0, 2], "holds as many neighbors as exist");
    }
}
