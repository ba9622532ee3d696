//! Label-proximity stage: distance from each object to its closest labeled object.
//!
//! The labeled set is expected to be small, so this is a plain scan over it
//! for every object rather than an index query.

use std::ops::Range;

use ahash::AHashMap;

use crate::dataset::{euclidean, Dataset, ObjectId};

/// Closest labeled object of an object and the distance to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelProximity {
    pub labeled: ObjectId,
    pub distance: f64,
}

/// Object id -> closest labeled object.
pub type ProximityMap = AHashMap<ObjectId, LabelProximity>;

/// Closest labeled object of `object`; the first labeled id wins on ties.
/// `None` when `labeled` is empty.
pub fn nearest_labeled(data: &Dataset, labeled: &[ObjectId], object: ObjectId) -> Option<LabelProximity> {
    let point = data.point(object);
    let mut best: Option<LabelProximity> = None;

    for &candidate in labeled {
        let distance = euclidean(point, data.point(candidate));
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(LabelProximity {
                labeled: candidate,
                distance,
            });
        }
    }

    best
}

/// Label proximity of every object in `objects`.
pub fn label_proximity(data: &Dataset, labeled: &[ObjectId], objects: Range<ObjectId>) -> ProximityMap {
    let mut map = ProximityMap::with_capacity(objects.len());
    for object in objects {
        if let Some(proximity) = nearest_labeled(data, labeled, object) {
            map.insert(object, proximity);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(positions: &[f64]) -> Dataset {
        Dataset::from_rows(positions.iter().map(|&p| vec![p]).collect()).unwrap()
    }

    #[test]
    fn test_labeled_object_is_its_own_closest() {
        let data = line(&[0.0, 1.0, 2.0, 10.0]);
        let map = label_proximity(&data, &[0, 3], 0..4);

        assert_eq!(map[&0], LabelProximity { labeled: 0, distance: 0.0 });
        assert_eq!(map[&1], LabelProximity { labeled: 0, distance: 1.0 });
        assert_eq!(map[&2], LabelProximity { labeled: 0, distance: 2.0 });
        assert_eq!(map[&3], LabelProximity { labeled: 3, distance: 0.0 });
    }

    #[test]
    fn test_first_labeled_wins_ties() {
        let data = line(&[0.0, 5.0, 10.0]);
        let closest = nearest_labeled(&data, &[2, 0], 1).unwrap();
        assert_eq!(closest.labeled, 2, "equidistant labeled objects resolved by labeled-set order");
        assert_eq!(closest.distance, 5.0);
    }

    #[test]
    fn test_partition_subset_only() {
        let data = line(&[0.0, 1.0, 2.0, 3.0]);
        let map = label_proximity(&data, &[0], 2..4);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&2) && map.contains_key(&3));
    }

    #[test]
    fn test_empty_labeled_set() {
        let data = line(&[0.0, 1.0]);
        assert!(nearest_labeled(&data, &[], 0).is_none());
        assert!(label_proximity(&data, &[], 0..2).is_empty());
    }
}
