//! Splits the object-id space into one contiguous chunk per worker.

use std::ops::Range;

use crate::dataset::ObjectId;

/// Splits `[0, count)` into `parts` contiguous, disjoint, ordered ranges.
///
/// Every range but the last holds `count / parts` ids; the last one absorbs
/// the remainder. When `parts > count` the leading ranges are empty.
/// `parts == 0` is treated as a single partition.
pub fn partition(count: ObjectId, parts: usize) -> Vec<Range<ObjectId>> {
    let parts = parts.max(1);
    let chunk = count as usize / parts;

    (0..parts)
        .map(|i| {
            let start = (i * chunk) as ObjectId;
            let end = if i + 1 == parts {
                count
            } else {
                ((i + 1) * chunk) as ObjectId
            };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<ObjectId>], count: ObjectId) {
        let ids: Vec<ObjectId> = ranges.iter().flat_map(|r| r.clone()).collect();
        let expected: Vec<ObjectId> = (0..count).collect();
        assert_eq!(ids, expected, "ranges must cover [0, {count}) exactly once, in order");
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(12, 4);
        assert_eq!(ranges, vec![0..3, 3..6, 6..9, 9..12]);
    }

    #[test]
    fn test_last_absorbs_remainder() {
        let ranges = partition(10, 4);
        assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..10]);
        assert_covers(&ranges, 10);
    }

    #[test]
    fn test_more_parts_than_objects() {
        let ranges = partition(3, 5);
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 4);
        assert_covers(&ranges, 3);
    }

    #[test]
    fn test_single_partition() {
        assert_eq!(partition(7, 1), vec![0..7]);
        assert_eq!(partition(7, 0), vec![0..7]);
    }

    #[test]
    fn test_coverage_many_shapes() {
        for count in 0..40 {
            for parts in 1..12 {
                let ranges = partition(count, parts);
                assert_eq!(ranges.len(), parts);
                assert_covers(&ranges, count);
            }
        }
    }
}
