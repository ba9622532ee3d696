//! Point table storage.
//!
//! Objects are rows of a dense, row-major `f64` table. The object id is the
//! 0-based row index, which is also the construction order used to break
//! distance ties in the spatial index.

use crate::error::{GraphError, Result};

/// Dense 0-based object identifier.
pub type ObjectId = u32;

/// Immutable point table shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Attribute values stored row after row
    values: Vec<f64>,
    /// Number of attributes per object
    dimensions: usize,
    /// Number of objects
    len: usize,
}

impl Dataset {
    /// Builds a dataset from rows, rejecting empty input, ragged rows and
    /// tables whose squared distances would overflow `f64`.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dimensions = match rows.first() {
            Some(first) => first.len(),
            None => return Err(GraphError::EmptyDataset),
        };
        if dimensions == 0 {
            return Err(GraphError::InvalidParameter(
                "objects must have at least one attribute".to_string(),
            ));
        }
        if rows.len() > ObjectId::MAX as usize {
            return Err(GraphError::InvalidParameter(format!(
                "at most {} objects are supported, got {}",
                ObjectId::MAX,
                rows.len()
            )));
        }

        let mut values = Vec::with_capacity(rows.len() * dimensions);
        for (row, attrs) in rows.iter().enumerate() {
            if attrs.len() != dimensions {
                return Err(GraphError::DimensionMismatch {
                    row,
                    expected: dimensions,
                    found: attrs.len(),
                });
            }
            if let Some(value) = attrs.iter().find(|v| !v.is_finite()) {
                return Err(GraphError::InvalidParameter(format!(
                    "object {row} has a non-finite attribute {value}"
                )));
            }
            values.extend_from_slice(attrs);
        }

        // Bounds every pairwise squared distance
        let extent = squared_extent(&values, dimensions);
        if !extent.is_finite() {
            return Err(GraphError::InvalidParameter(format!(
                "attribute ranges too wide: squared bounding box diagonal {extent} overflows"
            )));
        }

        Ok(Dataset {
            values,
            dimensions,
            len: rows.len(),
        })
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of attributes per object.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Attribute vector of an object.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a valid object id.
    pub fn point(&self, id: ObjectId) -> &[f64] {
        let start = id as usize * self.dimensions;
        &self.values[start..start + self.dimensions]
    }

    /// Euclidean distance between two objects.
    pub fn distance(&self, a: ObjectId, b: ObjectId) -> f64 {
        euclidean(self.point(a), self.point(b))
    }

    /// Checks that every labeled id references a row of this table.
    pub fn check_labeled(&self, labeled: &[ObjectId]) -> Result<()> {
        match labeled.iter().find(|&&id| id as usize >= self.len) {
            Some(&id) => Err(GraphError::LabelOutOfRange { id, len: self.len }),
            None => Ok(()),
        }
    }
}

/// Sum over attributes of the squared value span.
fn squared_extent(values: &[f64], dimensions: usize) -> f64 {
    (0..dimensions)
        .map(|axis| {
            let (lo, hi) = values
                .iter()
                .skip(axis)
                .step_by(dimensions)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            let span = hi - lo;
            span * span
        })
        .sum()
}

/// Squared Euclidean distance.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}
