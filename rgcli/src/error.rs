//! Error types for graph construction.

use thiserror::Error;

use crate::dataset::ObjectId;

/// Errors that can occur while loading inputs or building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// I/O error while reading tables or writing edge lists
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON parameter file
    #[error("invalid parameter file: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value (zero k, zero threads, ...)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input table has no rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// An informativeness-aware variant was requested without labeled objects.
    #[error("variant {0} requires a non-empty labeled set")]
    EmptyLabeledSet(String),

    /// A row does not have the dimensionality of the first row.
    #[error("row {row} has {found} attributes, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A labeled id does not reference a row of the table.
    #[error("labeled id {id} is out of range (dataset has {len} objects)")]
    LabelOutOfRange { id: ObjectId, len: usize },

    /// A line of an input file could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported output format '{0}' (supported formats: ncol and pajek)")]
    UnsupportedFormat(String),

    #[error("unknown variant '{0}' (expected knn, mutual-knn, gbili or rgcli)")]
    UnknownVariant(String),

    /// A partition worker failed or panicked.
    #[error("worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
