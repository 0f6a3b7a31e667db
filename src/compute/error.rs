//! Errors raised by distance, classification and scoring.

/// Failures of the nearest-neighbour pipeline.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ComputeError {
    /// Two feature vectors that must be compared have different lengths.
    #[error("Shape mismatch: expected {expected} features, found {found} (row {row})")]
    Shape {
        expected: usize,
        found: usize,
        row: usize,
    },
    /// No usable rows or columns for a distance computation.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    /// Paired sequences (predictions/actuals, rows/labels) differ in length.
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// A label outside the binary label set.
    #[error("Invalid label {value} at row {row}; labels must be 0 or 1")]
    InvalidLabel { row: usize, value: i64 },
    /// A feature value that is NaN or infinite.
    #[error("Non-finite feature value at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },
}
