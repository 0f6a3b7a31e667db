//! Labelled feature tables and the context shared by a search run.

use serde::Serialize;

use crate::compute::ComputeError;

/// Binary class label (0 or 1).
pub type Label = u8;

/// Row-major matrix of feature vectors, all rows the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl FeatureMatrix {
    /// Build from individual rows. Fails with `Shape` on ragged input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, ComputeError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ComputeError::Shape {
                    expected: cols,
                    found: row.len(),
                    row: i,
                });
            }
            data.extend_from_slice(row);
        }
        let matrix = Self {
            data,
            rows: rows.len(),
            cols,
        };
        matrix.check_finite()?;
        Ok(matrix)
    }

    /// Build from flat row-major storage.
    pub fn from_flat(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self, ComputeError> {
        if data.len() != rows * cols {
            return Err(ComputeError::LengthMismatch {
                left: data.len(),
                right: rows * cols,
            });
        }
        let matrix = Self { data, rows, cols };
        matrix.check_finite()?;
        Ok(matrix)
    }

    fn check_finite(&self) -> Result<(), ComputeError> {
        match self.data.iter().position(|v| !v.is_finite()) {
            Some(i) => Err(ComputeError::NonFinite {
                row: i / self.cols,
                col: i % self.cols,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Feature vector of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Restrict to the given columns, preserving row order.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= n_cols()`.
    pub fn project(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.rows * indices.len());
        for row in self.rows() {
            data.extend(indices.iter().map(|&c| row[c]));
        }
        Self {
            data,
            rows: self.rows,
            cols: indices.len(),
        }
    }

    /// Columns with the fewest values strictly below `threshold`.
    ///
    /// Returns at most `count` column indices, ordered by that count
    /// ascending; ties keep ascending column order.
    pub fn low_signal_columns(&self, threshold: f32, count: usize) -> Vec<usize> {
        let mut below = vec![0usize; self.cols];
        for row in self.rows() {
            for (c, &v) in row.iter().enumerate() {
                if v < threshold {
                    below[c] += 1;
                }
            }
        }

        let mut columns: Vec<usize> = (0..self.cols).collect();
        columns.sort_by_key(|&c| below[c]);
        columns.truncate(count);
        columns
    }
}

/// Feature rows with row-aligned binary labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    features: FeatureMatrix,
    labels: Vec<Label>,
}

impl Dataset {
    /// Pair features with labels, checking alignment and label values.
    pub fn new(features: FeatureMatrix, labels: Vec<Label>) -> Result<Self, ComputeError> {
        if features.n_rows() != labels.len() {
            return Err(ComputeError::LengthMismatch {
                left: features.n_rows(),
                right: labels.len(),
            });
        }
        if let Some((row, &value)) = labels.iter().enumerate().find(|(_, l)| **l > 1) {
            return Err(ComputeError::InvalidLabel {
                row,
                value: value.into(),
            });
        }
        Ok(Self { features, labels })
    }

    #[inline]
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Train and test data for one search run.
///
/// Passed explicitly to every evaluation so independent runs never share
/// mutable state.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub train: Dataset,
    pub test: Dataset,
}

impl SearchContext {
    /// Check that both sets are non-empty and share a feature count.
    pub fn new(train: Dataset, test: Dataset) -> Result<Self, ComputeError> {
        if train.is_empty() {
            return Err(ComputeError::EmptyInput("training set has no rows"));
        }
        if test.is_empty() {
            return Err(ComputeError::EmptyInput("test set has no rows"));
        }
        if train.features.n_cols() != test.features.n_cols() {
            return Err(ComputeError::Shape {
                expected: train.features.n_cols(),
                found: test.features.n_cols(),
                row: 0,
            });
        }
        Ok(Self { train, test })
    }

    /// Shared feature-vector length (chromosome length).
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.train.features.n_cols()
    }
}
