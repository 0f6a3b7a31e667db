//! Pairwise distances between test and training feature vectors.

use crate::schema::{DistanceMetric, FeatureMatrix};

use super::ComputeError;

/// Dense `test x train` distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DistanceMatrix {
    /// Number of test rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Number of training rows.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Distances from test row `i` to every training row.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Distance from test row `i` to training row `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }
}

/// Distance between two equal-length vectors.
///
/// Differences are accumulated in `f64`.
#[inline]
pub fn vector_distance(a: &[f32], b: &[f32], metric: DistanceMetric) -> f64 {
    let pairs = a.iter().zip(b).map(|(&x, &y)| f64::from(x) - f64::from(y));
    match metric {
        DistanceMetric::Euclidean => pairs.map(|d| d * d).sum::<f64>().sqrt(),
        DistanceMetric::Manhattan => pairs.map(f64::abs).sum(),
    }
}

/// Compute `D[i][j]`, the distance from test row `i` to training row `j`.
///
/// Both matrices must carry the same (non-zero) number of feature columns,
/// and the training matrix must have at least one row.
pub fn distances(
    test: &FeatureMatrix,
    train: &FeatureMatrix,
    metric: DistanceMetric,
) -> Result<DistanceMatrix, ComputeError> {
    if test.n_cols() != train.n_cols() {
        return Err(ComputeError::Shape {
            expected: train.n_cols(),
            found: test.n_cols(),
            row: 0,
        });
    }
    if train.n_cols() == 0 {
        return Err(ComputeError::EmptyInput("no active feature columns"));
    }
    if train.n_rows() == 0 {
        return Err(ComputeError::EmptyInput("no training rows"));
    }

    let mut data = Vec::with_capacity(test.n_rows() * train.n_rows());
    for t in test.rows() {
        data.extend(train.rows().map(|r| vector_distance(t, r, metric)));
    }

    Ok(DistanceMatrix {
        data,
        rows: test.n_rows(),
        cols: train.n_rows(),
    })
}
