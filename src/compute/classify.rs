//! One-nearest-neighbour label prediction.

use crate::schema::Label;

use super::{ComputeError, DistanceMatrix};

/// Index of the smallest value; the first index wins ties.
///
/// Returns `None` for an empty slice. NaN entries never win.
pub fn arg_min(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| v < b) {
            best = Some((j, v));
        }
    }
    best.map(|(j, _)| j)
}

/// Predict each test row's label as the label of its nearest training row.
pub fn predict(
    distances: &DistanceMatrix,
    train_labels: &[Label],
) -> Result<Vec<Label>, ComputeError> {
    if distances.n_cols() == 0 {
        return Err(ComputeError::EmptyInput("distance matrix has no columns"));
    }
    if distances.n_cols() != train_labels.len() {
        return Err(ComputeError::LengthMismatch {
            left: distances.n_cols(),
            right: train_labels.len(),
        });
    }

    distances
        .rows()
        .map(|row| {
            arg_min(row)
                .map(|j| train_labels[j])
                .ok_or(ComputeError::EmptyInput("no comparable distances"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distances;
    use crate::schema::{DistanceMetric, FeatureMatrix};

    fn matrix(rows: &[&[f32]]) -> FeatureMatrix {
        FeatureMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_arg_min_first_tie() {
        assert_eq!(arg_min(&[3.0, 1.0, 1.0, 2.0]), Some(1));
        assert_eq!(arg_min(&[]), None);
        assert_eq!(arg_min(&[f64::NAN, 2.0, 2.0]), Some(1));
        assert_eq!(arg_min(&[f64::NAN]), None);
    }

    #[test]
    fn test_predict_nearest_label() {
        let train = matrix(&[&[0.0, 0.0], &[10.0, 10.0]]);
        let test = matrix(&[&[1.0, 1.0], &[9.0, 8.0]]);
        let d = distances(&test, &train, DistanceMetric::Euclidean).unwrap();
        assert_eq!(predict(&d, &[0, 1]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_tie_uses_first_training_row() {
        let train = matrix(&[&[0.0], &[2.0]]);
        let test = matrix(&[&[1.0]]);
        let d = distances(&test, &train, DistanceMetric::Manhattan).unwrap();
        assert_eq!(predict(&d, &[1, 0]).unwrap(), vec![1]);
        assert_eq!(predict(&d, &[0, 1]).unwrap(), vec![0]);
    }

    #[test]
    fn test_label_count_mismatch() {
        let train = matrix(&[&[0.0], &[2.0]]);
        let test = matrix(&[&[1.0]]);
        let d = distances(&test, &train, DistanceMetric::Manhattan).unwrap();
        assert_eq!(
            predict(&d, &[0]).unwrap_err(),
            ComputeError::LengthMismatch { left: 2, right: 1 }
        );
    }
}
