//! Nearest-neighbour fitness for feature-selection chromosomes.
//!
//! A chromosome's fitness is the percentage of test rows whose 1-NN
//! prediction, using only the chromosome's active columns, matches the
//! true label.

use serde::{Deserialize, Serialize};

use crate::compute::{ComputeError, distances, predict};
use crate::schema::{Chromosome, DistanceMetric, FeatureMatrix, Label, SearchContext};

/// Percentage of positions where `predictions` equals `actuals`.
pub fn accuracy(predictions: &[Label], actuals: &[Label]) -> Result<f64, ComputeError> {
    if predictions.len() != actuals.len() {
        return Err(ComputeError::LengthMismatch {
            left: predictions.len(),
            right: actuals.len(),
        });
    }
    if actuals.is_empty() {
        return Err(ComputeError::EmptyInput("no labels to score"));
    }
    let correct = predictions
        .iter()
        .zip(actuals)
        .filter(|(p, a)| p == a)
        .count();
    Ok(100.0 * correct as f64 / actuals.len() as f64)
}

/// Test-set predictions using only the chromosome's active columns.
pub fn predict_subset(
    chromosome: &Chromosome,
    train: &FeatureMatrix,
    test: &FeatureMatrix,
    train_labels: &[Label],
    metric: DistanceMetric,
) -> Result<Vec<Label>, ComputeError> {
    if chromosome.len() != train.n_cols() {
        return Err(ComputeError::Shape {
            expected: train.n_cols(),
            found: chromosome.len(),
            row: 0,
        });
    }
    if test.n_cols() != train.n_cols() {
        return Err(ComputeError::Shape {
            expected: train.n_cols(),
            found: test.n_cols(),
            row: 0,
        });
    }
    let indices = chromosome.active_indices();
    let train = train.project(&indices);
    let test = test.project(&indices);
    let d = distances(&test, &train, metric)?;
    predict(&d, train_labels)
}

/// Project, measure distances, classify and score one chromosome.
pub fn evaluate(
    chromosome: &Chromosome,
    train: &FeatureMatrix,
    test: &FeatureMatrix,
    train_labels: &[Label],
    test_labels: &[Label],
    metric: DistanceMetric,
) -> Result<f64, ComputeError> {
    let predictions = predict_subset(chromosome, train, test, train_labels, metric)?;
    accuracy(&predictions, test_labels)
}

/// Scores chromosomes against a search context.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    metric: DistanceMetric,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Accuracy of `chromosome` on the context's test set.
    pub fn evaluate(
        &self,
        chromosome: &Chromosome,
        ctx: &SearchContext,
    ) -> Result<f64, ComputeError> {
        evaluate(
            chromosome,
            ctx.train.features(),
            ctx.test.features(),
            ctx.train.labels(),
            ctx.test.labels(),
            self.metric,
        )
    }

    /// Accuracy, or `None` when the chromosome selects no feature.
    ///
    /// Other failures still propagate.
    pub fn try_score(
        &self,
        chromosome: &Chromosome,
        ctx: &SearchContext,
    ) -> Result<Option<f64>, ComputeError> {
        if chromosome.has_no_active() {
            return Ok(None);
        }
        self.evaluate(chromosome, ctx).map(Some)
    }

    /// Test-set predictions of `chromosome`.
    pub fn predictions(
        &self,
        chromosome: &Chromosome,
        ctx: &SearchContext,
    ) -> Result<Vec<Label>, ComputeError> {
        predict_subset(
            chromosome,
            ctx.train.features(),
            ctx.test.features(),
            ctx.train.labels(),
            self.metric,
        )
    }
}

/// Accuracy of one metric on a fixed feature mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineScore {
    pub metric: DistanceMetric,
    pub accuracy: f64,
}

/// Accuracy of `mask` under every supported metric.
pub fn baseline_report(
    ctx: &SearchContext,
    mask: &Chromosome,
) -> Result<Vec<BaselineScore>, ComputeError> {
    DistanceMetric::ALL
        .iter()
        .map(|&metric| {
            FitnessEvaluator::new(metric)
                .evaluate(mask, ctx)
                .map(|accuracy| BaselineScore { metric, accuracy })
        })
        .collect()
}
