//! Configuration types for the feature-selection search.

use serde::{Deserialize, Serialize};

/// Distance metric used to compare feature vectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Square root of the summed squared differences.
    #[default]
    Euclidean,
    /// Sum of absolute differences.
    Manhattan,
}

impl DistanceMetric {
    /// All supported metrics, in report order.
    pub const ALL: [DistanceMetric; 2] = [DistanceMetric::Euclidean, DistanceMetric::Manhattan];
}

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of chromosomes per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Per-bit flip probability (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Accuracy (0-100) at which the search stops early.
    #[serde(default = "default_accuracy_threshold")]
    pub accuracy_threshold: f64,
    /// Upper bound on evaluated generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Metric used by the nearest-neighbour fitness function.
    #[serde(default)]
    pub distance_metric: DistanceMetric,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Evaluate chromosomes on the rayon worker pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            accuracy_threshold: default_accuracy_threshold(),
            max_generations: default_max_generations(),
            distance_metric: DistanceMetric::default(),
            random_seed: None,
            parallel: default_parallel(),
        }
    }
}

fn default_population_size() -> usize {
    20
}
fn default_mutation_rate() -> f64 {
    0.05
}
fn default_accuracy_threshold() -> f64 {
    95.0
}
fn default_max_generations() -> usize {
    100
}
fn default_parallel() -> bool {
    true
}

impl SearchConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !(0.0..=100.0).contains(&self.accuracy_threshold) {
            return Err(ConfigError::InvalidThreshold(self.accuracy_threshold));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::InvalidMaxGenerations);
        }
        Ok(())
    }

    /// Number of chromosomes kept by selection.
    pub fn survivor_count(&self) -> usize {
        self.population_size.div_ceil(2).max(1)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be positive")]
    InvalidPopulationSize,
    #[error("Mutation rate {0} is outside [0, 1]")]
    InvalidMutationRate(f64),
    #[error("Accuracy threshold {0} is outside [0, 100]")]
    InvalidThreshold(f64),
    #[error("Maximum generation count must be positive")]
    InvalidMaxGenerations,
}
