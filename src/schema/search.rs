//! Progress and result types produced by the genetic search.

use serde::{Deserialize, Serialize};

use super::{Chromosome, DistanceMetric};

/// A chromosome paired with the accuracy it achieved in one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// The evaluated feature mask.
    pub chromosome: Chromosome,
    /// Test accuracy in percent (0-100).
    pub accuracy: f64,
}

/// Per-generation summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best accuracy in this generation.
    pub best_accuracy: f64,
    /// Mean accuracy of this generation.
    pub mean_accuracy: f64,
    /// Chromosomes scored 0 because no feature was active.
    pub skipped: usize,
    /// Mean pairwise Hamming distance between chromosomes.
    pub diversity: f64,
}

/// Current phase of the search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Building the initial population.
    #[default]
    Initializing,
    /// Scoring chromosomes.
    Evaluating,
    /// Search finished.
    Complete,
    /// Search stopped by the cancel handle.
    Stopped,
}

/// Progress update emitted after every evaluated generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Generations evaluated so far.
    pub generation: usize,
    /// Generation ceiling.
    pub max_generations: usize,
    /// Best accuracy seen so far.
    pub best_accuracy: f64,
    /// Best accuracy this generation.
    pub generation_best: f64,
    /// Mean accuracy of the current population.
    pub mean_accuracy: f64,
    /// Best chromosome seen so far.
    pub best: Option<FitnessRecord>,
    /// Current phase.
    pub phase: SearchPhase,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Best accuracy met or exceeded the configured threshold.
    ThresholdMet,
    /// Generation ceiling reached before the threshold.
    ThresholdNotReached,
    /// Cancelled through the cancel handle.
    Cancelled,
}

/// Statistics from a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Generations evaluated.
    pub generations: usize,
    /// Chromosome evaluations performed (including skipped ones).
    pub total_evaluations: u64,
    /// Distance metric used for fitness.
    pub metric: DistanceMetric,
    /// Wall-clock time in seconds.
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Final result handed to the output sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best chromosome found and its accuracy.
    pub best: FitnessRecord,
    /// Run statistics.
    pub stats: SearchStats,
    /// Ordered per-generation trace.
    pub trace: Vec<GenerationRecord>,
}

impl SearchResult {
    /// Whether the accuracy threshold was met.
    pub fn threshold_met(&self) -> bool {
        self.stats.stop_reason == StopReason::ThresholdMet
    }

    /// `(generation, best accuracy)` pairs in generation order.
    pub fn best_accuracy_trace(&self) -> Vec<(usize, f64)> {
        self.trace
            .iter()
            .map(|r| (r.generation, r.best_accuracy))
            .collect()
    }
}
