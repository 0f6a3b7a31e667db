//! Genetic feature selection for nearest-neighbour classification.
//!
//! Given labelled train and test feature tables (binary labels), the crate
//! searches for the subset of feature columns that maximises 1-NN accuracy
//! on the test set. Subsets are encoded as bit-mask chromosomes and evolved
//! with elitist selection, two-point crossover and bit-flip mutation.
//!
//! # Architecture
//!
//! - `schema`: Configuration, chromosome, dataset and result types
//! - `compute`: Distances, 1-NN prediction, fitness and the genetic search
//! - `storage`: Loading input tables and writing results
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use knn_feature_ga::{GeneticSearch, SearchConfig, storage::RunConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let run = RunConfig::load("run.json")?;
//! let context = Arc::new(run.load_context()?);
//!
//! let mut search = GeneticSearch::new(SearchConfig::default(), context)?;
//! let result = search.run()?;
//!
//! println!("{} -> {:.1}%", result.best.chromosome, result.best.accuracy);
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod schema;
pub mod storage;

// Re-export commonly used types
pub use compute::evolution::{FitnessEvaluator, GeneticSearch, SearchError};
pub use compute::{ComputeError, DistanceMatrix, distances, predict};
pub use schema::{
    Chromosome, Dataset, DistanceMetric, FeatureMatrix, SearchConfig, SearchContext,
    SearchResult, StopReason,
};
