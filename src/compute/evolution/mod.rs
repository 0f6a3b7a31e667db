//! Evolutionary feature selection.
//!
//! The search system consists of:
//!
//! - **Chromosome operators** (`chromosome`): random masks, two-point
//!   crossover and bit-flip mutation, all driven by a seedable RNG
//! - **Fitness** (`fitness`): 1-NN accuracy of a mask on the test set
//! - **Search** (`search`): the generational loop with elitist selection
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use knn_feature_ga::compute::evolution::GeneticSearch;
//! use knn_feature_ga::schema::{Dataset, FeatureMatrix, SearchConfig, SearchContext};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let train = Dataset::new(
//!     FeatureMatrix::from_rows(vec![vec![0.0, 0.0], vec![10.0, 10.0]])?,
//!     vec![0, 1],
//! )?;
//! let test = Dataset::new(FeatureMatrix::from_rows(vec![vec![1.0, 1.0]])?, vec![0])?;
//! let context = Arc::new(SearchContext::new(train, test)?);
//!
//! let mut search = GeneticSearch::new(SearchConfig::default(), context)?;
//! let result = search.run_with_callback(|progress| {
//!     println!("Generation {}: best accuracy = {:.1}%",
//!         progress.generation, progress.best_accuracy);
//! })?;
//!
//! println!("Best mask {} at {:.1}%", result.best.chromosome, result.best.accuracy);
//! # Ok(())
//! # }
//! ```

mod chromosome;
mod fitness;
mod search;

pub use chromosome::{ChromosomeRng, crossover_at};
pub use fitness::{
    BaselineScore, FitnessEvaluator, accuracy, baseline_report, evaluate, predict_subset,
};
pub use search::{GeneticSearch, SearchError};
