//! Storage module - Loading input tables and writing search output.

mod loader;
mod run_config;
mod sink;

pub use loader::{
    LoadError, load_context, load_dataset, load_features, load_labels, parse_features,
    parse_labels,
};
pub use run_config::{PruneConfig, RunConfig};
pub use sink::{read_result, write_predictions, write_result};
