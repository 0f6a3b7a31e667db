//! Schema module - Configuration, chromosome, dataset and result types.

mod chromosome;
mod config;
mod dataset;
mod search;

pub use chromosome::*;
pub use config::*;
pub use dataset::*;
pub use search::*;
