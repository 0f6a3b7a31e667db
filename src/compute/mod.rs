//! Compute module - Distances, nearest-neighbour classification and the
//! genetic feature search built on top of them.

mod classify;
mod distance;
mod error;

pub mod evolution;

pub use classify::*;
pub use distance::*;
pub use error::*;
