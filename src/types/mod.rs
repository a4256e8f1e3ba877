//! Type definitions for tourstats

mod error;
mod prefs;
mod stats;
mod tour;

pub use error::*;
pub use prefs::*;
pub use stats::*;
pub use tour::*;
