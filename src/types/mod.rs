//! Type definitions for symtrack

mod error;
mod log;
mod stats;

pub use error::*;
pub use log::*;
pub use stats::*;
