//! Schema module - Puzzle definition and solve parameters.

mod config;
mod puzzle;

pub use config::*;
pub use puzzle::*;
