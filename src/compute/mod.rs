//! Compute module - Evolutionary search over token grids.

pub mod evolution;
