//! Regex grid puzzle - Evolutionary search over a 4x4 grid of tokens.
//!
//! This crate searches for an assignment of single-character tokens to a
//! 4x4 grid such that the strings read along each row and each column
//! fully match that line's pattern. The search is a concurrent genetic
//! algorithm: a bounded population store shared by pools of spawn, mutate
//! and crossover workers, driven by a generation loop.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Puzzle definition and solve parameters
//! - `compute`: Fitness evaluation, population store, worker pools and the
//!   evolution controller
//!
//! # Example
//!
//! ```rust,no_run
//! use regex_grid::{Configuration, EvolutionEngine, Outcome, Parameters};
//!
//! let params = Parameters {
//!     queue_capacity: 500,
//!     max_generations: 200,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(params, Configuration::default())?;
//! match engine.run().outcome {
//!     Outcome::Converged { solutions } => println!("{}", solutions[0]),
//!     Outcome::Exhausted { best_score } => println!("Best score: {best_score}"),
//! }
//! # Ok::<(), regex_grid::compute::evolution::EngineError>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{Candidate, EvolutionEngine, EvolutionResult, Outcome};
pub use schema::{Configuration, Parameters};
