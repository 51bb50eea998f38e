//! Evolutionary search for grids satisfying every row and column pattern.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Genome Operations** (`genome`): Genotype grid and seedable token draws
//! - **Fitness Evaluation** (`fitness`): Scores a genotype against the constraints
//! - **Population Store** (`store`): Bounded blocking queue shared by all workers
//! - **Worker Pool** (`pool`): Fixed thread pool running one phase at a time
//! - **Operators** (`operators`): Spawn, mutate and intersect
//! - **Search Controller** (`search`): Initialization and the generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use regex_grid::schema::{Configuration, Parameters};
//! use regex_grid::compute::evolution::{EvolutionEngine, Outcome};
//!
//! let params = Parameters {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(params, Configuration::default())?;
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: top score = {}", progress.generation, progress.top_score);
//! });
//!
//! if let Outcome::Converged { solutions } = result.outcome {
//!     for solution in solutions {
//!         println!("{solution}");
//!     }
//! }
//! # Ok::<(), regex_grid::compute::evolution::EngineError>(())
//! ```
//!
//! # Generation loop
//!
//! Each generation runs a mutation phase over every population member and
//! then a crossover phase over `queue_capacity / 2` pairs. Both phases are
//! barriers: the store holds exactly `queue_capacity` candidates between
//! them.

mod fitness;
mod genome;
mod operators;
mod pool;
mod search;
mod store;

pub use fitness::{FitnessEvaluator, longest_match};
pub use genome::{GenomeRng, Genotype, genotype_distance};
pub use operators::{Breeder, Replacement};
pub use pool::{PhaseStats, WorkUnits, WorkerPool};
pub use search::{
    Candidate, EngineError, EvolutionEngine, EvolutionPhase, EvolutionProgress, EvolutionResult,
    EvolutionStats, Outcome,
};
pub use store::PopulationStore;
