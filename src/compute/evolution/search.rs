//! Generation-loop controller for the evolutionary search.

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

use log::{debug, info};

use crate::schema::{ConfigError, Configuration, ParameterError, Parameters};

use super::fitness::FitnessEvaluator;
use super::genome::{GenomeRng, Genotype};
use super::operators::Breeder;
use super::pool::{PhaseStats, WorkerPool};
use super::store::PopulationStore;

/// A candidate individual in the population.
///
/// Satisfaction and score are computed once at construction and never
/// change; every operator produces a new candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    id: u64,
    genotype: Genotype,
    satisfaction: Vec<bool>,
    score: usize,
    generation: usize,
    parents: Vec<u64>,
}

impl Candidate {
    /// Score `genotype` and wrap it as a candidate.
    pub fn evaluate(
        id: u64,
        genotype: Genotype,
        evaluator: &FitnessEvaluator,
        generation: usize,
        parents: Vec<u64>,
    ) -> Self {
        let (satisfaction, score) = evaluator.evaluate(&genotype);
        Self {
            id,
            genotype,
            satisfaction,
            score,
            generation,
            parents,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Per-constraint results, index-aligned with the configuration.
    pub fn satisfaction(&self) -> &[bool] {
        &self.satisfaction
    }

    /// Number of satisfied constraints.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Generation created.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Parent IDs.
    pub fn parents(&self) -> &[u64] {
        &self.parents
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "candidate {} (score {}/{})",
            self.id,
            self.score,
            self.satisfaction.len()
        )?;
        writeln!(f, "{}", self.genotype)?;
        write!(f, "{:?}", self.satisfaction)
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionPhase {
    Initializing,
    GenerationLoop,
    Converged,
    Exhausted,
}

/// Progress report emitted after each completed generation.
#[derive(Debug, Clone)]
pub struct EvolutionProgress {
    /// Generations completed so far.
    pub generation: usize,
    pub max_generations: usize,
    /// Top score in the population after this generation.
    pub top_score: usize,
    /// Best top score observed over the run.
    pub best_score: usize,
    /// Store size at the generation boundary.
    pub population: usize,
    pub mutation: PhaseStats,
    pub crossover: PhaseStats,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Some candidates satisfy every constraint.
    Converged { solutions: Vec<Candidate> },
    /// Generation budget spent without a perfect candidate.
    Exhausted { best_score: usize },
}

/// Summary counters for a run.
#[derive(Debug, Clone)]
pub struct EvolutionStats {
    /// Generation loop iterations, including the final check.
    pub generations: usize,
    pub total_evaluations: u64,
    pub best_score: usize,
    pub elapsed_seconds: f64,
    pub evaluations_per_second: f64,
}

/// Result of a solve run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub outcome: Outcome,
    pub stats: EvolutionStats,
}

/// Engine construction errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid parameters: {0}")]
    Parameters(#[from] ParameterError),
    #[error("Invalid puzzle configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    params: Parameters,
    config: Configuration,
    evaluator: FitnessEvaluator,
    rng: GenomeRng,
    pool: WorkerPool,
    store: PopulationStore<Candidate>,
    next_id: AtomicU64,
    phase: EvolutionPhase,
    generation: usize,
    best_score: usize,
    evaluations: u64,
}

impl EvolutionEngine {
    /// Validate inputs, compile the constraints and build the worker pool.
    pub fn new(params: Parameters, config: Configuration) -> Result<Self, EngineError> {
        params.validate()?;
        config.validate()?;

        let evaluator = FitnessEvaluator::new(&config)?;
        let rng = match params.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };
        let pool = WorkerPool::new(params.pool_size)?;
        let store = PopulationStore::new(params.queue_capacity);

        Ok(Self {
            params,
            config,
            evaluator,
            rng,
            pool,
            store,
            next_id: AtomicU64::new(0),
            phase: EvolutionPhase::Initializing,
            generation: 0,
            best_score: 0,
            evaluations: 0,
        })
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Current store size.
    pub fn population_len(&self) -> usize {
        self.store.len()
    }

    /// Copies of every candidate currently in the store.
    pub fn population(&self) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(self.store.capacity());
        self.store.inspect(|c| candidates.push(c.clone()));
        candidates
    }

    /// Highest score in the store. Membership is unchanged.
    pub fn top_score(&self) -> usize {
        let mut top = 0;
        self.store.inspect(|c| top = top.max(c.score()));
        top
    }

    /// Copies of every candidate scoring exactly `score`.
    pub fn candidates_with_score(&self, score: usize) -> Vec<Candidate> {
        let mut found = Vec::new();
        self.store.inspect(|c| {
            if c.score() == score {
                found.push(c.clone());
            }
        });
        found
    }

    /// Fill the store with `queue_capacity` random candidates.
    pub fn initialize(&mut self) -> PhaseStats {
        let capacity = self.params.queue_capacity;
        info!(
            "Initializing population of {} with {} workers",
            capacity,
            self.pool.size()
        );

        self.store.drain();
        self.phase = EvolutionPhase::Initializing;
        self.generation = 0;
        self.best_score = 0;

        let store = &self.store;
        let breeder = Breeder::new(&self.config, &self.evaluator, &self.next_id, 0);
        let stats = self.pool.run_phase(capacity, &mut self.rng, |rng| {
            store.push(breeder.spawn(rng));
            true
        });
        self.evaluations += stats.units as u64;

        self.phase = EvolutionPhase::GenerationLoop;
        info!("Initialization complete, top score {}", self.top_score());
        stats
    }

    /// Mutate every population member once. Mutants are kept only when
    /// they score strictly higher than their parent.
    pub fn mutation_phase(&mut self) -> PhaseStats {
        let store = &self.store;
        let breeder = Breeder::new(
            &self.config,
            &self.evaluator,
            &self.next_id,
            self.generation + 1,
        );

        let stats = self
            .pool
            .run_phase(self.params.queue_capacity, &mut self.rng, |rng| {
                let parent = store.pop();
                let (survivor, improved) = breeder.mutate(rng, parent);
                store.push(survivor);
                improved
            });
        debug!(
            "Generation {}: mutation kept {}/{} mutants",
            self.generation, stats.accepted, stats.units
        );

        self.evaluations += stats.units as u64;
        stats
    }

    /// Cross `queue_capacity / 2` pairs. Every pair goes back as two
    /// candidates.
    pub fn crossover_phase(&mut self) -> PhaseStats {
        let store = &self.store;
        let breeder = Breeder::new(
            &self.config,
            &self.evaluator,
            &self.next_id,
            self.generation + 1,
        );

        let stats = self
            .pool
            .run_phase(self.params.queue_capacity / 2, &mut self.rng, |rng| {
                let (first, second) = store.pop_pair();
                let ([a, b], replacement) = breeder.intersect(rng, first, second);
                store.push(a);
                store.push(b);
                replacement.replaced()
            });
        debug!(
            "Generation {}: crossover inserted {}/{} children",
            self.generation, stats.accepted, stats.units
        );

        self.evaluations += stats.units as u64;
        stats
    }

    /// One mutation phase followed by one crossover phase.
    pub fn evolve_generation(&mut self) -> (PhaseStats, PhaseStats) {
        let mutation = self.mutation_phase();
        let crossover = self.crossover_phase();
        (mutation, crossover)
    }

    /// Run the generation loop on the current population.
    pub fn evolve_with_callback<F>(&mut self, mut callback: F) -> Outcome
    where
        F: FnMut(&EvolutionProgress),
    {
        let perfect = self.evaluator.constraint_count();
        let max_generations = self.params.max_generations;
        self.phase = EvolutionPhase::GenerationLoop;

        for g in 0..max_generations {
            self.generation = g;

            let top = self.top_score();
            self.best_score = self.best_score.max(top);

            if top == perfect {
                let solutions = self.candidates_with_score(perfect);
                info!(
                    "Convergence achieved at generation {}: {} solutions",
                    g,
                    solutions.len()
                );
                self.phase = EvolutionPhase::Converged;
                return Outcome::Converged { solutions };
            }

            if g + 1 == max_generations {
                break;
            }

            let (mutation, crossover) = self.evolve_generation();
            let top_score = self.top_score();
            self.best_score = self.best_score.max(top_score);

            callback(&EvolutionProgress {
                generation: g + 1,
                max_generations,
                top_score,
                best_score: self.best_score,
                population: self.store.len(),
                mutation,
                crossover,
            });
        }

        info!(
            "Maximum generation count reached, top score {}",
            self.best_score
        );
        self.phase = EvolutionPhase::Exhausted;
        Outcome::Exhausted {
            best_score: self.best_score,
        }
    }

    /// Initialize and run to convergence or exhaustion.
    pub fn run_with_callback<F>(&mut self, callback: F) -> EvolutionResult
    where
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();
        self.evaluations = 0;

        self.initialize();
        let outcome = self.evolve_with_callback(callback);

        let elapsed = start_time.elapsed().as_secs_f64();
        EvolutionResult {
            outcome,
            stats: EvolutionStats {
                generations: self.generation + 1,
                total_evaluations: self.evaluations,
                best_score: self.best_score,
                elapsed_seconds: elapsed,
                evaluations_per_second: self.evaluations as f64 / elapsed.max(f64::EPSILON),
            },
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(queue_capacity: usize, pool_size: usize, max_generations: usize) -> Parameters {
        Parameters {
            queue_capacity,
            pool_size,
            max_generations,
            random_seed: Some(42),
        }
    }

    fn engine(params: Parameters) -> EvolutionEngine {
        EvolutionEngine::new(params, Configuration::default()).unwrap()
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            EvolutionEngine::new(params(0, 2, 5), Configuration::default()),
            Err(EngineError::Parameters(ParameterError::ZeroQueueCapacity))
        ));

        let mut config = Configuration::default();
        config.alphabets[0].clear();
        assert!(matches!(
            EvolutionEngine::new(params(10, 2, 5), config),
            Err(EngineError::Configuration(ConfigError::EmptyAlphabet(0)))
        ));
    }

    #[test]
    fn test_initialize_fills_store() {
        let mut engine = engine(params(37, 4, 5));
        assert_eq!(engine.phase(), EvolutionPhase::Initializing);

        let stats = engine.initialize();
        assert_eq!(stats.units, 37);
        assert_eq!(engine.population_len(), 37);
        assert_eq!(engine.phase(), EvolutionPhase::GenerationLoop);

        for candidate in engine.population() {
            assert_eq!(
                candidate.score(),
                candidate.satisfaction().iter().filter(|&&b| b).count()
            );
            assert!(candidate.score() <= 8);
            assert!(candidate.parents().is_empty());
        }
    }

    #[test]
    fn test_generation_conserves_population() {
        let mut engine = engine(params(51, 4, 5));
        engine.initialize();

        let mut top = engine.top_score();
        for _ in 0..5 {
            let (mutation, crossover) = engine.evolve_generation();
            assert_eq!(mutation.units, 51);
            assert_eq!(crossover.units, 25);
            assert_eq!(engine.population_len(), 51);

            // Neither phase ever replaces a candidate with a weaker one.
            let next = engine.top_score();
            assert!(next >= top);
            top = next;
        }
    }

    #[test]
    fn test_each_phase_leaves_store_full() {
        for (capacity, workers) in [(51, 4), (7, 3), (1, 8), (2, 16), (64, 64)] {
            let mut engine = engine(params(capacity, workers, 5));
            engine.initialize();
            assert_eq!(engine.population_len(), capacity);

            for _ in 0..3 {
                let mutation = engine.mutation_phase();
                assert_eq!(mutation.units, capacity);
                assert_eq!(engine.population_len(), capacity);

                let crossover = engine.crossover_phase();
                assert_eq!(crossover.units, capacity / 2);
                assert_eq!(engine.population_len(), capacity);
            }
        }
    }

    #[test]
    fn test_small_capacity_with_many_workers() {
        let mut engine = engine(params(2, 8, 4));
        let result = engine.run();
        assert_eq!(engine.population_len(), 2);
        assert!(result.stats.generations <= 4);
    }

    #[test]
    fn test_single_generation_exhausts_without_evolving() {
        let mut engine = engine(params(10, 2, 1));
        let result = engine.run();

        match result.outcome {
            Outcome::Exhausted { best_score } => assert!(best_score < 8),
            Outcome::Converged { .. } => panic!("random population should not be perfect"),
        }
        assert_eq!(engine.phase(), EvolutionPhase::Exhausted);
        assert_eq!(result.stats.total_evaluations, 10);
    }

    #[test]
    fn test_converges_on_known_solution() {
        let mut engine = engine(params(8, 2, 10));
        engine.initialize();

        let solution = Genotype::parse(["DNIN", "RINE", "RERE", "RDLN"]).unwrap();
        let mut population = engine.store.drain();
        population[0] = Candidate::evaluate(999, solution, &engine.evaluator, 0, Vec::new());
        for candidate in population {
            engine.store.push(candidate);
        }

        let mut reports = 0;
        let outcome = engine.evolve_with_callback(|_| reports += 1);
        assert_eq!(reports, 0);
        assert_eq!(engine.phase(), EvolutionPhase::Converged);

        match outcome {
            Outcome::Converged { solutions } => {
                assert!(solutions.iter().any(|c| c.genotype() == &solution));
                assert!(solutions.iter().all(|c| c.score() == 8));
            }
            Outcome::Exhausted { .. } => panic!("expected convergence"),
        }
        assert_eq!(engine.population_len(), 8);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let snapshot = || {
            let mut engine = engine(params(20, 1, 5));
            engine.initialize();
            for _ in 0..3 {
                engine.evolve_generation();
            }
            engine
                .population()
                .iter()
                .map(|c| (*c.genotype(), c.score()))
                .collect::<Vec<_>>()
        };

        assert_eq!(snapshot(), snapshot());
    }

    #[test]
    fn test_end_to_end_run() {
        let mut engine = engine(params(100, 4, 50));
        let mut generations = Vec::new();

        let result = engine.run_with_callback(|progress| {
            assert_eq!(progress.population, 100);
            assert_eq!(progress.mutation.units, 100);
            assert_eq!(progress.crossover.units, 50);
            assert!(progress.top_score <= progress.best_score);
            generations.push(progress.generation);
        });

        assert!(result.stats.generations <= 50);
        assert_eq!(engine.population_len(), 100);
        assert_eq!(generations, (1..=generations.len()).collect::<Vec<_>>());

        match result.outcome {
            Outcome::Converged { solutions } => {
                assert!(!solutions.is_empty());
                assert!(solutions.iter().all(|c| c.score() == 8));
                assert_eq!(result.stats.best_score, 8);
            }
            Outcome::Exhausted { best_score } => {
                assert!(best_score < 8);
                assert_eq!(generations.len(), 49);
            }
        }
    }

    #[test]
    fn test_candidate_display() {
        let config = Configuration::default();
        let evaluator = FitnessEvaluator::new(&config).unwrap();
        let genotype = Genotype::parse(["DNIN", "RINE", "RERE", "RDLN"]).unwrap();
        let candidate = Candidate::evaluate(7, genotype, &evaluator, 0, Vec::new());

        let text = candidate.to_string();
        assert!(text.starts_with("candidate 7 (score 8/8)"));
        assert!(text.contains("RDLN\nRERE\nRINE\nDNIN"));
    }
}
