//! Quick solve performance test

use regex_grid::{Configuration, EvolutionEngine, Outcome, Parameters};
use std::time::Instant;

fn main() {
    println!("=== Solve Performance Test ===\n");

    // Test different population sizes
    for queue_capacity in [100, 500, 1000] {
        println!("Population: {}", queue_capacity);

        let params = Parameters {
            queue_capacity,
            max_generations: 100,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(params, Configuration::default()).unwrap();
        let result = engine.run();
        let elapsed = start.elapsed();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", result.stats.total_evaluations);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", result.stats.evaluations_per_second);
        match result.outcome {
            Outcome::Converged { solutions } => println!("  Solutions:      {}", solutions.len()),
            Outcome::Exhausted { best_score } => println!("  Best score:     {}", best_score),
        }
        println!();
    }

    println!("=== Scalability Test (population 1000) ===\n");

    // Test different worker counts
    for pool_size in [1, 2, 4, 8] {
        let params = Parameters {
            queue_capacity: 1000,
            pool_size,
            max_generations: 20,
            random_seed: Some(42),
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(params, Configuration::default()).unwrap();
        let result = engine.run();
        let elapsed = start.elapsed();

        println!(
            "Workers {}: {} evals in {:.2}s ({:.1} evals/sec)",
            pool_size,
            result.stats.total_evaluations,
            elapsed.as_secs_f64(),
            result.stats.evaluations_per_second
        );
    }
}
