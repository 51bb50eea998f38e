//! Regex grid CLI - Solve the puzzle with parameters from JSON.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;

use regex_grid::{
    compute::evolution::{EvolutionEngine, Outcome},
    schema::{Configuration, Parameters},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: {} [params.json]", args[0]);
        eprintln!();
        eprintln!("Search for a 4x4 grid satisfying every row and column pattern.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  params.json  Solve parameters (default: built-in defaults)");
        eprintln!();
        eprintln!("Example parameters are printed with the --example flag.");
        std::process::exit(1);
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_parameters();
        return;
    }

    // Load parameters
    let params = match args.get(1) {
        Some(path) => Parameters::from_json_file(PathBuf::from(path)).unwrap_or_else(|e| {
            eprintln!("Error loading parameters: {}", e);
            std::process::exit(1);
        }),
        None => Parameters::default(),
    };

    println!("Regex Grid Solver");
    println!("=================");
    println!("Population: {}", params.queue_capacity);
    println!("Workers: {}", params.pool_size);
    println!("Max generations: {}", params.max_generations);
    if let Some(seed) = params.random_seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut engine = EvolutionEngine::new(params, Configuration::default()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = engine.run_with_callback(|progress| {
        println!(
            "  Generation {}/{}: top score {} (mutants kept {}, children kept {})",
            progress.generation,
            progress.max_generations,
            progress.top_score,
            progress.mutation.accepted,
            progress.crossover.accepted
        );
    });

    println!();
    match result.outcome {
        Outcome::Converged { solutions } => {
            println!("Convergence achieved: {} solutions", solutions.len());
            for solution in &solutions {
                println!();
                println!("{}", solution);
            }
        }
        Outcome::Exhausted { best_score } => {
            println!("Maximum generation count reached");
            println!("Top score: {}", best_score);
        }
    }

    println!();
    println!(
        "Time: {:.2}s ({} evaluations, {:.0} evals/s)",
        result.stats.elapsed_seconds,
        result.stats.total_evaluations,
        result.stats.evaluations_per_second
    );
}

fn print_example_parameters() {
    let params = Parameters {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example parameters (params.json):");
    match serde_json::to_string_pretty(&params) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing parameters: {}", e),
    }
}
