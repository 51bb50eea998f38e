//! Benchmarks for fitness evaluation and full solve runs.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use regex_grid::{
    compute::evolution::{EvolutionEngine, FitnessEvaluator, GenomeRng},
    schema::{Configuration, Parameters},
};

fn bench_fitness_evaluate(c: &mut Criterion) {
    let config = Configuration::default();
    let evaluator = FitnessEvaluator::new(&config).unwrap();
    let mut rng = GenomeRng::new(42);
    let genotypes: Vec<_> = (0..256).map(|_| rng.random_genotype(&config)).collect();

    c.bench_function("fitness_evaluate", |b| {
        let mut i = 0;
        b.iter(|| {
            let genotype = &genotypes[i % genotypes.len()];
            i += 1;
            evaluator.evaluate(black_box(genotype))
        });
    });
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    group.sample_size(20);

    for size in [100, 1000] {
        let params = Parameters {
            queue_capacity: size,
            max_generations: 1,
            random_seed: Some(42),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(params, Configuration::default()).unwrap();
        engine.initialize();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(engine.evolve_generation());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fitness_evaluate, bench_generation);
criterion_main!(benches);
