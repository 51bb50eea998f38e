//! Fixed-size worker pool running one phase of work units at a time.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use super::genome::GenomeRng;

/// Shared countdown of work units for one phase.
#[derive(Debug)]
pub struct WorkUnits {
    remaining: AtomicUsize,
}

impl WorkUnits {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(units),
        }
    }

    /// Take one unit. Returns `false` once every unit has been claimed.
    pub fn claim(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Counters for a completed phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseStats {
    /// Work units processed.
    pub units: usize,
    /// Units whose result changed the population (improved mutant kept,
    /// crossover child inserted, candidate spawned).
    pub accepted: usize,
}

/// Pool of `size` worker threads.
///
/// Each call to [`WorkerPool::run_phase`] is a barrier: it returns only
/// after every worker of that phase has finished.
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
}

impl WorkerPool {
    /// Build a pool with `size` threads.
    pub fn new(size: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("evolve-worker-{i}"))
            .build()?;
        Ok(Self { pool, size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Process exactly `units` work units across all workers.
    ///
    /// Each worker gets its own generator seeded from `rng`, so a seeded
    /// `rng` fixes every worker's draw sequence. `work` returns whether
    /// the unit was accepted.
    pub fn run_phase<F>(&self, units: usize, rng: &mut GenomeRng, work: F) -> PhaseStats
    where
        F: Fn(&mut GenomeRng) -> bool + Sync,
    {
        let queue = WorkUnits::new(units);
        let processed = AtomicUsize::new(0);
        let accepted = AtomicUsize::new(0);
        let seeds: Vec<u64> = (0..self.size).map(|_| rng.next_seed()).collect();

        self.pool.scope(|scope| {
            for seed in seeds {
                let queue = &queue;
                let processed = &processed;
                let accepted = &accepted;
                let work = &work;

                scope.spawn(move |_| {
                    let mut rng = GenomeRng::new(seed);
                    while queue.claim() {
                        if work(&mut rng) {
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                        processed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        PhaseStats {
            units: processed.into_inner(),
            accepted: accepted.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[test]
    fn test_work_units_claim() {
        let units = WorkUnits::new(2);
        assert!(units.claim());
        assert!(units.claim());
        assert!(!units.claim());
        assert!(!units.claim());
    }

    #[test]
    fn test_phase_processes_every_unit() {
        let pool = WorkerPool::new(4).unwrap();
        let mut rng = GenomeRng::new(1);

        for units in [0, 1, 3, 100, 1001] {
            let counter = AtomicUsize::new(0);
            let stats = pool.run_phase(units, &mut rng, |_| {
                counter.fetch_add(1, Ordering::Relaxed) % 2 == 0
            });
            assert_eq!(stats.units, units);
            assert_eq!(counter.load(Ordering::Relaxed), units);
            assert_eq!(stats.accepted, units.div_ceil(2));
        }
    }

    #[test]
    fn test_phase_uses_multiple_threads() {
        let pool = WorkerPool::new(3).unwrap();
        let mut rng = GenomeRng::new(1);
        let names = Mutex::new(HashSet::new());

        pool.run_phase(300, &mut rng, |_| {
            let name = std::thread::current().name().map(str::to_owned);
            names.lock().unwrap().insert(name);
            std::thread::sleep(std::time::Duration::from_micros(50));
            true
        });

        let names = names.into_inner().unwrap();
        assert!(!names.is_empty());
        assert!(names.len() <= 3);
        assert!(
            names
                .iter()
                .flatten()
                .all(|n| n.starts_with("evolve-worker-"))
        );
    }

    #[test]
    fn test_worker_rngs_reproducible() {
        let pool = WorkerPool::new(1).unwrap();

        let draws = |seed: u64| {
            let mut rng = GenomeRng::new(seed);
            let seen = Mutex::new(Vec::new());
            pool.run_phase(5, &mut rng, |rng| {
                seen.lock().unwrap().push(rng.next_seed());
                true
            });
            seen.into_inner().unwrap()
        };

        assert_eq!(draws(9), draws(9));
        assert_ne!(draws(9), draws(10));
    }
}
