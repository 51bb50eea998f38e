//! Spawn, mutate and intersect: every operator yields fresh candidates.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::schema::{Cell, Configuration};

use super::fitness::FitnessEvaluator;
use super::genome::{GenomeRng, Genotype};
use super::search::Candidate;

/// Which parent, if any, a crossover child replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Child kept in place of the second parent.
    Second,
    /// Child kept in place of the first parent.
    First,
    /// Child discarded, both parents kept.
    Discarded,
}

impl Replacement {
    /// Tournament rule between a child and its two parents.
    ///
    /// The two branches are deliberately asymmetric: a child that beats
    /// both parents, or neither, is discarded.
    pub fn decide(child: usize, first: usize, second: usize) -> Self {
        if child <= first && child > second {
            Replacement::Second
        } else if child > first && child <= second {
            Replacement::First
        } else {
            Replacement::Discarded
        }
    }

    pub fn replaced(&self) -> bool {
        !matches!(self, Replacement::Discarded)
    }
}

/// Candidate factory shared by the worker pools.
pub struct Breeder<'a> {
    config: &'a Configuration,
    evaluator: &'a FitnessEvaluator,
    next_id: &'a AtomicU64,
    generation: usize,
}

impl<'a> Breeder<'a> {
    /// `config` must already be validated; the engine is the only caller.
    pub(crate) fn new(
        config: &'a Configuration,
        evaluator: &'a FitnessEvaluator,
        next_id: &'a AtomicU64,
        generation: usize,
    ) -> Self {
        Self {
            config,
            evaluator,
            next_id,
            generation,
        }
    }

    fn candidate(&self, genotype: Genotype, parents: Vec<u64>) -> Candidate {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Candidate::evaluate(id, genotype, self.evaluator, self.generation, parents)
    }

    /// A fully random candidate.
    pub fn spawn(&self, rng: &mut GenomeRng) -> Candidate {
        let genotype = rng.random_genotype(self.config);
        self.candidate(genotype, Vec::new())
    }

    /// Redraw one cell of `parent`. The mutant survives only when it
    /// scores strictly higher; otherwise `parent` is returned untouched.
    /// The flag reports whether the mutant was kept.
    pub fn mutate(&self, rng: &mut GenomeRng, parent: Candidate) -> (Candidate, bool) {
        let genotype = rng.mutate(parent.genotype(), self.config);
        let mutant = self.candidate(genotype, vec![parent.id()]);

        if mutant.score() > parent.score() {
            (mutant, true)
        } else {
            (parent, false)
        }
    }

    /// Cross two parents at a uniformly random split point.
    pub fn intersect(
        &self,
        rng: &mut GenomeRng,
        first: Candidate,
        second: Candidate,
    ) -> ([Candidate; 2], Replacement) {
        let split = rng.random_cell();
        self.intersect_at(split, first, second)
    }

    /// Cross two parents at `split` and apply [`Replacement::decide`].
    /// Always returns two candidates.
    pub fn intersect_at(
        &self,
        split: Cell,
        first: Candidate,
        second: Candidate,
    ) -> ([Candidate; 2], Replacement) {
        let genotype = Genotype::crossover(first.genotype(), second.genotype(), split);
        let child = self.candidate(genotype, vec![first.id(), second.id()]);

        let replacement = Replacement::decide(child.score(), first.score(), second.score());
        log::trace!(
            "crossover {} x {} at ({}, {}): child {} -> {:?}",
            first.id(),
            second.id(),
            split.row,
            split.col,
            child.score(),
            replacement
        );

        match replacement {
            Replacement::Second => ([first, child], replacement),
            Replacement::First => ([second, child], replacement),
            Replacement::Discarded => ([first, second], replacement),
        }
    }
}
