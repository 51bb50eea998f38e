//! Genotype representation and random token draws.
//!
//! Provides random generation, single-cell mutation, and block crossover.

use std::fmt;

use rand::prelude::*;

use crate::schema::{Cell, Configuration, GRID};

/// A fully populated grid of single-character tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Genotype {
    cells: [[char; GRID]; GRID],
}

impl Genotype {
    /// Build from explicit rows.
    pub fn from_rows(cells: [[char; GRID]; GRID]) -> Self {
        Self { cells }
    }

    /// Build from four row strings, each exactly `GRID` characters.
    pub fn parse(rows: [&str; GRID]) -> Option<Self> {
        let mut cells = [[' '; GRID]; GRID];
        for (row, text) in cells.iter_mut().zip(rows) {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != GRID {
                return None;
            }
            row.copy_from_slice(&chars);
        }
        Some(Self { cells })
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> char {
        self.cells[cell.row][cell.col]
    }

    /// Concatenate the tokens along a sequence.
    pub fn extract(&self, sequence: &[Cell]) -> String {
        sequence.iter().map(|&cell| self.get(cell)).collect()
    }

    /// Copy of this genotype with one cell replaced.
    pub fn with_cell(&self, cell: Cell, token: char) -> Self {
        let mut cells = self.cells;
        cells[cell.row][cell.col] = token;
        Self { cells }
    }

    /// Block crossover: cells with `row <= split.row && col <= split.col`
    /// come from `first`, the rest from `second`.
    pub fn crossover(first: &Genotype, second: &Genotype, split: Cell) -> Genotype {
        let cells = std::array::from_fn(|i| {
            std::array::from_fn(|j| {
                if i <= split.row && j <= split.col {
                    first.cells[i][j]
                } else {
                    second.cells[i][j]
                }
            })
        });
        Genotype { cells }
    }
}

impl fmt::Display for Genotype {
    /// Last row first, so columns read downward in their sequence order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate().rev() {
            let line: String = row.iter().collect();
            write!(f, "{line}")?;
            if i > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a token for `cell`: a fair coin picks the row or the column
    /// alphabet, then a uniform draw from the chosen alphabet.
    ///
    /// `config` must pass [`Configuration::validate`]. If the coin lands on
    /// an empty alphabet the other one is used; a cell whose alphabets are
    /// both empty has no token to draw and gets `' '`.
    pub fn random_token(&mut self, config: &Configuration, cell: Cell) -> char {
        let (row, column) = (config.row_alphabet(cell.row), config.column_alphabet(cell.col));
        let (chosen, other) = if self.rng.gen_bool(0.5) {
            (row, column)
        } else {
            (column, row)
        };
        let alphabet = if chosen.is_empty() { other } else { chosen };
        debug_assert!(!alphabet.is_empty(), "cell {cell:?} has no tokens");
        alphabet.chars().choose(&mut self.rng).unwrap_or(' ')
    }

    /// Generate a fully random genotype.
    pub fn random_genotype(&mut self, config: &Configuration) -> Genotype {
        let mut cells = [[' '; GRID]; GRID];
        for (i, row) in cells.iter_mut().enumerate() {
            for (j, token) in row.iter_mut().enumerate() {
                *token = self.random_token(config, Cell::new(i, j));
            }
        }
        Genotype { cells }
    }

    /// Uniformly chosen grid cell.
    pub fn random_cell(&mut self) -> Cell {
        Cell::new(self.rng.gen_range(0..GRID), self.rng.gen_range(0..GRID))
    }

    /// Copy of `genotype` with one uniformly chosen cell redrawn.
    pub fn mutate(&mut self, genotype: &Genotype, config: &Configuration) -> Genotype {
        let cell = self.random_cell();
        let token = self.random_token(config, cell);
        genotype.with_cell(cell, token)
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Number of cells in which two genotypes differ.
pub fn genotype_distance(g1: &Genotype, g2: &Genotype) -> usize {
    g1.cells
        .iter()
        .flatten()
        .zip(g2.cells.iter().flatten())
        .filter(|(a, b)| a != b)
        .count()
}
