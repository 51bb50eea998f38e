//! Puzzle definition: gene alphabets, pattern constraints and the cell
//! sequences each constraint is checked against.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Side length of the square genotype grid.
pub const GRID: usize = 4;

/// Number of constraints (one per row and one per column).
pub const CONSTRAINT_COUNT: usize = 2 * GRID;

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cross-position check applied after a full-length pattern match.
///
/// The regex engine has no backreferences, so constraints that need
/// positions of the extracted string to agree declare it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostMatch {
    /// `(xy)\1`: character 0 equals character 2 and 1 equals 3.
    RepeatedPair,
}

impl PostMatch {
    /// Check the matched test string.
    pub fn holds(&self, text: &str) -> bool {
        match self {
            PostMatch::RepeatedPair => {
                let chars: Vec<char> = text.chars().collect();
                chars.len() == GRID && chars[0] == chars[2] && chars[1] == chars[3]
            }
        }
    }
}

/// A single pattern constraint over one extracted sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Human readable label (e.g. "row 0").
    pub name: String,
    /// Pattern the extracted string must match in full.
    pub pattern: String,
    /// Cells concatenated, in order, into the test string.
    pub sequence: [Cell; GRID],
    /// Optional check run only when the pattern already matched in full.
    #[serde(default)]
    pub post_match: Option<PostMatch>,
}

/// Immutable puzzle configuration shared by every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Token alphabets: `0..GRID` for rows, `GRID..2*GRID` for columns.
    pub alphabets: Vec<String>,
    /// Constraints, index-aligned with the satisfaction vector.
    pub constraints: Vec<Constraint>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::linkedin()
    }
}

impl Configuration {
    /// The fixed eight-constraint puzzle.
    pub fn linkedin() -> Self {
        let alphabets = [
            "IN",
            "ENGINER",
            "MBERS",
            "LNKD",
            "RD",
            "ABCDEFGHIJLMNOPQSTUVXYZ",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            "NECT",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let patterns = [
            ("[LINKED]*IN", None),
            ("(ENG|INE|E|R)*", None),
            ("([MBERS]*)", Some(PostMatch::RepeatedPair)),
            (".(LN|K|D)*", None),
            ("R+D", None),
            ("[^WORK]*ING?", None),
            (".*[IN].*", None),
            ("C{0}N[NECT]*", None),
        ];

        let constraints = patterns
            .iter()
            .enumerate()
            .map(|(e, (pattern, post_match))| {
                let (name, sequence) = if e < GRID {
                    (format!("row {e}"), row_sequence(e))
                } else {
                    (format!("column {}", e - GRID), column_sequence(e - GRID))
                };
                Constraint {
                    name,
                    pattern: pattern.to_string(),
                    sequence,
                    post_match: *post_match,
                }
            })
            .collect();

        Self {
            alphabets,
            constraints,
        }
    }

    /// Alphabet used when a cell draws from its row.
    #[inline]
    pub fn row_alphabet(&self, row: usize) -> &str {
        &self.alphabets[row]
    }

    /// Alphabet used when a cell draws from its column.
    #[inline]
    pub fn column_alphabet(&self, col: usize) -> &str {
        &self.alphabets[GRID + col]
    }

    /// Highest achievable score.
    #[inline]
    pub fn perfect_score(&self) -> usize {
        self.constraints.len()
    }

    /// Validate the puzzle definition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabets.len() != 2 * GRID {
            return Err(ConfigError::AlphabetCount(self.alphabets.len()));
        }
        if let Some(index) = self.alphabets.iter().position(|a| a.is_empty()) {
            return Err(ConfigError::EmptyAlphabet(index));
        }
        if self.constraints.len() != CONSTRAINT_COUNT {
            return Err(ConfigError::ConstraintCount(self.constraints.len()));
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if let Some(cell) = constraint
                .sequence
                .iter()
                .find(|c| c.row >= GRID || c.col >= GRID)
            {
                return Err(ConfigError::CellOutOfRange {
                    constraint: index,
                    row: cell.row,
                    col: cell.col,
                });
            }
            Regex::new(&constraint.pattern).map_err(|source| ConfigError::InvalidPattern {
                constraint: index,
                source,
            })?;
        }
        Ok(())
    }
}

/// Row `r`, read left to right.
fn row_sequence(r: usize) -> [Cell; GRID] {
    std::array::from_fn(|j| Cell::new(r, j))
}

/// Column `c`, read from the last row up to the first.
fn column_sequence(c: usize) -> [Cell; GRID] {
    std::array::from_fn(|i| Cell::new(GRID - 1 - i, c))
}

/// Puzzle configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Expected 8 alphabets, found {0}")]
    AlphabetCount(usize),
    #[error("Alphabet {0} is empty")]
    EmptyAlphabet(usize),
    #[error("Expected 8 constraints, found {0}")]
    ConstraintCount(usize),
    #[error("Constraint {constraint} references cell ({row}, {col}) outside the grid")]
    CellOutOfRange {
        constraint: usize,
        row: usize,
        col: usize,
    },
    #[error("Constraint {constraint} has an invalid pattern: {source}")]
    InvalidPattern {
        constraint: usize,
        #[source]
        source: regex::Error,
    },
}
