//! Fitness evaluation against the puzzle's pattern constraints.
//!
//! Each constraint extracts a test string along its cell sequence, finds the
//! leftmost-longest substring matching its pattern, and is satisfied only
//! when that match spans the whole test string. Constraints carrying a
//! [`PostMatch`] are checked again on the matched text afterwards.

use regex::Regex;

use crate::schema::{Cell, ConfigError, Configuration, Constraint, PostMatch};

use super::genome::Genotype;

/// A compiled constraint.
struct CompiledConstraint {
    sequence: Vec<Cell>,
    /// `^(?:pattern)$`, used to test candidate substrings.
    anchored: Regex,
    post_match: Option<PostMatch>,
}

impl CompiledConstraint {
    fn compile(index: usize, constraint: &Constraint) -> Result<Self, ConfigError> {
        let anchored = Regex::new(&format!("^(?:{})$", constraint.pattern)).map_err(|source| {
            ConfigError::InvalidPattern {
                constraint: index,
                source,
            }
        })?;

        Ok(Self {
            sequence: constraint.sequence.to_vec(),
            anchored,
            post_match: constraint.post_match,
        })
    }

    fn is_satisfied(&self, genotype: &Genotype) -> bool {
        let test = genotype.extract(&self.sequence);
        let matched = longest_match(&self.anchored, &test);

        if matched.chars().count() < test.chars().count() {
            return false;
        }

        match &self.post_match {
            Some(check) => check.holds(matched),
            None => true,
        }
    }
}

/// Leftmost-longest match of an anchored pattern within `text`.
///
/// Returns the longest matching substring starting at the leftmost offset
/// where any match (possibly empty) exists, or `""` when nothing matches.
pub fn longest_match<'t>(anchored: &Regex, text: &'t str) -> &'t str {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    for (s, &start) in bounds.iter().enumerate() {
        for &end in bounds[s..].iter().rev() {
            let candidate = &text[start..end];
            if anchored.is_match(candidate) {
                return candidate;
            }
        }
    }
    ""
}

/// Scores genotypes against a configuration's constraints.
///
/// Patterns are compiled once at construction; evaluation is a pure
/// function of the genotype.
pub struct FitnessEvaluator {
    constraints: Vec<CompiledConstraint>,
}

impl FitnessEvaluator {
    /// Compile every constraint of a validated configuration.
    pub fn new(config: &Configuration) -> Result<Self, ConfigError> {
        let constraints = config
            .constraints
            .iter()
            .enumerate()
            .map(|(index, constraint)| CompiledConstraint::compile(index, constraint))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { constraints })
    }

    /// Number of constraints, i.e. the perfect score.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Satisfaction vector and score for `genotype`.
    pub fn evaluate(&self, genotype: &Genotype) -> (Vec<bool>, usize) {
        let satisfaction: Vec<bool> = self
            .constraints
            .iter()
            .map(|c| c.is_satisfied(genotype))
            .collect();
        let score = satisfaction.iter().filter(|&&b| b).count();
        (satisfaction, score)
    }
}
