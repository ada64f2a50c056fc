//! Fuzzy matching algorithms.
//!
//! This module provides the palette's scored-subsequence matcher, the character presence
//! summary used to reject non-matches cheaply, and the `FuzzyMatcher` trait tying them to
//! the engine.

/// Scored-subsequence alignment with start-of-string, start-of-word and contiguity bonuses
pub mod palette;
/// Character presence bitmasks used as a prefilter
pub mod presence;
pub(crate) mod util;

use serde::Serialize;

pub(crate) type IndexType = usize;
/// Score of a match, the greater the better
pub type ScoreType = i64;

/// Matched character indices, one per pattern character
pub type MatchIndices = Vec<IndexType>;

/// One pattern character's place in an alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignStep {
    /// Character index in the choice
    pub index: IndexType,
    /// Cumulative score once this character is matched
    pub score: ScoreType,
}

/// An assignment of each pattern character to a position in the choice, preserving order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alignment {
    steps: Vec<AlignStep>,
}

impl Alignment {
    /// Wraps already ordered steps
    pub fn new(steps: Vec<AlignStep>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].index < w[1].index));
        Self { steps }
    }

    /// The steps of the alignment, one per pattern character
    pub fn steps(&self) -> &[AlignStep] {
        &self.steps
    }

    /// Final cumulative score, 0 for the empty alignment
    pub fn score(&self) -> ScoreType {
        self.steps.last().map(|s| s.score).unwrap_or(0)
    }

    /// Matched character indices in order
    pub fn indices(&self) -> MatchIndices {
        self.steps.iter().map(|s| s.index).collect()
    }

    /// Index of the first matched character
    pub fn begin(&self) -> Option<IndexType> {
        self.steps.first().map(|s| s.index)
    }

    /// Number of matched characters
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for the alignment of the empty pattern
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Trait for fuzzy matching text patterns against choices
pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the optimal alignment
    fn fuzzy_align(&self, choice: &str, pattern: &str) -> Option<Alignment>;

    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)> {
        self.fuzzy_align(choice, pattern)
            .map(|alignment| (alignment.score(), alignment.indices()))
    }

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_align(choice, pattern).map(|alignment| alignment.score())
    }
}

/// Folds a character for case-insensitive comparison.
///
/// ASCII folds to lowercase; other characters fold to the first char of their lowercase
/// mapping.
#[inline]
pub fn fold_case(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        ch.to_lowercase().next().unwrap_or(ch)
    }
}

/// Case-insensitive equality of two strings, using [`fold_case`]
pub fn eq_folded(a: &str, b: &str) -> bool {
    let mut a = a.chars().map(fold_case);
    let mut b = b.chars().map(fold_case);
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => continue,
            _ => return false,
        }
    }
}
