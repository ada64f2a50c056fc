//! Ranked items.
//!
//! This module provides the matched item type handed back to the host and the ranking
//! criteria used to sort matches.
use std::cmp::Ordering as CmpOrd;
use std::default::Default;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "cli")]
use clap::ValueEnum;
#[cfg(feature = "cli")]
use clap::builder::PossibleValue;

use crate::PaletteItem;
use crate::fuzzy_matcher::{Alignment, ScoreType};

/// Rank tuple used for sorting match results, lower sorts first
pub type Rank = [i64; 4];

//------------------------------------------------------------------------------

/// Builder for creating rank values based on configurable criteria
#[derive(Debug)]
pub struct RankBuilder {
    criterion: Vec<RankCriteria>,
}

impl Default for RankBuilder {
    fn default() -> Self {
        Self {
            criterion: vec![RankCriteria::Score],
        }
    }
}

impl RankBuilder {
    /// Creates a new rank builder with the given criteria
    ///
    /// The score always takes part: it is put first unless one of `score`/`-score` is given.
    pub fn new(mut criterion: Vec<RankCriteria>) -> Self {
        if !criterion.contains(&RankCriteria::Score) && !criterion.contains(&RankCriteria::NegScore) {
            criterion.insert(0, RankCriteria::Score);
        }

        criterion.dedup();
        Self { criterion }
    }

    /// score: the greater the better
    pub fn build_rank(&self, score: ScoreType, begin: usize, length: usize, priority: i64, index: usize) -> Rank {
        let mut rank = [0; 4];
        let begin = begin as i64;
        let length = length as i64;
        let index = index as i64;

        for (slot, criteria) in self.criterion.iter().take(4).enumerate() {
            let value = match criteria {
                RankCriteria::Score => -score,
                RankCriteria::NegScore => score,
                RankCriteria::Begin => begin,
                RankCriteria::NegBegin => -begin,
                RankCriteria::Length => length,
                RankCriteria::NegLength => -length,
                RankCriteria::Priority => priority,
                RankCriteria::NegPriority => -priority,
                RankCriteria::Index => index,
                RankCriteria::NegIndex => -index,
            };

            rank[slot] = value;
        }

        trace!("ranks: {rank:?}");
        rank
    }

    /// Stable sort by rank: items with equal ranks keep their relative order
    pub fn sort(&self, items: &mut [MatchedItem]) {
        items.sort_by(|a, b| a.rank.cmp(&b.rank));
    }
}

//------------------------------------------------------------------------------
/// A candidate that matched a query
#[derive(Clone)]
pub struct MatchedItem {
    /// The candidate as supplied by the host
    pub item: Arc<dyn PaletteItem>,
    /// Position of the candidate in the index
    pub index: usize,
    /// Index of the variant that best explains the match
    pub which_match: usize,
    /// Best score over all variants
    pub score: ScoreType,
    /// Alignment of the query in the `which_match` variant
    pub alignment: Alignment,
    /// The rank used for sorting
    pub rank: Rank,
}

impl MatchedItem {
    /// Text of the variant that explains the match
    pub fn matched_variant(&self) -> Option<String> {
        self.item
            .variants()
            .into_iter()
            .nth(self.which_match)
            .map(|v| v.into_owned())
    }

    /// Character indices to emphasize in the matched variant
    pub fn matched_indices(&self) -> Vec<usize> {
        self.alignment.indices()
    }
}

impl std::fmt::Debug for MatchedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchedItem")
            .field("item", &self.item.id())
            .field("which_match", &self.which_match)
            .field("score", &self.score)
            .field("rank", &self.rank)
            .finish()
    }
}

impl Deref for MatchedItem {
    type Target = Arc<dyn PaletteItem>;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl PartialEq for MatchedItem {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.rank == other.rank
    }
}

impl std::cmp::Eq for MatchedItem {}

impl PartialOrd for MatchedItem {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrd> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchedItem {
    fn cmp(&self, other: &Self) -> CmpOrd {
        self.rank.cmp(&other.rank).then(self.index.cmp(&other.index))
    }
}

//------------------------------------------------------------------------------
/// Criteria for ranking and sorting matched items
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RankCriteria {
    /// Sort by match score (higher is better)
    Score,
    /// Sort by match score (lower is better)
    NegScore,
    /// Sort by position of the first matched character
    Begin,
    /// Sort by position of the first matched character (reversed)
    NegBegin,
    /// Sort by length of the matched variant
    Length,
    /// Sort by length of the matched variant (reversed)
    NegLength,
    /// Sort by the host supplied priority, lower first
    Priority,
    /// Sort by the host supplied priority, higher first
    NegPriority,
    /// Sort by item index
    Index,
    /// Sort by item index (reversed)
    NegIndex,
}

#[cfg(feature = "cli")]
impl ValueEnum for RankCriteria {
    fn value_variants<'a>() -> &'a [Self] {
        use RankCriteria::*;
        &[
            Score,
            NegScore,
            Begin,
            NegBegin,
            Length,
            NegLength,
            Priority,
            NegPriority,
            Index,
            NegIndex,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        use RankCriteria::*;
        Some(match self {
            Score => PossibleValue::new("score"),
            NegScore => PossibleValue::new("-score"),
            Begin => PossibleValue::new("begin"),
            NegBegin => PossibleValue::new("-begin"),
            Length => PossibleValue::new("length"),
            NegLength => PossibleValue::new("-length"),
            Priority => PossibleValue::new("priority"),
            NegPriority => PossibleValue::new("-priority"),
            Index => PossibleValue::new("index"),
            NegIndex => PossibleValue::new("-index"),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn score_is_always_a_criterion() {
        let builder = RankBuilder::new(vec![RankCriteria::Priority]);
        assert_eq!(builder.build_rank(10, 0, 5, 3, 7), [-10, 3, 0, 0]);
    }

    #[test]
    fn negated_criteria() {
        let builder = RankBuilder::new(vec![
            RankCriteria::NegScore,
            RankCriteria::NegBegin,
            RankCriteria::NegLength,
            RankCriteria::NegIndex,
        ]);
        assert_eq!(builder.build_rank(10, 2, 5, 0, 7), [10, -2, -5, -7]);
    }

    #[test]
    fn higher_score_sorts_first() {
        let builder = RankBuilder::default();
        assert!(builder.build_rank(10, 0, 0, 0, 1) < builder.build_rank(5, 0, 0, 0, 0));
    }

    #[test]
    fn duplicates_are_dropped() {
        let builder = RankBuilder::new(vec![RankCriteria::Score, RankCriteria::Score, RankCriteria::Index]);
        assert_eq!(builder.build_rank(1, 0, 0, 0, 4), [-1, 4, 0, 0]);
    }
}
