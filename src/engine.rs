//! The query matcher: filters an index down to the candidates a query matches and ranks them.
//!
//! An engine is created for one query and thrown away when the query changes. It never
//! mutates the index, so running it twice over the same index yields the same result.
use std::fmt::{Display, Error, Formatter};

use crate::fuzzy_matcher::palette::{DEFAULT_MAX_CHOICE_LEN, DEFAULT_MAX_PATTERN_LEN, EXACT_MATCH_SCORE, PaletteMatcher};
use crate::fuzzy_matcher::presence::CharPresence;
use crate::fuzzy_matcher::util::is_subsequence;
use crate::fuzzy_matcher::{Alignment, FuzzyMatcher, ScoreType, eq_folded, fold_case};
use crate::index::{CandidateIndex, IndexedCandidate, IndexedVariant};
use crate::item::{MatchedItem, RankBuilder};

//------------------------------------------------------------------------------
/// The folded form of a query, computed once per query change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySummary {
    /// The empty query: everything matches
    All,
    /// A non-empty query
    Chars {
        /// Digits and letters of the query
        presence: CharPresence,
        /// Every query character after case folding, punctuation included
        folded: Vec<char>,
    },
}

impl QuerySummary {
    /// Summarizes `query`
    ///
    /// ```
    /// use hcommander::QuerySummary;
    ///
    /// assert_eq!(QuerySummary::build(""), QuerySummary::All);
    /// assert!(!QuerySummary::build("::").is_all());
    /// ```
    pub fn build(query: &str) -> Self {
        if query.is_empty() {
            return Self::All;
        }
        let folded: Vec<char> = query.chars().map(fold_case).collect();
        let presence = folded.iter().copied().collect();
        Self::Chars { presence, folded }
    }

    /// True for the match-everything sentinel
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Presence summary of the query, empty for the sentinel
    pub fn presence(&self) -> CharPresence {
        match self {
            Self::All => CharPresence::EMPTY,
            Self::Chars { presence, .. } => *presence,
        }
    }

    /// Number of query characters
    pub fn char_len(&self) -> usize {
        match self {
            Self::All => 0,
            Self::Chars { folded, .. } => folded.len(),
        }
    }
}

//------------------------------------------------------------------------------
/// A candidate that passed the filter, before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteredItem {
    /// Position of the candidate in the index
    pub index: usize,
    /// Index of the variant that explains the match
    pub which_match: usize,
}

//------------------------------------------------------------------------------
/// Builder for [`PaletteEngine`]
pub struct PaletteEngineBuilder {
    query: String,
    max_query_len: usize,
    max_variant_len: usize,
    matcher: Option<Box<dyn FuzzyMatcher>>,
}

impl Default for PaletteEngineBuilder {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_query_len: DEFAULT_MAX_PATTERN_LEN,
            max_variant_len: DEFAULT_MAX_CHOICE_LEN,
            matcher: None,
        }
    }
}

impl PaletteEngineBuilder {
    /// Sets the query
    pub fn query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    /// Longest query, in chars, that can match anything
    pub fn max_query_len(mut self, len: usize) -> Self {
        self.max_query_len = len;
        self
    }

    /// Longest variant, in chars, that can be matched
    pub fn max_variant_len(mut self, len: usize) -> Self {
        self.max_variant_len = len;
        self
    }

    /// Replaces the alignment algorithm
    pub fn matcher(mut self, matcher: Box<dyn FuzzyMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Builds the engine
    pub fn build(self) -> PaletteEngine {
        let matcher = self.matcher.unwrap_or_else(|| {
            Box::new(
                PaletteMatcher::default()
                    .max_pattern_len(self.max_query_len)
                    .max_choice_len(self.max_variant_len),
            )
        });
        let summary = QuerySummary::build(&self.query);
        if summary.char_len() > self.max_query_len {
            debug!(
                "query of {} chars exceeds limit {}, nothing will match",
                summary.char_len(),
                self.max_query_len
            );
        }
        debug!("Initialized palette engine for {:?}", self.query);

        PaletteEngine {
            query: self.query,
            summary,
            matcher,
            max_query_len: self.max_query_len,
            max_variant_len: self.max_variant_len,
        }
    }
}

/// Matches and ranks the candidates of an index against one query
pub struct PaletteEngine {
    query: String,
    summary: QuerySummary,
    matcher: Box<dyn FuzzyMatcher>,
    max_query_len: usize,
    max_variant_len: usize,
}

impl PaletteEngine {
    /// Returns a default builder for chaining
    pub fn builder() -> PaletteEngineBuilder {
        PaletteEngineBuilder::default()
    }

    /// The raw query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The folded query
    pub fn summary(&self) -> &QuerySummary {
        &self.summary
    }

    fn query_too_long(&self) -> bool {
        self.summary.char_len() > self.max_query_len
    }

    /// Presence subset test followed by the ordered subsequence scan
    fn variant_passes(&self, variant: &IndexedVariant) -> bool {
        if variant.char_len() > self.max_variant_len {
            return false;
        }
        match &self.summary {
            QuerySummary::All => true,
            QuerySummary::Chars { presence, folded } => {
                variant.presence().contains_all(*presence) && is_subsequence(folded, variant.text().chars())
            }
        }
    }

    fn is_exact(&self, variant: &IndexedVariant) -> bool {
        variant.char_len() <= self.max_variant_len && eq_folded(variant.text(), &self.query)
    }

    /// True if the candidate matches the query
    pub fn matches(&self, candidate: &IndexedCandidate) -> bool {
        self.which_match(candidate).is_some()
    }

    /// Index of the variant that best explains the match, if the candidate matches.
    ///
    /// A variant equal to the query (ignoring case) wins outright; otherwise the first
    /// variant, in declared order, containing the query as a subsequence.
    pub fn which_match(&self, candidate: &IndexedCandidate) -> Option<usize> {
        let variants = candidate.variants();
        if variants.is_empty() {
            return None;
        }
        if self.summary.is_all() {
            return Some(0);
        }
        if self.query_too_long() {
            return None;
        }
        variants
            .iter()
            .position(|v| self.is_exact(v))
            .or_else(|| variants.iter().position(|v| self.variant_passes(v)))
    }

    fn variant_score(&self, variant: &IndexedVariant) -> Option<ScoreType> {
        if self.is_exact(variant) {
            return Some(EXACT_MATCH_SCORE);
        }
        if !self.variant_passes(variant) {
            return None;
        }
        self.matcher.fuzzy_match(variant.text(), &self.query)
    }

    /// Best score over all variants of the candidate, `None` if it does not match
    pub fn score(&self, candidate: &IndexedCandidate) -> Option<ScoreType> {
        if candidate.variants().is_empty() {
            return None;
        }
        if self.summary.is_all() {
            return Some(0);
        }
        if self.query_too_long() {
            return None;
        }
        candidate.variants().iter().filter_map(|v| self.variant_score(v)).max()
    }

    /// Alignment of the query within one variant of the candidate
    pub fn align(&self, candidate: &IndexedCandidate, which_match: usize) -> Option<Alignment> {
        let variant = candidate.variants().get(which_match)?;
        if self.summary.is_all() {
            return Some(Alignment::default());
        }
        if self.query_too_long() || variant.char_len() > self.max_variant_len {
            return None;
        }
        self.matcher.fuzzy_align(variant.text(), &self.query)
    }

    /// Every matching candidate of the index, in index order
    pub fn filter(&self, index: &CandidateIndex) -> Vec<FilteredItem> {
        let filtered: Vec<FilteredItem> = index
            .iter()
            .enumerate()
            .filter_map(|(i, candidate)| {
                self.which_match(candidate).map(|which_match| FilteredItem {
                    index: i,
                    which_match,
                })
            })
            .collect();
        trace!("{self}: {}/{} candidates matched", filtered.len(), index.len());
        filtered
    }

    /// Scores and sorts filtered candidates, best first.
    ///
    /// The sort is stable, so ties keep the order of `filtered`. The empty query keeps the
    /// supplied order whatever the criteria.
    pub fn rank(
        &self,
        index: &CandidateIndex,
        filtered: &[FilteredItem],
        rank_builder: &RankBuilder,
    ) -> Vec<MatchedItem> {
        let mut ranked: Vec<MatchedItem> = filtered
            .iter()
            .filter_map(|f| {
                let candidate = index.get(f.index)?;
                let score = self.score(candidate)?;
                let alignment = self.align(candidate, f.which_match)?;
                let begin = alignment.begin().unwrap_or(0);
                let length = candidate.variants()[f.which_match].char_len();
                let rank = rank_builder.build_rank(score, begin, length, candidate.item.priority(), f.index);
                Some(MatchedItem {
                    item: candidate.item.clone(),
                    index: f.index,
                    which_match: f.which_match,
                    score,
                    alignment,
                    rank,
                })
            })
            .collect();

        if !self.summary.is_all() {
            rank_builder.sort(&mut ranked);
        }
        debug!("{self}: ranked {} items", ranked.len());
        ranked
    }

    /// Filter then rank
    pub fn run(&self, index: &CandidateIndex, rank_builder: &RankBuilder) -> Vec<MatchedItem> {
        let filtered = self.filter(index);
        self.rank(index, &filtered, rank_builder)
    }
}

impl Display for PaletteEngine {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "(Palette: {})", self.query)
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Candidate, PaletteItem};

    fn index_of(candidates: Vec<Candidate>) -> CandidateIndex {
        CandidateIndex::build(
            candidates
                .into_iter()
                .map(|c| Arc::new(c) as Arc<dyn PaletteItem>),
        )
    }

    fn engine(query: &str) -> PaletteEngine {
        PaletteEngine::builder().query(query).build()
    }

    fn ids(ranked: &[MatchedItem]) -> Vec<String> {
        ranked.iter().map(|m| m.item.id().into_owned()).collect()
    }

    #[test]
    fn exact_variant_wins_which_match() {
        let index = index_of(vec![Candidate::text("t", ["Translate", "tx", "ty", "tz"])]);
        let candidate = index.get(0).unwrap();
        assert_eq!(engine("tx").which_match(candidate), Some(1));
        assert_eq!(engine("TZ").which_match(candidate), Some(3));
        assert_eq!(engine("tx").score(candidate), Some(EXACT_MATCH_SCORE));
    }

    #[test]
    fn first_subsequence_variant_otherwise() {
        let index = index_of(vec![Candidate::text("t", ["Translate", "tx", "ty", "tz"])]);
        let candidate = index.get(0).unwrap();
        assert_eq!(engine("ta").which_match(candidate), Some(0));
        assert_eq!(engine("t").which_match(candidate), Some(0));
        assert_eq!(engine("xyz").which_match(candidate), None);
    }

    #[test]
    fn punctuation_is_matched_literally() {
        let index = index_of(vec![
            Candidate::text("a", ["Parm: value"]),
            Candidate::text("b", ["Parm value"]),
        ]);
        let filtered = engine("m:v").filter(&index);
        assert_eq!(filtered, vec![FilteredItem { index: 0, which_match: 0 }]);

        let only_punct = engine("::");
        assert!(!only_punct.summary().is_all());
        assert!(only_punct.filter(&index).is_empty());
    }

    #[test]
    fn empty_query_keeps_order() {
        let index = index_of(vec![
            Candidate::text("b", ["Beta"]),
            Candidate::text("a", ["Alpha"]),
            Candidate::text("none", Vec::<String>::new()),
        ]);
        let ranked = engine("").run(&index, &RankBuilder::new(vec![crate::RankCriteria::Length]));
        assert_eq!(ids(&ranked), ["b", "a"]);
        assert!(ranked.iter().all(|m| m.which_match == 0 && m.score == 0 && m.alignment.is_empty()));
    }

    #[test]
    fn zero_variants_never_match() {
        let index = index_of(vec![Candidate::text("none", Vec::<String>::new())]);
        let candidate = index.get(0).unwrap();
        assert!(!engine("a").matches(candidate));
        assert!(engine("a").score(candidate).is_none());
    }

    #[test]
    fn ranks_by_score_then_supplied_order() {
        let index = index_of(vec![
            Candidate::text("scale", ["Scale"]),
            Candidate::text("translate", ["Translate"]),
            Candidate::text("alpha", ["Alpha"]),
            Candidate::text("alpha2", ["Alpha"]),
        ]);
        let ranked = engine("a").run(&index, &RankBuilder::default());
        assert_eq!(ids(&ranked), ["alpha", "alpha2", "scale", "translate"]);
    }

    #[test]
    fn score_is_max_over_variants() {
        let index = index_of(vec![Candidate::text("x", ["Export Geometry", "geo"])]);
        let candidate = index.get(0).unwrap();
        let e = engine("geo");
        // the exact name wins which_match and the sentinel score
        assert_eq!(e.which_match(candidate), Some(1));
        assert_eq!(e.score(candidate), Some(EXACT_MATCH_SCORE));

        let e = engine("eg");
        assert_eq!(e.which_match(candidate), Some(0));
        assert_eq!(
            e.score(candidate),
            crate::fuzzy_matcher::palette::fuzzy_match("Export Geometry", "eg")
        );
    }

    #[test]
    fn length_limits() {
        let index = index_of(vec![Candidate::text("long", ["a".repeat(20)])]);
        let candidate = index.get(0).unwrap();
        let short_variants = PaletteEngine::builder().query("a").max_variant_len(10).build();
        assert!(!short_variants.matches(candidate));

        let short_query = PaletteEngine::builder().query("aaa").max_query_len(2).build();
        assert!(!short_query.matches(candidate));
        assert!(short_query.filter(&index).is_empty());
    }

    #[test]
    fn alignment_follows_which_match() {
        let index = index_of(vec![Candidate::text("vm", ["Volume Merge", "vmerge"])]);
        let ranked = engine("vmerge").run(&index, &RankBuilder::default());
        assert_eq!(ranked[0].which_match, 1);
        assert_eq!(ranked[0].matched_indices(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ranked[0].matched_variant().as_deref(), Some("vmerge"));
    }

    #[test]
    fn display() {
        assert_eq!(engine("tx").to_string(), "(Palette: tx)");
    }
}
