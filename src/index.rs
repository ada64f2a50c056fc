//! The candidate index.
//!
//! Holds every candidate's name variants along with their character presence summary. The
//! index is built once per candidate set and rebuilt wholesale when the set changes; it is
//! never mutated in place.
use std::sync::Arc;

use crate::PaletteItem;
use crate::fuzzy_matcher::presence::CharPresence;

/// A name variant with its precomputed presence summary
#[derive(Debug, Clone)]
pub struct IndexedVariant {
    text: String,
    presence: CharPresence,
    char_len: usize,
}

impl IndexedVariant {
    /// Indexes one variant
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let presence = CharPresence::from(text.as_str());
        let char_len = text.chars().count();
        Self {
            text,
            presence,
            char_len,
        }
    }

    /// The variant text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The digits and letters the variant contains
    pub fn presence(&self) -> CharPresence {
        self.presence
    }

    /// Length of the variant in chars
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/// A candidate and its indexed variants, in declared order
#[derive(Clone)]
pub struct IndexedCandidate {
    /// The candidate as supplied by the host
    pub item: Arc<dyn PaletteItem>,
    variants: Vec<IndexedVariant>,
}

impl IndexedCandidate {
    fn new(item: Arc<dyn PaletteItem>) -> Self {
        let variants = item
            .variants()
            .into_iter()
            .map(|v| IndexedVariant::new(v.into_owned()))
            .collect();
        Self { item, variants }
    }

    /// The indexed variants, display label first
    pub fn variants(&self) -> &[IndexedVariant] {
        &self.variants
    }
}

impl std::fmt::Debug for IndexedCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedCandidate")
            .field("id", &self.item.id())
            .field("variants", &self.variants)
            .finish()
    }
}

/// Index over an ordered candidate set
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    candidates: Vec<IndexedCandidate>,
}

impl CandidateIndex {
    /// Builds the index, keeping the order in which candidates are supplied.
    ///
    /// Candidates without variants are kept (so positions stay stable) but never match.
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn PaletteItem>>,
    {
        let candidates: Vec<IndexedCandidate> = items.into_iter().map(IndexedCandidate::new).collect();
        let malformed = candidates.iter().filter(|c| c.variants.is_empty()).count();
        if malformed > 0 {
            debug!("index: {malformed} candidate(s) without variants will never match");
        }
        debug!("index: built over {} candidates", candidates.len());
        Self { candidates }
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if the index holds no candidate
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidate at `index`, in supplied order
    pub fn get(&self, index: usize) -> Option<&IndexedCandidate> {
        self.candidates.get(index)
    }

    /// Iterates over the candidates in supplied order
    pub fn iter(&self) -> std::slice::Iter<'_, IndexedCandidate> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateIndex {
    type Item = &'a IndexedCandidate;
    type IntoIter = std::slice::Iter<'a, IndexedCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::Candidate;

    #[test]
    fn empty_index() {
        let index = CandidateIndex::build(Vec::<Arc<dyn PaletteItem>>::new());
        assert!(index.is_empty());
        assert!(index.get(0).is_none());
    }

    #[test]
    fn summaries_follow_variants() {
        let index = CandidateIndex::build(vec![
            Arc::new(Candidate::text("t", ["Translate", "tx"])) as Arc<dyn PaletteItem>,
            Arc::new("Scale") as Arc<dyn PaletteItem>,
        ]);
        assert_eq!(index.len(), 2);

        let translate = index.get(0).unwrap();
        assert_eq!(translate.variants().len(), 2);
        assert_eq!(translate.variants()[1].text(), "tx");
        assert_eq!(translate.variants()[1].presence(), CharPresence::from("xt"));
        assert_eq!(translate.variants()[0].char_len(), 9);

        let scale = index.get(1).unwrap();
        assert_eq!(scale.item.id(), "Scale");
    }

    #[test]
    fn keeps_candidates_without_variants() {
        let index = CandidateIndex::build(vec![
            Arc::new(Candidate::text("nothing", Vec::<String>::new())) as Arc<dyn PaletteItem>,
        ]);
        assert_eq!(index.len(), 1);
        assert!(index.get(0).unwrap().variants().is_empty());
    }
}
