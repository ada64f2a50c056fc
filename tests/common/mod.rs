use std::sync::Arc;

use hcommander::highlight::wrap_matches;
use hcommander::prelude::*;

/// Index over plain candidates, each identified by its first variant
pub fn index_of(candidates: &[&[&str]]) -> CandidateIndex {
    CandidateIndex::build(candidates.iter().map(|variants| {
        let id = variants.first().copied().unwrap_or_default();
        Arc::new(Candidate::text(id, variants.iter().copied())) as Arc<dyn PaletteItem>
    }))
}

pub fn run(index: &CandidateIndex, query: &str) -> Vec<MatchedItem> {
    PaletteEngine::builder().query(query).build().run(index, &RankBuilder::default())
}

pub fn ranked_ids(index: &CandidateIndex, query: &str) -> Vec<String> {
    run(index, query).iter().map(|m| m.item.id().into_owned()).collect()
}

/// `score label`, or `score label (variant)` when another variant explains the match, with
/// matched characters in brackets
pub fn listing(index: &CandidateIndex, query: &str) -> String {
    run(index, query)
        .iter()
        .map(|m| {
            let variants = m.item.variants();
            let marked = wrap_matches(&variants[m.which_match], &m.matched_indices());
            if m.which_match == 0 {
                format!("{} {}", m.score, marked)
            } else {
                format!("{} {} ({})", m.score, variants[0], marked)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
