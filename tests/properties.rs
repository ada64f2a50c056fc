use hcommander::fuzzy_matcher::FuzzyMatcher;
use hcommander::fuzzy_matcher::palette::{
    CONTIGUOUS_BONUS, MATCH_SCORE, PaletteMatcher, START_OF_STRING_BONUS, START_OF_WORD_BONUS,
};
use proptest::prelude::*;

fn is_subsequence(variant: &str, query: &str) -> bool {
    let mut rest = variant.chars().map(|c| c.to_ascii_lowercase());
    query
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .all(|q| rest.any(|c| c == q))
}

/// Best score over every way of spelling `query` in `variant`
fn brute_force(variant: &[char], query: &[char], from: usize, prev: Option<usize>) -> Option<i64> {
    let Some((&q, rest)) = query.split_first() else {
        return Some(0);
    };
    (from..variant.len())
        .filter(|&j| variant[j].eq_ignore_ascii_case(&q))
        .filter_map(|j| {
            let mut score = MATCH_SCORE;
            if j == 0 {
                score += START_OF_STRING_BONUS;
            } else if variant[j - 1] == ' ' {
                score += START_OF_WORD_BONUS;
            }
            if prev.is_some_and(|p| p + 1 == j) {
                score += CONTIGUOUS_BONUS;
            }
            brute_force(variant, rest, j + 1, Some(j)).map(|s| s + score)
        })
        .max()
}

fn variant() -> impl Strategy<Value = String> {
    "[abAB :]{0,10}"
}

fn query() -> impl Strategy<Value = String> {
    "[abAB:]{0,4}"
}

proptest! {
    #[test]
    fn aligns_iff_subsequence(v in variant(), q in query()) {
        let matcher = PaletteMatcher::default();
        prop_assert_eq!(matcher.fuzzy_align(&v, &q).is_some(), is_subsequence(&v, &q));
        prop_assert_eq!(matcher.fuzzy_match(&v, &q).is_some(), is_subsequence(&v, &q));
    }

    #[test]
    fn aligned_chars_spell_the_query(v in variant(), q in query()) {
        let matcher = PaletteMatcher::default();
        if let Some(alignment) = matcher.fuzzy_align(&v, &q) {
            let chars: Vec<char> = v.chars().collect();
            let spelled: String = alignment.indices().iter().map(|&i| chars[i]).collect();
            prop_assert!(spelled.eq_ignore_ascii_case(&q), "{:?} spelled {:?} for {:?}", v, spelled, q);
            prop_assert!(alignment.steps().windows(2).all(|w| w[0].index < w[1].index && w[0].score < w[1].score));
        }
    }

    #[test]
    fn alignment_is_optimal(v in variant(), q in query()) {
        let matcher = PaletteMatcher::default();
        let chars: Vec<char> = v.chars().collect();
        let pattern: Vec<char> = q.chars().collect();
        let expected = brute_force(&chars, &pattern, 0, None);
        prop_assert_eq!(matcher.fuzzy_match(&v, &q), expected);
        prop_assert_eq!(matcher.fuzzy_align(&v, &q).map(|a| a.score()), expected);
    }
}
