use crate::fuzzy_matcher::fold_case;

/// Quick subsequence check on already folded pattern chars.
///
/// Every pattern character is matched literally, punctuation included.
pub fn is_subsequence<I>(pattern: &[char], choice: I) -> bool
where
    I: IntoIterator<Item = char>,
{
    if pattern.is_empty() {
        return true;
    }
    let mut pi = 0;
    for c in choice {
        if fold_case(c) == pattern[pi] {
            pi += 1;
            if pi == pattern.len() {
                return true;
            }
        }
    }
    false
}

/// Folds every character of `s` into `buf`, clearing it first
pub fn fold_into(s: &str, buf: &mut Vec<char>) {
    buf.clear();
    buf.extend(s.chars().map(fold_case));
}

#[cfg(test)]
pub fn assert_order(matcher: &dyn crate::fuzzy_matcher::FuzzyMatcher, pattern: &str, choices: &[&'static str]) {
    let result = filter_and_sort(matcher, pattern, choices);

    if result != choices {
        // debug print
        println!("pattern: {pattern}");
        for &choice in choices.iter() {
            if let Some((score, indices)) = matcher.fuzzy_indices(choice, pattern) {
                println!("{}: {:?}", score, crate::highlight::wrap_matches(choice, &indices));
            } else {
                println!("NO MATCH for {choice}");
            }
        }
    }

    assert_eq!(result, choices);
}

#[cfg(test)]
pub fn filter_and_sort(
    matcher: &dyn crate::fuzzy_matcher::FuzzyMatcher,
    pattern: &str,
    lines: &[&'static str],
) -> Vec<&'static str> {
    let mut lines_with_score: Vec<(i64, &'static str)> = lines
        .iter()
        .filter_map(|&s| matcher.fuzzy_match(s, pattern).map(|score| (score, s)))
        .collect();
    lines_with_score.sort_by_key(|(score, _)| -score);
    lines_with_score.into_iter().map(|(_, string)| string).collect()
}
