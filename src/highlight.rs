//! Presentation helpers: which characters of a label to emphasize.
//!
//! The alignment computed for ranking also tells the renderer which characters spelled the
//! query. These helpers turn it into a per-character flag list or into runs of text.

use crate::fuzzy_matcher::FuzzyMatcher;
use crate::fuzzy_matcher::palette::PaletteMatcher;

/// Per-character highlight flags for `variant` against `query`.
///
/// Every character of `variant` appears once, in order, as `(char index, is matched)`. When
/// the query is empty or does not match, nothing is marked.
///
/// ```
/// use hcommander::highlight::highlight;
///
/// let marks: Vec<_> = highlight("tx", "x").into_iter().map(|(_, m)| m).collect();
/// assert_eq!(marks, [false, true]);
/// ```
pub fn highlight(variant: &str, query: &str) -> Vec<(usize, bool)> {
    highlight_with(&PaletteMatcher::default(), variant, query)
}

/// Same as [`highlight`] with an explicit matcher
pub fn highlight_with(matcher: &dyn FuzzyMatcher, variant: &str, query: &str) -> Vec<(usize, bool)> {
    let indices = matcher
        .fuzzy_indices(variant, query)
        .map(|(_, indices)| indices)
        .unwrap_or_default();
    mark(variant, &indices)
}

/// Flags each character of `text` whose index is in the sorted `indices`
pub fn mark(text: &str, indices: &[usize]) -> Vec<(usize, bool)> {
    let mut pending = indices.iter().peekable();
    text.chars()
        .enumerate()
        .map(|(i, _)| {
            let matched = pending.next_if(|&&idx| idx == i).is_some();
            (i, matched)
        })
        .collect()
}

/// A run of consecutive characters sharing the same highlight state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The text of the run
    pub text: String,
    /// Whether the run should be emphasized
    pub matched: bool,
}

/// Splits `text` into runs of matched and unmatched characters
pub fn segments(text: &str, indices: &[usize]) -> Vec<Segment> {
    let mut res: Vec<Segment> = Vec::new();
    for (ch, (_, matched)) in text.chars().zip(mark(text, indices)) {
        match res.last_mut() {
            Some(last) if last.matched == matched => last.text.push(ch),
            _ => res.push(Segment {
                text: ch.to_string(),
                matched,
            }),
        }
    }
    res
}

/// Wraps every matched character in brackets, e.g. `[V]olume [M]erge`
pub fn wrap_matches(line: &str, indices: &[usize]) -> String {
    let mut ret = String::new();
    for (ch, (_, matched)) in line.chars().zip(mark(line, indices)) {
        if matched {
            ret.push('[');
            ret.push(ch);
            ret.push(']');
        } else {
            ret.push(ch);
        }
    }
    ret
}
