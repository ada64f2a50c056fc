//! The palette matcher: a scored longest-subsequence alignment.
//!
//! The choice must contain every pattern character, in order, after case folding. Among all
//! such alignments the matcher picks the one with the highest cumulative score, where every
//! matched character earns [`MATCH_SCORE`] plus:
//!
//! - [`START_OF_STRING_BONUS`] when it is the first character of the choice,
//! - [`START_OF_WORD_BONUS`] when it follows a space,
//! - [`CONTIGUOUS_BONUS`] when the previous pattern character matched right before it.
//!
//! Two tables are filled, fzy style:
//! - `matched[i][j]`: the best score with pattern char `i` matched exactly at choice char `j`,
//!   and whether that match extends a contiguous run.
//! - `best[i][j]`: the best score for pattern chars `0..=i` within choice chars `0..=j`, with a
//!   back-pointer to where pattern char `i` was matched.
//!
//! # Example:
//! ```
//! use hcommander::fuzzy_matcher::FuzzyMatcher;
//! use hcommander::fuzzy_matcher::palette::PaletteMatcher;
//!
//! let matcher = PaletteMatcher::default();
//!
//! assert_eq!(None, matcher.fuzzy_match("Translate", "xyz"));
//! let (score, indices) = matcher.fuzzy_indices("Volume Merge", "vmerge").unwrap();
//! assert_eq!(indices, [0, 7, 8, 9, 10, 11]);
//! assert_eq!(score, 15);
//! ```

use std::cell::RefCell;

use thread_local::ThreadLocal;

use crate::fuzzy_matcher::util::{fold_into, is_subsequence};
use crate::fuzzy_matcher::{AlignStep, Alignment, FuzzyMatcher, IndexType, ScoreType, eq_folded};

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

/// Points awarded for each matched character.
pub const MATCH_SCORE: ScoreType = 1;

/// Extra bonus when the match is at position 0 of the choice.
pub const START_OF_STRING_BONUS: ScoreType = 3;

/// Extra bonus when the match follows a space.
pub const START_OF_WORD_BONUS: ScoreType = 2;

/// Extra bonus when the match directly follows the previous matched character.
pub const CONTIGUOUS_BONUS: ScoreType = 1;

/// Score of a choice equal to the pattern, ignoring case.
pub const EXACT_MATCH_SCORE: ScoreType = ScoreType::MAX / 2;

/// Longest pattern, in chars, the matcher will align.
pub const DEFAULT_MAX_PATTERN_LEN: usize = 256;

/// Longest choice, in chars, the matcher will align.
pub const DEFAULT_MAX_CHOICE_LEN: usize = 1024;

/// Sentinel that won't overflow when added to.
const NEG_INF: ScoreType = ScoreType::MIN / 2;

const NO_POSITION: IndexType = IndexType::MAX;

// ---------------------------------------------------------------------------
// DP cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct MatchCell {
    score: ScoreType,
    contiguous: bool,
}

impl MatchCell {
    const NONE: MatchCell = MatchCell {
        score: NEG_INF,
        contiguous: false,
    };
}

#[derive(Debug, Clone, Copy)]
struct BestCell {
    score: ScoreType,
    at: IndexType,
}

impl BestCell {
    const NONE: BestCell = BestCell {
        score: NEG_INF,
        at: NO_POSITION,
    };
}

#[derive(Default)]
struct Buffers {
    pattern: Vec<char>,
    choice: Vec<char>,
    matched: Vec<MatchCell>,
    best: Vec<BestCell>,
}

/// Bonus earned by matching choice char `j`, on top of [`MATCH_SCORE`]
#[inline]
fn position_bonus(choice: &[char], j: usize) -> ScoreType {
    if j == 0 {
        START_OF_STRING_BONUS
    } else if choice[j - 1] == ' ' {
        START_OF_WORD_BONUS
    } else {
        0
    }
}

/// Fill one pattern row. `prev` holds the previous row, `None` for the first pattern char.
fn fill_row(
    pattern_ch: char,
    choice: &[char],
    prev: Option<(&[MatchCell], &[BestCell])>,
    matched: &mut [MatchCell],
    best: &mut [BestCell],
) {
    let mut running = BestCell::NONE;
    for j in 0..choice.len() {
        let cell = if choice[j] != pattern_ch {
            MatchCell::NONE
        } else {
            let gain = MATCH_SCORE + position_bonus(choice, j);
            match prev {
                None => MatchCell {
                    score: gain,
                    contiguous: false,
                },
                Some(_) if j == 0 => MatchCell::NONE,
                Some((prev_matched, prev_best)) => {
                    let gap = prev_best[j - 1].score;
                    let gap = if gap > NEG_INF { gap + gain } else { NEG_INF };
                    let run = prev_matched[j - 1].score;
                    let run = if run > NEG_INF {
                        run + gain + CONTIGUOUS_BONUS
                    } else {
                        NEG_INF
                    };
                    if run > gap {
                        MatchCell {
                            score: run,
                            contiguous: true,
                        }
                    } else {
                        MatchCell {
                            score: gap,
                            contiguous: false,
                        }
                    }
                }
            }
        };
        matched[j] = cell;
        // strict comparison: on ties the earliest position wins
        if cell.score > running.score {
            running = BestCell {
                score: cell.score,
                at: j,
            };
        }
        best[j] = running;
    }
}

/// Full alignment with traceback. `pattern` and `choice` are folded, non-empty, and
/// `pattern` is a subsequence of `choice`.
fn align(
    pattern: &[char],
    choice: &[char],
    matched: &mut Vec<MatchCell>,
    best: &mut Vec<BestCell>,
) -> Option<Alignment> {
    let n = pattern.len();
    let m = choice.len();

    matched.clear();
    matched.resize(n * m, MatchCell::NONE);
    best.clear();
    best.resize(n * m, BestCell::NONE);

    for i in 0..n {
        let (prev_matched, cur_matched) = matched.split_at_mut(i * m);
        let (prev_best, cur_best) = best.split_at_mut(i * m);
        let prev = if i == 0 {
            None
        } else {
            Some((&prev_matched[(i - 1) * m..], &prev_best[(i - 1) * m..]))
        };
        fill_row(pattern[i], choice, prev, &mut cur_matched[..m], &mut cur_best[..m]);
    }

    let last = best[(n - 1) * m + m - 1];
    if last.at == NO_POSITION {
        return None;
    }

    // Walk the back-pointers from the last pattern char
    let mut steps = vec![AlignStep::default(); n];
    let mut j = last.at;
    for i in (0..n).rev() {
        let cell = matched[i * m + j];
        steps[i] = AlignStep {
            index: j,
            score: cell.score,
        };
        if i > 0 {
            j = if cell.contiguous {
                j - 1
            } else {
                best[(i - 1) * m + j - 1].at
            };
        }
    }

    Some(Alignment::new(steps))
}

/// Score-only pass keeping two rows.
fn score_only(
    pattern: &[char],
    choice: &[char],
    matched: &mut Vec<MatchCell>,
    best: &mut Vec<BestCell>,
) -> Option<ScoreType> {
    let m = choice.len();

    matched.clear();
    matched.resize(2 * m, MatchCell::NONE);
    best.clear();
    best.resize(2 * m, BestCell::NONE);

    for (i, &ch) in pattern.iter().enumerate() {
        let (row_a, row_b) = matched.split_at_mut(m);
        let (best_a, best_b) = best.split_at_mut(m);
        // even rows are written to the first half, odd rows to the second
        let (prev, cur_matched, cur_best) = match (i, i % 2) {
            (0, _) => (None, row_a, best_a),
            (_, 0) => (Some((&*row_b, &*best_b)), row_a, best_a),
            _ => (Some((&*row_a, &*best_a)), row_b, best_b),
        };
        fill_row(ch, choice, prev, cur_matched, cur_best);
    }

    let offset = if pattern.len() % 2 == 1 { 0 } else { m };
    let last = best[offset + m - 1];
    (last.at != NO_POSITION).then_some(last.score)
}

// ---------------------------------------------------------------------------
// Public matcher struct
// ---------------------------------------------------------------------------

/// Case-insensitive scored-subsequence matcher used by the palette.
///
/// Patterns and choices longer than the configured limits never match, which bounds the
/// `O(pattern × choice)` table.
pub struct PaletteMatcher {
    max_pattern_len: usize,
    max_choice_len: usize,
    buffers: ThreadLocal<RefCell<Buffers>>,
}

impl Default for PaletteMatcher {
    fn default() -> Self {
        Self {
            max_pattern_len: DEFAULT_MAX_PATTERN_LEN,
            max_choice_len: DEFAULT_MAX_CHOICE_LEN,
            buffers: ThreadLocal::new(),
        }
    }
}

impl std::fmt::Debug for PaletteMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteMatcher")
            .field("max_pattern_len", &self.max_pattern_len)
            .field("max_choice_len", &self.max_choice_len)
            .finish()
    }
}

impl PaletteMatcher {
    /// Sets the longest pattern, in chars, that can match
    pub fn max_pattern_len(mut self, len: usize) -> Self {
        self.max_pattern_len = len;
        self
    }

    /// Sets the longest choice, in chars, that can match
    pub fn max_choice_len(mut self, len: usize) -> Self {
        self.max_choice_len = len;
        self
    }

    /// Score of one name variant: [`EXACT_MATCH_SCORE`] if it equals the pattern ignoring
    /// case, the alignment score otherwise.
    pub fn variant_score(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        if !pattern.is_empty() && eq_folded(choice, pattern) {
            if pattern.chars().count() > self.max_pattern_len {
                return None;
            }
            return Some(EXACT_MATCH_SCORE);
        }
        self.fuzzy_match(choice, pattern)
    }

    /// Folds both strings into the thread's buffers and runs `f` when a match is possible
    fn with_folded<T>(
        &self,
        choice: &str,
        pattern: &str,
        f: impl FnOnce(&[char], &[char], &mut Vec<MatchCell>, &mut Vec<BestCell>) -> Option<T>,
    ) -> Option<T> {
        let mut buffers = self.buffers.get_or(|| RefCell::new(Buffers::default())).borrow_mut();
        let Buffers {
            pattern: pat_buf,
            choice: cho_buf,
            matched,
            best,
        } = &mut *buffers;

        fold_into(pattern, pat_buf);
        if pat_buf.len() > self.max_pattern_len {
            trace!("pattern of {} chars exceeds limit {}", pat_buf.len(), self.max_pattern_len);
            return None;
        }
        fold_into(choice, cho_buf);
        if cho_buf.len() > self.max_choice_len {
            trace!("choice of {} chars exceeds limit {}", cho_buf.len(), self.max_choice_len);
            return None;
        }
        if pat_buf.len() > cho_buf.len() || !is_subsequence(pat_buf, cho_buf.iter().copied()) {
            return None;
        }

        f(pat_buf.as_slice(), cho_buf.as_slice(), matched, best)
    }
}

impl FuzzyMatcher for PaletteMatcher {
    fn fuzzy_align(&self, choice: &str, pattern: &str) -> Option<Alignment> {
        if pattern.is_empty() {
            return Some(Alignment::default());
        }
        self.with_folded(choice, pattern, align)
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        if pattern.is_empty() {
            return Some(0);
        }
        self.with_folded(choice, pattern, score_only)
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions
// ---------------------------------------------------------------------------

/// Align `pattern` against `choice` with the default limits
pub fn fuzzy_align(choice: &str, pattern: &str) -> Option<Alignment> {
    PaletteMatcher::default().fuzzy_align(choice, pattern)
}

/// Score `pattern` against `choice` with the default limits
pub fn fuzzy_match(choice: &str, pattern: &str) -> Option<ScoreType> {
    PaletteMatcher::default().fuzzy_match(choice, pattern)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
