use std::fmt::{Debug, Formatter};

use crate::fuzzy_matcher::fold_case;

const DIGITS: u32 = 10;

/// Set of the case-folded characters `0-9` and `a-z` present in a string.
///
/// Other characters (punctuation, spaces, non-ASCII letters) set no bit, so the presence test
/// can only reject, never prove, a match: the ordered subsequence scan still has to run.
///
/// ```
/// use hcommander::fuzzy_matcher::presence::CharPresence;
///
/// let variant = CharPresence::from("Volume Merge");
/// assert!(variant.contains_all(CharPresence::from("vmerge")));
/// assert!(!variant.contains_all(CharPresence::from("vx")));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CharPresence(u64);

impl CharPresence {
    /// The summary of a string without any digit or letter
    pub const EMPTY: CharPresence = CharPresence(0);

    /// Bit assigned to a character after case folding, if any
    #[inline]
    fn bit(ch: char) -> Option<u64> {
        match fold_case(ch) {
            c @ '0'..='9' => Some(1 << (c as u32 - '0' as u32)),
            c @ 'a'..='z' => Some(1 << (DIGITS + c as u32 - 'a' as u32)),
            _ => None,
        }
    }

    /// Adds a character to the set, ignoring characters outside `0-9a-z`
    #[inline]
    pub fn insert(&mut self, ch: char) {
        if let Some(bit) = Self::bit(ch) {
            self.0 |= bit;
        }
    }

    /// True if the set holds the character (after case folding)
    pub fn contains(&self, ch: char) -> bool {
        Self::bit(ch).is_some_and(|bit| self.0 & bit != 0)
    }

    /// Presence subset test: every character in `other` is also in `self`
    #[inline]
    pub fn contains_all(&self, other: CharPresence) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no digit or letter was recorded
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The raw bitmask: bits 0-9 are digits, bits 10-35 are `a-z`
    pub fn bits(&self) -> u64 {
        self.0
    }
}

impl From<&str> for CharPresence {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl FromIterator<char> for CharPresence {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut presence = CharPresence::EMPTY;
        for ch in iter {
            presence.insert(ch);
        }
        presence
    }
}

impl Debug for CharPresence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chars: String = ('0'..='9').chain('a'..='z').filter(|&c| self.contains(c)).collect();
        write!(f, "CharPresence({chars:?})")
    }
}
