//! String literals.
//!
//! A [`Word`] is a finite sequence of code points, the value domain of the
//! SMT-LIB `String` sort. All operations follow the SMT-LIB theory of Unicode
//! strings; character case conversion only touches ASCII letters.

use crate::error::{Result, TermError};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest code point of the SMT-LIB string alphabet.
pub const MAX_CODE_POINT: u32 = 0x2FFFF;

/// A string literal.
///
/// Every code point is at most [`MAX_CODE_POINT`]; all constructors from
/// outside data check this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Word(Vec<u32>);

impl Word {
    /// The empty word.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a word from raw code points, checking each against the alphabet.
    pub fn from_code_points(points: impl IntoIterator<Item = u32>) -> Result<Self> {
        let points: Vec<u32> = points.into_iter().collect();
        if let Some(&bad) = points.iter().find(|&&c| c > MAX_CODE_POINT) {
            return Err(TermError::InvalidCodePoint(bad));
        }
        Ok(Self(points))
    }

    /// Single-character word.
    pub fn from_char_code(code: u32) -> Result<Self> {
        Self::from_code_points([code])
    }

    /// Decimal numeral of `n`, without leading zeros.
    pub fn decimal(n: &BigUint) -> Self {
        Self(n.to_string().bytes().map(u32::from).collect())
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for the empty word.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The code points of this word.
    pub fn code_points(&self) -> &[u32] {
        &self.0
    }

    /// The only character of a length-one word.
    pub fn as_char(&self) -> Option<u32> {
        match self.0.as_slice() {
            [c] => Some(*c),
            _ => None,
        }
    }

    /// First position `>= from` where `needle` occurs.
    pub fn find(&self, needle: &Word, from: usize) -> Option<usize> {
        if from > self.len() {
            return None;
        }
        if needle.is_empty() {
            return Some(from);
        }
        if needle.len() > self.len() {
            return None;
        }
        (from..=self.len() - needle.len()).find(|&i| self.0[i..i + needle.len()] == needle.0[..])
    }

    /// Check whether `needle` occurs anywhere in this word.
    pub fn contains(&self, needle: &Word) -> bool {
        self.find(needle, 0).is_some()
    }

    /// Characters in `[start, end)`, clamped to the word.
    pub fn slice(&self, start: usize, end: usize) -> Word {
        let end = end.min(self.len());
        if start >= end {
            return Word::empty();
        }
        Word(self.0[start..end].to_vec())
    }

    /// Suffix starting at `start`.
    pub fn suffix_from(&self, start: usize) -> Word {
        self.slice(start, self.len())
    }

    /// Concatenation of two words.
    pub fn concat(&self, other: &Word) -> Word {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.0);
        points.extend_from_slice(&other.0);
        Word(points)
    }

    /// Check whether `prefix` is a prefix of this word.
    pub fn starts_with(&self, prefix: &Word) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Check whether `suffix` is a suffix of this word.
    pub fn ends_with(&self, suffix: &Word) -> bool {
        self.0.ends_with(&suffix.0)
    }

    /// Length of the longest common prefix.
    pub fn common_prefix_len(&self, other: &Word) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Length of the longest common suffix.
    pub fn common_suffix_len(&self, other: &Word) -> usize {
        self.0
            .iter()
            .rev()
            .zip(other.0.iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Check whether the word is a non-empty sequence of decimal digits.
    pub fn is_digits(&self) -> bool {
        !self.is_empty() && self.0.iter().all(|&c| is_digit(c))
    }

    /// Check whether some character of `other` also occurs in this word.
    pub fn shares_char_with(&self, other: &Word) -> bool {
        other.0.iter().any(|c| self.0.contains(c))
    }

    /// Check whether `c` occurs in this word.
    pub fn has_char(&self, c: u32) -> bool {
        self.0.contains(&c)
    }

    /// Number of occurrences of `c`.
    pub fn count_char(&self, c: u32) -> usize {
        self.0.iter().filter(|&&x| x == c).count()
    }

    /// The repeated character of a non-empty word made of one character.
    pub fn homogeneous_char(&self) -> Option<u32> {
        let first = *self.0.first()?;
        self.0.iter().all(|&c| c == first).then_some(first)
    }

    /// Shortest word `r` such that this word is `r` repeated.
    pub fn primitive_root(&self) -> Word {
        let n = self.len();
        for p in 1..n {
            if n % p == 0 && (p..n).all(|i| self.0[i] == self.0[i - p]) {
                return self.slice(0, p);
            }
        }
        self.clone()
    }

    /// ASCII lower-case conversion (`str.to_lower`).
    pub fn to_lower(&self) -> Word {
        Word(
            self.0
                .iter()
                .map(|&c| if (0x41..=0x5A).contains(&c) { c + 32 } else { c })
                .collect(),
        )
    }

    /// ASCII upper-case conversion (`str.to_upper`).
    pub fn to_upper(&self) -> Word {
        Word(
            self.0
                .iter()
                .map(|&c| if (0x61..=0x7A).contains(&c) { c - 32 } else { c })
                .collect(),
        )
    }

    /// Reversed word (`str.rev`).
    pub fn reversed(&self) -> Word {
        Word(self.0.iter().rev().copied().collect())
    }

    /// Replace the first occurrence of `pattern` (`str.replace`).
    pub fn replace_first(&self, pattern: &Word, replacement: &Word) -> Word {
        match self.find(pattern, 0) {
            Some(pos) => self
                .slice(0, pos)
                .concat(replacement)
                .concat(&self.suffix_from(pos + pattern.len())),
            None => self.clone(),
        }
    }

    /// Replace every non-overlapping occurrence, left to right
    /// (`str.replace_all`). An empty pattern leaves the word unchanged.
    pub fn replace_all(&self, pattern: &Word, replacement: &Word) -> Word {
        if pattern.is_empty() {
            return self.clone();
        }
        let mut out = Vec::with_capacity(self.len());
        let mut pos = 0;
        while let Some(hit) = self.find(pattern, pos) {
            out.extend_from_slice(&self.0[pos..hit]);
            out.extend_from_slice(&replacement.0);
            pos = hit + pattern.len();
        }
        out.extend_from_slice(&self.0[pos..]);
        Word(out)
    }
}

/// Check whether a code point is an ASCII decimal digit.
pub fn is_digit(c: u32) -> bool {
    (0x30..=0x39).contains(&c)
}

impl TryFrom<&str> for Word {
    type Error = TermError;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_code_points(s.chars().map(u32::from))
    }
}

impl TryFrom<String> for Word {
    type Error = TermError;

    fn try_from(s: String) -> Result<Self> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<Vec<u32>> for Word {
    type Error = TermError;

    fn try_from(points: Vec<u32>) -> Result<Self> {
        Self::from_code_points(points)
    }
}

impl From<Word> for Vec<u32> {
    fn from(w: Word) -> Self {
        w.0
    }
}

impl FromStr for Word {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl fmt::Display for Word {
    /// Prints the word as an SMT-LIB string literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for &c in &self.0 {
            match c {
                0x22 => f.write_str("\"\"")?,
                0x5C => f.write_str("\\u{5c}")?,
                0x20..=0x7E => {
                    if let Some(ch) = char::from_u32(c) {
                        write!(f, "{ch}")?;
                    }
                }
                _ => write!(f, "\\u{{{c:x}}}")?,
            }
        }
        f.write_str("\"")
    }
}
