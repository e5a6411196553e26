//! Entailment queries used by rule guards.
//!
//! Rules ask bounded semantic questions ("is this string at least 2 long?",
//! "can `x` contain `y`?") through the [`EntailmentOracle`] trait. An answer
//! of [`Entail::Unknown`] never enables a rule. The oracle is a pure query
//! service: the rewriter only reads from it, and an implementation shared
//! between threads must be reentrant.
//!
//! [`StructuralOracle`] answers from the shape of the terms alone, using
//! length intervals and linear arithmetic over length atoms.

mod arith;
mod interval;
mod length;
mod structural;

pub use arith::{Atom, Linear, int_interval};
pub use interval::Interval;
pub use length::length_interval;
pub use structural::StructuralOracle;
pub(crate) use structural::is_sub_run;

use num_bigint::BigInt;
use strux_core::{Term, Word};

/// Three-valued answer to an entailment query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entail {
    /// The fact holds in every model
    Yes,
    /// The fact fails in every model
    No,
    /// Not decided
    Unknown,
}

impl Entail {
    /// Check for [`Entail::Yes`].
    pub fn is_yes(self) -> bool {
        self == Entail::Yes
    }

    /// Check for [`Entail::No`].
    pub fn is_no(self) -> bool {
        self == Entail::No
    }

    /// Answer for the negated fact.
    pub fn negate(self) -> Entail {
        match self {
            Entail::Yes => Entail::No,
            Entail::No => Entail::Yes,
            Entail::Unknown => Entail::Unknown,
        }
    }
}

impl From<bool> for Entail {
    fn from(b: bool) -> Self {
        if b { Entail::Yes } else { Entail::No }
    }
}

/// Query service for rule guards.
pub trait EntailmentOracle: Send + Sync {
    /// Is `str.len(term) >= k`?
    fn length_geq(&self, term: &Term, k: i64) -> Entail;

    /// Is `str.len(term) <= k`?
    fn length_leq(&self, term: &Term, k: i64) -> Entail;

    /// The value of `term` if it is a constant string.
    fn is_constant(&self, term: &Term) -> Option<Word>;

    /// Does `haystack` contain `needle` (semantically)?
    fn contains(&self, haystack: &Term, needle: &Term) -> Entail;

    /// Do `a` and `b` have the same length?
    fn equal_length(&self, a: &Term, b: &Term) -> Entail;

    /// Is `lhs >= rhs` for integer terms?
    fn arith_geq(&self, lhs: &Term, rhs: &Term) -> Entail;

    /// Is `lhs >= rhs` assuming `atom >= lower`?
    ///
    /// The default ignores the assumption, which can only lose answers.
    fn arith_geq_assuming(&self, lhs: &Term, rhs: &Term, atom: &Term, lower: &BigInt) -> Entail {
        let _ = (atom, lower);
        self.arith_geq(lhs, rhs)
    }
}
