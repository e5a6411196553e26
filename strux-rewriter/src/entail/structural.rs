//! Oracle that answers from term structure.

use super::arith::Linear;
use super::length::length_interval;
use super::{Entail, EntailmentOracle};
use num_bigint::BigInt;
use num_traits::Zero;
use std::cmp::Ordering;
use strux_core::{Op, Term, Word};

/// Default entailment oracle.
///
/// Stateless. Length questions use [`length_interval`]; arithmetic
/// questions flatten both sides into [`Linear`] forms and bound their
/// difference; containment is decided for constants, for syntactic
/// sub-concatenations and by length or character arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralOracle;

impl StructuralOracle {
    /// Create the oracle.
    pub fn new() -> Self {
        Self
    }

    fn geq_zero(diff: &Linear, assume: Option<(&super::Atom, &BigInt)>) -> Entail {
        let zero = BigInt::zero();
        let bounds = diff.interval(assume);
        if bounds.all_geq(&zero) {
            Entail::Yes
        } else if bounds.all_lt(&zero) {
            Entail::No
        } else {
            Entail::Unknown
        }
    }
}

/// Check whether `needle` occurs as a contiguous run of `haystack`.
pub(crate) fn is_sub_run(haystack: &[Term], needle: &[Term]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

impl EntailmentOracle for StructuralOracle {
    fn length_geq(&self, term: &Term, k: i64) -> Entail {
        let k = BigInt::from(k);
        let bounds = length_interval(term);
        if bounds.all_geq(&k) {
            Entail::Yes
        } else if bounds.all_lt(&k) {
            Entail::No
        } else {
            Entail::Unknown
        }
    }

    fn length_leq(&self, term: &Term, k: i64) -> Entail {
        self.length_geq(term, k.saturating_add(1)).negate()
    }

    fn is_constant(&self, term: &Term) -> Option<Word> {
        term.concat_components()
            .iter()
            .try_fold(Word::empty(), |acc, part| Some(acc.concat(part.as_word()?)))
    }

    fn contains(&self, haystack: &Term, needle: &Term) -> Entail {
        if needle.is_empty_string() || haystack == needle {
            return Entail::Yes;
        }
        let hay_word = self.is_constant(haystack);
        if let (Some(h), Some(n)) = (&hay_word, self.is_constant(needle)) {
            return Entail::from(h.contains(&n));
        }

        let hay_parts = haystack.concat_components();
        if is_sub_run(hay_parts, needle.concat_components()) {
            return Entail::Yes;
        }
        if let Some(n) = needle.as_word()
            && hay_parts
                .iter()
                .any(|part| part.as_word().is_some_and(|w| w.contains(n)))
        {
            return Entail::Yes;
        }
        if needle.op() == &Op::Substr && &needle.args()[0] == haystack {
            return Entail::Yes;
        }

        if let Some(h) = &hay_word
            && needle
                .concat_components()
                .iter()
                .any(|part| part.as_word().is_some_and(|w| !h.contains(w)))
        {
            return Entail::No;
        }
        let surplus = Linear::of_length(needle).minus(&Linear::of_length(haystack));
        if surplus.interval(None).compare(&BigInt::zero()) == Some(Ordering::Greater) {
            return Entail::No;
        }
        Entail::Unknown
    }

    fn equal_length(&self, a: &Term, b: &Term) -> Entail {
        let diff = Linear::of_length(a).minus(&Linear::of_length(b));
        match diff.interval(None).compare(&BigInt::zero()) {
            Some(Ordering::Equal) => Entail::Yes,
            Some(_) => Entail::No,
            None => Entail::Unknown,
        }
    }

    fn arith_geq(&self, lhs: &Term, rhs: &Term) -> Entail {
        Self::geq_zero(&Linear::of_int(lhs).minus(&Linear::of_int(rhs)), None)
    }

    fn arith_geq_assuming(&self, lhs: &Term, rhs: &Term, atom: &Term, lower: &BigInt) -> Entail {
        let diff = Linear::of_int(lhs).minus(&Linear::of_int(rhs));
        let assumed = Linear::of_int(atom);
        match assumed.as_offset_atom() {
            Some((a, offset)) => {
                let shifted = lower - offset;
                Self::geq_zero(&diff, Some((a, &shifted)))
            }
            None => self.arith_geq(lhs, rhs),
        }
    }
}
