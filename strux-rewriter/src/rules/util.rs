//! Pattern helpers shared by the rule families.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use smallvec::SmallVec;
use strux_core::{Op, Result, Term, Word};

/// Integer literal payload.
pub(super) fn int_lit(t: &Term) -> Option<&BigInt> {
    t.as_int()
}

/// Integer literal that fits a `usize` index; `None` for symbolic or
/// negative values and for values past any string length.
pub(super) fn index_lit(t: &Term) -> Option<usize> {
    t.as_int().and_then(ToPrimitive::to_usize)
}

/// Single-character string literal.
pub(super) fn char_lit(t: &Term) -> Option<u32> {
    t.as_word().and_then(Word::as_char)
}

/// Whether `t` is the integer literal `n`.
pub(super) fn is_int(t: &Term, n: i64) -> bool {
    t.as_int().is_some_and(|v| *v == BigInt::from(n))
}

/// `(str.len t)`.
pub(super) fn len(t: &Term) -> Result<Term> {
    Term::mk_len(t)
}

/// `t + k`.
pub(super) fn plus(t: &Term, k: i64) -> Result<Term> {
    Term::mk_add([t.clone(), Term::int(k)])
}

/// `(= t "")`.
pub(super) fn is_empty_eq(t: &Term) -> Result<Term> {
    Term::mk_eq(t, &Term::empty_string())
}

/// `(str.to_re "")`.
pub(super) fn re_epsilon() -> Result<Term> {
    Term::mk_to_re(&Term::empty_string())
}

/// Leading constant component of a string term and the remaining
/// components.
pub(super) fn split_leading_word(t: &Term) -> Option<(&Word, &[Term])> {
    let (first, rest) = t.concat_components().split_first()?;
    Some((first.as_word()?, rest))
}

/// Trailing constant component of a string term and the preceding
/// components.
pub(super) fn split_trailing_word(t: &Term) -> Option<(&[Term], &Word)> {
    let (last, rest) = t.concat_components().split_last()?;
    Some((rest, last.as_word()?))
}

/// Concatenation of `head`, then `parts`.
pub(super) fn cons(head: Term, parts: &[Term]) -> Result<Term> {
    Term::concat_of(std::iter::once(head).chain(parts.iter().cloned()))
}

/// Concatenation of `parts`, then `tail`.
pub(super) fn snoc(parts: &[Term], tail: Term) -> Result<Term> {
    Term::concat_of(parts.iter().cloned().chain(std::iter::once(tail)))
}

/// A string literal, or nothing for the empty word.
pub(super) fn non_empty_lit(word: Word) -> Option<Term> {
    (!word.is_empty()).then(|| Term::string(word))
}

/// The side opposite to an empty-string literal in an equality.
pub(super) fn other_than_empty<'t>(a: &'t Term, b: &'t Term) -> Option<&'t Term> {
    if a.is_empty_string() {
        Some(b)
    } else if b.is_empty_string() {
        Some(a)
    } else {
        None
    }
}

/// `re.all`, or `(re.* re.allchar)`.
pub(super) fn is_sigma_star(r: &Term) -> bool {
    match r.op() {
        Op::ReAll => true,
        Op::ReStar => r.args()[0].op() == &Op::ReAllChar,
        _ => false,
    }
}

/// Constant word of `(str.to_re c)`.
pub(super) fn to_re_word(r: &Term) -> Option<&Word> {
    match r.op() {
        Op::ToRe => r.args()[0].as_word(),
        _ => None,
    }
}

/// Haystack, pattern and replacement of a `str.replace` node.
pub(super) fn replace_args(t: &Term) -> Option<(&Term, &Term, &Term)> {
    let args = t.args();
    (t.op() == &Op::Replace).then(|| (&args[0], &args[1], &args[2]))
}

/// Flatten nested applications of `op` into one argument list.
pub(super) fn flatten(args: &[Term], op: &Op) -> (SmallVec<[Term; 4]>, bool) {
    let mut out = SmallVec::with_capacity(args.len());
    let mut changed = false;
    for arg in args {
        if arg.op() == op {
            out.extend(arg.args().iter().cloned());
            changed = true;
        } else {
            out.push(arg.clone());
        }
    }
    (out, changed)
}
