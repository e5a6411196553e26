//! `str.substr s i n`.
//!
//! The result is `""` when `i < 0`, `i >= |s|` or `n <= 0`, and otherwise
//! the characters of `s` from `i` up to `min(i + n, |s|)`.

use super::util::{char_lit, index_lit, int_lit, is_int, len};
use super::{Rule, RuleContext, RuleResult};
use crate::eval;
use crate::rewrites::RewriteId;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use strux_core::{Op, Term};

pub(super) static SUBSTR_RULES: &[Rule] = &[
    Rule::size(RewriteId::SsEmptystr, ss_emptystr),
    Rule::size(RewriteId::SsConstStartMaxOob, ss_const_start_max_oob),
    Rule::size(RewriteId::SsConstStartNeg, ss_const_start_neg),
    Rule::size(RewriteId::SsConstStartOob, ss_const_start_oob),
    Rule::size(RewriteId::SsConstLenNonPos, ss_const_len_non_pos),
    Rule::size(RewriteId::SsConstLenMaxOob, ss_const_len_max_oob),
    Rule::size(RewriteId::SsConstEndOob, ss_const_end_oob),
    Rule::size(RewriteId::SsConstSs, ss_const_ss),
    Rule::size(RewriteId::SsStartNeg, ss_start_neg),
    Rule::size(RewriteId::SsLenNonPos, ss_len_non_pos),
    Rule::size(RewriteId::SsStartEntailsZeroLen, ss_start_entails_zero_len),
    Rule::size(RewriteId::SsGeqZeroStartEntailsEmpS, ss_empty_string_arg),
    Rule::size(RewriteId::SsStartGeqLen, ss_start_geq_len),
    Rule::size(RewriteId::SsNonZeroLenEntailsOob, ss_non_zero_len_entails_oob),
    Rule::size(RewriteId::SsLenOneZZ, ss_len_one_z_z),
    Rule::size(RewriteId::SsLenInclude, ss_len_include),
    Rule::size(RewriteId::SsCombine, ss_combine),
    Rule::size(RewriteId::SsStripStartPt, ss_strip_start_pt),
    Rule::size(RewriteId::SsStripEndPt, ss_strip_end_pt),
    Rule::lex(
        RewriteId::SsEndPtNorm,
        "window lengths become str.len of a string no rule rewrites",
        ss_end_pt_norm,
    ),
    Rule::lex(
        RewriteId::SubstrReplSwap,
        "str.substr moves below str.replace",
        substr_repl_swap,
    ),
];

fn parts(t: &Term) -> (&Term, &Term, &Term) {
    let args = t.args();
    (&args[0], &args[1], &args[2])
}

fn empty() -> RuleResult {
    Ok(Some(Term::empty_string()))
}

/// `(str.substr "" i n)` → `""`.
fn ss_emptystr(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if parts(t).0.is_empty_string() {
        return empty();
    }
    Ok(None)
}

/// Constant string, start past any representable index.
fn ss_const_start_max_oob(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, _) = parts(t);
    match (s.as_word(), int_lit(i)) {
        (Some(_), Some(i)) if i.is_positive() && i.to_usize().is_none() => empty(),
        _ => Ok(None),
    }
}

/// Constant string, negative constant start.
fn ss_const_start_neg(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, _) = parts(t);
    match (s.as_word(), int_lit(i)) {
        (Some(_), Some(i)) if i.is_negative() => empty(),
        _ => Ok(None),
    }
}

/// Constant string, constant start at or past its end.
fn ss_const_start_oob(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, _) = parts(t);
    match (s.as_word(), index_lit(i)) {
        (Some(w), Some(i)) if i >= w.len() => empty(),
        _ => Ok(None),
    }
}

/// Constant string, constant non-positive length.
fn ss_const_len_non_pos(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, _, n) = parts(t);
    match (s.as_word(), int_lit(n)) {
        (Some(_), Some(n)) if !n.is_positive() => empty(),
        _ => Ok(None),
    }
}

/// Constant string and start, length past any representable index: the
/// suffix from the start.
fn ss_const_len_max_oob(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    match (s.as_word(), index_lit(i), int_lit(n)) {
        (Some(w), Some(i), Some(n)) if n.to_usize().is_none() => {
            Ok(Some(Term::string(w.suffix_from(i))))
        }
        _ => Ok(None),
    }
}

/// Constant string and start, window reaching the end: the suffix.
fn ss_const_end_oob(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    match (s.as_word(), index_lit(i), index_lit(n)) {
        (Some(w), Some(i), Some(n)) if i.saturating_add(n) >= w.len() => {
            Ok(Some(Term::string(w.suffix_from(i))))
        }
        _ => Ok(None),
    }
}

/// All three arguments constant.
fn ss_const_ss(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    match (s.as_word(), int_lit(i), int_lit(n)) {
        (Some(w), Some(i), Some(n)) => Ok(Some(Term::string(eval::substr(w, i, n)))),
        _ => Ok(None),
    }
}

/// Negative constant start.
fn ss_start_neg(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if int_lit(parts(t).1).is_some_and(Signed::is_negative) {
        return empty();
    }
    Ok(None)
}

/// Non-positive constant length.
fn ss_len_non_pos(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if int_lit(parts(t).2).is_some_and(|n| !n.is_positive()) {
        return empty();
    }
    Ok(None)
}

/// `0 >= n` is entailed.
fn ss_start_entails_zero_len(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.oracle.arith_geq(&Term::int(0), parts(t).2).is_yes() {
        return empty();
    }
    Ok(None)
}

/// The string argument is entailed to be empty.
fn ss_empty_string_arg(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.oracle.length_geq(parts(t).0, 1).is_no() {
        return empty();
    }
    Ok(None)
}

/// `i >= |s|` is entailed.
fn ss_start_geq_len(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, _) = parts(t);
    if ctx.oracle.arith_geq(i, &len(s)?).is_yes() {
        return empty();
    }
    Ok(None)
}

/// `i >= |s|` is entailed once `n >= 1` is assumed; for `n <= 0` the
/// result is empty anyway.
fn ss_non_zero_len_entails_oob(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    if ctx
        .oracle
        .arith_geq_assuming(i, &len(s)?, n, &BigInt::one())
        .is_yes()
    {
        return empty();
    }
    Ok(None)
}

/// `(str.substr s 0 n)` with `n >= 1` and `|s| <= 1` → `s`.
fn ss_len_one_z_z(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    let window_positive = int_lit(n).is_some_and(Signed::is_positive);
    if is_int(i, 0) && window_positive && ctx.oracle.length_leq(s, 1).is_yes() {
        return Ok(Some(s.clone()));
    }
    Ok(None)
}

/// `(str.substr s 0 n)` with `n >= |s|` entailed → `s`.
fn ss_len_include(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    if is_int(i, 0) && ctx.oracle.arith_geq(n, &len(s)?).is_yes() {
        return Ok(Some(s.clone()));
    }
    Ok(None)
}

/// Nested windows with constant bounds collapse into one window.
fn ss_combine(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (inner, i2, n2) = parts(t);
    if inner.op() != &Op::Substr {
        return Ok(None);
    }
    let (x, i1, n1) = parts(inner);
    let (Some(i1), Some(n1), Some(i2), Some(n2)) = (int_lit(i1), int_lit(n1), int_lit(i2), int_lit(n2))
    else {
        return Ok(None);
    };
    if i1.is_negative() || !n1.is_positive() || i2.is_negative() || !n2.is_positive() {
        return Ok(None);
    }
    if i2 >= n1 {
        return empty();
    }
    let start = i1 + i2;
    let window = (n1 - i2).min(n2.clone());
    Term::mk_substr(x, &Term::int(start), &Term::int(window)).map(Some)
}

/// Drop leading constant components that lie entirely before a constant
/// start.
fn ss_strip_start_pt(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    let Some(mut start) = int_lit(i).filter(|i| !i.is_negative()).cloned() else {
        return Ok(None);
    };
    let components = s.concat_components();
    let mut dropped = 0;
    for part in components {
        match part.as_word() {
            Some(w) if BigInt::from(w.len()) <= start => {
                start -= w.len();
                dropped += 1;
            }
            _ => break,
        }
    }
    if dropped == 0 {
        return Ok(None);
    }
    let rest = Term::concat_of(components[dropped..].iter().cloned())?;
    Term::mk_substr(&rest, &Term::int(start), n).map(Some)
}

/// Keep only the shortest prefix of components whose length covers the
/// constant window.
fn ss_strip_end_pt(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    let components = s.concat_components();
    let (Some(i), Some(n)) = (int_lit(i), int_lit(n)) else {
        return Ok(None);
    };
    if components.len() < 2 || i.is_negative() || !n.is_positive() {
        return Ok(None);
    }
    let Some(end) = (i + n).to_i64() else {
        return Ok(None);
    };
    for cut in 1..components.len() {
        let prefix = Term::concat_of(components[..cut].iter().cloned())?;
        if ctx.oracle.length_geq(&prefix, end).is_yes() {
            return Term::mk_substr(&prefix, parts(t).1, parts(t).2).map(Some);
        }
    }
    Ok(None)
}

/// A window entailed to reach the end of a string that no rule rewrites
/// under `str.len` is replaced by that length.
fn ss_end_pt_norm(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, i, n) = parts(t);
    if s.op() == &Op::Concat || s.is_literal() || is_int(i, 0) {
        return Ok(None);
    }
    let length = len(s)?;
    if n == &length || int_lit(n).is_some_and(Zero::is_zero) {
        return Ok(None);
    }
    if ctx.oracle.arith_geq(n, &length).is_yes() {
        return Term::mk_substr(s, i, &length).map(Some);
    }
    Ok(None)
}

/// `(str.substr (str.replace x c d) 0 n)` with single characters `c` and
/// `d` → `(str.replace (str.substr x 0 n) c d)`.
fn substr_repl_swap(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (inner, i, n) = parts(t);
    if inner.op() != &Op::Replace || !is_int(i, 0) {
        return Ok(None);
    }
    let (x, from, to) = parts(inner);
    if char_lit(from).is_none() || char_lit(to).is_none() {
        return Ok(None);
    }
    let prefix = Term::mk_substr(x, i, n)?;
    Term::mk_replace(&prefix, from, to).map(Some)
}

#[cfg(test)]
mod tests {
    use super::super::util::fixtures::*;
    use super::*;

    fn sub(s: &Term, i: &Term, n: &Term) -> Term {
        Term::mk_substr(s, i, n).unwrap()
    }

    #[test]
    fn test_constant_windows() {
        let abc = lit("abc");
        assert_eq!(fire(ss_const_start_neg, &sub(&abc, &int(-1), &int(3))), Some(lit("")));
        assert_eq!(fire(ss_const_start_oob, &sub(&abc, &int(3), &int(1))), Some(lit("")));
        assert_eq!(fire(ss_const_len_non_pos, &sub(&abc, &int(0), &int(0))), Some(lit("")));
        assert_eq!(fire(ss_const_end_oob, &sub(&abc, &int(1), &int(5))), Some(lit("bc")));
        assert_eq!(fire(ss_const_ss, &sub(&abc, &int(1), &int(1))), Some(lit("b")));
        let huge = Term::int(BigInt::from(u64::MAX) * 4);
        assert_eq!(fire(ss_const_start_max_oob, &sub(&abc, &huge, &int(1))), Some(lit("")));
        assert_eq!(fire(ss_const_len_max_oob, &sub(&abc, &int(2), &huge)), Some(lit("c")));
    }

    #[test]
    fn test_symbolic_out_of_bounds() {
        let x = s("x");
        assert_eq!(fire(ss_start_neg, &sub(&x, &int(-2), &n("k"))), Some(lit("")));
        assert_eq!(fire(ss_len_non_pos, &sub(&x, &n("k"), &int(0))), Some(lit("")));
        let len_x = Term::mk_len(&x).unwrap();
        assert_eq!(fire(ss_start_geq_len, &sub(&x, &len_x, &n("k"))), Some(lit("")));
        let neg_window = Term::mk_sub(&int(0), &len_x).unwrap();
        assert_eq!(
            fire(ss_start_entails_zero_len, &sub(&x, &n("i"), &neg_window)),
            Some(lit(""))
        );
        let short = sub(&x, &int(0), &int(0));
        assert_eq!(fire(ss_empty_string_arg, &sub(&short, &n("i"), &n("k"))), Some(lit("")));
    }

    #[test]
    fn test_assumed_window() {
        let x = s("x");
        let k = n("k");
        let len_x = Term::mk_len(&x).unwrap();
        let start = Term::mk_sub(&Term::mk_add([len_x, int(1)]).unwrap(), &k).unwrap();
        let t = sub(&x, &start, &k);
        assert_eq!(fire(ss_start_geq_len, &t), None);
        assert_eq!(fire(ss_non_zero_len_entails_oob, &t), None);
        // |x| + k is past the end only when k >= 1.
        let start = Term::mk_add([Term::mk_len(&x).unwrap(), k.clone()]).unwrap();
        assert_eq!(fire(ss_non_zero_len_entails_oob, &sub(&x, &start, &k)), Some(lit("")));
    }

    #[test]
    fn test_whole_string_windows() {
        let x = s("x");
        let c = Term::mk_from_code(&n("c")).unwrap();
        assert_eq!(fire(ss_len_one_z_z, &sub(&c, &int(0), &int(4))), Some(c.clone()));
        let len_x = Term::mk_len(&x).unwrap();
        assert_eq!(fire(ss_len_include, &sub(&x, &int(0), &len_x)), Some(x.clone()));
        assert_eq!(fire(ss_len_include, &sub(&x, &int(0), &int(5))), None);
    }

    #[test]
    fn test_combine() {
        let x = s("x");
        let inner = sub(&x, &int(1), &int(5));
        assert_eq!(
            fire(ss_combine, &sub(&inner, &int(2), &int(10))),
            Some(sub(&x, &int(3), &int(3)))
        );
        assert_eq!(fire(ss_combine, &sub(&inner, &int(5), &int(1))), Some(lit("")));
    }

    #[test]
    fn test_strip_endpoints() {
        let x = s("x");
        let y = s("y");
        let t = sub(&cat(&[lit("ab"), x.clone()]), &int(3), &n("k"));
        assert_eq!(fire(ss_strip_start_pt, &t), Some(sub(&x, &int(1), &n("k"))));

        let t = sub(&cat(&[x.clone(), lit("abc"), y.clone()]), &int(0), &int(2));
        let covering = cat(&[x.clone(), lit("abc")]);
        assert_eq!(fire(ss_strip_end_pt, &t), Some(sub(&covering, &int(0), &int(2))));
        let t = sub(&cat(&[x.clone(), y.clone()]), &int(0), &int(2));
        assert_eq!(fire(ss_strip_end_pt, &t), None);
        let t = sub(&cat(&[lit("abc"), x.clone(), y.clone()]), &int(1), &int(2));
        assert_eq!(fire(ss_strip_end_pt, &t), Some(sub(&lit("abc"), &int(1), &int(2))));
    }

    #[test]
    fn test_end_point_normalised() {
        let x = s("x");
        let len_x = Term::mk_len(&x).unwrap();
        let long = Term::mk_add([len_x.clone(), int(5)]).unwrap();
        let t = sub(&x, &n("i"), &long);
        assert_eq!(fire(ss_end_pt_norm, &t), Some(sub(&x, &n("i"), &len_x)));
        assert_eq!(fire(ss_end_pt_norm, &sub(&x, &n("i"), &len_x)), None);
    }

    #[test]
    fn test_swap_with_replace() {
        let x = s("x");
        let r = Term::mk_replace(&x, &lit("a"), &lit("b")).unwrap();
        let expected = Term::mk_replace(&sub(&x, &int(0), &int(2)), &lit("a"), &lit("b")).unwrap();
        assert_eq!(fire(substr_repl_swap, &sub(&r, &int(0), &int(2))), Some(expected));
        let wide = Term::mk_replace(&x, &lit("ab"), &lit("b")).unwrap();
        assert_eq!(fire(substr_repl_swap, &sub(&wide, &int(0), &int(2))), None);
    }
}
