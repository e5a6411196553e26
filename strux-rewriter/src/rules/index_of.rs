//! `str.indexof s t i`.
//!
//! The result is the first position `p >= i` where `t` occurs in `s`, or
//! `-1` when there is none or `i` lies outside `[0, |s|]`. An empty `t`
//! occurs at every position.

use super::util::{int_lit, is_int, len, plus, split_leading_word, split_trailing_word};
use super::{Rule, RuleContext, RuleResult};
use crate::eval;
use crate::rewrites::RewriteId;
use num_traits::{Signed, Zero};
use strux_core::{Op, Term};

pub(super) static INDEX_OF_RULES: &[Rule] = &[
    Rule::size(RewriteId::IdofFind, idof_find),
    Rule::size(RewriteId::IdofNfind, idof_nfind),
    Rule::size(RewriteId::IdofNeg, idof_neg),
    Rule::size(RewriteId::IdofEqCstStart, idof_eq_cst_start),
    Rule::size(RewriteId::IdofEqNstart, idof_eq_nstart),
    Rule::lex(
        RewriteId::IdofEqNorm,
        "string arguments become the empty literal",
        idof_eq_norm,
    ),
    Rule::size(RewriteId::IdofEmpIdof, idof_emp_idof),
    Rule::size(RewriteId::IdofMax, idof_max),
    Rule::size(RewriteId::IdofLen, idof_len),
    Rule::size(RewriteId::IdofStripSymLen, idof_strip_sym_len),
    Rule::size(RewriteId::IdofNctn, idof_nctn),
    Rule::size(RewriteId::IdofDefCtn, idof_def_ctn),
    Rule::size(RewriteId::IdofNormPrefix, idof_norm_prefix),
    Rule::size(RewriteId::IdofPullEndpt, idof_pull_endpt),
    Rule::size(RewriteId::IdofStripCnstEndpts, idof_strip_cnst_endpts),
];

fn parts(t: &Term) -> (&Term, &Term, &Term) {
    let args = t.args();
    (&args[0], &args[1], &args[2])
}

fn not_found() -> RuleResult {
    Ok(Some(Term::int(-1)))
}

fn constant_result(t: &Term) -> Option<num_bigint::BigInt> {
    let (s, p, i) = parts(t);
    Some(eval::index_of(s.as_word()?, p.as_word()?, int_lit(i)?))
}

/// All constant, pattern found.
fn idof_find(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(constant_result(t)
        .filter(|r| !r.is_negative())
        .map(Term::int))
}

/// All constant, pattern not found.
fn idof_nfind(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(constant_result(t).filter(Signed::is_negative).map(Term::int))
}

/// Negative constant start.
fn idof_neg(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if int_lit(parts(t).2).is_some_and(Signed::is_negative) {
        return not_found();
    }
    Ok(None)
}

/// `(str.indexof x x 0)` → `0`.
fn idof_eq_cst_start(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    Ok((s == p && is_int(i, 0)).then(|| Term::int(0)))
}

/// `(str.indexof x x k)` for a constant `k ≠ 0` → `-1`.
fn idof_eq_nstart(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    if s == p && int_lit(i).is_some_and(|k| !k.is_zero()) {
        return not_found();
    }
    Ok(None)
}

/// `(str.indexof x x i)` → `(str.indexof "" "" i)`: both are `0` at
/// `i = 0` and `-1` elsewhere.
fn idof_eq_norm(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    if s != p || s.is_empty_string() {
        return Ok(None);
    }
    let empty = Term::empty_string();
    Term::mk_indexof(&empty, &empty, i).map(Some)
}

/// Empty pattern at an in-range start → the start.
fn idof_emp_idof(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    if !p.is_empty_string() {
        return Ok(None);
    }
    let in_range = ctx.oracle.arith_geq(i, &Term::int(0)).is_yes()
        && ctx.oracle.arith_geq(&len(s)?, i).is_yes();
    Ok(in_range.then(|| i.clone()))
}

/// Start entailed past `|s|`.
fn idof_max(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, _, i) = parts(t);
    if ctx.oracle.arith_geq(i, &plus(&len(s)?, 1)?).is_yes() {
        return not_found();
    }
    Ok(None)
}

/// Pattern entailed longer than the string.
fn idof_len(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    if ctx.oracle.arith_geq(&len(p)?, &plus(&len(s)?, 1)?).is_yes() {
        return not_found();
    }
    Ok(None)
}

/// `i + |t| > |s|` is entailed: no occurrence fits after the start.
fn idof_strip_sym_len(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    let reach = Term::mk_add([i.clone(), len(p)?])?;
    if ctx.oracle.arith_geq(&reach, &plus(&len(s)?, 1)?).is_yes() {
        return not_found();
    }
    Ok(None)
}

/// The string cannot contain the pattern.
fn idof_nctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    if ctx.oracle.contains(s, p).is_no() {
        return not_found();
    }
    Ok(None)
}

/// The pattern is the first component of the string, searched from `0`.
fn idof_def_ctn(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    let leads = s.op() == &Op::Concat && &s.args()[0] == p;
    Ok((leads && is_int(i, 0)).then(|| Term::int(0)))
}

/// Constant pattern found inside the leading constant, searched from `0`.
fn idof_norm_prefix(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    let (Some(pattern), Some((head, _))) = (p.as_word(), split_leading_word(s)) else {
        return Ok(None);
    };
    if pattern.is_empty() || !is_int(i, 0) {
        return Ok(None);
    }
    Ok(head.find(pattern, 0).map(Term::int))
}

/// Search from `0` restricted to the shortest prefix of components that
/// is entailed to contain the pattern.
fn idof_pull_endpt(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    let components = s.concat_components();
    if components.len() < 2 || !is_int(i, 0) {
        return Ok(None);
    }
    for cut in 1..components.len() {
        let prefix = Term::concat_of(components[..cut].iter().cloned())?;
        if ctx.oracle.contains(&prefix, p).is_yes() {
            return Term::mk_indexof(&prefix, p, i).map(Some);
        }
    }
    Ok(None)
}

/// Drop a trailing constant sharing no character with a constant pattern.
fn idof_strip_cnst_endpts(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, i) = parts(t);
    let (Some(pattern), Some((init, tail))) = (p.as_word(), split_trailing_word(s)) else {
        return Ok(None);
    };
    if pattern.is_empty() || init.is_empty() || tail.shares_char_with(pattern) {
        return Ok(None);
    }
    let stripped = Term::concat_of(init.iter().cloned())?;
    Term::mk_indexof(&stripped, p, i).map(Some)
}
