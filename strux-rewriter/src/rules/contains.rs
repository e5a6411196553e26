//! `str.contains x y`.

use super::util::{
    char_lit, is_empty_eq, len, plus, replace_args, split_leading_word, split_trailing_word,
};
use super::{Rule, RuleContext, RuleResult};
use crate::entail::is_sub_run;
use crate::rewrites::RewriteId;
use rustc_hash::FxHashMap;
use strux_core::{Op, Term, Word};

pub(super) static CONTAINS_RULES: &[Rule] = &[
    Rule::size(RewriteId::CtnConst, ctn_const),
    Rule::size(RewriteId::CtnRhsEmptystr, ctn_rhs_emptystr),
    Rule::size(RewriteId::CtnEq, ctn_eq),
    Rule::lex(
        RewriteId::CtnLhsEmptystr,
        "str.contains becomes an equality",
        ctn_lhs_emptystr,
    ),
    Rule::size(RewriteId::CtnSubstr, ctn_substr),
    Rule::size(RewriteId::CtnComponent, ctn_component),
    Rule::size(RewriteId::CtnSplit, ctn_split),
    Rule::size(RewriteId::CtnLenIneq, ctn_len_ineq),
    Rule::lex(
        RewriteId::CtnLenIneqNstrict,
        "str.contains becomes an equality",
        ctn_len_ineq_nstrict,
    ),
    Rule::size(RewriteId::CtnNconstCtnConcat, ctn_nconst_ctn_concat),
    Rule::size(RewriteId::CtnMsetNss, ctn_mset_nss),
    Rule::lex(
        RewriteId::CtnConcatChar,
        "str.contains haystacks lose their concatenation",
        ctn_concat_char,
    ),
    Rule::lex(
        RewriteId::CtnSplitOnes,
        "str.contains haystacks lose their concatenation",
        ctn_split_ones,
    ),
    Rule::size(RewriteId::CtnStripEndpt, ctn_strip_endpt),
    Rule::size(RewriteId::CtnReplSelf, ctn_repl_self),
    Rule::lex(
        RewriteId::CtnReplEmpty,
        "str.replace over the empty string disappears",
        ctn_repl_empty,
    ),
    Rule::lex(
        RewriteId::CtnReplToCtnDisj,
        "str.replace under str.contains disappears",
        ctn_repl_to_ctn_disj,
    ),
    Rule::lex(
        RewriteId::CtnReplCnstsToCtn,
        "str.replace under str.contains disappears",
        ctn_repl_cnsts_to_ctn,
    ),
    Rule::lex(
        RewriteId::CtnReplToCtn,
        "str.replace under str.contains disappears",
        ctn_repl_to_ctn,
    ),
    Rule::size(RewriteId::CtnReplChar, ctn_repl_char),
    Rule::size(RewriteId::CtnReplLenOneToCtn, ctn_repl_len_one_to_ctn),
    Rule::size(RewriteId::CtnRepl, ctn_repl),
    Rule::size(RewriteId::CtnRplNonCtn, ctn_rpl_non_ctn),
    Rule::lex(
        RewriteId::CtnReplSimpRepl,
        "str.replace under str.contains disappears",
        ctn_repl_simp_repl,
    ),
];

fn parts(t: &Term) -> (&Term, &Term) {
    (&t.args()[0], &t.args()[1])
}

fn yes() -> RuleResult {
    Ok(Some(Term::bool(true)))
}

fn no() -> RuleResult {
    Ok(Some(Term::bool(false)))
}

fn is_single_char(t: &Term, ctx: &RuleContext<'_>) -> bool {
    ctx.oracle.length_geq(t, 1).is_yes() && ctx.oracle.length_leq(t, 1).is_yes()
}

fn contains_each(parts: &[Term], needle: &Term) -> RuleResult {
    let disjuncts = parts
        .iter()
        .map(|part| Term::mk_contains(part, needle))
        .collect::<strux_core::Result<Vec<_>>>()?;
    Term::or_of(disjuncts).map(Some)
}

/// Both arguments constant.
fn ctn_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match (x.as_word(), y.as_word()) {
        (Some(x), Some(y)) => Ok(Some(Term::bool(x.contains(y)))),
        _ => Ok(None),
    }
}

/// `(str.contains x "")` → `true`.
fn ctn_rhs_emptystr(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if parts(t).1.is_empty_string() {
        return yes();
    }
    Ok(None)
}

/// `(str.contains x x)` → `true`.
fn ctn_eq(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if x == y {
        return yes();
    }
    Ok(None)
}

/// `(str.contains "" y)` → `(= y "")`.
fn ctn_lhs_emptystr(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if x.is_empty_string() {
        return is_empty_eq(y).map(Some);
    }
    Ok(None)
}

/// `(str.contains x (str.substr x i n))` → `true`.
fn ctn_substr(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if y.op() == &Op::Substr && &y.args()[0] == x {
        return yes();
    }
    Ok(None)
}

/// The components of `y` are a contiguous run of those of `x`.
fn ctn_component(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if is_sub_run(x.concat_components(), y.concat_components()) {
        return yes();
    }
    Ok(None)
}

/// A constant `y` inside a constant component of `x`.
fn ctn_split(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some(needle) = y.as_word() else {
        return Ok(None);
    };
    let found = x
        .concat_components()
        .iter()
        .any(|part| part.as_word().is_some_and(|w| w.contains(needle)));
    if found {
        return yes();
    }
    Ok(None)
}

/// `|y| > |x|` is entailed.
fn ctn_len_ineq(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if ctx.oracle.arith_geq(&len(y)?, &plus(&len(x)?, 1)?).is_yes() {
        return no();
    }
    Ok(None)
}

/// `|y| >= |x|` is entailed: containment is equality.
fn ctn_len_ineq_nstrict(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if ctx.oracle.arith_geq(&len(y)?, &len(x)?).is_yes() {
        return Term::mk_eq(x, y).map(Some);
    }
    Ok(None)
}

/// Constant `x` missing a constant component of `y`.
fn ctn_nconst_ctn_concat(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some(hay) = x.as_word() else {
        return Ok(None);
    };
    let missing = y
        .concat_components()
        .iter()
        .any(|part| part.as_word().is_some_and(|w| !hay.contains(w)));
    if missing {
        return no();
    }
    Ok(None)
}

/// Constant `x` with fewer occurrences of some character than the
/// constant components of `y` need together.
fn ctn_mset_nss(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some(hay) = x.as_word() else {
        return Ok(None);
    };
    let mut needed: FxHashMap<u32, usize> = FxHashMap::default();
    for w in y.concat_components().iter().filter_map(Term::as_word) {
        for &c in w.code_points() {
            *needed.entry(c).or_default() += 1;
        }
    }
    if needed.iter().any(|(&c, &count)| hay.count_char(c) < count) {
        return no();
    }
    Ok(None)
}

/// A single character is contained in a concatenation iff it is
/// contained in one of its components.
fn ctn_concat_char(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if x.op() != &Op::Concat || char_lit(y).is_none() {
        return Ok(None);
    }
    contains_each(x.args(), y)
}

/// Same for a symbolic `y` of length at most one.
fn ctn_split_ones(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    if x.op() != &Op::Concat || y.is_literal() || !ctx.oracle.length_leq(y, 1).is_yes() {
        return Ok(None);
    }
    contains_each(x.args(), y)
}

/// Drop constant end components of `x` sharing no character with a
/// constant `y`.
fn ctn_strip_endpt(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some(needle) = y.as_word().filter(|w| !w.is_empty()) else {
        return Ok(None);
    };
    let components = x.concat_components();
    if components.len() < 2 {
        return Ok(None);
    }
    let disjoint = |w: &Word| !w.shares_char_with(needle);
    let mut start = 0;
    let mut end = components.len();
    if split_leading_word(x).is_some_and(|(w, _)| disjoint(w)) {
        start = 1;
    }
    if split_trailing_word(x).is_some_and(|(_, w)| disjoint(w)) {
        end -= 1;
    }
    if start == 0 && end == components.len() {
        return Ok(None);
    }
    let kept = Term::concat_of(components[start..end.max(start)].iter().cloned())?;
    Term::mk_contains(&kept, y).map(Some)
}

/// `(str.contains (str.replace a b a) a)` → `true`.
fn ctn_repl_self(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(x) {
        Some((a, _, c)) if a == y && c == y => yes(),
        _ => Ok(None),
    }
}

/// `(str.contains x (str.replace "" b c))` →
/// `(or (not (= b "")) (str.contains x c))`.
fn ctn_repl_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(y) {
        Some((a, b, c)) if a.is_empty_string() => {
            let nonempty = Term::mk_not(&is_empty_eq(b)?)?;
            Term::mk_or([nonempty, Term::mk_contains(x, c)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// `(str.contains (str.replace a b c) c)` →
/// `(or (str.contains a b) (str.contains a c))`.
fn ctn_repl_to_ctn_disj(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(x) {
        Some((a, b, c)) if c == y => {
            Term::mk_or([Term::mk_contains(a, b)?, Term::mk_contains(a, y)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// Constant pattern and replacement, the replacement containing a
/// constant `y`.
fn ctn_repl_cnsts_to_ctn(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some((a, b, c)) = replace_args(x) else {
        return Ok(None);
    };
    match (b.as_word(), c.as_word(), y.as_word()) {
        (Some(_), Some(cw), Some(yw)) if cw.contains(yw) => {
            Term::mk_or([Term::mk_contains(a, b)?, Term::mk_contains(a, y)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// The replacement is entailed to contain `y`.
fn ctn_repl_to_ctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(x) {
        Some((a, b, c)) if ctx.oracle.contains(c, y).is_yes() => {
            Term::mk_or([Term::mk_contains(a, b)?, Term::mk_contains(a, y)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// A character in neither the constant pattern nor the constant
/// replacement is contained iff it is in the original string.
fn ctn_repl_char(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let (Some((a, b, c)), Some(ch)) = (replace_args(x), char_lit(y)) else {
        return Ok(None);
    };
    match (b.as_word(), c.as_word()) {
        (Some(bw), Some(cw)) if !bw.has_char(ch) && !cw.has_char(ch) => {
            Term::mk_contains(a, y).map(Some)
        }
        _ => Ok(None),
    }
}

/// Same with a symbolic single-character `y` decided by the oracle.
fn ctn_repl_len_one_to_ctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    let Some((a, b, c)) = replace_args(x) else {
        return Ok(None);
    };
    if !is_single_char(y, ctx) {
        return Ok(None);
    }
    if ctx.oracle.contains(b, y).is_no() && ctx.oracle.contains(c, y).is_no() {
        return Term::mk_contains(a, y).map(Some);
    }
    Ok(None)
}

/// `(str.contains x (str.replace x b c))` with `|c| > |b|` →
/// `(not (str.contains x b))`.
fn ctn_repl(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(y) {
        Some((a, b, c))
            if a == x && ctx.oracle.arith_geq(&len(c)?, &plus(&len(b)?, 1)?).is_yes() =>
        {
            Term::mk_not(&Term::mk_contains(x, b)?).map(Some)
        }
        _ => Ok(None),
    }
}

/// `(str.contains x (str.replace x b c))` where `x` cannot contain `c`.
fn ctn_rpl_non_ctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(y) {
        Some((a, b, c)) if a == x && ctx.oracle.contains(x, c).is_no() => {
            Term::mk_not(&Term::mk_contains(x, b)?).map(Some)
        }
        _ => Ok(None),
    }
}

/// `(str.contains x (str.replace x b c))` with `|b| = |c|` →
/// `(or (not (str.contains x b)) (= b c))`.
fn ctn_repl_simp_repl(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (x, y) = parts(t);
    match replace_args(y) {
        Some((a, b, c)) if a == x && ctx.oracle.equal_length(b, c).is_yes() => {
            let absent = Term::mk_not(&Term::mk_contains(x, b)?)?;
            Term::mk_or([absent, Term::mk_eq(b, c)?]).map(Some)
        }
        _ => Ok(None),
    }
}
