//! `str.replace s t r` and `str.replace_all s t r`.
//!
//! `str.replace` substitutes the first occurrence of `t` in `s`; an empty
//! `t` occurs at position 0, so the result is `r ++ s`.

use super::util::{char_lit, cons, len, replace_args, snoc, split_trailing_word};
use super::{Rule, RuleContext, RuleResult};
use crate::rewrites::RewriteId;
use num_traits::Zero;
use strux_core::{Op, Term};

pub(super) static REPLACE_RULES: &[Rule] = &[
    Rule::size(RewriteId::RplConstFind, rpl_const_find),
    Rule::size(RewriteId::RplConstNfind, rpl_const_nfind),
    Rule::size(RewriteId::RplRplEmpty, rpl_rpl_empty),
    Rule::size(RewriteId::RplId, rpl_id),
    Rule::size(RewriteId::RplReplace, rpl_replace),
    Rule::size(RewriteId::RplEmpCntsSubsts, rpl_emp_cnts_substs),
    Rule::size(RewriteId::RplNctn, rpl_nctn),
    Rule::size(RewriteId::ReplCharNcontribFind, repl_char_ncontrib_find),
    Rule::size(RewriteId::RplXYXSimp, rpl_x_y_x_simp),
    Rule::size(RewriteId::RplRplLenId, rpl_rpl_len_id),
    Rule::size(RewriteId::RplCntsSubsts, rpl_cnts_substs),
    Rule::lex(
        RewriteId::RplCctn,
        "the haystack of str.replace loses components",
        rpl_cctn,
    ),
    Rule::lex(
        RewriteId::RplCctnRpl,
        "the haystack of str.replace loses components",
        rpl_cctn_rpl,
    ),
    Rule::lex(
        RewriteId::RplPullEndpt,
        "the haystack of str.replace loses components",
        rpl_pull_endpt,
    ),
    Rule::size(RewriteId::ReplRepl2InvId, repl_repl2_inv_id),
    Rule::size(RewriteId::ReplRepl2Inv, repl_repl2_inv),
    Rule::size(RewriteId::ReplRepl3InvId, repl_repl3_inv_id),
    Rule::size(RewriteId::ReplRepl3Inv, repl_repl3_inv),
    Rule::size(RewriteId::ReplReplShortCircuit, repl_repl_short_circuit),
    Rule::lex(
        RewriteId::ReplDualReplIte,
        "str.replace over a non-constant haystack disappears",
        repl_dual_repl_ite,
    ),
    Rule::lex(
        RewriteId::ReplSubstIdx,
        "str.replace applications decrease",
        repl_subst_idx,
    ),
];

pub(super) static REPLACE_ALL_RULES: &[Rule] = &[
    Rule::size(RewriteId::ReplallEmptyFind, replall_empty_find),
    Rule::size(RewriteId::ReplallConst, replall_const),
];

fn parts(t: &Term) -> (&Term, &Term, &Term) {
    let args = t.args();
    (&args[0], &args[1], &args[2])
}

/// All constant, pattern occurs.
fn rpl_const_find(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    match (s.as_word(), p.as_word(), r.as_word()) {
        (Some(s), Some(p), Some(r)) if s.contains(p) => {
            Ok(Some(Term::string(s.replace_first(p, r))))
        }
        _ => Ok(None),
    }
}

/// Constant string without the constant pattern.
fn rpl_const_nfind(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    match (s.as_word(), p.as_word()) {
        (Some(sw), Some(pw)) if !sw.contains(pw) => Ok(Some(s.clone())),
        _ => Ok(None),
    }
}

/// Empty pattern: `r ++ s`.
fn rpl_rpl_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    if !p.is_empty_string() {
        return Ok(None);
    }
    Term::concat_of([r.clone(), s.clone()]).map(Some)
}

/// Pattern and replacement equal.
fn rpl_id(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    Ok((p == r).then(|| s.clone()))
}

/// `(str.replace x x r)` → `r`.
fn rpl_replace(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    Ok((s == p).then(|| r.clone()))
}

/// Empty string with a pattern entailed non-empty.
fn rpl_emp_cnts_substs(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    if s.is_empty_string() && ctx.oracle.length_geq(p, 1).is_yes() {
        return Ok(Some(s.clone()));
    }
    Ok(None)
}

/// The string cannot contain the pattern.
fn rpl_nctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    Ok(ctx.oracle.contains(s, p).is_no().then(|| s.clone()))
}

/// Constant string missing a character that a constant component of the
/// pattern needs.
fn repl_char_ncontrib_find(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    let Some(sw) = s.as_word() else {
        return Ok(None);
    };
    let blocked = p.concat_components().iter().any(|part| {
        part.as_word()
            .is_some_and(|w| w.code_points().iter().any(|&c| !sw.has_char(c)))
    });
    Ok(blocked.then(|| s.clone()))
}

/// `(str.replace c t c)` for a single character `c` and a non-empty `t`.
fn rpl_x_y_x_simp(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    if s == r && char_lit(s).is_some() && ctx.oracle.length_geq(p, 1).is_yes() {
        return Ok(Some(s.clone()));
    }
    Ok(None)
}

/// `(str.replace x t x)` with non-empty `t` no shorter than `x`.
fn rpl_rpl_len_id(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    if s != r || !ctx.oracle.length_geq(p, 1).is_yes() {
        return Ok(None);
    }
    Ok(ctx.oracle.arith_geq(&len(p)?, &len(s)?).is_yes().then(|| s.clone()))
}

/// The pattern is the first component of the string.
fn rpl_cnts_substs(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    if s.op() != &Op::Concat || &s.args()[0] != p {
        return Ok(None);
    }
    cons(r.clone(), &s.args()[1..]).map(Some)
}

/// Replace inside the shortest prefix of components entailed to contain
/// the pattern.
fn rpl_cctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    let components = s.concat_components();
    if components.len() < 2 {
        return Ok(None);
    }
    for cut in 1..components.len() {
        let prefix = Term::concat_of(components[..cut].iter().cloned())?;
        if ctx.oracle.contains(&prefix, p).is_yes() {
            let inner = Term::mk_replace(&prefix, p, r)?;
            return cons(inner, &components[cut..]).map(Some);
        }
    }
    Ok(None)
}

/// A single-character pattern that the first component cannot contain is
/// replaced in the remaining components.
fn rpl_cctn_rpl(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    let components = s.concat_components();
    if components.len() < 2 {
        return Ok(None);
    }
    let single = ctx.oracle.length_geq(p, 1).is_yes() && ctx.oracle.length_leq(p, 1).is_yes();
    if !single || !ctx.oracle.contains(&components[0], p).is_no() {
        return Ok(None);
    }
    let rest = Term::concat_of(components[1..].iter().cloned())?;
    let inner = Term::mk_replace(&rest, p, r)?;
    Term::concat_of([components[0].clone(), inner]).map(Some)
}

/// Move a trailing constant sharing no character with a constant pattern
/// out of the replacement.
fn rpl_pull_endpt(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    let (Some(pattern), Some((init, tail))) = (p.as_word(), split_trailing_word(s)) else {
        return Ok(None);
    };
    if pattern.is_empty() || init.is_empty() || tail.shares_char_with(pattern) {
        return Ok(None);
    }
    let inner = Term::mk_replace(&Term::concat_of(init.iter().cloned())?, p, r)?;
    snoc(&[inner], Term::string(tail.clone())).map(Some)
}

/// `(str.replace x (str.replace y x y) y)` → `x`.
fn repl_repl2_inv_id(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, p, r) = parts(t);
    Ok(match replace_args(p) {
        Some((y, x2, y2)) if x2 == x && y == y2 && y == r => Some(x.clone()),
        _ => None,
    })
}

/// `(str.replace x (str.replace y x y) z)` → `(str.replace x y z)`.
fn repl_repl2_inv(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, p, z) = parts(t);
    match replace_args(p) {
        Some((y, x2, y2)) if x2 == x && y == y2 => Term::mk_replace(x, y, z).map(Some),
        _ => Ok(None),
    }
}

/// `(str.replace x y (str.replace y x y))` → `x`.
fn repl_repl3_inv_id(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y, r) = parts(t);
    Ok(match replace_args(r) {
        Some((y1, x2, y2)) if y1 == y && x2 == x && y2 == y => Some(x.clone()),
        _ => None,
    })
}

/// `(str.replace x y (str.replace y x z))` → `(ite (= x y) z x)`.
fn repl_repl3_inv(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (x, y, r) = parts(t);
    match replace_args(r) {
        Some((y1, x2, z)) if y1 == y && x2 == x => {
            Term::mk_ite(&Term::mk_eq(x, y)?, z, x).map(Some)
        }
        _ => Ok(None),
    }
}

/// A single-character pattern that neither the inner string nor the
/// inner replacement can contain leaves the inner replace untouched.
fn repl_repl_short_circuit(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (inner, p, _) = parts(t);
    let Some((x, _, z)) = replace_args(inner) else {
        return Ok(None);
    };
    if char_lit(p).is_none() {
        return Ok(None);
    }
    let absent = ctx.oracle.contains(x, p).is_no() && ctx.oracle.contains(z, p).is_no();
    Ok(absent.then(|| inner.clone()))
}

/// Constant pattern and replacement pushed into an `ite` of constants.
fn repl_dual_repl_ite(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    let [c, a, b] = s.args() else {
        return Ok(None);
    };
    if s.op() != &Op::Ite || p.as_word().is_none() || r.as_word().is_none() {
        return Ok(None);
    }
    if a.as_word().is_none() || b.as_word().is_none() {
        return Ok(None);
    }
    let then = Term::mk_replace(a, p, r)?;
    let other = Term::mk_replace(b, p, r)?;
    Term::mk_ite(c, &then, &other).map(Some)
}

/// `(str.replace s (str.substr s 0 n) r)` with `n >= 0` →
/// `r ++ (str.substr s n (str.len s))`.
fn repl_subst_idx(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    if p.op() != &Op::Substr || &p.args()[0] != s {
        return Ok(None);
    }
    let (start, n) = (&p.args()[1], &p.args()[2]);
    if !start.as_int().is_some_and(Zero::is_zero) {
        return Ok(None);
    }
    if !ctx.oracle.arith_geq(n, &Term::int(0)).is_yes() {
        return Ok(None);
    }
    let rest = Term::mk_substr(s, n, &len(s)?)?;
    Term::concat_of([r.clone(), rest]).map(Some)
}

/// `(str.replace_all s "" r)` → `s`.
fn replall_empty_find(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, _) = parts(t);
    Ok(p.is_empty_string().then(|| s.clone()))
}

/// All constant.
fn replall_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, p, r) = parts(t);
    match (s.as_word(), p.as_word(), r.as_word()) {
        (Some(s), Some(p), Some(r)) => Ok(Some(Term::string(s.replace_all(p, r)))),
        _ => Ok(None),
    }
}
