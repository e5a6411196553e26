//! Concatenation, length, Boolean and arithmetic glue.
//!
//! These rules keep the terms produced by the string families in a small
//! canonical shape: concatenations are flat with merged literals, Boolean
//! connectives are flat and free of units, integer sums carry at most one
//! literal (last).

use super::util::{flatten, int_lit};
use super::{Rule, RuleContext, RuleResult};
use crate::entail::Entail;
use crate::rewrites::RewriteId;
use num_bigint::BigInt;
use num_traits::Zero;
use strux_core::{Op, Result, Term};

pub(super) static CONCAT_RULES: &[Rule] = &[Rule::size(RewriteId::ConcatNorm, concat_norm)];

pub(super) static LENGTH_RULES: &[Rule] = &[
    Rule::size(RewriteId::LenEval, len_eval),
    Rule::lex(
        RewriteId::LenConcat,
        "str.len applications over str.++ decrease",
        len_concat,
    ),
];

pub(super) static BOOL_RULES: &[Rule] = &[Rule::size(RewriteId::BoolEval, bool_eval)];

pub(super) static ITE_RULES: &[Rule] = &[Rule::size(RewriteId::IteEval, ite_eval)];

pub(super) static ARITH_RULES: &[Rule] = &[Rule::size(RewriteId::ArithEval, arith_eval)];

pub(super) static INT_LEQ_RULES: &[Rule] = &[
    Rule::size(RewriteId::ArithEval, arith_eval),
    Rule::size(RewriteId::ArithLeqEntail, arith_leq_entail),
];

/// Flatten nested concatenations, drop `""` and merge adjacent literals.
fn concat_norm(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (flat, mut changed) = flatten(t.args(), &Op::Concat);
    let mut parts: Vec<Term> = Vec::with_capacity(flat.len());
    for part in flat {
        if part.is_empty_string() {
            changed = true;
            continue;
        }
        let merged = match (parts.last().and_then(Term::as_word), part.as_word()) {
            (Some(prev), Some(w)) => Some(prev.concat(w)),
            _ => None,
        };
        if let Some(word) = merged {
            parts.pop();
            parts.push(Term::string(word));
            changed = true;
        } else {
            parts.push(part);
        }
    }
    if !changed {
        return Ok(None);
    }
    Term::concat_of(parts).map(Some)
}

/// `(str.len c)` → `|c|`.
fn len_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(t.args()[0].as_word().map(|w| Term::int(w.len())))
}

/// `(str.len (str.++ x₁ … xₙ))` → `(+ (str.len xᵢ) … k)` with literal
/// lengths summed into `k`.
fn len_concat(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let s = &t.args()[0];
    if s.op() != &Op::Concat {
        return Ok(None);
    }
    let mut known = 0usize;
    let mut terms = Vec::with_capacity(s.args().len());
    for part in s.args() {
        match part.as_word() {
            Some(w) => known += w.len(),
            None => terms.push(Term::mk_len(part)?),
        }
    }
    if known > 0 {
        terms.push(Term::int(known));
    }
    sum_of(terms).map(Some)
}

fn sum_of(mut terms: Vec<Term>) -> Result<Term> {
    match terms.len() {
        0 => Ok(Term::int(0)),
        1 => Ok(terms.remove(0)),
        _ => Term::mk_add(terms),
    }
}

/// `(not b)` for a literal or a double negation, and `and`/`or` with
/// units, absorbing literals, duplicates or complementary pairs.
fn bool_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let op = t.op();
    if op == &Op::Not {
        let arg = &t.args()[0];
        if let Some(b) = arg.as_bool() {
            return Ok(Some(Term::bool(!b)));
        }
        if arg.op() == &Op::Not {
            return Ok(Some(arg.args()[0].clone()));
        }
        return Ok(None);
    }

    let unit = op == &Op::And;
    let (flat, mut changed) = flatten(t.args(), op);
    let mut parts: Vec<Term> = Vec::with_capacity(flat.len());
    for part in flat {
        match part.as_bool() {
            Some(b) if b == unit => {
                changed = true;
                continue;
            }
            Some(_) => return Ok(Some(Term::bool(!unit))),
            None => {}
        }
        if parts.contains(&part) {
            changed = true;
            continue;
        }
        if parts.iter().any(|q| is_negation_of(q, &part) || is_negation_of(&part, q)) {
            return Ok(Some(Term::bool(!unit)));
        }
        parts.push(part);
    }
    if !changed {
        return Ok(None);
    }
    if unit {
        Term::and_of(parts).map(Some)
    } else {
        Term::or_of(parts).map(Some)
    }
}

fn is_negation_of(neg: &Term, t: &Term) -> bool {
    neg.op() == &Op::Not && &neg.args()[0] == t
}

/// `ite` with a literal condition, equal branches, or literal Boolean
/// branches.
fn ite_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let [c, a, b] = t.args() else {
        return Ok(None);
    };
    if let Some(cond) = c.as_bool() {
        return Ok(Some(if cond { a.clone() } else { b.clone() }));
    }
    if a == b {
        return Ok(Some(a.clone()));
    }
    match (a.as_bool(), b.as_bool()) {
        (Some(true), Some(false)) => Ok(Some(c.clone())),
        (Some(false), Some(true)) => Term::mk_not(c).map(Some),
        _ => Ok(None),
    }
}

/// Fold integer literals in `+`, `-` and `<=`.
fn arith_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    match t.op() {
        Op::Add => fold_sum(t),
        Op::Sub => {
            let [a, b] = t.args() else {
                return Ok(None);
            };
            if let (Some(x), Some(y)) = (int_lit(a), int_lit(b)) {
                return Ok(Some(Term::int(x - y)));
            }
            if int_lit(b).is_some_and(Zero::is_zero) {
                return Ok(Some(a.clone()));
            }
            Ok((a == b).then(|| Term::int(0)))
        }
        Op::IntLeq => {
            let [a, b] = t.args() else {
                return Ok(None);
            };
            if let (Some(x), Some(y)) = (int_lit(a), int_lit(b)) {
                return Ok(Some(Term::bool(x <= y)));
            }
            Ok((a == b).then(|| Term::bool(true)))
        }
        _ => Ok(None),
    }
}

fn fold_sum(t: &Term) -> RuleResult {
    let (flat, flattened) = flatten(t.args(), &Op::Add);
    let mut sum = BigInt::zero();
    let mut literals = 0usize;
    let mut saw_zero = false;
    let mut rest = Vec::with_capacity(flat.len());
    for part in flat {
        match int_lit(&part) {
            Some(n) => {
                saw_zero |= n.is_zero();
                sum += n;
                literals += 1;
            }
            None => rest.push(part),
        }
    }
    if !flattened && literals < 2 && !saw_zero {
        return Ok(None);
    }
    if !sum.is_zero() {
        rest.push(Term::int(sum));
    }
    sum_of(rest).map(Some)
}

/// `(<= a b)` decided by the oracle.
fn arith_leq_entail(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let [a, b] = t.args() else {
        return Ok(None);
    };
    Ok(match ctx.oracle.arith_geq(b, a) {
        Entail::Yes => Some(Term::bool(true)),
        Entail::No => Some(Term::bool(false)),
        Entail::Unknown => None,
    })
}
