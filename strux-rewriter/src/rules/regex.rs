//! Regular-expression membership and regular-expression operators.

use super::util::{
    char_lit, cons, flatten, is_sigma_star, len, re_epsilon, split_leading_word, to_re_word,
};
use super::{Rule, RuleContext, RuleResult};
use crate::eval::{Assignment, regex};
use crate::rewrites::RewriteId;
use strux_core::{Op, Result, Term};

pub(super) static IN_RE_RULES: &[Rule] = &[
    Rule::size(RewriteId::ReInNone, re_in_none),
    Rule::size(RewriteId::ReInSigmaStar, re_in_sigma_star),
    Rule::size(RewriteId::ReEmptyInStrStar, re_empty_in_str_star),
    Rule::size(RewriteId::ReCharInStrStar, re_char_in_str_star),
    Rule::size(RewriteId::ReInDistCharStar, re_in_dist_char_star),
    Rule::size(RewriteId::ReInEval, re_in_eval),
    Rule::size(RewriteId::ReInStrToRe, re_in_str_to_re),
    Rule::size(RewriteId::ReConcatPureAllchar, re_concat_pure_allchar),
    Rule::size(RewriteId::ReConcatToContains, re_concat_to_contains),
    Rule::lex(
        RewriteId::ReSimpleConsume,
        "leading literal characters of both arguments decrease",
        re_simple_consume,
    ),
];

pub(super) static RE_CONCAT_RULES: &[Rule] = &[
    Rule::size(RewriteId::ReConcatFlatten, re_concat_flatten),
    Rule::size(RewriteId::ReConcat, re_concat),
    Rule::size(RewriteId::ReConcatOpt, re_concat_opt),
];

pub(super) static RE_UNION_RULES: &[Rule] = &[
    Rule::size(RewriteId::ReAndorFlatten, re_andor_flatten),
    Rule::size(RewriteId::ReOrAll, re_or_all),
];

pub(super) static RE_INTER_RULES: &[Rule] = &[
    Rule::size(RewriteId::ReAndorFlatten, re_andor_flatten),
    Rule::size(RewriteId::ReAndEmpty, re_and_empty),
];

pub(super) static RE_STAR_RULES: &[Rule] = &[
    Rule::lex(
        RewriteId::ReStarEmpty,
        "re.* applications decrease",
        re_star_empty,
    ),
    Rule::size(RewriteId::ReStarEmptyString, re_star_empty_string),
    Rule::size(RewriteId::ReStarNestedStar, re_star_nested_star),
    Rule::size(RewriteId::ReStarUnion, re_star_union),
];

pub(super) static RE_LOOP_RULES: &[Rule] = &[
    Rule::lex(RewriteId::ReLoop, "re.loop applications decrease", re_loop),
    Rule::size(RewriteId::ReLoopStar, re_loop_star),
];

fn parts(t: &Term) -> (&Term, &Term) {
    (&t.args()[0], &t.args()[1])
}

/// Regular concatenation of any number of parts.
fn re_concat_of(mut parts: Vec<Term>) -> Result<Term> {
    match parts.len() {
        0 => re_epsilon(),
        1 => Ok(parts.remove(0)),
        _ => Term::mk_re_concat(parts),
    }
}

// --- membership ---

/// `(str.in_re s re.none)` → `false`.
fn re_in_none(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok((parts(t).1.op() == &Op::ReNone).then(|| Term::bool(false)))
}

/// Membership in `re.all` → `true`.
fn re_in_sigma_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(is_sigma_star(parts(t).1).then(|| Term::bool(true)))
}

/// `""` is in every star.
fn re_empty_in_str_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    Ok((s.is_empty_string() && r.op() == &Op::ReStar).then(|| Term::bool(true)))
}

/// A single character is in `(re.* r)` iff it is in `r`.
fn re_char_in_str_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    if char_lit(s).is_none() || r.op() != &Op::ReStar {
        return Ok(None);
    }
    Term::mk_in_re(s, &r.args()[0]).map(Some)
}

/// A constant in `(re.* (str.to_re c))` for a single character `c`.
fn re_in_dist_char_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    let (Some(w), true) = (s.as_word(), r.op() == &Op::ReStar) else {
        return Ok(None);
    };
    let Some(c) = to_re_word(&r.args()[0]).and_then(|d| d.as_char()) else {
        return Ok(None);
    };
    Ok(Some(Term::bool(w.code_points().iter().all(|&x| x == c))))
}

/// A constant against a ground expression, by derivatives.
fn re_in_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    let Some(w) = s.as_word() else {
        return Ok(None);
    };
    Ok(regex::compile(r, &Assignment::new())
        .ok()
        .map(|re| Term::bool(re.matches(w))))
}

/// `(str.in_re s (str.to_re t))` → `(= s t)`.
fn re_in_str_to_re(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    if r.op() != &Op::ToRe {
        return Ok(None);
    }
    Term::mk_eq(s, &r.args()[0]).map(Some)
}

/// A concatenation of `re.allchar` and `re.all` constrains only the
/// length.
fn re_concat_pure_allchar(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    if r.op() != &Op::ReConcat {
        return Ok(None);
    }
    let mut chars = 0usize;
    let mut open = false;
    for part in r.args() {
        if part.op() == &Op::ReAllChar {
            chars += 1;
        } else if is_sigma_star(part) {
            open = true;
        } else {
            return Ok(None);
        }
    }
    let length = len(s)?;
    let k = Term::int(chars);
    if open {
        Term::mk_leq(&k, &length).map(Some)
    } else {
        Term::mk_eq(&length, &k).map(Some)
    }
}

/// `(str.in_re s (re.++ re.all (str.to_re t) re.all))` →
/// `(str.contains s t)`.
fn re_concat_to_contains(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    match r.args() {
        [pre, mid, post]
            if r.op() == &Op::ReConcat
                && is_sigma_star(pre)
                && is_sigma_star(post)
                && mid.op() == &Op::ToRe =>
        {
            Term::mk_contains(s, &mid.args()[0]).map(Some)
        }
        _ => Ok(None),
    }
}

/// Consume the common prefix of a leading string constant and a leading
/// `str.to_re` constant; a mismatch decides membership.
fn re_simple_consume(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, r) = parts(t);
    if r.op() != &Op::ReConcat {
        return Ok(None);
    }
    let Some((c, s_rest)) = split_leading_word(s) else {
        return Ok(None);
    };
    let Some(d) = to_re_word(&r.args()[0]) else {
        return Ok(None);
    };
    if c.is_empty() || d.is_empty() {
        return Ok(None);
    }
    let k = c.common_prefix_len(d);
    if k < c.len() && k < d.len() {
        return Ok(Some(Term::bool(false)));
    }
    let s_new = if k == c.len() {
        Term::concat_of(s_rest.iter().cloned())?
    } else {
        cons(Term::string(c.suffix_from(k)), s_rest)?
    };
    let mut r_parts = Vec::with_capacity(r.args().len());
    if k < d.len() {
        r_parts.push(Term::mk_to_re(&Term::string(d.suffix_from(k)))?);
    }
    r_parts.extend(r.args()[1..].iter().cloned());
    Term::mk_in_re(&s_new, &re_concat_of(r_parts)?).map(Some)
}

// --- operators ---

/// Inline nested `re.++`.
fn re_concat_flatten(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (flat, changed) = flatten(t.args(), &Op::ReConcat);
    if !changed {
        return Ok(None);
    }
    re_concat_of(flat.into_vec()).map(Some)
}

/// `re.none` absorbs, `(str.to_re "")` is dropped and adjacent constant
/// `str.to_re` parts merge.
fn re_concat(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if t.args().iter().any(|part| part.op() == &Op::ReNone) {
        return Ok(Some(Term::re_none()));
    }
    let mut changed = false;
    let mut out: Vec<Term> = Vec::with_capacity(t.args().len());
    for part in t.args() {
        if to_re_word(part).is_some_and(|w| w.is_empty()) {
            changed = true;
            continue;
        }
        let merged = match (out.last().and_then(to_re_word), to_re_word(part)) {
            (Some(prev), Some(w)) => Some(prev.concat(w)),
            _ => None,
        };
        match merged {
            Some(word) => {
                out.pop();
                out.push(Term::mk_to_re(&Term::string(word))?);
                changed = true;
            }
            None => out.push(part.clone()),
        }
    }
    if !changed {
        return Ok(None);
    }
    re_concat_of(out).map(Some)
}

/// Adjacent equal stars, or adjacent `re.all`, collapse.
fn re_concat_opt(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let mut changed = false;
    let mut out: Vec<Term> = Vec::with_capacity(t.args().len());
    for part in t.args() {
        let redundant = out.last().is_some_and(|prev| {
            (is_sigma_star(prev) && is_sigma_star(part))
                || (prev.op() == &Op::ReStar && prev == part)
        });
        if redundant {
            changed = true;
        } else {
            out.push(part.clone());
        }
    }
    if !changed {
        return Ok(None);
    }
    re_concat_of(out).map(Some)
}

/// Flatten `re.union` / `re.inter`, drop their unit and duplicates.
fn re_andor_flatten(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let op = t.op();
    let is_union = op == &Op::ReUnion;
    let is_unit = |r: &Term| {
        if is_union {
            r.op() == &Op::ReNone
        } else {
            is_sigma_star(r)
        }
    };
    let (flat, mut changed) = flatten(t.args(), op);
    let mut out: Vec<Term> = Vec::with_capacity(flat.len());
    for part in flat {
        if is_unit(&part) || out.contains(&part) {
            changed = true;
        } else {
            out.push(part);
        }
    }
    if !changed {
        return Ok(None);
    }
    match out.len() {
        0 if is_union => Ok(Some(Term::re_none())),
        0 => Ok(Some(Term::re_all())),
        1 => Ok(out.pop()),
        _ => Term::app(op.clone(), out).map(Some),
    }
}

/// A union with `re.all` is `re.all`.
fn re_or_all(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(t.args().iter().any(is_sigma_star).then(Term::re_all))
}

/// An intersection with `re.none`, or of two distinct constant words, is
/// empty.
fn re_and_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let args = t.args();
    if args.iter().any(|r| r.op() == &Op::ReNone) {
        return Ok(Some(Term::re_none()));
    }
    let mut words = args.iter().filter_map(to_re_word);
    if let Some(first) = words.next()
        && words.any(|w| w != first)
    {
        return Ok(Some(Term::re_none()));
    }
    Ok(None)
}

/// `(re.* re.none)` → `(str.to_re "")`.
fn re_star_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if t.args()[0].op() == &Op::ReNone {
        return re_epsilon().map(Some);
    }
    Ok(None)
}

/// `(re.* (str.to_re ""))` → `(str.to_re "")`.
fn re_star_empty_string(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = &t.args()[0];
    Ok(to_re_word(inner)
        .is_some_and(|w| w.is_empty())
        .then(|| inner.clone()))
}

/// `(re.* (re.* r))` → `(re.* r)`.
fn re_star_nested_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = &t.args()[0];
    Ok((inner.op() == &Op::ReStar).then(|| inner.clone()))
}

/// `(re.* (re.union (str.to_re "") r …))` → `(re.* (re.union r …))`.
fn re_star_union(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = &t.args()[0];
    if inner.op() != &Op::ReUnion {
        return Ok(None);
    }
    let is_epsilon = |r: &Term| to_re_word(r).is_some_and(|w| w.is_empty());
    if !inner.args().iter().any(is_epsilon) {
        return Ok(None);
    }
    let mut rest: Vec<Term> = inner.args().iter().filter(|&r| !is_epsilon(r)).cloned().collect();
    let body = match rest.len() {
        0 => return re_epsilon().map(Some),
        1 => rest.remove(0),
        _ => Term::mk_re_union(rest)?,
    };
    Term::mk_re_star(&body).map(Some)
}

/// Empty, zero-width and single-iteration loops.
fn re_loop(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Op::ReLoop { lo, hi } = *t.op() else {
        return Ok(None);
    };
    if lo > hi {
        return Ok(Some(Term::re_none()));
    }
    if hi == 0 {
        return re_epsilon().map(Some);
    }
    Ok((lo == 1 && hi == 1).then(|| t.args()[0].clone()))
}

/// `((_ re.loop lo hi) (re.* r))` with `hi >= 1` → `(re.* r)`.
fn re_loop_star(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Op::ReLoop { lo, hi } = *t.op() else {
        return Ok(None);
    };
    let inner = &t.args()[0];
    Ok((lo <= hi && hi >= 1 && inner.op() == &Op::ReStar).then(|| inner.clone()))
}

#[cfg(test)]
mod tests {
    use super::super::util::fixtures::*;
    use super::*;

    fn to_re(w: &str) -> Term {
        Term::mk_to_re(&lit(w)).unwrap()
    }

    fn star(r: &Term) -> Term {
        Term::mk_re_star(r).unwrap()
    }

    fn in_re(s: &Term, r: &Term) -> Term {
        Term::mk_in_re(s, r).unwrap()
    }

    fn re_cat(parts: &[Term]) -> Term {
        Term::mk_re_concat(parts.to_vec()).unwrap()
    }

    #[test]
    fn test_trivial_membership() {
        let x = s("x");
        assert_eq!(fire(re_in_none, &in_re(&x, &Term::re_none())), Some(Term::bool(false)));
        let sigma = star(&Term::re_allchar());
        assert_eq!(fire(re_in_sigma_star, &in_re(&x, &sigma)), Some(Term::bool(true)));
        let r = star(&to_re("ab"));
        assert_eq!(fire(re_empty_in_str_star, &in_re(&lit(""), &r)), Some(Term::bool(true)));
        assert_eq!(fire(re_char_in_str_star, &in_re(&lit("a"), &r)), Some(in_re(&lit("a"), &to_re("ab"))));
        let aa = star(&to_re("a"));
        assert_eq!(fire(re_in_dist_char_star, &in_re(&lit("aaa"), &aa)), Some(Term::bool(true)));
        assert_eq!(fire(re_in_dist_char_star, &in_re(&lit("aba"), &aa)), Some(Term::bool(false)));
    }

    #[test]
    fn test_ground_membership() {
        let r = re_cat(&[to_re("a"), star(&Term::mk_re_range(&lit("0"), &lit("9")).unwrap())]);
        assert_eq!(fire(re_in_eval, &in_re(&lit("a12"), &r)), Some(Term::bool(true)));
        assert_eq!(fire(re_in_eval, &in_re(&lit("a1b"), &r)), Some(Term::bool(false)));
        let open = Term::mk_to_re(&s("y")).unwrap();
        assert_eq!(fire(re_in_eval, &in_re(&lit("a"), &open)), None);
        assert_eq!(
            fire(re_in_str_to_re, &in_re(&s("x"), &open)),
            Some(Term::mk_eq(&s("x"), &s("y")).unwrap())
        );
    }

    #[test]
    fn test_length_only_patterns() {
        let x = s("x");
        let len_x = Term::mk_len(&x).unwrap();
        let two = re_cat(&[Term::re_allchar(), Term::re_allchar()]);
        assert_eq!(
            fire(re_concat_pure_allchar, &in_re(&x, &two)),
            Some(Term::mk_eq(&len_x, &int(2)).unwrap())
        );
        let at_least = re_cat(&[Term::re_allchar(), Term::re_all()]);
        assert_eq!(
            fire(re_concat_pure_allchar, &in_re(&x, &at_least)),
            Some(Term::mk_leq(&int(1), &len_x).unwrap())
        );
        let inside = re_cat(&[Term::re_all(), Term::mk_to_re(&s("y")).unwrap(), Term::re_all()]);
        assert_eq!(
            fire(re_concat_to_contains, &in_re(&x, &inside)),
            Some(Term::mk_contains(&x, &s("y")).unwrap())
        );
    }

    #[test]
    fn test_simple_consume() {
        let x = s("x");
        let y_re = Term::mk_to_re(&s("y")).unwrap();
        let t = in_re(&cat(&[lit("ab"), x.clone()]), &re_cat(&[to_re("a"), y_re.clone()]));
        assert_eq!(
            fire(re_simple_consume, &t),
            Some(in_re(&cat(&[lit("b"), x.clone()]), &y_re))
        );
        let t = in_re(&cat(&[lit("ab"), x.clone()]), &re_cat(&[to_re("ac"), y_re.clone()]));
        assert_eq!(fire(re_simple_consume, &t), Some(Term::bool(false)));
    }

    #[test]
    fn test_concat_operators() {
        let y_re = Term::mk_to_re(&s("y")).unwrap();
        let nested = re_cat(&[to_re("a"), re_cat(&[to_re("b"), y_re.clone()])]);
        assert_eq!(
            fire(re_concat_flatten, &nested),
            Some(re_cat(&[to_re("a"), to_re("b"), y_re.clone()]))
        );
        let merge = re_cat(&[to_re("a"), to_re("b"), to_re(""), y_re.clone()]);
        assert_eq!(fire(re_concat, &merge), Some(re_cat(&[to_re("ab"), y_re.clone()])));
        let none = re_cat(&[y_re.clone(), Term::re_none()]);
        assert_eq!(fire(re_concat, &none), Some(Term::re_none()));
        let stars = re_cat(&[star(&y_re), star(&y_re), Term::re_all(), Term::re_all()]);
        assert_eq!(fire(re_concat_opt, &stars), Some(re_cat(&[star(&y_re), Term::re_all()])));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = to_re("a");
        let b = to_re("b");
        let u = Term::mk_re_union([a.clone(), Term::mk_re_union([b.clone(), a.clone()]).unwrap()]).unwrap();
        assert_eq!(
            fire(re_andor_flatten, &u),
            Some(Term::mk_re_union([a.clone(), b.clone()]).unwrap())
        );
        let u = Term::mk_re_union([a.clone(), Term::re_none()]).unwrap();
        assert_eq!(fire(re_andor_flatten, &u), Some(a.clone()));
        let u = Term::mk_re_union([a.clone(), Term::re_all()]).unwrap();
        assert_eq!(fire(re_or_all, &u), Some(Term::re_all()));
        let i = Term::mk_re_inter([a.clone(), b.clone()]).unwrap();
        assert_eq!(fire(re_and_empty, &i), Some(Term::re_none()));
        let i = Term::mk_re_inter([a.clone(), star(&a)]).unwrap();
        assert_eq!(fire(re_and_empty, &i), None);
    }

    #[test]
    fn test_star_and_loop() {
        let a = to_re("a");
        let eps = to_re("");
        assert_eq!(fire(re_star_empty, &star(&Term::re_none())), Some(eps.clone()));
        assert_eq!(fire(re_star_empty_string, &star(&eps)), Some(eps.clone()));
        assert_eq!(fire(re_star_nested_star, &star(&star(&a))), Some(star(&a)));
        let opt = Term::mk_re_union([eps.clone(), a.clone()]).unwrap();
        assert_eq!(fire(re_star_union, &star(&opt)), Some(star(&a)));

        assert_eq!(fire(re_loop, &Term::mk_re_loop(&a, 3, 2).unwrap()), Some(Term::re_none()));
        assert_eq!(fire(re_loop, &Term::mk_re_loop(&a, 0, 0).unwrap()), Some(eps));
        assert_eq!(fire(re_loop, &Term::mk_re_loop(&a, 1, 1).unwrap()), Some(a.clone()));
        assert_eq!(fire(re_loop, &Term::mk_re_loop(&a, 1, 2).unwrap()), None);
        assert_eq!(fire(re_loop_star, &Term::mk_re_loop(&star(&a), 2, 4).unwrap()), Some(star(&a)));
    }
}
