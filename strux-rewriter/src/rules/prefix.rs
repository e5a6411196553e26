//! `str.prefixof`, `str.suffixof` and `str.<=`.
//!
//! `(str.prefixof s t)` holds when `s` is a prefix of `t`; the suffix
//! variant reads from the end. Both share one table and dispatch on the
//! operator.

use super::util::{is_empty_eq, len, non_empty_lit, split_leading_word, split_trailing_word};
use super::{Rule, RuleContext, RuleResult};
use crate::rewrites::RewriteId;
use strux_core::{Op, Term, Word};

pub(super) static AFFIX_RULES: &[Rule] = &[
    Rule::size(RewriteId::SufPrefixEmpty, suf_prefix_empty),
    Rule::lex(
        RewriteId::SufPrefixConst,
        "affix literals shorten",
        suf_prefix_const,
    ),
    Rule::lex(
        RewriteId::SufPrefixEmptyConst,
        "affix tests become equalities",
        suf_prefix_empty_const,
    ),
    Rule::lex(
        RewriteId::SufPrefixEq,
        "affix tests become equalities",
        suf_prefix_eq,
    ),
    Rule::size(RewriteId::SufPrefixCtn, suf_prefix_ctn),
    Rule::lex(
        RewriteId::SufPrefixToEqs,
        "affix tests become equalities",
        suf_prefix_to_eqs,
    ),
];

pub(super) static STR_LEQ_RULES: &[Rule] = &[
    Rule::size(RewriteId::StrLeqEval, str_leq_eval),
    Rule::size(RewriteId::StrLeqId, str_leq_id),
    Rule::lex(
        RewriteId::StrLeqEmpty,
        "str.<= becomes an equality",
        str_leq_empty,
    ),
    Rule::lex(
        RewriteId::StrLeqCprefix,
        "leading literals shorten",
        str_leq_cprefix,
    ),
];

fn parts(t: &Term) -> (&Term, &Term) {
    let args = t.args();
    (&args[0], &args[1])
}

fn is_suffix(t: &Term) -> bool {
    t.op() == &Op::SuffixOf
}

fn verdict(b: bool) -> RuleResult {
    Ok(Some(Term::bool(b)))
}

/// The empty string is an affix of everything.
fn suf_prefix_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, _) = parts(t);
    Ok(s.is_empty_string().then(|| Term::bool(true)))
}

/// Constants fold; otherwise the literal at the tested end of both sides
/// either disagrees or loses its common part.
fn suf_prefix_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    let suffix = is_suffix(t);
    if let (Some(a), Some(b)) = (s.as_word(), u.as_word()) {
        return verdict(if suffix { b.ends_with(a) } else { b.starts_with(a) });
    }
    if suffix {
        let (Some((s_init, a)), Some((u_init, b))) = (split_trailing_word(s), split_trailing_word(u))
        else {
            return Ok(None);
        };
        let common = a.common_suffix_len(b);
        if common < a.len() && common < b.len() {
            return verdict(false);
        }
        if common == 0 {
            return Ok(None);
        }
        let a = a.slice(0, a.len() - common);
        let b = b.slice(0, b.len() - common);
        let s = Term::concat_of(s_init.iter().cloned().chain(non_empty_lit(a)))?;
        let u = Term::concat_of(u_init.iter().cloned().chain(non_empty_lit(b)))?;
        Term::mk_suffixof(&s, &u).map(Some)
    } else {
        let (Some((a, s_rest)), Some((b, u_rest))) = (split_leading_word(s), split_leading_word(u))
        else {
            return Ok(None);
        };
        let common = a.common_prefix_len(b);
        if common < a.len() && common < b.len() {
            return verdict(false);
        }
        if common == 0 {
            return Ok(None);
        }
        let s = strip_leading(a, common, s_rest)?;
        let u = strip_leading(b, common, u_rest)?;
        Term::mk_prefixof(&s, &u).map(Some)
    }
}

fn strip_leading(word: &Word, count: usize, rest: &[Term]) -> strux_core::Result<Term> {
    let head = non_empty_lit(word.suffix_from(count));
    Term::concat_of(head.into_iter().chain(rest.iter().cloned()))
}

/// Only the empty string is an affix of `""`.
fn suf_prefix_empty_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    if !u.is_empty_string() {
        return Ok(None);
    }
    is_empty_eq(s).map(Some)
}

/// An affix at least as long as the string is the string itself.
fn suf_prefix_eq(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    if s == u {
        return verdict(true);
    }
    if ctx.oracle.arith_geq(&len(s)?, &len(u)?).is_yes() {
        return Term::mk_eq(s, u).map(Some);
    }
    Ok(None)
}

/// Every affix is contained.
fn suf_prefix_ctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    if ctx.oracle.contains(u, s).is_no() {
        return verdict(false);
    }
    Ok(None)
}

fn suf_prefix_to_eqs(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    if ctx.oracle.equal_length(s, u).is_yes() {
        return Term::mk_eq(s, u).map(Some);
    }
    Ok(None)
}

/// Lexicographic order of two constants.
fn str_leq_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    let (Some(a), Some(b)) = (s.as_word(), u.as_word()) else {
        return Ok(None);
    };
    verdict(a <= b)
}

fn str_leq_id(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    Ok((s == u).then(|| Term::bool(true)))
}

/// `""` is the least string.
fn str_leq_empty(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    if s.is_empty_string() {
        return verdict(true);
    }
    if u.is_empty_string() {
        return is_empty_eq(s).map(Some);
    }
    Ok(None)
}

/// Common leading characters do not affect the order; the first
/// differing character decides it.
fn str_leq_cprefix(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (s, u) = parts(t);
    let (Some((a, s_rest)), Some((b, u_rest))) = (split_leading_word(s), split_leading_word(u))
    else {
        return Ok(None);
    };
    let common = a.common_prefix_len(b);
    if common < a.len() && common < b.len() {
        let (ca, cb) = (a.code_points()[common], b.code_points()[common]);
        return verdict(ca < cb);
    }
    if common == 0 {
        return Ok(None);
    }
    let s = strip_leading(a, common, s_rest)?;
    let u = strip_leading(b, common, u_rest)?;
    Term::mk_str_leq(&s, &u).map(Some)
}

#[cfg(test)]
mod tests {
    use super::super::util::fixtures::*;
    use super::*;

    fn prefixof(s: &Term, t: &Term) -> Term {
        Term::mk_prefixof(s, t).unwrap()
    }

    fn suffixof(s: &Term, t: &Term) -> Term {
        Term::mk_suffixof(s, t).unwrap()
    }

    fn leq(s: &Term, t: &Term) -> Term {
        Term::mk_str_leq(s, t).unwrap()
    }

    #[test]
    fn test_affix_constants() {
        let t = Term::bool(true);
        let f = Term::bool(false);
        assert_eq!(fire(suf_prefix_const, &prefixof(&lit("ab"), &lit("abc"))), Some(t.clone()));
        assert_eq!(fire(suf_prefix_const, &suffixof(&lit("bc"), &lit("abc"))), Some(t));
        assert_eq!(fire(suf_prefix_const, &suffixof(&lit("ab"), &lit("abc"))), Some(f.clone()));
        assert_eq!(fire(suf_prefix_empty, &prefixof(&lit(""), &s("x"))), Some(Term::bool(true)));

        let x = s("x");
        let y = s("y");
        let mismatch = prefixof(&cat(&[lit("ab"), x.clone()]), &cat(&[lit("ac"), y.clone()]));
        assert_eq!(fire(suf_prefix_const, &mismatch), Some(f));
        let strip = prefixof(&cat(&[lit("ab"), x.clone()]), &cat(&[lit("abc"), y.clone()]));
        assert_eq!(
            fire(suf_prefix_const, &strip),
            Some(prefixof(&x, &cat(&[lit("c"), y.clone()])))
        );
        let strip = suffixof(&cat(&[x.clone(), lit("bc")]), &cat(&[y.clone(), lit("c")]));
        assert_eq!(
            fire(suf_prefix_const, &strip),
            Some(suffixof(&cat(&[x.clone(), lit("b")]), &y))
        );
    }

    #[test]
    fn test_affix_equalities() {
        let x = s("x");
        let y = s("y");
        assert_eq!(
            fire(suf_prefix_empty_const, &prefixof(&x, &lit(""))),
            Some(Term::mk_eq(&x, &lit("")).unwrap())
        );
        assert_eq!(fire(suf_prefix_eq, &suffixof(&x, &x)), Some(Term::bool(true)));
        let longer = cat(&[y.clone(), x.clone()]);
        assert_eq!(
            fire(suf_prefix_eq, &prefixof(&longer, &x)),
            Some(Term::mk_eq(&longer, &x).unwrap())
        );
        assert_eq!(fire(suf_prefix_eq, &prefixof(&x, &y)), None);
        let rev = cat(&[x.clone(), y.clone()]);
        assert_eq!(
            fire(suf_prefix_to_eqs, &prefixof(&longer, &rev)),
            Some(Term::mk_eq(&longer, &rev).unwrap())
        );
    }

    #[test]
    fn test_affix_not_contained() {
        let t = prefixof(&lit("z"), &lit("abc"));
        assert_eq!(fire(suf_prefix_ctn, &t), Some(Term::bool(false)));
        assert_eq!(fire(suf_prefix_ctn, &prefixof(&lit("a"), &s("x"))), None);
    }

    #[test]
    fn test_str_leq() {
        let x = s("x");
        let y = s("y");
        assert_eq!(fire(str_leq_eval, &leq(&lit("ab"), &lit("b"))), Some(Term::bool(true)));
        assert_eq!(fire(str_leq_eval, &leq(&lit("b"), &lit("ab"))), Some(Term::bool(false)));
        assert_eq!(fire(str_leq_eval, &leq(&lit("a"), &lit("ab"))), Some(Term::bool(true)));
        assert_eq!(fire(str_leq_id, &leq(&x, &x)), Some(Term::bool(true)));
        assert_eq!(fire(str_leq_empty, &leq(&lit(""), &x)), Some(Term::bool(true)));
        assert_eq!(
            fire(str_leq_empty, &leq(&x, &lit(""))),
            Some(Term::mk_eq(&x, &lit("")).unwrap())
        );
        let t = leq(&cat(&[lit("ab"), x.clone()]), &cat(&[lit("ac"), y.clone()]));
        assert_eq!(fire(str_leq_cprefix, &t), Some(Term::bool(true)));
        let t = leq(&cat(&[lit("ab"), x.clone()]), &cat(&[lit("a"), y.clone()]));
        assert_eq!(
            fire(str_leq_cprefix, &t),
            Some(leq(&cat(&[lit("b"), x.clone()]), &y))
        );
    }
}
