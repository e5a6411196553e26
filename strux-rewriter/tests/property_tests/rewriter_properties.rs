//! Property-based tests for the rewrite engine
//!
//! Normal forms are stable, reproducible and keep the value of the input.
//! Generated terms reach every string, conversion and regex operator, with
//! symbolic integer arguments and literal-headed equations.

use proptest::prelude::*;
use strux_core::{Sort, Term, Word};
use strux_rewriter::{Assignment, RewriteConfig, StringsRewriter, Value, eval};

fn lit(w: &str) -> Term {
    Term::mk_string(w).unwrap()
}

fn checked() -> StringsRewriter {
    StringsRewriter::new().with_config(RewriteConfig::default().with_measure_check(true))
}

fn int_leaf() -> impl Strategy<Value = Term> {
    prop_oneof![
        (-1i64..4).prop_map(Term::int),
        Just(Term::var("n", Sort::Int)),
    ]
}

/// Integer arguments over `strs`: constants, `n`, and string measures.
fn int_over(strs: BoxedStrategy<Term>) -> impl Strategy<Value = Term> {
    prop_oneof![
        3 => int_leaf(),
        1 => strs.clone().prop_map(|s| Term::mk_len(&s).unwrap()),
        1 => strs.clone().prop_map(|s| Term::mk_to_code(&s).unwrap()),
        1 => strs.prop_map(|s| Term::mk_to_int(&s).unwrap()),
    ]
}

fn string_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        Just(Term::var("x", Sort::String)),
        Just(Term::var("y", Sort::String)),
        "[ab1A]{0,3}".prop_map(|s| lit(&s)),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::mk_concat([a, b]).unwrap()),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| Term::mk_replace(&a, &b, &c).unwrap()),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| Term::mk_replace_all(&a, &b, &c).unwrap()),
            (inner.clone(), int_over(inner.clone()), int_over(inner.clone()))
                .prop_map(|(s, i, n)| Term::mk_substr(&s, &i, &n).unwrap()),
            inner.clone().prop_map(|s| Term::mk_rev(&s).unwrap()),
            inner.clone().prop_map(|s| Term::mk_to_lower(&s).unwrap()),
            inner.clone().prop_map(|s| Term::mk_to_upper(&s).unwrap()),
            int_over(inner.clone()).prop_map(|n| Term::mk_from_int(&n).unwrap()),
            int_over(inner).prop_map(|n| Term::mk_from_code(&n).unwrap()),
        ]
    })
}

fn regex_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        string_term().prop_map(|s| Term::mk_to_re(&s).unwrap()),
        Just(Term::re_allchar()),
        Just(Term::re_none()),
        Just(Term::re_all()),
        ("[ab]", "[ab]").prop_map(|(lo, hi)| Term::mk_re_range(&lit(&lo), &lit(&hi)).unwrap()),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::mk_re_concat([a, b]).unwrap()),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::mk_re_union([a, b]).unwrap()),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::mk_re_inter([a, b]).unwrap()),
            inner.clone().prop_map(|r| Term::mk_re_star(&r).unwrap()),
            inner.clone().prop_map(|r| Term::mk_re_comp(&r).unwrap()),
            (inner, 0u64..2, 0u64..2)
                .prop_map(|(r, lo, extra)| Term::mk_re_loop(&r, lo, lo + extra).unwrap()),
        ]
    })
}

/// `(= (str.++ p s) (str.++ p q t))` and its suffix mirror, optionally with
/// one side reduced to its literal.
fn literal_headed_eq() -> impl Strategy<Value = Term> {
    (
        "[ab]{0,2}",
        "[ab]{0,2}",
        string_term(),
        string_term(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(p, q, s, t, suffix, bare)| {
            let long = format!("{p}{q}");
            let side = |w: &str, rest: Term| {
                if suffix {
                    Term::mk_concat([rest, lit(w)]).unwrap()
                } else {
                    Term::mk_concat([lit(w), rest]).unwrap()
                }
            };
            let lhs = if bare { lit(&p) } else { side(&p, s) };
            Term::mk_eq(&lhs, &side(&long, t)).unwrap()
        })
}

fn any_term() -> impl Strategy<Value = Term> {
    let strs = || string_term().boxed();
    prop_oneof![
        string_term(),
        int_over(strs()),
        (string_term(), string_term(), int_over(strs()))
            .prop_map(|(a, b, n)| Term::mk_indexof(&a, &b, &n).unwrap()),
        (string_term(), string_term()).prop_map(|(a, b)| Term::mk_contains(&a, &b).unwrap()),
        (string_term(), string_term()).prop_map(|(a, b)| Term::mk_prefixof(&a, &b).unwrap()),
        (string_term(), string_term()).prop_map(|(a, b)| Term::mk_suffixof(&a, &b).unwrap()),
        (string_term(), string_term()).prop_map(|(a, b)| Term::mk_str_leq(&a, &b).unwrap()),
        (string_term(), string_term()).prop_map(|(a, b)| Term::mk_eq(&a, &b).unwrap()),
        (string_term(), regex_term()).prop_map(|(s, r)| Term::mk_in_re(&s, &r).unwrap()),
        literal_headed_eq(),
    ]
}

fn assignments() -> Vec<Assignment> {
    let words = ["", "a", "b", "ab", "ba", "aab", "1", "A1"];
    let ints = [-1i64, 0, 1, 3];
    let mut out = Vec::new();
    for x in words {
        for y in words {
            for n in ints {
                out.push(
                    Assignment::new()
                        .with("x", Value::Str(x.parse().unwrap()))
                        .with("y", Value::Str(y.parse().unwrap()))
                        .with("n", Value::Int(n.into())),
                );
            }
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Rewriting terminates well inside a step cap and reports no defect
    #[test]
    fn rewrite_terminates_under_cap(t in any_term()) {
        let config = RewriteConfig::default()
            .with_max_steps(Some(10_000))
            .with_measure_check(true);
        let rw = StringsRewriter::new().with_config(config);
        prop_assert!(rw.try_rewrite(&t).is_ok(), "{}", t);
    }

    /// A normal form rewrites to itself without firing a rule
    #[test]
    fn normal_form_is_fixpoint(t in any_term()) {
        let rw = checked();
        let nf = rw.try_rewrite(&t);
        prop_assert!(nf.is_ok(), "{}: {:?}", t, nf);
        let nf = nf.unwrap();
        let (again, trace) = rw.rewrite_with_trace(&nf);
        prop_assert_eq!(again, nf);
        prop_assert!(trace.is_empty());
    }

    /// Fresh rewriters agree on both result and trace
    #[test]
    fn rewrite_is_deterministic(t in any_term()) {
        let (a, ta) = StringsRewriter::new().rewrite_with_trace(&t);
        let (b, tb) = StringsRewriter::new().rewrite_with_trace(&t);
        prop_assert_eq!(a, b);
        prop_assert_eq!(ta, tb);
    }

    /// Memoization does not change the normal form
    #[test]
    fn cache_does_not_change_result(t in any_term()) {
        let cached = StringsRewriter::new().rewrite(&t);
        let uncached = StringsRewriter::new()
            .with_config(RewriteConfig::default().with_cache(false))
            .rewrite(&t);
        prop_assert_eq!(cached, uncached);
    }

    /// Rewriting keeps sort and value under every sample assignment
    #[test]
    fn rewrite_preserves_value(t in any_term()) {
        let nf = checked().try_rewrite(&t);
        prop_assert!(nf.is_ok(), "{}: {:?}", t, nf);
        let nf = nf.unwrap();
        prop_assert_eq!(nf.sort(), t.sort());
        for env in assignments() {
            let before = eval(&t, &env).unwrap();
            let after = eval(&nf, &env).unwrap();
            prop_assert_eq!(before, after, "{} --> {}", t, nf);
        }
    }

    /// Ground string terms fold to the literal they evaluate to
    #[test]
    fn ground_terms_evaluate_to_literals(t in string_term()) {
        let env = Assignment::new()
            .with("x", Value::Str(Word::try_from("ab").unwrap()))
            .with("y", Value::Str(Word::try_from("b").unwrap()))
            .with("n", Value::Int(1.into()));
        let ground = substitute(&t);
        let nf = checked().rewrite(&ground);
        prop_assert!(nf.is_literal(), "{} did not fold: {}", ground, nf);
        prop_assert_eq!(eval(&nf, &env).unwrap(), eval(&t, &env).unwrap());
    }
}

fn substitute(t: &Term) -> Term {
    match t.var_name() {
        Some("x") => lit("ab"),
        Some("y") => lit("b"),
        Some("n") => Term::int(1),
        _ if t.args().is_empty() => t.clone(),
        _ => t
            .with_args(t.args().iter().map(substitute).collect::<Vec<_>>())
            .unwrap(),
    }
}
