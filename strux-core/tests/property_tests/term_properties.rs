//! Property-based tests for term construction
//!
//! Verifies cached metadata against freshly computed values.

use proptest::prelude::*;
use strux_core::{Sort, Term};

fn string_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        Just(Term::var("x", Sort::String)),
        Just(Term::var("y", Sort::String)),
        "[ab]{0,3}".prop_map(|s| Term::mk_string(&s).unwrap()),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::mk_concat([a, b]).unwrap()),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| Term::mk_replace(&a, &b, &c).unwrap()),
            (inner.clone(), -2i64..4, 0i64..4).prop_map(|(s, i, n)| {
                Term::mk_substr(&s, &Term::int(i), &Term::int(n)).unwrap()
            }),
            inner.prop_map(|s| Term::mk_rev(&s).unwrap()),
        ]
    })
}

fn recount(t: &Term) -> u64 {
    1 + t.args().iter().map(recount).sum::<u64>()
}

fn rebuild(t: &Term) -> Term {
    if t.args().is_empty() {
        return t.clone();
    }
    let args: Vec<Term> = t.args().iter().map(rebuild).collect();
    t.with_args(args).unwrap()
}

proptest! {
    /// Cached size matches a recount of the tree
    #[test]
    fn cached_size_is_tree_size(t in string_term()) {
        prop_assert_eq!(t.size(), recount(&t));
    }

    /// Rebuilding from scratch yields an equal term
    #[test]
    fn rebuilt_term_is_equal(t in string_term()) {
        prop_assert_eq!(rebuild(&t), t);
    }

    /// Every generated term has sort String
    #[test]
    fn string_operators_keep_sort(t in string_term()) {
        prop_assert_eq!(t.sort(), Sort::String);
    }
}
