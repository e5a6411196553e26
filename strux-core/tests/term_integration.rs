//! Integration tests for the term model
//!
//! These tests exercise the public construction API the way the rewriter
//! uses it:
//! - Checked constructors and their error values
//! - Structural equality and hashing of independently built terms
//! - Depth-limited printing

use rustc_hash::FxHashSet;
use strux_core::{Arity, Op, Sort, Term, TermError, Word};

fn str_var(name: &str) -> Term {
    Term::var(name, Sort::String)
}

fn lit(w: &str) -> Term {
    Term::mk_string(w).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_every_string_operator_builds() {
    let x = str_var("x");
    let y = str_var("y");
    let n = Term::var("n", Sort::Int);

    let built = [
        Term::mk_len(&x),
        Term::mk_substr(&x, &n, &n),
        Term::mk_indexof(&x, &y, &n),
        Term::mk_replace(&x, &y, &x),
        Term::mk_replace_all(&x, &y, &x),
        Term::mk_contains(&x, &y),
        Term::mk_prefixof(&x, &y),
        Term::mk_suffixof(&x, &y),
        Term::mk_to_code(&x),
        Term::mk_from_code(&n),
        Term::mk_to_int(&x),
        Term::mk_from_int(&n),
        Term::mk_to_lower(&x),
        Term::mk_to_upper(&x),
        Term::mk_rev(&x),
        Term::mk_str_leq(&x, &y),
    ];
    for term in built {
        assert!(term.is_ok(), "{term:?}");
    }
}

#[test]
fn test_regex_operators_build() {
    let a = Term::mk_to_re(&lit("a")).unwrap();
    let range = Term::mk_re_range(&lit("a"), &lit("z")).unwrap();
    let star = Term::mk_re_star(&a).unwrap();
    let union = Term::mk_re_union([a.clone(), range.clone(), star.clone()]).unwrap();
    let inter = Term::mk_re_inter([union.clone(), Term::re_all()]).unwrap();
    let comp = Term::mk_re_comp(&inter).unwrap();
    let plus = Term::mk_re_plus(&a).unwrap();
    let opt = Term::mk_re_opt(&a).unwrap();
    for r in [&union, &inter, &comp, &plus, &opt] {
        assert_eq!(r.sort(), Sort::RegLan);
    }
    let member = Term::mk_in_re(&str_var("x"), &comp).unwrap();
    assert_eq!(member.sort(), Sort::Bool);
}

#[test]
fn test_malformed_terms_are_rejected() {
    let x = str_var("x");
    let n = Term::var("n", Sort::Int);

    assert_eq!(
        Term::app(Op::Replace, [x.clone(), x.clone()]).unwrap_err(),
        TermError::ArityMismatch {
            op: "str.replace",
            expected: Arity::Exactly(3),
            found: 2
        }
    );
    assert_eq!(
        Term::mk_indexof(&x, &n, &n).unwrap_err(),
        TermError::SortMismatch {
            op: "str.indexof",
            position: 1,
            expected: Sort::String,
            found: Sort::Int
        }
    );
    assert!(Term::mk_re_union([Term::re_all()]).is_err());
    assert!(Term::mk_add([n.clone(), x.clone()]).is_err());
    assert!(Word::from_char_code(0x30000).is_err());
}

#[test]
fn test_literals_outside_alphabet_are_rejected() {
    assert_eq!(
        Term::mk_string("a\u{30000}").unwrap_err(),
        TermError::InvalidCodePoint(0x30000)
    );
    assert!("\u{30000}".parse::<Word>().is_err());
    assert!(Term::mk_string("a\u{2FFFF}").is_ok());
}

#[test]
fn test_derived_builders() {
    let a = Term::var("a", Sort::Int);
    let b = Term::var("b", Sort::Int);
    assert_eq!(Term::mk_geq(&a, &b).unwrap(), Term::mk_leq(&b, &a).unwrap());
    let lt = Term::mk_lt(&a, &b).unwrap();
    assert_eq!(lt.op(), &Op::Not);
    assert_eq!(lt.args()[0], Term::mk_leq(&b, &a).unwrap());
}

// ============================================================================
// Equality and hashing
// ============================================================================

#[test]
fn test_independently_built_terms_hash_equal() {
    let build = || {
        let x = str_var("x");
        Term::mk_contains(
            &Term::mk_concat([x.clone(), lit("ab")]).unwrap(),
            &lit("b"),
        )
        .unwrap()
    };
    let mut set = FxHashSet::default();
    set.insert(build());
    set.insert(build());
    assert_eq!(set.len(), 1);
}

#[test]
fn test_literal_payloads() {
    assert_eq!(lit("ab").as_word(), Some(&Word::try_from("ab").unwrap()));
    assert_eq!(Term::int(7).as_int().map(|n| n.to_string()), Some("7".to_string()));
    assert_eq!(Term::bool(false).as_bool(), Some(false));
    assert_eq!(str_var("x").var_name(), Some("x"));
    assert!(Term::empty_string().is_empty_string());
    assert!(!lit("a").is_empty_string());
}

// ============================================================================
// Printing
// ============================================================================

#[test]
fn test_printing() {
    let x = str_var("x");
    let t = Term::mk_replace(&x, &lit("a"), &lit("a")).unwrap();
    assert_eq!(t.to_string(), "(str.replace x \"a\" \"a\")");

    let nested = Term::mk_len(&Term::mk_rev(&Term::mk_rev(&x).unwrap()).unwrap()).unwrap();
    assert_eq!(nested.display_depth(Some(2)).to_string(), "(str.len (str.rev (...)))");
}
