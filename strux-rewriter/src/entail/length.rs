//! Length bounds of string terms.
//!
//! Bounds follow from the term structure alone: literals have a fixed
//! length, concatenation adds lengths, and each string operator bounds its
//! result by its arguments.

use super::arith::int_interval;
use super::interval::Interval;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use strux_core::{Op, Term};

/// Interval of `str.len(term)`; always within `[0, ∞)`.
pub fn length_interval(term: &Term) -> Interval {
    let args = term.args();
    match term.op() {
        Op::Str(w) => Interval::point(BigInt::from(w.len())),
        Op::Concat => args
            .iter()
            .fold(Interval::point(BigInt::zero()), |acc, part| {
                acc.add(&length_interval(part))
            }),
        Op::Substr => {
            let whole = length_interval(&args[0]);
            let window = int_interval(&args[2]).non_negative();
            let max = match (whole.max, window.max) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            Interval {
                min: Some(BigInt::zero()),
                max,
            }
        }
        Op::Replace => {
            let x = length_interval(&args[0]);
            let t = length_interval(&args[1]);
            let r = length_interval(&args[2]);
            // Either nothing is replaced or |x| - |t| + |r|.
            let replaced = Interval {
                min: match (&x.min, &t.max, &r.min) {
                    (Some(x), Some(t), Some(r)) => Some(x - t + r),
                    _ => None,
                },
                max: match (&x.max, &t.min, &r.max) {
                    (Some(x), Some(t), Some(r)) => Some(x - t + r),
                    _ => None,
                },
            };
            x.hull(&replaced).non_negative()
        }
        Op::ReplaceAll => {
            let x = length_interval(&args[0]);
            let t = length_interval(&args[1]);
            let r = length_interval(&args[2]);
            let shrinking = t.all_geq(&BigInt::one())
                && matches!((&r.max, &t.min), (Some(r), Some(t)) if r <= t);
            if shrinking {
                Interval {
                    min: Some(BigInt::zero()),
                    max: x.max,
                }
            } else {
                Interval::any_length()
            }
        }
        Op::FromCode => Interval::bounded(BigInt::zero(), BigInt::one()),
        Op::ToLower | Op::ToUpper | Op::Rev => length_interval(&args[0]),
        Op::Ite => length_interval(&args[1]).hull(&length_interval(&args[2])),
        _ => Interval::any_length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strux_core::Sort;

    fn lit(w: &str) -> Term {
        Term::mk_string(w).unwrap()
    }

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_literal_and_concat() {
        let x = Term::var("x", Sort::String);
        let t = Term::mk_concat([lit("ab"), x, lit("c")]).unwrap();
        assert_eq!(length_interval(&t), Interval::at_least(int(3)));
    }

    #[test]
    fn test_substr_bounded_by_window() {
        let x = Term::var("x", Sort::String);
        let t = Term::mk_substr(&x, &Term::int(0), &Term::int(2)).unwrap();
        assert_eq!(length_interval(&t), Interval::bounded(int(0), int(2)));
        let neg = Term::mk_substr(&x, &Term::int(0), &Term::int(-2)).unwrap();
        assert_eq!(length_interval(&neg), Interval::point(int(0)));
    }

    #[test]
    fn test_replace_bounds() {
        let x = Term::var("x", Sort::String);
        let r = Term::mk_replace(&lit("abcd"), &x, &lit("z")).unwrap();
        // Nothing replaced (4) up to an empty pattern prepending "z" (5).
        assert_eq!(length_interval(&r).max, Some(int(5)));
        assert_eq!(length_interval(&r).min, Some(int(0)));

        let ra = Term::mk_replace_all(&x, &lit("ab"), &lit("")).unwrap();
        assert_eq!(length_interval(&ra), Interval::any_length());
        let rb = Term::mk_replace_all(&lit("abab"), &lit("ab"), &lit("c"))
            .unwrap();
        assert_eq!(length_interval(&rb), Interval::bounded(int(0), int(4)));
    }
}
