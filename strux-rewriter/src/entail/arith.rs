//! Linear integer expressions over length and integer atoms.
//!
//! An integer term is flattened into `c + Σ aᵢ·xᵢ`, where each atom `xᵢ` is
//! either the length of a non-constant string component or an integer term
//! the flattening cannot see through. Interval bounds of the atoms then give
//! an interval for the whole expression.

use super::interval::Interval;
use super::length::length_interval;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use strux_core::{MAX_CODE_POINT, Op, Term};

/// Atom of a linear expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// `str.len` of a string term that is not a concatenation or literal
    Len(Term),
    /// Opaque integer term
    Int(Term),
}

/// `constant + Σ coeff·atom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linear {
    /// Constant part
    pub constant: BigInt,
    /// Atoms with their non-zero coefficients
    pub coeffs: Vec<(Atom, BigInt)>,
}

impl Linear {
    /// The constant `n`.
    pub fn constant(n: BigInt) -> Self {
        Self {
            constant: n,
            coeffs: Vec::new(),
        }
    }

    fn atom(atom: Atom) -> Self {
        Self {
            constant: BigInt::zero(),
            coeffs: vec![(atom, BigInt::one())],
        }
    }

    /// Linear form of an integer term.
    pub fn of_int(term: &Term) -> Self {
        match term.op() {
            Op::Int(n) => Self::constant(n.clone()),
            Op::Add => term
                .args()
                .iter()
                .fold(Self::constant(BigInt::zero()), |acc, arg| {
                    acc.plus(&Self::of_int(arg), &BigInt::one())
                }),
            Op::Sub => Self::of_int(&term.args()[0]).minus(&Self::of_int(&term.args()[1])),
            Op::Length => Self::of_length(&term.args()[0]),
            _ => Self::atom(Atom::Int(term.clone())),
        }
    }

    /// Linear form of `str.len(s)`.
    pub fn of_length(s: &Term) -> Self {
        let mut out = Self::constant(BigInt::zero());
        for part in s.concat_components() {
            match part.as_word() {
                Some(w) => out.constant += w.len(),
                None => out.add_atom(Atom::Len(part.clone()), &BigInt::one()),
            }
        }
        out
    }

    /// `self + k·other`.
    pub fn plus(mut self, other: &Linear, k: &BigInt) -> Linear {
        self.constant += &other.constant * k;
        for (atom, coeff) in &other.coeffs {
            self.add_atom(atom.clone(), &(coeff * k));
        }
        self
    }

    /// `self - other`.
    pub fn minus(self, other: &Linear) -> Linear {
        self.plus(other, &-BigInt::one())
    }

    fn add_atom(&mut self, atom: Atom, k: &BigInt) {
        if let Some(slot) = self.coeffs.iter_mut().find(|(a, _)| *a == atom) {
            slot.1 += k;
        } else {
            self.coeffs.push((atom, k.clone()));
        }
        self.coeffs.retain(|(_, coeff)| !coeff.is_zero());
    }

    /// If the form is `c + x` for a single atom, that atom and `c`.
    pub fn as_offset_atom(&self) -> Option<(&Atom, &BigInt)> {
        match self.coeffs.as_slice() {
            [(atom, coeff)] if coeff.is_one() => Some((atom, &self.constant)),
            _ => None,
        }
    }

    /// Interval of the expression, with an optional lower bound assumed
    /// for one atom.
    pub fn interval(&self, assume: Option<(&Atom, &BigInt)>) -> Interval {
        self.coeffs
            .iter()
            .fold(Interval::point(self.constant.clone()), |acc, (atom, coeff)| {
                let mut bounds = atom_interval(atom);
                if let Some((assumed, lower)) = assume
                    && assumed == atom
                {
                    bounds = bounds.raise_min(lower);
                }
                acc.add(&bounds.scale(coeff))
            })
    }
}

/// Interval of an atom.
pub fn atom_interval(atom: &Atom) -> Interval {
    match atom {
        Atom::Len(s) => length_interval(s),
        Atom::Int(t) => opaque_int_interval(t),
    }
}

/// Interval of any integer term.
pub fn int_interval(term: &Term) -> Interval {
    Linear::of_int(term).interval(None)
}

fn opaque_int_interval(term: &Term) -> Interval {
    let minus_one = -BigInt::one();
    match term.op() {
        Op::IndexOf => Interval {
            min: Some(minus_one),
            max: length_interval(&term.args()[0]).max,
        },
        Op::ToInt => Interval::at_least(minus_one),
        Op::ToCode => Interval::bounded(minus_one, BigInt::from(MAX_CODE_POINT)),
        Op::Ite => int_interval(&term.args()[1]).hull(&int_interval(&term.args()[2])),
        _ => Interval::unbounded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strux_core::Sort;

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_length_of_concat_is_flattened() {
        let x = Term::var("x", Sort::String);
        let t = Term::mk_concat([x.clone(), Term::mk_string("abc").unwrap(), x.clone()]).unwrap();
        let lin = Linear::of_length(&t);
        assert_eq!(lin.constant, int(3));
        assert_eq!(lin.coeffs, vec![(Atom::Len(x), int(2))]);
    }

    #[test]
    fn test_cancellation() {
        let x = Term::var("x", Sort::String);
        let len_x = Term::mk_len(&x).unwrap();
        let t = Term::mk_sub(&Term::mk_add([len_x.clone(), Term::int(2)]).unwrap(), &len_x).unwrap();
        assert_eq!(Linear::of_int(&t), Linear::constant(int(2)));
    }

    #[test]
    fn test_intervals() {
        let x = Term::var("x", Sort::String);
        let n = Term::var("n", Sort::Int);
        let idx = Term::mk_indexof(&Term::mk_string("abc").unwrap(), &x, &n).unwrap();
        assert_eq!(int_interval(&idx), Interval::bounded(int(-1), int(3)));

        let len = Term::mk_len(&x).unwrap();
        let sum = Term::mk_add([len, Term::int(1)]).unwrap();
        assert_eq!(int_interval(&sum), Interval::at_least(int(1)));
        assert_eq!(int_interval(&n), Interval::unbounded());

        let lin = Linear::of_int(&n);
        let (atom, _) = lin.as_offset_atom().unwrap();
        assert_eq!(lin.interval(Some((atom, &int(1)))), Interval::at_least(int(1)));
    }
}
