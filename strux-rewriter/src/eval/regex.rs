//! Regular expression membership by derivatives.
//!
//! A ground regex term is compiled into [`Re`], a small expression tree over
//! character ranges. Membership of a word is decided by taking the
//! Brzozowski derivative for each character and testing whether the residual
//! language accepts the empty word. The smart constructors keep residuals
//! small by absorbing `∅` and dropping `ε` where this does not change the
//! language.

use super::{Assignment, Value, eval};
use crate::error::EvalError;
use strux_core::{MAX_CODE_POINT, Op, Term, Word};

/// Compiled regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Re {
    /// The empty language
    Empty,
    /// The language of the empty word
    Epsilon,
    /// One character in an inclusive range
    Range(u32, u32),
    /// Concatenation
    Concat(Box<Re>, Box<Re>),
    /// Union
    Union(Vec<Re>),
    /// Intersection
    Inter(Vec<Re>),
    /// Kleene star
    Star(Box<Re>),
    /// Between `lo` and `hi` repetitions
    Loop(Box<Re>, u32, u32),
    /// Complement
    Comp(Box<Re>),
}

impl Re {
    /// Any single character.
    pub fn any_char() -> Re {
        Re::Range(0, MAX_CODE_POINT)
    }

    /// The language of exactly `word`.
    pub fn word(word: &Word) -> Re {
        word.code_points()
            .iter()
            .rev()
            .fold(Re::Epsilon, |acc, &c| Re::concat(Re::Range(c, c), acc))
    }

    fn concat(a: Re, b: Re) -> Re {
        match (a, b) {
            (Re::Empty, _) | (_, Re::Empty) => Re::Empty,
            (Re::Epsilon, r) | (r, Re::Epsilon) => r,
            (a, b) => Re::Concat(Box::new(a), Box::new(b)),
        }
    }

    fn union(parts: Vec<Re>) -> Re {
        let mut out: Vec<Re> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Re::Empty => {}
                Re::Union(inner) => {
                    for r in inner {
                        if !out.contains(&r) {
                            out.push(r);
                        }
                    }
                }
                r => {
                    if !out.contains(&r) {
                        out.push(r);
                    }
                }
            }
        }
        match out.len() {
            0 => Re::Empty,
            1 => out.remove(0),
            _ => Re::Union(out),
        }
    }

    fn inter(parts: Vec<Re>) -> Re {
        let mut out: Vec<Re> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Re::Empty => return Re::Empty,
                Re::Inter(inner) => out.extend(inner),
                r => {
                    if !out.contains(&r) {
                        out.push(r);
                    }
                }
            }
        }
        match out.len() {
            1 => out.remove(0),
            _ => Re::Inter(out),
        }
    }

    /// Check whether the empty word is in the language.
    pub fn nullable(&self) -> bool {
        match self {
            Re::Empty | Re::Range(..) => false,
            Re::Epsilon | Re::Star(_) => true,
            Re::Concat(a, b) => a.nullable() && b.nullable(),
            Re::Union(parts) => parts.iter().any(Re::nullable),
            Re::Inter(parts) => parts.iter().all(Re::nullable),
            Re::Loop(r, lo, _) => *lo == 0 || r.nullable(),
            Re::Comp(r) => !r.nullable(),
        }
    }

    /// Derivative with respect to the character `c`.
    pub fn derivative(&self, c: u32) -> Re {
        match self {
            Re::Empty | Re::Epsilon => Re::Empty,
            Re::Range(lo, hi) => {
                if (*lo..=*hi).contains(&c) {
                    Re::Epsilon
                } else {
                    Re::Empty
                }
            }
            Re::Concat(a, b) => {
                let first = Re::concat(a.derivative(c), (**b).clone());
                if a.nullable() {
                    Re::union(vec![first, b.derivative(c)])
                } else {
                    first
                }
            }
            Re::Union(parts) => Re::union(parts.iter().map(|r| r.derivative(c)).collect()),
            Re::Inter(parts) => Re::inter(parts.iter().map(|r| r.derivative(c)).collect()),
            Re::Star(r) => Re::concat(r.derivative(c), self.clone()),
            Re::Loop(r, lo, hi) => {
                if *hi == 0 {
                    return Re::Empty;
                }
                let rest = Re::Loop(r.clone(), lo.saturating_sub(1), hi - 1);
                Re::concat(r.derivative(c), rest)
            }
            Re::Comp(r) => Re::Comp(Box::new(r.derivative(c))),
        }
    }

    /// Check whether `word` is in the language.
    pub fn matches(&self, word: &Word) -> bool {
        let mut current = self.clone();
        for &c in word.code_points() {
            current = current.derivative(c);
            if current == Re::Empty {
                return false;
            }
        }
        current.nullable()
    }
}

/// Compile a regex term, evaluating embedded string terms under
/// `assignment`.
pub fn compile(term: &Term, assignment: &Assignment) -> Result<Re, EvalError> {
    let word_of = |t: &Term| -> Result<Word, EvalError> {
        match eval(t, assignment)? {
            Value::Str(w) => Ok(w),
            _ => Err(EvalError::UnsupportedSort(t.sort())),
        }
    };
    let args = term.args();
    Ok(match term.op() {
        Op::ReNone => Re::Empty,
        Op::ReAllChar => Re::any_char(),
        Op::ReAll => Re::Star(Box::new(Re::any_char())),
        Op::ToRe => Re::word(&word_of(&args[0])?),
        Op::ReRange => {
            let lo = word_of(&args[0])?;
            let hi = word_of(&args[1])?;
            match (lo.as_char(), hi.as_char()) {
                (Some(lo), Some(hi)) if lo <= hi => Re::Range(lo, hi),
                _ => Re::Empty,
            }
        }
        Op::ReConcat => {
            let mut parts = args
                .iter()
                .map(|a| compile(a, assignment))
                .collect::<Result<Vec<_>, _>>()?;
            let mut acc = parts.pop().unwrap_or(Re::Epsilon);
            while let Some(part) = parts.pop() {
                acc = Re::concat(part, acc);
            }
            acc
        }
        Op::ReUnion => Re::union(
            args.iter()
                .map(|a| compile(a, assignment))
                .collect::<Result<_, _>>()?,
        ),
        Op::ReInter => Re::inter(
            args.iter()
                .map(|a| compile(a, assignment))
                .collect::<Result<_, _>>()?,
        ),
        Op::ReStar => Re::Star(Box::new(compile(&args[0], assignment)?)),
        Op::ReLoop { lo, hi } => {
            if lo > hi {
                Re::Empty
            } else {
                Re::Loop(Box::new(compile(&args[0], assignment)?), *lo, *hi)
            }
        }
        Op::ReComp => Re::Comp(Box::new(compile(&args[0], assignment)?)),
        _ => return Err(EvalError::UnsupportedSort(term.sort())),
    })
}
