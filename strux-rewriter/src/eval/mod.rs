//! Ground evaluation of terms.
//!
//! Implements the SMT-LIB semantics of every operator over concrete values.
//! The rule catalog uses the same helpers to fold constants, so folding and
//! evaluation cannot disagree; the property tests use [`eval`] to check
//! that rewriting preserves the value of a term under random assignments.

pub mod regex;

use crate::error::EvalError;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rustc_hash::FxHashMap;
use std::fmt;
use strux_core::{MAX_CODE_POINT, Op, Sort, Term, Word};

/// Value of a non-regex term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(BigInt),
    /// String
    Str(Word),
}

impl Value {
    /// Sort of the value.
    pub fn sort(&self) -> Sort {
        match self {
            Value::Bool(_) => Sort::Bool,
            Value::Int(_) => Sort::Int,
            Value::Str(_) => Sort::String,
        }
    }

    /// The value as a literal term.
    pub fn to_term(&self) -> Term {
        match self {
            Value::Bool(b) => Term::bool(*b),
            Value::Int(n) => Term::int(n.clone()),
            Value::Str(w) => Term::string(w.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(w) => write!(f, "{w}"),
        }
    }
}

/// Values of free variables, by name.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    values: FxHashMap<String, Value>,
}

impl Assignment {
    /// Empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` to `value`.
    pub fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Evaluate `term` under `assignment`.
pub fn eval(term: &Term, assignment: &Assignment) -> Result<Value, EvalError> {
    if term.sort() == Sort::RegLan {
        return Err(EvalError::UnsupportedSort(Sort::RegLan));
    }
    let args = term.args();
    let s = |i: usize| -> Result<Word, EvalError> {
        match eval(&args[i], assignment)? {
            Value::Str(w) => Ok(w),
            other => Err(EvalError::UnsupportedSort(other.sort())),
        }
    };
    let n = |i: usize| -> Result<BigInt, EvalError> {
        match eval(&args[i], assignment)? {
            Value::Int(n) => Ok(n),
            other => Err(EvalError::UnsupportedSort(other.sort())),
        }
    };
    let b = |i: usize| -> Result<bool, EvalError> {
        match eval(&args[i], assignment)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::UnsupportedSort(other.sort())),
        }
    };

    Ok(match term.op() {
        Op::Var(name) => {
            let value = assignment
                .get(name)
                .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))?;
            if value.sort() != term.sort() {
                return Err(EvalError::Malformed {
                    name: name.to_string(),
                    expected: term.sort(),
                });
            }
            value.clone()
        }
        Op::Str(w) => Value::Str(w.clone()),
        Op::Int(v) => Value::Int(v.clone()),
        Op::Bool(v) => Value::Bool(*v),
        Op::ReNone | Op::ReAll | Op::ReAllChar => {
            return Err(EvalError::UnsupportedSort(Sort::RegLan));
        }

        Op::Concat => {
            let mut out = Word::empty();
            for i in 0..args.len() {
                out = out.concat(&s(i)?);
            }
            Value::Str(out)
        }
        Op::Length => Value::Int(BigInt::from(s(0)?.len())),
        Op::Substr => Value::Str(substr(&s(0)?, &n(1)?, &n(2)?)),
        Op::IndexOf => Value::Int(index_of(&s(0)?, &s(1)?, &n(2)?)),
        Op::Replace => Value::Str(s(0)?.replace_first(&s(1)?, &s(2)?)),
        Op::ReplaceAll => Value::Str(s(0)?.replace_all(&s(1)?, &s(2)?)),
        Op::Contains => Value::Bool(s(0)?.contains(&s(1)?)),
        Op::PrefixOf => Value::Bool(s(1)?.starts_with(&s(0)?)),
        Op::SuffixOf => Value::Bool(s(1)?.ends_with(&s(0)?)),
        Op::ToCode => Value::Int(to_code(&s(0)?)),
        Op::FromCode => Value::Str(from_code(&n(0)?)),
        Op::ToInt => Value::Int(to_int(&s(0)?)),
        Op::FromInt => Value::Str(from_int(&n(0)?)),
        Op::ToLower => Value::Str(s(0)?.to_lower()),
        Op::ToUpper => Value::Str(s(0)?.to_upper()),
        Op::Rev => Value::Str(s(0)?.reversed()),
        Op::StrLeq => Value::Bool(s(0)? <= s(1)?),

        Op::InRe => {
            let word = s(0)?;
            Value::Bool(regex::compile(&args[1], assignment)?.matches(&word))
        }
        Op::ToRe
        | Op::ReConcat
        | Op::ReUnion
        | Op::ReInter
        | Op::ReStar
        | Op::ReLoop { .. }
        | Op::ReRange
        | Op::ReComp => return Err(EvalError::UnsupportedSort(Sort::RegLan)),

        Op::Eq => Value::Bool(eval(&args[0], assignment)? == eval(&args[1], assignment)?),
        Op::Not => Value::Bool(!b(0)?),
        Op::And => {
            let mut all = true;
            for i in 0..args.len() {
                all &= b(i)?;
            }
            Value::Bool(all)
        }
        Op::Or => {
            let mut any = false;
            for i in 0..args.len() {
                any |= b(i)?;
            }
            Value::Bool(any)
        }
        Op::Ite => {
            if b(0)? {
                eval(&args[1], assignment)?
            } else {
                eval(&args[2], assignment)?
            }
        }
        Op::Add => {
            let mut sum = BigInt::zero();
            for i in 0..args.len() {
                sum += n(i)?;
            }
            Value::Int(sum)
        }
        Op::Sub => Value::Int(n(0)? - n(1)?),
        Op::IntLeq => Value::Bool(n(0)? <= n(1)?),
    })
}

/// `str.substr`: the characters of `s` from `start`, at most `len` of them;
/// `""` when the start is outside `s` or the length is not positive.
pub fn substr(s: &Word, start: &BigInt, len: &BigInt) -> Word {
    let (Some(start), true) = (start.to_usize(), len.is_positive()) else {
        return Word::empty();
    };
    if start >= s.len() {
        return Word::empty();
    }
    let end = len
        .to_usize()
        .and_then(|len| start.checked_add(len))
        .unwrap_or(usize::MAX);
    s.slice(start, end)
}

/// `str.indexof`: first occurrence of `t` in `s` at or after `start`, or
/// `-1`.
pub fn index_of(s: &Word, t: &Word, start: &BigInt) -> BigInt {
    match start.to_usize() {
        Some(from) if from <= s.len() => s
            .find(t, from)
            .map_or_else(|| -BigInt::one(), BigInt::from),
        _ => -BigInt::one(),
    }
}

/// `str.to_code`: code point of a one-character string, else `-1`.
pub fn to_code(s: &Word) -> BigInt {
    s.as_char().map_or_else(|| -BigInt::one(), BigInt::from)
}

/// `str.from_code`: one-character string, or `""` outside the alphabet.
pub fn from_code(n: &BigInt) -> Word {
    n.to_u32()
        .filter(|&c| c <= MAX_CODE_POINT)
        .and_then(|c| Word::from_char_code(c).ok())
        .unwrap_or_default()
}

/// `str.to_int`: value of a decimal numeral, else `-1`.
pub fn to_int(s: &Word) -> BigInt {
    if !s.is_digits() {
        return -BigInt::one();
    }
    s.code_points().iter().fold(BigInt::zero(), |acc, &c| {
        acc * 10u32 + BigInt::from(c - u32::from('0'))
    })
}

/// `str.from_int`: decimal numeral of a non-negative integer, else `""`.
pub fn from_int(n: &BigInt) -> Word {
    n.to_biguint().map_or_else(Word::empty, |n| Word::decimal(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(w: &str) -> Term {
        Term::mk_string(w).unwrap()
    }

    fn w(s: &str) -> Word {
        s.parse().unwrap()
    }

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_substr_semantics() {
        assert_eq!(substr(&w("hello"), &int(1), &int(3)), w("ell"));
        assert_eq!(substr(&w("hello"), &int(-1), &int(3)), w(""));
        assert_eq!(substr(&w("hello"), &int(5), &int(1)), w(""));
        assert_eq!(substr(&w("hello"), &int(2), &int(0)), w(""));
        assert_eq!(substr(&w("hello"), &int(3), &int(100)), w("lo"));
        let huge = BigInt::from(u64::MAX) * 4u32;
        assert_eq!(substr(&w("hello"), &int(0), &huge), w("hello"));
        assert_eq!(substr(&w("hello"), &huge, &int(1)), w(""));
    }

    #[test]
    fn test_index_of_semantics() {
        assert_eq!(index_of(&w("abcabc"), &w("c"), &int(0)), int(2));
        assert_eq!(index_of(&w("abcabc"), &w("c"), &int(3)), int(5));
        assert_eq!(index_of(&w("abc"), &w(""), &int(3)), int(3));
        assert_eq!(index_of(&w("abc"), &w(""), &int(4)), int(-1));
        assert_eq!(index_of(&w("abc"), &w("a"), &int(-1)), int(-1));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(to_int(&w("0042")), int(42));
        assert_eq!(to_int(&w("")), int(-1));
        assert_eq!(to_int(&w("4a")), int(-1));
        assert_eq!(from_int(&int(17)), w("17"));
        assert_eq!(from_int(&int(-3)), w(""));
        assert_eq!(to_code(&w("a")), int(97));
        assert_eq!(to_code(&w("ab")), int(-1));
        assert_eq!(from_code(&int(98)), w("b"));
        assert_eq!(from_code(&int(-1)), w(""));
        assert_eq!(from_code(&int(i64::from(MAX_CODE_POINT) + 1)), w(""));
    }

    #[test]
    fn test_eval_terms() {
        let x = Term::var("x", Sort::String);
        let asg = Assignment::new().with("x", Value::Str(w("banana")));
        let t = Term::mk_indexof(&x, &lit("an"), &Term::int(2)).unwrap();
        assert_eq!(eval(&t, &asg), Ok(Value::Int(int(3))));

        let r = Term::mk_replace(&x, &lit("a"), &lit("o")).unwrap();
        assert_eq!(eval(&r, &asg), Ok(Value::Str(w("bonana"))));

        let leq = Term::mk_str_leq(&lit("ab"), &x).unwrap();
        assert_eq!(eval(&leq, &asg), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_eval_errors() {
        let x = Term::var("x", Sort::String);
        assert_eq!(
            eval(&x, &Assignment::new()),
            Err(EvalError::UnboundVariable("x".to_string()))
        );
        let asg = Assignment::new().with("x", Value::Int(int(1)));
        assert_eq!(
            eval(&x, &asg),
            Err(EvalError::Malformed {
                name: "x".to_string(),
                expected: Sort::String
            })
        );
        assert_eq!(
            eval(&Term::re_all(), &asg),
            Err(EvalError::UnsupportedSort(Sort::RegLan))
        );
    }
}
