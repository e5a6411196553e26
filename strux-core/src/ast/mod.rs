//! Immutable terms of the string and regular expression theory.
//!
//! A [`Term`] is a reference-counted node holding an operator, its ordered
//! arguments and its sort. Terms are never mutated; rewriting builds new
//! nodes and shares unchanged subterms. Every node caches its tree size and
//! a structural hash, so equality and hashing are cheap on shared subterms.
//!
//! All applications are built through checked constructors that reject
//! wrong arities and argument sorts, so a malformed term can never reach the
//! rewriter.

mod display;

pub use display::DisplayTerm;

use crate::error::{Arity, Result, TermError};
use crate::sort::Sort;
use crate::word::Word;
use num_bigint::BigInt;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Operator of a term node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    /// Free variable (its sort is stored on the node)
    Var(Arc<str>),
    /// String literal
    Str(Word),
    /// Integer literal
    Int(BigInt),
    /// Boolean literal
    Bool(bool),
    /// `re.none`, the empty language
    ReNone,
    /// `re.all`, every string
    ReAll,
    /// `re.allchar`, every single-character string
    ReAllChar,

    /// `str.++`
    Concat,
    /// `str.len`
    Length,
    /// `str.substr`
    Substr,
    /// `str.indexof`
    IndexOf,
    /// `str.replace`
    Replace,
    /// `str.replace_all`
    ReplaceAll,
    /// `str.contains`
    Contains,
    /// `str.prefixof`
    PrefixOf,
    /// `str.suffixof`
    SuffixOf,
    /// `str.to_code`
    ToCode,
    /// `str.from_code`
    FromCode,
    /// `str.to_int`
    ToInt,
    /// `str.from_int`
    FromInt,
    /// `str.to_lower`
    ToLower,
    /// `str.to_upper`
    ToUpper,
    /// `str.rev`
    Rev,
    /// `str.<=`
    StrLeq,

    /// `str.to_re`
    ToRe,
    /// `str.in_re`
    InRe,
    /// `re.++`
    ReConcat,
    /// `re.union`
    ReUnion,
    /// `re.inter`
    ReInter,
    /// `re.*`
    ReStar,
    /// `(_ re.loop lo hi)`
    ReLoop {
        /// Minimum number of repetitions
        lo: u32,
        /// Maximum number of repetitions
        hi: u32,
    },
    /// `re.range`
    ReRange,
    /// `re.comp`
    ReComp,

    /// `=`
    Eq,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `ite`
    Ite,
    /// `+`
    Add,
    /// Binary `-`
    Sub,
    /// `<=` on integers
    IntLeq,
}

impl Op {
    /// SMT-LIB symbol of the operator.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Var(_) => "var",
            Op::Str(_) => "string literal",
            Op::Int(_) => "integer literal",
            Op::Bool(_) => "boolean literal",
            Op::ReNone => "re.none",
            Op::ReAll => "re.all",
            Op::ReAllChar => "re.allchar",
            Op::Concat => "str.++",
            Op::Length => "str.len",
            Op::Substr => "str.substr",
            Op::IndexOf => "str.indexof",
            Op::Replace => "str.replace",
            Op::ReplaceAll => "str.replace_all",
            Op::Contains => "str.contains",
            Op::PrefixOf => "str.prefixof",
            Op::SuffixOf => "str.suffixof",
            Op::ToCode => "str.to_code",
            Op::FromCode => "str.from_code",
            Op::ToInt => "str.to_int",
            Op::FromInt => "str.from_int",
            Op::ToLower => "str.to_lower",
            Op::ToUpper => "str.to_upper",
            Op::Rev => "str.rev",
            Op::StrLeq => "str.<=",
            Op::ToRe => "str.to_re",
            Op::InRe => "str.in_re",
            Op::ReConcat => "re.++",
            Op::ReUnion => "re.union",
            Op::ReInter => "re.inter",
            Op::ReStar => "re.*",
            Op::ReLoop { .. } => "re.loop",
            Op::ReRange => "re.range",
            Op::ReComp => "re.comp",
            Op::Eq => "=",
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Ite => "ite",
            Op::Add => "+",
            Op::Sub => "-",
            Op::IntLeq => "<=",
        }
    }

    /// Check whether this is a leaf operator (variable or literal).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Op::Var(_)
                | Op::Str(_)
                | Op::Int(_)
                | Op::Bool(_)
                | Op::ReNone
                | Op::ReAll
                | Op::ReAllChar
        )
    }

    /// Check whether this is a literal (constant leaf).
    pub fn is_literal(&self) -> bool {
        matches!(self, Op::Str(_) | Op::Int(_) | Op::Bool(_))
    }

    /// Check whether the operator is associative and takes two or more
    /// arguments.
    pub fn is_nary(&self) -> bool {
        matches!(
            self,
            Op::Concat | Op::ReConcat | Op::ReUnion | Op::ReInter | Op::And | Op::Or | Op::Add
        )
    }
}

/// Argument sorts accepted by an operator.
enum Signature {
    /// Fixed sorts, one per position
    Fixed(&'static [Sort]),
    /// Two or more arguments of one sort
    Variadic(Sort),
}

/// Check arity and argument sorts, returning the result sort.
fn check_app(op: &Op, args: &[Term]) -> Result<Sort> {
    use Sort::{Bool as B, Int as I, RegLan as R, String as S};

    let (signature, result) = match op {
        Op::Var(_) | Op::Str(_) | Op::Int(_) | Op::Bool(_) | Op::ReNone | Op::ReAll
        | Op::ReAllChar => {
            // Leaves are built through their dedicated constructors.
            return Err(TermError::ArityMismatch {
                op: op.name(),
                expected: Arity::Exactly(0),
                found: args.len(),
            });
        }
        Op::Concat => (Signature::Variadic(S), S),
        Op::Length | Op::ToCode | Op::ToInt => (Signature::Fixed(&[S]), I),
        Op::Substr => (Signature::Fixed(&[S, I, I]), S),
        Op::IndexOf => (Signature::Fixed(&[S, S, I]), I),
        Op::Replace | Op::ReplaceAll => (Signature::Fixed(&[S, S, S]), S),
        Op::Contains | Op::PrefixOf | Op::SuffixOf | Op::StrLeq => {
            (Signature::Fixed(&[S, S]), B)
        }
        Op::FromCode | Op::FromInt => (Signature::Fixed(&[I]), S),
        Op::ToLower | Op::ToUpper | Op::Rev => (Signature::Fixed(&[S]), S),
        Op::ToRe => (Signature::Fixed(&[S]), R),
        Op::InRe => (Signature::Fixed(&[S, R]), B),
        Op::ReConcat | Op::ReUnion | Op::ReInter => (Signature::Variadic(R), R),
        Op::ReStar | Op::ReLoop { .. } | Op::ReComp => (Signature::Fixed(&[R]), R),
        Op::ReRange => (Signature::Fixed(&[S, S]), R),
        Op::Not => (Signature::Fixed(&[B]), B),
        Op::And | Op::Or => (Signature::Variadic(B), B),
        Op::Add => (Signature::Variadic(I), I),
        Op::Sub => (Signature::Fixed(&[I, I]), I),
        Op::IntLeq => (Signature::Fixed(&[I, I]), B),
        Op::Eq => {
            check_arity(op, Arity::Exactly(2), args.len())?;
            check_sort(op, 1, args[0].sort(), args[1].sort())?;
            return Ok(B);
        }
        Op::Ite => {
            check_arity(op, Arity::Exactly(3), args.len())?;
            check_sort(op, 0, B, args[0].sort())?;
            check_sort(op, 2, args[1].sort(), args[2].sort())?;
            return Ok(args[1].sort());
        }
    };

    match signature {
        Signature::Fixed(sorts) => {
            check_arity(op, Arity::Exactly(sorts.len()), args.len())?;
            for (position, (&expected, arg)) in sorts.iter().zip(args).enumerate() {
                check_sort(op, position, expected, arg.sort())?;
            }
        }
        Signature::Variadic(expected) => {
            check_arity(op, Arity::AtLeast(2), args.len())?;
            for (position, arg) in args.iter().enumerate() {
                check_sort(op, position, expected, arg.sort())?;
            }
        }
    }
    Ok(result)
}

fn check_arity(op: &Op, expected: Arity, found: usize) -> Result<()> {
    if expected.admits(found) {
        Ok(())
    } else {
        Err(TermError::ArityMismatch {
            op: op.name(),
            expected,
            found,
        })
    }
}

fn check_sort(op: &Op, position: usize, expected: Sort, found: Sort) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(TermError::SortMismatch {
            op: op.name(),
            position,
            expected,
            found,
        })
    }
}

struct TermNode {
    op: Op,
    args: SmallVec<[Term; 3]>,
    sort: Sort,
    size: u64,
    hash: u64,
}

/// An immutable, shared term.
#[derive(Clone)]
pub struct Term(Arc<TermNode>);

impl Term {
    fn from_parts(op: Op, args: SmallVec<[Term; 3]>, sort: Sort) -> Self {
        let size = args
            .iter()
            .fold(1u64, |acc, arg| acc.saturating_add(arg.size()));
        let mut hasher = FxHasher::default();
        op.hash(&mut hasher);
        sort.hash(&mut hasher);
        for arg in &args {
            hasher.write_u64(arg.0.hash);
        }
        let hash = hasher.finish();
        Term(Arc::new(TermNode {
            op,
            args,
            sort,
            size,
            hash,
        }))
    }

    fn leaf(op: Op, sort: Sort) -> Self {
        Self::from_parts(op, SmallVec::new(), sort)
    }

    // ----- leaves -----

    /// Free variable of the given sort.
    pub fn var(name: &str, sort: Sort) -> Self {
        Self::leaf(Op::Var(Arc::from(name)), sort)
    }

    /// String literal.
    pub fn string(word: Word) -> Self {
        Self::leaf(Op::Str(word), Sort::String)
    }

    /// String literal from Rust text, rejecting code points outside the
    /// alphabet.
    pub fn mk_string(s: &str) -> Result<Self> {
        Ok(Self::string(Word::try_from(s)?))
    }

    /// The empty string literal.
    pub fn empty_string() -> Self {
        Self::string(Word::empty())
    }

    /// Integer literal.
    pub fn int(value: impl Into<BigInt>) -> Self {
        Self::leaf(Op::Int(value.into()), Sort::Int)
    }

    /// Boolean literal.
    pub fn bool(value: bool) -> Self {
        Self::leaf(Op::Bool(value), Sort::Bool)
    }

    /// `re.none`.
    pub fn re_none() -> Self {
        Self::leaf(Op::ReNone, Sort::RegLan)
    }

    /// `re.all`.
    pub fn re_all() -> Self {
        Self::leaf(Op::ReAll, Sort::RegLan)
    }

    /// `re.allchar`.
    pub fn re_allchar() -> Self {
        Self::leaf(Op::ReAllChar, Sort::RegLan)
    }

    // ----- applications -----

    /// Checked application of a non-leaf operator.
    pub fn app(op: Op, args: impl IntoIterator<Item = Term>) -> Result<Self> {
        let args: SmallVec<[Term; 3]> = args.into_iter().collect();
        let sort = check_app(&op, &args)?;
        Ok(Self::from_parts(op, args, sort))
    }

    /// Same operator applied to new arguments.
    pub fn with_args(&self, args: impl IntoIterator<Item = Term>) -> Result<Self> {
        if self.op().is_leaf() {
            return Ok(self.clone());
        }
        Self::app(self.op().clone(), args)
    }

    /// `str.++` over two or more strings.
    pub fn mk_concat(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::Concat, parts)
    }

    /// Concatenation of any number of strings: `""` for none, the part
    /// itself for one.
    pub fn concat_of(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        let mut parts: Vec<Term> = parts.into_iter().collect();
        match parts.len() {
            0 => Ok(Self::empty_string()),
            1 => {
                let part = parts.remove(0);
                check_sort(&Op::Concat, 0, Sort::String, part.sort())?;
                Ok(part)
            }
            _ => Self::mk_concat(parts),
        }
    }

    /// `str.len`.
    pub fn mk_len(s: &Term) -> Result<Self> {
        Self::app(Op::Length, [s.clone()])
    }

    /// `str.substr`.
    pub fn mk_substr(s: &Term, start: &Term, len: &Term) -> Result<Self> {
        Self::app(Op::Substr, [s.clone(), start.clone(), len.clone()])
    }

    /// `str.indexof`.
    pub fn mk_indexof(s: &Term, t: &Term, start: &Term) -> Result<Self> {
        Self::app(Op::IndexOf, [s.clone(), t.clone(), start.clone()])
    }

    /// `str.replace`.
    pub fn mk_replace(s: &Term, t: &Term, r: &Term) -> Result<Self> {
        Self::app(Op::Replace, [s.clone(), t.clone(), r.clone()])
    }

    /// `str.replace_all`.
    pub fn mk_replace_all(s: &Term, t: &Term, r: &Term) -> Result<Self> {
        Self::app(Op::ReplaceAll, [s.clone(), t.clone(), r.clone()])
    }

    /// `str.contains`.
    pub fn mk_contains(s: &Term, t: &Term) -> Result<Self> {
        Self::app(Op::Contains, [s.clone(), t.clone()])
    }

    /// `str.prefixof`.
    pub fn mk_prefixof(s: &Term, t: &Term) -> Result<Self> {
        Self::app(Op::PrefixOf, [s.clone(), t.clone()])
    }

    /// `str.suffixof`.
    pub fn mk_suffixof(s: &Term, t: &Term) -> Result<Self> {
        Self::app(Op::SuffixOf, [s.clone(), t.clone()])
    }

    /// `str.to_code`.
    pub fn mk_to_code(s: &Term) -> Result<Self> {
        Self::app(Op::ToCode, [s.clone()])
    }

    /// `str.from_code`.
    pub fn mk_from_code(n: &Term) -> Result<Self> {
        Self::app(Op::FromCode, [n.clone()])
    }

    /// `str.to_int`.
    pub fn mk_to_int(s: &Term) -> Result<Self> {
        Self::app(Op::ToInt, [s.clone()])
    }

    /// `str.from_int`.
    pub fn mk_from_int(n: &Term) -> Result<Self> {
        Self::app(Op::FromInt, [n.clone()])
    }

    /// `str.to_lower`.
    pub fn mk_to_lower(s: &Term) -> Result<Self> {
        Self::app(Op::ToLower, [s.clone()])
    }

    /// `str.to_upper`.
    pub fn mk_to_upper(s: &Term) -> Result<Self> {
        Self::app(Op::ToUpper, [s.clone()])
    }

    /// `str.rev`.
    pub fn mk_rev(s: &Term) -> Result<Self> {
        Self::app(Op::Rev, [s.clone()])
    }

    /// `str.<=`.
    pub fn mk_str_leq(s: &Term, t: &Term) -> Result<Self> {
        Self::app(Op::StrLeq, [s.clone(), t.clone()])
    }

    /// `str.to_re`.
    pub fn mk_to_re(s: &Term) -> Result<Self> {
        Self::app(Op::ToRe, [s.clone()])
    }

    /// `str.in_re`.
    pub fn mk_in_re(s: &Term, r: &Term) -> Result<Self> {
        Self::app(Op::InRe, [s.clone(), r.clone()])
    }

    /// `re.++` over two or more languages.
    pub fn mk_re_concat(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::ReConcat, parts)
    }

    /// `re.union` over two or more languages.
    pub fn mk_re_union(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::ReUnion, parts)
    }

    /// `re.inter` over two or more languages.
    pub fn mk_re_inter(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::ReInter, parts)
    }

    /// `re.*`.
    pub fn mk_re_star(r: &Term) -> Result<Self> {
        Self::app(Op::ReStar, [r.clone()])
    }

    /// `(_ re.loop lo hi)`.
    pub fn mk_re_loop(r: &Term, lo: u64, hi: u64) -> Result<Self> {
        let (Ok(lo32), Ok(hi32)) = (u32::try_from(lo), u32::try_from(hi)) else {
            return Err(TermError::InvalidLoopBounds { lo, hi });
        };
        Self::app(Op::ReLoop { lo: lo32, hi: hi32 }, [r.clone()])
    }

    /// `re.range`.
    pub fn mk_re_range(lo: &Term, hi: &Term) -> Result<Self> {
        Self::app(Op::ReRange, [lo.clone(), hi.clone()])
    }

    /// `re.comp`.
    pub fn mk_re_comp(r: &Term) -> Result<Self> {
        Self::app(Op::ReComp, [r.clone()])
    }

    /// `re.+`, built as `(re.++ r (re.* r))`.
    pub fn mk_re_plus(r: &Term) -> Result<Self> {
        Self::mk_re_concat([r.clone(), Self::mk_re_star(r)?])
    }

    /// `re.opt`, built as `(re.union (str.to_re "") r)`.
    pub fn mk_re_opt(r: &Term) -> Result<Self> {
        Self::mk_re_union([Self::mk_to_re(&Self::empty_string())?, r.clone()])
    }

    /// `=`.
    pub fn mk_eq(a: &Term, b: &Term) -> Result<Self> {
        Self::app(Op::Eq, [a.clone(), b.clone()])
    }

    /// `not`.
    pub fn mk_not(a: &Term) -> Result<Self> {
        Self::app(Op::Not, [a.clone()])
    }

    /// `and` over two or more formulas.
    pub fn mk_and(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::And, parts)
    }

    /// `or` over two or more formulas.
    pub fn mk_or(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::Or, parts)
    }

    /// Conjunction of any number of formulas: `true` for none.
    pub fn and_of(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::junction(Op::And, true, parts)
    }

    /// Disjunction of any number of formulas: `false` for none.
    pub fn or_of(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::junction(Op::Or, false, parts)
    }

    fn junction(op: Op, unit: bool, parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        let mut parts: Vec<Term> = parts.into_iter().collect();
        match parts.len() {
            0 => Ok(Self::bool(unit)),
            1 => {
                let part = parts.remove(0);
                check_sort(&op, 0, Sort::Bool, part.sort())?;
                Ok(part)
            }
            _ => Self::app(op, parts),
        }
    }

    /// `ite`.
    pub fn mk_ite(c: &Term, t: &Term, e: &Term) -> Result<Self> {
        Self::app(Op::Ite, [c.clone(), t.clone(), e.clone()])
    }

    /// `+` over two or more integers.
    pub fn mk_add(parts: impl IntoIterator<Item = Term>) -> Result<Self> {
        Self::app(Op::Add, parts)
    }

    /// Binary `-`.
    pub fn mk_sub(a: &Term, b: &Term) -> Result<Self> {
        Self::app(Op::Sub, [a.clone(), b.clone()])
    }

    /// `<=` on integers.
    pub fn mk_leq(a: &Term, b: &Term) -> Result<Self> {
        Self::app(Op::IntLeq, [a.clone(), b.clone()])
    }

    /// `>=`, built as `(<= b a)`.
    pub fn mk_geq(a: &Term, b: &Term) -> Result<Self> {
        Self::mk_leq(b, a)
    }

    /// `<`, built as `(not (<= b a))`.
    pub fn mk_lt(a: &Term, b: &Term) -> Result<Self> {
        Self::mk_not(&Self::mk_leq(b, a)?)
    }

    // ----- accessors -----

    /// Operator of this node.
    pub fn op(&self) -> &Op {
        &self.0.op
    }

    /// Arguments of this node.
    pub fn args(&self) -> &[Term] {
        &self.0.args
    }

    /// Sort of this term.
    pub fn sort(&self) -> Sort {
        self.0.sort
    }

    /// Number of nodes in the term tree (shared subterms counted per use).
    pub fn size(&self) -> u64 {
        self.0.size
    }

    /// String literal payload.
    pub fn as_word(&self) -> Option<&Word> {
        match self.op() {
            Op::Str(w) => Some(w),
            _ => None,
        }
    }

    /// Integer literal payload.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self.op() {
            Op::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Boolean literal payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self.op() {
            Op::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Variable name.
    pub fn var_name(&self) -> Option<&str> {
        match self.op() {
            Op::Var(name) => Some(name),
            _ => None,
        }
    }

    /// Check for the `""` literal.
    pub fn is_empty_string(&self) -> bool {
        self.as_word().is_some_and(Word::is_empty)
    }

    /// Check for a literal leaf.
    pub fn is_literal(&self) -> bool {
        self.op().is_literal()
    }

    /// Components of a string concatenation; any other term is its own
    /// single component.
    pub fn concat_components(&self) -> &[Term] {
        match self.op() {
            Op::Concat => self.args(),
            _ => std::slice::from_ref(self),
        }
    }

    /// Check whether `other` occurs as a subterm of this term.
    pub fn has_subterm(&self, other: &Term) -> bool {
        self == other || self.args().iter().any(|arg| arg.has_subterm(other))
    }

    /// Display adapter that elides subterms deeper than `max_depth`.
    pub fn display_depth(&self, max_depth: Option<usize>) -> DisplayTerm<'_> {
        DisplayTerm::new(self, max_depth)
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.hash == other.0.hash
                && self.0.size == other.0.size
                && self.0.sort == other.0.sort
                && self.0.op == other.0.op
                && self.0.args == other.0.args)
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl std::fmt::Debug for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(w: &str) -> Term {
        Term::mk_string(w).unwrap()
    }

    fn s(name: &str) -> Term {
        Term::var(name, Sort::String)
    }

    #[test]
    fn test_structural_equality() {
        let a = Term::mk_concat([s("x"), lit("ab")]).unwrap();
        let b = Term::mk_concat([s("x"), lit("ab")]).unwrap();
        let c = Term::mk_concat([lit("ab"), s("x")]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Term::var("x", Sort::String), Term::var("x", Sort::Int));
    }

    #[test]
    fn test_size() {
        let x = s("x");
        let sub = Term::mk_substr(&x, &Term::int(0), &Term::int(1)).unwrap();
        assert_eq!(x.size(), 1);
        assert_eq!(sub.size(), 4);
        let len = Term::mk_len(&sub).unwrap();
        assert_eq!(len.size(), 5);
    }

    #[test]
    fn test_sorts_of_applications() {
        let x = s("x");
        assert_eq!(Term::mk_len(&x).unwrap().sort(), Sort::Int);
        assert_eq!(Term::mk_contains(&x, &x).unwrap().sort(), Sort::Bool);
        assert_eq!(Term::mk_to_re(&x).unwrap().sort(), Sort::RegLan);
        let ite = Term::mk_ite(&Term::bool(true), &x, &lit("a")).unwrap();
        assert_eq!(ite.sort(), Sort::String);
    }

    #[test]
    fn test_rejects_bad_arity() {
        let x = s("x");
        let err = Term::app(Op::Substr, [x.clone(), Term::int(0)]).unwrap_err();
        assert_eq!(
            err,
            TermError::ArityMismatch {
                op: "str.substr",
                expected: Arity::Exactly(3),
                found: 2
            }
        );
        assert!(Term::mk_concat([x.clone()]).is_err());
        assert!(Term::app(Op::Str(Word::empty()), []).is_err());
    }

    #[test]
    fn test_rejects_bad_sort() {
        let x = s("x");
        let n = Term::var("n", Sort::Int);
        let err = Term::mk_len(&n).unwrap_err();
        assert!(matches!(err, TermError::SortMismatch { position: 0, .. }));
        assert!(Term::mk_eq(&x, &n).is_err());
        assert!(Term::mk_ite(&Term::bool(true), &x, &n).is_err());
        assert!(Term::mk_in_re(&x, &x).is_err());
    }

    #[test]
    fn test_loop_bounds() {
        let r = Term::re_allchar();
        assert!(Term::mk_re_loop(&r, 1, 3).is_ok());
        assert_eq!(
            Term::mk_re_loop(&r, 0, u64::from(u32::MAX) + 1).unwrap_err(),
            TermError::InvalidLoopBounds {
                lo: 0,
                hi: u64::from(u32::MAX) + 1
            }
        );
    }

    #[test]
    fn test_concat_of() {
        assert!(Term::concat_of([]).unwrap().is_empty_string());
        assert_eq!(Term::concat_of([s("x")]).unwrap(), s("x"));
        assert_eq!(Term::concat_of([s("x"), s("y")]).unwrap().op(), &Op::Concat);
        assert!(Term::concat_of([Term::int(1)]).is_err());
        assert_eq!(Term::and_of([]).unwrap(), Term::bool(true));
        assert_eq!(Term::or_of([]).unwrap(), Term::bool(false));
    }

    #[test]
    fn test_concat_components() {
        let x = s("x");
        assert_eq!(x.concat_components(), &[x.clone()]);
        let c = Term::mk_concat([x.clone(), s("y")]).unwrap();
        assert_eq!(c.concat_components().len(), 2);
        assert!(c.has_subterm(&x));
        assert!(!x.has_subterm(&c));
    }
}
