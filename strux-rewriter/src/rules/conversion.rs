//! Integer, code point, case and reversal conversions.

use super::{Rule, RuleContext, RuleResult};
use crate::eval;
use crate::rewrites::RewriteId;
use strux_core::{Op, Result, Term, Word};

pub(super) static FROM_INT_RULES: &[Rule] = &[Rule::size(RewriteId::ItosEval, itos_eval)];

pub(super) static TO_INT_RULES: &[Rule] = &[
    Rule::size(RewriteId::StoiEval, stoi_eval),
    Rule::size(RewriteId::StoiConcatNonnum, stoi_concat_nonnum),
];

pub(super) static TO_CODE_RULES: &[Rule] = &[Rule::size(RewriteId::ToCodeEval, to_code_eval)];

pub(super) static FROM_CODE_RULES: &[Rule] =
    &[Rule::size(RewriteId::FromCodeEval, from_code_eval)];

pub(super) static CASE_RULES: &[Rule] = &[
    Rule::size(RewriteId::StrConvConst, str_conv_const),
    Rule::size(RewriteId::StrConvIdem, str_conv_idem),
    Rule::size(RewriteId::StrConvItos, str_conv_itos),
    Rule::lex(
        RewriteId::StrConvMinscopeConcat,
        "case conversions move below str.++",
        str_conv_minscope_concat,
    ),
];

pub(super) static REV_RULES: &[Rule] = &[
    Rule::size(RewriteId::StrRevConst, str_rev_const),
    Rule::size(RewriteId::StrRevIdem, str_rev_idem),
    Rule::lex(
        RewriteId::StrRevMinscopeConcat,
        "str.rev moves below str.++",
        str_rev_minscope_concat,
    ),
];

fn arg(t: &Term) -> &Term {
    &t.args()[0]
}

fn itos_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_int().map(|n| Term::string(eval::from_int(n))))
}

fn stoi_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_word().map(|w| Term::int(eval::to_int(w))))
}

/// A constant component with a non-digit makes the whole string
/// non-numeric.
fn stoi_concat_nonnum(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let s = arg(t);
    if s.op() != &Op::Concat {
        return Ok(None);
    }
    let non_numeric = s
        .args()
        .iter()
        .any(|part| part.as_word().is_some_and(|w| !w.is_empty() && !w.is_digits()));
    Ok(non_numeric.then(|| Term::int(-1)))
}

fn to_code_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_word().map(|w| Term::int(eval::to_code(w))))
}

fn from_code_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_int().map(|n| Term::string(eval::from_code(n))))
}

fn convert_case(op: &Op, w: &Word) -> Word {
    if op == &Op::ToLower {
        w.to_lower()
    } else {
        w.to_upper()
    }
}

fn rebuild_case(op: &Op, s: &Term) -> Result<Term> {
    Term::app(op.clone(), [s.clone()])
}

/// Case conversion of a constant.
fn str_conv_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_word().map(|w| Term::string(convert_case(t.op(), w))))
}

/// The outer case conversion wins over an inner one.
fn str_conv_idem(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = arg(t);
    if !matches!(inner.op(), Op::ToLower | Op::ToUpper) {
        return Ok(None);
    }
    rebuild_case(t.op(), arg(inner)).map(Some)
}

/// Decimal numerals have no letters.
fn str_conv_itos(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = arg(t);
    Ok((inner.op() == &Op::FromInt).then(|| inner.clone()))
}

/// `(str.to_lower (str.++ x y))` → `(str.++ (str.to_lower x) (str.to_lower y))`.
fn str_conv_minscope_concat(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = arg(t);
    if inner.op() != &Op::Concat {
        return Ok(None);
    }
    let parts = inner
        .args()
        .iter()
        .map(|part| rebuild_case(t.op(), part))
        .collect::<Result<Vec<_>>>()?;
    Term::mk_concat(parts).map(Some)
}

fn str_rev_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    Ok(arg(t).as_word().map(|w| Term::string(w.reversed())))
}

/// `(str.rev (str.rev x))` → `x`.
fn str_rev_idem(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = arg(t);
    Ok((inner.op() == &Op::Rev).then(|| arg(inner).clone()))
}

/// `(str.rev (str.++ x y))` → `(str.++ (str.rev y) (str.rev x))`.
fn str_rev_minscope_concat(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let inner = arg(t);
    if inner.op() != &Op::Concat {
        return Ok(None);
    }
    let parts = inner
        .args()
        .iter()
        .rev()
        .map(Term::mk_rev)
        .collect::<Result<Vec<_>>>()?;
    Term::mk_concat(parts).map(Some)
}

#[cfg(test)]
mod tests {
    use super::super::util::fixtures::*;
    use super::*;

    #[test]
    fn test_integer_conversions() {
        let t = Term::mk_from_int(&int(42)).unwrap();
        assert_eq!(fire(itos_eval, &t), Some(lit("42")));
        assert_eq!(fire(itos_eval, &Term::mk_from_int(&int(-3)).unwrap()), Some(lit("")));
        assert_eq!(fire(stoi_eval, &Term::mk_to_int(&lit("007")).unwrap()), Some(int(7)));
        assert_eq!(fire(stoi_eval, &Term::mk_to_int(&lit("")).unwrap()), Some(int(-1)));
        let mixed = Term::mk_to_int(&cat(&[s("x"), lit("1a")])).unwrap();
        assert_eq!(fire(stoi_concat_nonnum, &mixed), Some(int(-1)));
        let digits = Term::mk_to_int(&cat(&[s("x"), lit("12")])).unwrap();
        assert_eq!(fire(stoi_concat_nonnum, &digits), None);
    }

    #[test]
    fn test_code_conversions() {
        assert_eq!(fire(to_code_eval, &Term::mk_to_code(&lit("a")).unwrap()), Some(int(97)));
        assert_eq!(fire(to_code_eval, &Term::mk_to_code(&lit("ab")).unwrap()), Some(int(-1)));
        assert_eq!(fire(from_code_eval, &Term::mk_from_code(&int(98)).unwrap()), Some(lit("b")));
        assert_eq!(fire(from_code_eval, &Term::mk_from_code(&int(-1)).unwrap()), Some(lit("")));
    }

    #[test]
    fn test_case_conversions() {
        let x = s("x");
        let lower = |t: &Term| Term::mk_to_lower(t).unwrap();
        let upper = |t: &Term| Term::mk_to_upper(t).unwrap();
        assert_eq!(fire(str_conv_const, &lower(&lit("AbC1"))), Some(lit("abc1")));
        assert_eq!(fire(str_conv_const, &upper(&lit("AbC1"))), Some(lit("ABC1")));
        assert_eq!(fire(str_conv_idem, &lower(&upper(&x))), Some(lower(&x)));
        let itos = Term::mk_from_int(&n("k")).unwrap();
        assert_eq!(fire(str_conv_itos, &upper(&itos)), Some(itos.clone()));
        let t = lower(&cat(&[x.clone(), lit("A")]));
        assert_eq!(
            fire(str_conv_minscope_concat, &t),
            Some(cat(&[lower(&x), lower(&lit("A"))]))
        );
    }

    #[test]
    fn test_reversal() {
        let x = s("x");
        let rev = |t: &Term| Term::mk_rev(t).unwrap();
        assert_eq!(fire(str_rev_const, &rev(&lit("abc"))), Some(lit("cba")));
        assert_eq!(fire(str_rev_idem, &rev(&rev(&x))), Some(x.clone()));
        let t = rev(&cat(&[lit("ab"), x.clone()]));
        assert_eq!(
            fire(str_rev_minscope_concat, &t),
            Some(cat(&[rev(&x), rev(&lit("ab"))]))
        );
    }
}
