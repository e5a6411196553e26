//! Equalities.
//!
//! Literal and identity checks apply at every sort. The remaining rules
//! only look at string equalities: empty-string tests against `str.replace`
//! and `str.substr`, splitting of concatenations, and refutations from
//! length and containment entailment. Equalities are not oriented, so each
//! rule accepts either side in either position.

use super::util::{
    is_empty_eq, len, other_than_empty, plus, replace_args, split_leading_word, split_trailing_word,
};
use super::{Rule, RuleContext, RuleResult};
use crate::rewrites::RewriteId;
use strux_core::{Op, Result, Sort, Term, Word};

pub(super) static EQ_RULES: &[Rule] = &[
    Rule::size(RewriteId::EqEval, eq_eval),
    Rule::size(RewriteId::StrEmpReplXYX, str_emp_repl_x_y_x),
    Rule::lex(
        RewriteId::StrEmpReplEmp,
        "str.replace under = disappears",
        str_emp_repl_emp,
    ),
    Rule::lex(
        RewriteId::StrEmpReplEmpR,
        "str.replace under = disappears",
        str_emp_repl_emp_r,
    ),
    Rule::lex(
        RewriteId::StrEqReplEmp,
        "str.replace under = disappears",
        str_eq_repl_emp,
    ),
    Rule::size(RewriteId::StrEmpSubstrLeqLen, str_emp_substr_leq_len),
    Rule::size(RewriteId::StrEmpSubstrLeqZ, str_emp_substr_leq_z),
    Rule::lex(
        RewriteId::StrEmpSubstrElim,
        "str.substr under = disappears",
        str_emp_substr_elim,
    ),
    Rule::lex(
        RewriteId::StrEqConjLenEntail,
        "str.++ under = disappears",
        str_eq_conj_len_entail,
    ),
    Rule::size(RewriteId::EqNfix, eq_nfix),
    Rule::size(RewriteId::SplitEqStripL, split_eq_strip_l),
    Rule::size(RewriteId::SplitEqStripR, split_eq_strip_r),
    Rule::size(RewriteId::StrEqUnify, str_eq_unify),
    Rule::size(RewriteId::StrEqHomogConst, str_eq_homog_const),
    Rule::size(RewriteId::StrEqConstNhomog, str_eq_const_nhomog),
    Rule::size(RewriteId::EqLenDeq, eq_len_deq),
    Rule::size(RewriteId::EqNctn, eq_nctn),
    Rule::lex(
        RewriteId::StrEqReplNotCtn,
        "str.replace under = disappears",
        str_eq_repl_not_ctn,
    ),
    Rule::lex(
        RewriteId::StrEqReplToEq,
        "str.replace under = disappears",
        str_eq_repl_to_eq,
    ),
    Rule::lex(
        RewriteId::StrEqReplToDis,
        "str.replace under = disappears",
        str_eq_repl_to_dis,
    ),
    Rule::lex(
        RewriteId::SplitEq,
        "str.++ under = shortens",
        split_eq,
    ),
];

fn parts(t: &Term) -> (&Term, &Term) {
    (&t.args()[0], &t.args()[1])
}

fn string_parts(t: &Term) -> Option<(&Term, &Term)> {
    let (a, b) = parts(t);
    (a.sort() == Sort::String).then_some((a, b))
}

fn verdict(b: bool) -> RuleResult {
    Ok(Some(Term::bool(b)))
}

/// The non-empty side of `"" = t`, when it is a `str.replace`.
fn empty_vs_replace(t: &Term) -> Option<(&Term, &Term, &Term)> {
    let (a, b) = parts(t);
    replace_args(other_than_empty(a, b)?)
}

/// The non-empty side of `"" = t`, when it is a `str.substr`.
fn empty_vs_substr(t: &Term) -> Option<(&Term, &Term, &Term)> {
    let (a, b) = parts(t);
    let s = other_than_empty(a, b)?;
    let args = s.args();
    (s.op() == &Op::Substr).then(|| (&args[0], &args[1], &args[2]))
}

/// Try `f` on both orientations of the equality.
fn either_way<'t, T>(t: &'t Term, f: impl Fn(&'t Term, &'t Term) -> Option<T>) -> Option<T> {
    let (a, b) = parts(t);
    f(a, b).or_else(|| f(b, a))
}

/// `(= t t)`, or two distinct literals.
fn eq_eval(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (a, b) = parts(t);
    if a == b {
        return verdict(true);
    }
    if a.is_literal() && b.is_literal() {
        return verdict(false);
    }
    Ok(None)
}

/// `"" = (str.replace x y x)` → `x = ""`.
fn str_emp_repl_x_y_x(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    match empty_vs_replace(t) {
        Some((x, _, z)) if x == z => is_empty_eq(x).map(Some),
        _ => Ok(None),
    }
}

/// `"" = (str.replace x y "")` → `x = "" ∨ x = y`.
fn str_emp_repl_emp(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    match empty_vs_replace(t) {
        Some((x, y, z)) if z.is_empty_string() => {
            Term::mk_or([is_empty_eq(x)?, Term::mk_eq(x, y)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// A non-empty replacement survives any replacement, so only an empty
/// haystack with a non-empty pattern leaves `""`.
fn str_emp_repl_emp_r(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    match empty_vs_replace(t) {
        Some((x, y, z)) if ctx.oracle.length_geq(z, 1).is_yes() => {
            let y_nonempty = Term::mk_not(&is_empty_eq(y)?)?;
            Term::mk_and([is_empty_eq(x)?, y_nonempty]).map(Some)
        }
        _ => Ok(None),
    }
}

/// `"" = (str.replace x y z)` in general.
fn str_eq_repl_emp(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((x, y, z)) = empty_vs_replace(t) else {
        return Ok(None);
    };
    let z_empty = is_empty_eq(z)?;
    let no_match = Term::mk_and([
        is_empty_eq(x)?,
        Term::mk_or([Term::mk_not(&is_empty_eq(y)?)?, z_empty.clone()])?,
    ])?;
    let whole_match = Term::mk_and([Term::mk_eq(x, y)?, z_empty])?;
    Term::mk_or([no_match, whole_match]).map(Some)
}

/// `"" = (str.substr x i n)` with `i >= 0` and `n >= 1`: the window is
/// empty exactly when it starts at or past the end.
fn str_emp_substr_leq_len(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let Some((x, i, n)) = empty_vs_substr(t) else {
        return Ok(None);
    };
    let zero = Term::int(0);
    if ctx.oracle.arith_geq(i, &zero).is_yes() && ctx.oracle.arith_geq(n, &Term::int(1)).is_yes()
    {
        return Term::mk_leq(&len(x)?, i).map(Some);
    }
    Ok(None)
}

/// `"" = (str.substr x i n)` with `0 <= i < |x|`: only the length matters.
fn str_emp_substr_leq_z(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let Some((x, i, n)) = empty_vs_substr(t) else {
        return Ok(None);
    };
    if ctx.oracle.arith_geq(i, &Term::int(0)).is_yes()
        && ctx.oracle.arith_geq(&len(x)?, &plus(i, 1)?).is_yes()
    {
        return Term::mk_leq(n, &Term::int(0)).map(Some);
    }
    Ok(None)
}

/// `"" = (str.substr x i n)` → `i < 0 ∨ |x| <= i ∨ n <= 0`.
fn str_emp_substr_elim(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((x, i, n)) = empty_vs_substr(t) else {
        return Ok(None);
    };
    Term::mk_or([
        Term::mk_leq(i, &Term::int(-1))?,
        Term::mk_leq(&len(x)?, i)?,
        Term::mk_leq(n, &Term::int(0))?,
    ])
    .map(Some)
}

/// `"" = (str.++ x₁ … xₙ)` → every `xᵢ = ""`.
fn str_eq_conj_len_entail(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (a, b) = parts(t);
    let Some(s) = other_than_empty(a, b) else {
        return Ok(None);
    };
    if s.op() != &Op::Concat {
        return Ok(None);
    }
    let conjuncts = s.args().iter().map(is_empty_eq).collect::<Result<Vec<_>>>()?;
    Term::and_of(conjuncts).map(Some)
}

fn prefix_clash(a: &Term, b: &Term) -> bool {
    let (Some((wa, _)), Some((wb, _))) = (split_leading_word(a), split_leading_word(b)) else {
        return false;
    };
    let common = wa.common_prefix_len(wb);
    common < wa.len() && common < wb.len()
}

fn suffix_clash(a: &Term, b: &Term) -> bool {
    let (Some((_, wa)), Some((_, wb))) = (split_trailing_word(a), split_trailing_word(b)) else {
        return false;
    };
    let common = wa.common_suffix_len(wb);
    common < wa.len() && common < wb.len()
}

/// Leading or trailing literals that disagree.
fn eq_nfix(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    if prefix_clash(a, b) || suffix_clash(a, b) {
        return verdict(false);
    }
    Ok(None)
}

fn lit_then(word: Word, rest: &[Term]) -> Result<Term> {
    let head = (!word.is_empty()).then(|| Term::string(word));
    Term::concat_of(head.into_iter().chain(rest.iter().cloned()))
}

fn then_lit(init: &[Term], word: Word) -> Result<Term> {
    let tail = (!word.is_empty()).then(|| Term::string(word));
    Term::concat_of(init.iter().cloned().chain(tail))
}

/// A side that is only a literal, used up entirely, becomes `""` without
/// shrinking; such equations are left to the length refutation.
fn if_smaller(t: &Term, out: Term) -> RuleResult {
    Ok((out.size() < t.size()).then_some(out))
}

/// Drop a shared first component, or the common prefix of leading
/// literals.
fn split_eq_strip_l(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    let (ca, cb) = (a.concat_components(), b.concat_components());
    if (ca.len() > 1 || cb.len() > 1) && ca[0] == cb[0] {
        let lhs = Term::concat_of(ca[1..].iter().cloned())?;
        let rhs = Term::concat_of(cb[1..].iter().cloned())?;
        return Term::mk_eq(&lhs, &rhs).map(Some);
    }
    let (Some((wa, ra)), Some((wb, rb))) = (split_leading_word(a), split_leading_word(b)) else {
        return Ok(None);
    };
    let common = wa.common_prefix_len(wb);
    let consumed = common == wa.len() || common == wb.len();
    if common == 0 || !consumed || (ra.is_empty() && rb.is_empty()) {
        return Ok(None);
    }
    let lhs = lit_then(wa.suffix_from(common), ra)?;
    let rhs = lit_then(wb.suffix_from(common), rb)?;
    if_smaller(t, Term::mk_eq(&lhs, &rhs)?)
}

/// Drop a shared last component, or the common suffix of trailing
/// literals.
fn split_eq_strip_r(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    let (ca, cb) = (a.concat_components(), b.concat_components());
    if (ca.len() > 1 || cb.len() > 1) && ca[ca.len() - 1] == cb[cb.len() - 1] {
        let lhs = Term::concat_of(ca[..ca.len() - 1].iter().cloned())?;
        let rhs = Term::concat_of(cb[..cb.len() - 1].iter().cloned())?;
        return Term::mk_eq(&lhs, &rhs).map(Some);
    }
    let (Some((ia, wa)), Some((ib, wb))) = (split_trailing_word(a), split_trailing_word(b)) else {
        return Ok(None);
    };
    let common = wa.common_suffix_len(wb);
    let consumed = common == wa.len() || common == wb.len();
    if common == 0 || !consumed || (ia.is_empty() && ib.is_empty()) {
        return Ok(None);
    }
    let lhs = then_lit(ia, wa.slice(0, wa.len() - common))?;
    let rhs = then_lit(ib, wb.slice(0, wb.len() - common))?;
    if_smaller(t, Term::mk_eq(&lhs, &rhs)?)
}

/// `x = (str.++ … x …)` → the other components are empty.
fn str_eq_unify(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    if string_parts(t).is_none() {
        return Ok(None);
    }
    let found = either_way(t, |x, s| {
        if x.op() == &Op::Concat || s.op() != &Op::Concat {
            return None;
        }
        let at = s.args().iter().position(|part| part == x)?;
        let others: Vec<Term> = s
            .args()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != at)
            .map(|(_, part)| part.clone())
            .collect();
        Some(others)
    });
    match found {
        Some(others) => is_empty_eq(&Term::concat_of(others)?).map(Some),
        None => Ok(None),
    }
}

/// `x ++ c = c ++ x` for a non-variable literal `c`.
fn commuting_literal(t: &Term) -> Option<(&Term, &Word)> {
    let (a, b) = string_parts(t)?;
    let ([x1, c1], [c2, x2]) = (a.concat_components(), b.concat_components()) else {
        return either_swap(a, b);
    };
    match (c1.as_word(), c2.as_word()) {
        (Some(w1), Some(w2)) if x1 == x2 && w1 == w2 && !x1.is_literal() => Some((x1, w1)),
        _ => either_swap(a, b),
    }
}

fn either_swap<'t>(a: &'t Term, b: &'t Term) -> Option<(&'t Term, &'t Word)> {
    let ([c1, x1], [x2, c2]) = (a.concat_components(), b.concat_components()) else {
        return None;
    };
    match (c1.as_word(), c2.as_word()) {
        (Some(w1), Some(w2)) if x1 == x2 && w1 == w2 && !x1.is_literal() => Some((x1, w1)),
        _ => None,
    }
}

fn power_membership(x: &Term, root: Word) -> RuleResult {
    let star = Term::mk_re_star(&Term::mk_to_re(&Term::string(root))?)?;
    Term::mk_in_re(x, &star).map(Some)
}

/// `x ++ "aa" = "aa" ++ x` → `x ∈ a*`.
fn str_eq_homog_const(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((x, c)) = commuting_literal(t) else {
        return Ok(None);
    };
    match c.homogeneous_char() {
        Some(ch) => power_membership(x, Word::from_char_code(ch)?),
        None => Ok(None),
    }
}

/// `x ++ c = c ++ x` → `x` is a power of the primitive root of `c`.
fn str_eq_const_nhomog(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let Some((x, c)) = commuting_literal(t) else {
        return Ok(None);
    };
    if c.homogeneous_char().is_some() {
        return Ok(None);
    }
    power_membership(x, c.primitive_root())
}

/// Sides with provably different lengths.
fn eq_len_deq(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    if ctx.oracle.equal_length(a, b).is_no() {
        return verdict(false);
    }
    Ok(None)
}

/// Equal strings contain each other.
fn eq_nctn(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    if ctx.oracle.contains(a, b).is_no() || ctx.oracle.contains(b, a).is_no() {
        return verdict(false);
    }
    Ok(None)
}

/// `(str.replace x y z) = x` → `¬contains(x, y) ∨ y = z`.
fn str_eq_repl_not_ctn(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let found = either_way(t, |r, x| {
        let (hay, y, z) = replace_args(r)?;
        (hay == x).then_some((x, y, z))
    });
    let Some((x, y, z)) = found else {
        return Ok(None);
    };
    let absent = Term::mk_not(&Term::mk_contains(x, y)?)?;
    Term::mk_or([absent, Term::mk_eq(y, z)?]).map(Some)
}

/// `(str.replace x y z) = z` with `y` not in `z` → `x = y ∨ x = z`.
fn str_eq_repl_to_eq(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let found = either_way(t, |r, w| {
        let (x, y, z) = replace_args(r)?;
        (z == w).then_some((x, y, z))
    });
    match found {
        Some((x, y, z)) if ctx.oracle.contains(z, y).is_no() => {
            Term::mk_or([Term::mk_eq(x, y)?, Term::mk_eq(x, z)?]).map(Some)
        }
        _ => Ok(None),
    }
}

/// Two replacements of the same pattern in the same haystack agree
/// exactly when nothing is replaced or the replacements agree.
fn str_eq_repl_to_dis(t: &Term, _: &RuleContext<'_>) -> RuleResult {
    let (a, b) = parts(t);
    let (Some((x1, y1, z)), Some((x2, y2, w))) = (replace_args(a), replace_args(b)) else {
        return Ok(None);
    };
    if x1 != x2 || y1 != y2 {
        return Ok(None);
    }
    let absent = Term::mk_not(&Term::mk_contains(x1, y1)?)?;
    Term::mk_or([absent, Term::mk_eq(z, w)?]).map(Some)
}

/// First components of equal length must be equal.
fn split_eq(t: &Term, ctx: &RuleContext<'_>) -> RuleResult {
    let Some((a, b)) = string_parts(t) else {
        return Ok(None);
    };
    let (ca, cb) = (a.concat_components(), b.concat_components());
    if ca.len() < 2 || cb.len() < 2 || !ctx.oracle.equal_length(&ca[0], &cb[0]).is_yes() {
        return Ok(None);
    }
    let head = Term::mk_eq(&ca[0], &cb[0])?;
    let rest = Term::mk_eq(
        &Term::concat_of(ca[1..].iter().cloned())?,
        &Term::concat_of(cb[1..].iter().cloned())?,
    )?;
    Term::mk_and([head, rest]).map(Some)
}
