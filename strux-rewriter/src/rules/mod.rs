//! The rule catalog.
//!
//! Each rule is a plain function from a node (whose children are already in
//! normal form) to an optional replacement. Rules are grouped per operator
//! into static tables; [`rules_for`] returns the table for a node's operator
//! and the engine fires the first rule in table order that returns a
//! replacement.
//!
//! Every rule declares how it makes progress. [`Measure::Size`] rules
//! return a strictly smaller tree, which the engine can verify. The others
//! name the ordering they decrease instead; these are the rules that push
//! an operator below another one or trade an operator for a comparison of
//! the same size.

mod contains;
mod conversion;
mod core;
mod equality;
mod index_of;
mod prefix;
mod regex;
mod replace;
mod substr;
mod util;

use crate::entail::EntailmentOracle;
use crate::rewrites::RewriteId;
use strux_core::{Op, Term};

/// Outcome of trying one rule.
pub type RuleResult = strux_core::Result<Option<Term>>;

/// Rule body.
pub type RuleFn = fn(&Term, &RuleContext<'_>) -> RuleResult;

/// Progress measure a rule decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// The output tree has fewer nodes
    Size,
    /// The output is smaller in the named ordering
    Lex(&'static str),
}

/// A catalog entry.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Identifier recorded in traces
    pub id: RewriteId,
    /// Declared measure
    pub measure: Measure,
    /// Rule body
    pub apply: RuleFn,
}

impl Rule {
    pub(crate) const fn size(id: RewriteId, apply: RuleFn) -> Self {
        Self {
            id,
            measure: Measure::Size,
            apply,
        }
    }

    pub(crate) const fn lex(id: RewriteId, ordering: &'static str, apply: RuleFn) -> Self {
        Self {
            id,
            measure: Measure::Lex(ordering),
            apply,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("measure", &self.measure)
            .finish()
    }
}

/// What a rule may consult besides the node itself.
pub struct RuleContext<'a> {
    /// Entailment queries
    pub oracle: &'a dyn EntailmentOracle,
}

/// Rules for nodes with operator `op`, in priority order.
pub fn rules_for(op: &Op) -> &'static [Rule] {
    match op {
        Op::Concat => core::CONCAT_RULES,
        Op::Length => core::LENGTH_RULES,
        Op::Eq => equality::EQ_RULES,
        Op::Not | Op::And | Op::Or => core::BOOL_RULES,
        Op::Ite => core::ITE_RULES,
        Op::Add | Op::Sub => core::ARITH_RULES,
        Op::IntLeq => core::INT_LEQ_RULES,
        Op::Substr => substr::SUBSTR_RULES,
        Op::IndexOf => index_of::INDEX_OF_RULES,
        Op::Replace => replace::REPLACE_RULES,
        Op::ReplaceAll => replace::REPLACE_ALL_RULES,
        Op::Contains => contains::CONTAINS_RULES,
        Op::PrefixOf | Op::SuffixOf => prefix::AFFIX_RULES,
        Op::StrLeq => prefix::STR_LEQ_RULES,
        Op::FromInt => conversion::FROM_INT_RULES,
        Op::ToInt => conversion::TO_INT_RULES,
        Op::ToCode => conversion::TO_CODE_RULES,
        Op::FromCode => conversion::FROM_CODE_RULES,
        Op::ToLower | Op::ToUpper => conversion::CASE_RULES,
        Op::Rev => conversion::REV_RULES,
        Op::InRe => regex::IN_RE_RULES,
        Op::ReConcat => regex::RE_CONCAT_RULES,
        Op::ReUnion => regex::RE_UNION_RULES,
        Op::ReInter => regex::RE_INTER_RULES,
        Op::ReStar => regex::RE_STAR_RULES,
        Op::ReLoop { .. } => regex::RE_LOOP_RULES,
        Op::Var(_)
        | Op::Str(_)
        | Op::Int(_)
        | Op::Bool(_)
        | Op::ReNone
        | Op::ReAll
        | Op::ReAllChar
        | Op::ToRe
        | Op::ReRange
        | Op::ReComp => &[],
    }
}

/// Every rule table, for inspection.
pub fn all_tables() -> [&'static [Rule]; 26] {
    [
        core::CONCAT_RULES,
        core::LENGTH_RULES,
        equality::EQ_RULES,
        core::BOOL_RULES,
        core::ITE_RULES,
        core::ARITH_RULES,
        core::INT_LEQ_RULES,
        substr::SUBSTR_RULES,
        index_of::INDEX_OF_RULES,
        replace::REPLACE_RULES,
        replace::REPLACE_ALL_RULES,
        contains::CONTAINS_RULES,
        prefix::AFFIX_RULES,
        prefix::STR_LEQ_RULES,
        conversion::FROM_INT_RULES,
        conversion::TO_INT_RULES,
        conversion::TO_CODE_RULES,
        conversion::FROM_CODE_RULES,
        conversion::CASE_RULES,
        conversion::REV_RULES,
        regex::IN_RE_RULES,
        regex::RE_CONCAT_RULES,
        regex::RE_UNION_RULES,
        regex::RE_INTER_RULES,
        regex::RE_STAR_RULES,
        regex::RE_LOOP_RULES,
    ]
}
