//! Error types for rewriting and evaluation.

use crate::rewrites::RewriteId;
use strux_core::{Sort, TermError};
use thiserror::Error;

/// A defect in the rule catalog, detected while rewriting.
///
/// None of these can be caused by the input term: a well-formed term never
/// makes a correct rule misbehave. They are reported instead of looping or
/// returning a wrong result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// A rule tried to build an ill-formed term
    #[error("rule {rule} built a malformed term: {source}")]
    MalformedOutput {
        /// Offending rule
        rule: RewriteId,
        /// Construction failure
        source: TermError,
    },
    /// A rule changed the sort of the term it rewrote
    #[error("rule {rule} changed the sort from {from} to {to}")]
    SortChanged {
        /// Offending rule
        rule: RewriteId,
        /// Sort before the rewrite
        from: Sort,
        /// Sort after the rewrite
        to: Sort,
    },
    /// A rule fired but returned its input unchanged
    #[error("rule {rule} fired without changing the term")]
    NoProgress {
        /// Offending rule
        rule: RewriteId,
    },
    /// A size-decreasing rule did not shrink the term
    #[error("rule {rule} did not decrease the term size ({before} -> {after})")]
    MeasureViolation {
        /// Offending rule
        rule: RewriteId,
        /// Size before the rewrite
        before: u64,
        /// Size after the rewrite
        after: u64,
    },
    /// A node could not be rebuilt over the normal forms of its children
    #[error("cannot rebuild {op} over rewritten arguments: {source}")]
    RebuildFailed {
        /// Operator of the node
        op: &'static str,
        /// Construction failure
        source: TermError,
    },
    /// The configured step cap was reached
    #[error("rewrite step limit of {limit} exceeded (last rule {rule})")]
    StepLimitExceeded {
        /// Configured cap
        limit: usize,
        /// Rule that fired last
        rule: RewriteId,
    },
}

impl RewriteError {
    /// Rule that caused the error, if a single rule is to blame.
    pub fn rule(&self) -> Option<RewriteId> {
        match self {
            RewriteError::MalformedOutput { rule, .. }
            | RewriteError::SortChanged { rule, .. }
            | RewriteError::NoProgress { rule }
            | RewriteError::MeasureViolation { rule, .. }
            | RewriteError::StepLimitExceeded { rule, .. } => Some(*rule),
            RewriteError::RebuildFailed { .. } => None,
        }
    }
}

/// Result type for rewriting.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors raised by the ground evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A variable has no value in the assignment
    #[error("no value for variable `{0}`")]
    UnboundVariable(String),
    /// Terms of this sort have no value (regular languages)
    #[error("terms of sort {0} have no value")]
    UnsupportedSort(Sort),
    /// An assigned value has the wrong sort
    #[error("value of `{name}` must be {expected}")]
    Malformed {
        /// Variable name
        name: String,
        /// Sort the variable was declared with
        expected: Sort,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_rule() {
        let err = RewriteError::MeasureViolation {
            rule: RewriteId::CtnEq,
            before: 3,
            after: 3,
        };
        assert_eq!(
            err.to_string(),
            "rule CTN_EQ did not decrease the term size (3 -> 3)"
        );
        assert_eq!(err.rule(), Some(RewriteId::CtnEq));

        let err = RewriteError::StepLimitExceeded {
            limit: 10,
            rule: RewriteId::RplId,
        };
        assert_eq!(
            err.to_string(),
            "rewrite step limit of 10 exceeded (last rule RPL_ID)"
        );
    }

    #[test]
    fn test_rebuild_failure_blames_no_rule() {
        let err = RewriteError::RebuildFailed {
            op: "str.len",
            source: TermError::SortMismatch {
                op: "str.len",
                position: 0,
                expected: Sort::String,
                found: Sort::Int,
            },
        };
        assert_eq!(err.rule(), None);
        assert_eq!(
            err.to_string(),
            "cannot rebuild str.len over rewritten arguments: \
             argument 0 of str.len must be String, found Int"
        );
    }
}
