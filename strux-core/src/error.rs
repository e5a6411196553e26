//! Error types for term construction and option handling.

use crate::sort::Sort;
use thiserror::Error;

/// Expected argument count of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// At least this many arguments.
    AtLeast(usize),
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity.
    pub fn admits(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Malformed term construction.
///
/// Terms are validated when they are built; a value of this type means the
/// caller tried to build a term that the string theory does not admit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    /// Wrong number of arguments
    #[error("{op} expects {expected} argument(s), found {found}")]
    ArityMismatch {
        /// Operator name
        op: &'static str,
        /// Accepted arity
        expected: Arity,
        /// Number of arguments supplied
        found: usize,
    },
    /// Argument of the wrong sort
    #[error("argument {position} of {op} must be {expected}, found {found}")]
    SortMismatch {
        /// Operator name
        op: &'static str,
        /// Zero-based argument position
        position: usize,
        /// Expected sort
        expected: Sort,
        /// Sort that was supplied
        found: Sort,
    },
    /// `re.loop` with an upper bound below the lower bound is still legal
    /// (it denotes the empty language), but bounds beyond `u32` are not.
    #[error("regex loop bounds {lo}..{hi} are out of range")]
    InvalidLoopBounds {
        /// Lower bound
        lo: u64,
        /// Upper bound
        hi: u64,
    },
    /// Character outside the string alphabet
    #[error("code point {0:#x} is outside the string alphabet")]
    InvalidCodePoint(u32),
}

/// Result type for term construction.
pub type Result<T> = std::result::Result<T, TermError>;

/// Errors raised when updating options by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// No option with this name
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// The value does not parse for this option
    #[error("invalid value `{value}` for option `{key}`")]
    InvalidValue {
        /// Option name
        key: &'static str,
        /// Rejected value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_admits() {
        assert!(Arity::Exactly(2).admits(2));
        assert!(!Arity::Exactly(2).admits(3));
        assert!(Arity::AtLeast(2).admits(5));
        assert!(!Arity::AtLeast(2).admits(1));
    }

    #[test]
    fn test_error_messages() {
        let err = TermError::ArityMismatch {
            op: "str.substr",
            expected: Arity::Exactly(3),
            found: 2,
        };
        assert_eq!(err.to_string(), "str.substr expects 3 argument(s), found 2");

        let err = TermError::SortMismatch {
            op: "str.len",
            position: 0,
            expected: Sort::String,
            found: Sort::Int,
        };
        assert_eq!(
            err.to_string(),
            "argument 0 of str.len must be String, found Int"
        );
    }
}
