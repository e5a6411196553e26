//! Strux Core - terms of the SMT-LIB string and regular expression theory
//!
//! This crate provides the foundational types shared by the Strux rewriter:
//! - [`Sort`]s and string literals ([`Word`])
//! - Immutable, structurally shared [`Term`]s with checked constructors
//! - An SMT-LIB style printer with an optional depth limit
//! - Diagnostics [`Options`] with change notification
//!
//! # Examples
//!
//! ```
//! use strux_core::{Sort, Term};
//!
//! let x = Term::var("x", Sort::String);
//! let start = Term::int(-1);
//! let len = Term::int(3);
//! let sub = Term::mk_substr(&x, &start, &len).unwrap();
//! assert_eq!(sub.to_string(), "(str.substr x (- 1) 3)");
//!
//! // Malformed applications are rejected at construction.
//! assert!(Term::mk_len(&start).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod options;
pub mod sort;
pub mod word;

pub use ast::{DisplayTerm, Op, Term};
pub use error::{Arity, OptionError, Result, TermError};
pub use options::{OptionKey, OptionListener, Options, OptionsManager, TraceVerbosity};
pub use sort::Sort;
pub use word::{MAX_CODE_POINT, Word};
