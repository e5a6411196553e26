//! Strux Rewriter - rule-based simplification of string and regex terms
//!
//! This crate turns terms of the SMT-LIB string theory into a normal form
//! using a catalog of named rewrite rules:
//! - [`StringsRewriter`] drives the rules bottom-up to a fixpoint
//! - [`RewriteId`] names every rule, with a total name lookup
//! - [`Trace`] records which rule produced each step
//! - [`EntailmentOracle`] answers the semantic side conditions of rules
//! - [`eval`] evaluates ground terms, for checking rewrites
//!
//! # Examples
//!
//! ```
//! use strux_core::{Sort, Term};
//! use strux_rewriter::{RewriteId, StringsRewriter};
//!
//! let x = Term::var("x", Sort::String);
//! let a = Term::mk_string("a").unwrap();
//! let t = Term::mk_replace(&x, &a, &a).unwrap();
//!
//! let rewriter = StringsRewriter::new();
//! let (nf, trace) = rewriter.rewrite_with_trace(&t);
//! assert_eq!(nf, x);
//! assert_eq!(trace.rules().collect::<Vec<_>>(), vec![RewriteId::RplId]);
//! assert_eq!(RewriteId::RplId.name(), "RPL_ID");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod entail;
pub mod error;
pub mod eval;
pub mod rewrites;
pub mod rules;
pub mod trace;

pub use engine::{RewriteConfig, RewriteOutcome, RewriteStats, StringsRewriter};
pub use entail::{Entail, EntailmentOracle, StructuralOracle};
pub use error::{EvalError, Result, RewriteError};
pub use eval::{Assignment, Value, eval};
pub use rewrites::{Family, RewriteId, UNSUPPORTED, rewrite_name};
pub use trace::{RewriteStep, Trace, TraceFormat, TraceFormatHandle};
