//! Property-based tests for strux-rewriter
//!
//! Engine guarantees over generated string terms and the rule name table.

mod name_properties;
mod rewriter_properties;
