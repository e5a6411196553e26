//! Property-based tests for strux-core
//!
//! Structural invariants of words and terms.

mod term_properties;
mod word_properties;
