//! Property-based tests for string literals
//!
//! Checks the SMT-LIB string operations against their defining laws.

use proptest::prelude::*;
use strux_core::Word;

fn word() -> impl Strategy<Value = Word> {
    "[abc]{0,6}".prop_map(|s| s.parse::<Word>().unwrap())
}

proptest! {
    /// A found position really holds the needle
    #[test]
    fn find_returns_an_occurrence(w in word(), needle in word(), from in 0usize..8) {
        if let Some(pos) = w.find(&needle, from) {
            prop_assert!(pos >= from);
            prop_assert_eq!(w.slice(pos, pos + needle.len()), needle);
        }
    }

    /// No occurrence is skipped
    #[test]
    fn find_is_leftmost(w in word(), needle in word()) {
        if let Some(pos) = w.find(&needle, 0) {
            for earlier in 0..pos {
                prop_assert_ne!(w.slice(earlier, earlier + needle.len()), needle.clone());
            }
        }
    }

    /// Replacing a needle that does not occur is the identity
    #[test]
    fn replace_absent_is_identity(w in word(), r in word()) {
        let needle = Word::try_from("d").unwrap();
        prop_assert_eq!(w.replace_first(&needle, &r), w.clone());
        prop_assert_eq!(w.replace_all(&needle, &r), w);
    }

    /// Length of a concatenation is the sum of lengths
    #[test]
    fn concat_length_adds(a in word(), b in word()) {
        prop_assert_eq!(a.concat(&b).len(), a.len() + b.len());
    }

    /// Reversal is an involution
    #[test]
    fn reverse_twice_is_identity(w in word()) {
        prop_assert_eq!(w.reversed().reversed(), w);
    }

    /// The primitive root repeats to the whole word
    #[test]
    fn primitive_root_tiles_word(w in word()) {
        let root = w.primitive_root();
        if !w.is_empty() {
            prop_assert_eq!(w.len() % root.len(), 0);
            let mut tiled = Word::empty();
            for _ in 0..w.len() / root.len() {
                tiled = tiled.concat(&root);
            }
            prop_assert_eq!(tiled, w);
        }
    }
}
