//! Property-based tests for the rule name table

use proptest::prelude::*;
use strux_rewriter::{RewriteId, UNSUPPORTED, rewrite_name};

proptest! {
    /// Every raw value resolves to a rule name or the sentinel
    #[test]
    fn name_lookup_is_total(raw in any::<u32>()) {
        let name = rewrite_name(raw);
        match RewriteId::from_raw(raw) {
            Some(id) => {
                prop_assert_eq!(name, id.name());
                prop_assert_eq!(RewriteId::parse_name(name), Some(id));
            }
            None => prop_assert_eq!(name, UNSUPPORTED),
        }
    }

    /// Names of catalog entries round-trip through the lookup
    #[test]
    fn catalog_names_round_trip(idx in 0..RewriteId::ALL.len()) {
        let id = RewriteId::ALL[idx];
        prop_assert_eq!(RewriteId::from_raw(id.as_raw()), Some(id));
        prop_assert_eq!(RewriteId::parse_name(id.name()), Some(id));
        prop_assert_ne!(id.name(), UNSUPPORTED);
    }
}
