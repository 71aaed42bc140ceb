//! Main test module for tenant-selectors
//!
//! This module includes all test suites:
//! - Integration tests for end-to-end selector scenarios
//! - Property-based tests for invariants
//! - Edge cases around wildcards, owners and malformed input

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::tenant_selectors::fault::Bus;
    use ::tenant_selectors::selectors::*;
    use ::tenant_selectors::*;

    use crate::integration::CatalogBuilder;

    #[test]
    fn test_empty_catalog() {
        let mut sel = ExchangeRestore::new(&any());
        sel.include(sel.all_data());

        let kept = sel.reduce(&Details::default(), &Bus::default());
        assert!(kept.is_empty());
    }

    #[test]
    fn test_none_owner_selects_nothing() {
        let deets = CatalogBuilder::new()
            .mail("u1", "Inbox", "m1", "hi")
            .build();

        let mut sel = ExchangeRestore::new(&none());
        sel.include(sel.all_data());

        assert!(sel.reduce(&deets, &Bus::default()).is_empty());
        assert!(sel.split_by_resource_owner(&["u1"]).is_empty());
    }

    #[test]
    fn test_other_owner_never_leaks() {
        let deets = CatalogBuilder::new()
            .mail("u1", "Inbox", "m1", "hi")
            .mail("u2", "Inbox", "m2", "hi")
            .build();

        let mut sel = ExchangeRestore::new(&["u1"]);
        // the scope names u2 but the selector only covers u1
        sel.include(sel.users(&["u2"]));

        assert!(sel.reduce(&deets, &Bus::default()).is_empty());
    }

    #[test]
    fn test_malformed_selector_json() {
        let bad = r#"{"service":"exchange","resourceOwners":42}"#;
        assert!(serde_json::from_str::<Selector>(bad).is_err());

        let unknown = r#"{"service":"fax","resourceOwners":{"comparator":"Pass"}}"#;
        assert!(serde_json::from_str::<Selector>(unknown).is_err());
    }

    #[test]
    fn test_unicode_folders() {
        let deets = CatalogBuilder::new()
            .mail("u1", "Входящие", "m1", "привет")
            .mail("u1", "受信トレイ", "m2", "こんにちは")
            .build();

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.include(sel.mail_folders(&["входящие"], &[]));

        let kept = sel.reduce(&deets, &Bus::default());
        assert_eq!(kept.len(), 1);
        assert!(kept.entries[0].repo_ref.ends_with("/m1"));
    }

    #[test]
    fn test_fail_fast_surfaces_first_error() {
        let mut deets = CatalogBuilder::new()
            .mail("u1", "Inbox", "m1", "hi")
            .build();
        deets.add(Entry {
            repo_ref: "tid/exchange/u1".to_string(),
            short_ref: "short".to_string(),
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info: ItemInfo::Exchange(Default::default()),
        });

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.include(sel.all_data());

        let bus = Bus::new(true);
        let kept = sel.reduce(&deets, &bus);
        assert_eq!(kept.len(), 1);
        assert!(matches!(bus.failure(), Some(SelectorError::InvalidPath(_))));
    }
}
