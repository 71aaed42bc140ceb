//! Property-based testing for tenant-selectors
//!
//! Uses proptest to check path escaping, filter wildcards and reduce laws
//! across randomly generated inputs.

use ::tenant_selectors::details::*;
use ::tenant_selectors::fault::Bus;
use ::tenant_selectors::filters;
use ::tenant_selectors::path::{self, Builder, ResourcePath};
use ::tenant_selectors::selectors::*;
use proptest::prelude::*;

/// Path elements rich in separators and escape characters
fn element_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("/".to_string()),
            Just("\\".to_string()),
            "[a-zA-Z0-9 ._-]{1,6}".prop_map(|s| s),
        ],
        1..6,
    )
    .prop_map(|parts| parts.concat())
}

/// Owner ids, folder names and item ids
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
struct MailSpec {
    owner: String,
    folder: String,
    id: String,
    subject: String,
}

fn mail_strategy() -> impl Strategy<Value = MailSpec> {
    (
        prop_oneof![Just("u1".to_string()), Just("u2".to_string())],
        prop_oneof![Just("Inbox".to_string()), Just("Archive".to_string()), element_strategy()],
        name_strategy(),
        "[a-z ]{0,12}",
    )
        .prop_map(|(owner, folder, id, subject)| MailSpec {
            owner,
            folder,
            id,
            subject,
        })
}

fn catalog(mails: &[MailSpec]) -> Details {
    let entries = mails
        .iter()
        .map(|m| {
            let repo_ref = Builder::new()
                .append([
                    "tid",
                    "exchange",
                    m.owner.as_str(),
                    "email",
                    m.folder.as_str(),
                    m.id.as_str(),
                ])
                .to_string();
            Entry {
                short_ref: ResourcePath::from_data_layer_path(&repo_ref, true)
                    .map(|rp| rp.short_ref())
                    .unwrap_or_default(),
                repo_ref,
                parent_ref: String::new(),
                location_ref: String::new(),
                item_ref: String::new(),
                updated: false,
                info: ItemInfo::Exchange(ExchangeInfo {
                    item_type: ItemType::ExchangeMail,
                    subject: m.subject.clone(),
                    ..Default::default()
                }),
            }
        })
        .collect();

    Details::new(entries)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Escaping then unescaping returns the original element
    #[test]
    fn prop_escape_round_trip(elem in element_strategy()) {
        let escaped = path::escape_element(&elem);
        prop_assert!(path::validate_escaped_element(&escaped).is_ok());
        prop_assert_eq!(path::unescape(&escaped), elem);
    }

    /// A built path splits back into the same elements
    #[test]
    fn prop_builder_split_round_trip(elems in prop::collection::vec(element_strategy(), 1..5)) {
        let built = Builder::new().append(&elems);
        let parsed = Builder::new().split_unescape_append(&built.to_string()).unwrap();
        prop_assert_eq!(parsed.elements(), built.elements());
    }

    /// Pass admits everything, fail admits nothing
    #[test]
    fn prop_wildcard_filters(input in ".{0,20}") {
        prop_assert!(filters::pass().compare(&input));
        prop_assert!(!filters::fail().compare(&input));
    }

    /// Reducing a reduced catalog changes nothing
    #[test]
    fn prop_reduce_idempotent(
        mails in prop::collection::vec(mail_strategy(), 0..12),
        folder in prop_oneof![Just("Inbox".to_string()), Just(ANY_TGT.to_string())],
        subject in "[a-z]{0,3}",
    ) {
        let deets = catalog(&mails);

        let mut sel = ExchangeRestore::new(&["u1", "u2"]);
        sel.include(sel.mail_folders(&[folder], &[]));
        if !subject.is_empty() {
            sel.filter(sel.mail_subject(&subject));
        }

        let once = sel.reduce(&deets, &Bus::default());
        let twice = sel.reduce(&once, &Bus::default());
        prop_assert_eq!(once, twice);
    }

    /// Without inclusions or filters nothing survives
    #[test]
    fn prop_empty_selector_keeps_nothing(
        mails in prop::collection::vec(mail_strategy(), 1..12),
    ) {
        let deets = catalog(&mails);

        let mut sel = ExchangeRestore::new(&any());
        sel.exclude(sel.mails(&any(), &["nothing"], &[]));

        prop_assert!(sel.reduce(&deets, &Bus::default()).is_empty());
    }

    /// Any keeps every owned mail, None keeps none
    #[test]
    fn prop_wildcard_scopes(
        mails in prop::collection::vec(mail_strategy(), 1..12),
    ) {
        let deets = catalog(&mails);

        let mut all = ExchangeRestore::new(&any());
        all.include(all.mails(&any(), &any(), &[]));
        prop_assert_eq!(all.reduce(&deets, &Bus::default()).len(), deets.len());

        let mut nothing = ExchangeRestore::new(&any());
        nothing.include(nothing.mails(&any(), &none(), &[]));
        prop_assert!(nothing.reduce(&deets, &Bus::default()).is_empty());
    }

    /// An entry matched by an exclusion never survives
    #[test]
    fn prop_exclusion_wins(
        mails in prop::collection::vec(mail_strategy(), 1..12),
    ) {
        let deets = catalog(&mails);
        let target = mails[0].id.clone();

        let mut sel = ExchangeRestore::new(&any());
        sel.include(sel.all_data());
        sel.exclude(sel.mails(&any(), &[target.as_str()], &[]));

        let kept = sel.reduce(&deets, &Bus::default());
        let suffix = format!("/{}", target);
        prop_assert!(kept.entries.iter().all(|e| !e.repo_ref.ends_with(&suffix)));
    }

    /// Mail scopes never admit contacts or events
    #[test]
    fn prop_cross_category_isolation(
        mails in prop::collection::vec(mail_strategy(), 1..8),
    ) {
        let mut deets = catalog(&mails);
        for m in &mails {
            let repo_ref = Builder::new()
                .append([
                    "tid",
                    "exchange",
                    m.owner.as_str(),
                    "contacts",
                    "Contacts",
                    m.id.as_str(),
                ])
                .to_string();
            deets.add(Entry {
                short_ref: m.id.clone(),
                repo_ref,
                parent_ref: String::new(),
                location_ref: String::new(),
                item_ref: String::new(),
                updated: false,
                info: ItemInfo::Exchange(ExchangeInfo {
                    item_type: ItemType::ExchangeContact,
                    subject: m.subject.clone(),
                    ..Default::default()
                }),
            });
        }

        let mut sel = ExchangeRestore::new(&any());
        sel.include(sel.mail_folders(&any(), &[]));

        let kept = sel.reduce(&deets, &Bus::default());
        prop_assert!(kept.entries.iter().all(|e| e.repo_ref.contains("/email/")));
    }

    /// Splitting by owner partitions the original result
    #[test]
    fn prop_split_union(
        mails in prop::collection::vec(mail_strategy(), 0..12),
    ) {
        let deets = catalog(&mails);

        let mut sel = ExchangeRestore::new(&any());
        sel.include(sel.mail_folders(&["Inbox"], &[]));
        let whole = sel.reduce(&deets, &Bus::default());

        let mut joined = 0;
        for split in sel.split_by_resource_owner(&["u1", "u2"]) {
            joined += split.reduce(&deets, &Bus::default()).len();
        }
        prop_assert_eq!(joined, whole.len());
    }
}
