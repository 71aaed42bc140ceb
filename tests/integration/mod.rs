//! Integration tests for tenant-selectors
//!
//! Builds realistic multi-owner catalogs and checks selector behavior end
//! to end: typed construction, serialization, the generic reduce, reasons
//! and splitting by owner.

use ::tenant_selectors::details::*;
use ::tenant_selectors::fault::Bus;
use ::tenant_selectors::path::{Builder, ResourcePath};
use ::tenant_selectors::selectors::*;
use ::tenant_selectors::*;
use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

/// Builds catalogs with consistent short refs and info payloads
#[derive(Default)]
pub struct CatalogBuilder {
    entries: Vec<Entry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, elements: &[&str], info: ItemInfo) -> &mut Self {
        let repo_ref = Builder::new().append(elements.iter().copied()).to_string();
        let short_ref = ResourcePath::from_data_layer_path(&repo_ref, true)
            .unwrap()
            .short_ref();

        self.entries.push(Entry {
            repo_ref,
            short_ref,
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info,
        });
        self
    }

    /// Mail message in `folder`
    pub fn mail(&mut self, owner: &str, folder: &str, id: &str, subject: &str) -> &mut Self {
        self.push(
            &["tid", "exchange", owner, "email", folder, id],
            ItemInfo::Exchange(ExchangeInfo {
                item_type: ItemType::ExchangeMail,
                subject: subject.to_string(),
                sender: "sender@example.com".to_string(),
                received: at(2024, 3),
                ..Default::default()
            }),
        )
    }

    /// Contact in `folder`
    pub fn contact(&mut self, owner: &str, folder: &str, id: &str, name: &str) -> &mut Self {
        self.push(
            &["tid", "exchange", owner, "contacts", folder, id],
            ItemInfo::Exchange(ExchangeInfo {
                item_type: ItemType::ExchangeContact,
                contact_name: name.to_string(),
                ..Default::default()
            }),
        )
    }

    /// Event in `calendar`
    pub fn event(&mut self, owner: &str, calendar: &str, id: &str, subject: &str) -> &mut Self {
        self.push(
            &["tid", "exchange", owner, "events", calendar, id],
            ItemInfo::Exchange(ExchangeInfo {
                item_type: ItemType::ExchangeEvent,
                subject: subject.to_string(),
                event_start: at(2024, 6),
                ..Default::default()
            }),
        )
    }

    /// Drive file beneath `folders`
    pub fn drive_file(&mut self, owner: &str, folders: &[&str], id: &str) -> &mut Self {
        let mut elems = vec!["tid", "onedrive", owner, "files", "drives", "d1", "root:"];
        elems.extend_from_slice(folders);
        elems.push(id);
        self.push(
            &elems,
            ItemInfo::OneDrive(OneDriveInfo {
                item_type: ItemType::OneDriveItem,
                item_name: id.to_string(),
                parent_path: folders.join("/"),
                created: at(2023, 1),
                modified: at(2023, 1),
                ..Default::default()
            }),
        )
    }

    /// Chat of `owner`
    pub fn chat(&mut self, owner: &str, id: &str, members: &[&str]) -> &mut Self {
        self.push(
            &["tid", "teamschats", owner, "chats", id],
            ItemInfo::TeamsChats(TeamsChatsInfo {
                item_type: ItemType::TeamsChat,
                chat: ChatInfo {
                    members: members.iter().map(|m| m.to_string()).collect(),
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
    }

    /// Folder entry, never returned by a reduce
    pub fn folder(&mut self, owner: &str, folder: &str) -> &mut Self {
        let repo_ref = Builder::new()
            .append(["tid", "exchange", owner, "email", folder])
            .to_string();
        self.entries.push(Entry {
            repo_ref,
            short_ref: String::new(),
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info: ItemInfo::Folder(FolderInfo {
                item_type: ItemType::FolderItem,
                display_name: folder.to_string(),
                ..Default::default()
            }),
        });
        self
    }

    pub fn build(&self) -> Details {
        Details::new(self.entries.clone())
    }
}

pub fn at(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

fn refs(d: &Details) -> Vec<String> {
    d.entries.iter().map(|e| e.repo_ref.clone()).collect()
}

/// Two users' mailboxes plus unrelated drive data
fn tenant_catalog() -> Details {
    CatalogBuilder::new()
        .folder("u1", "Inbox")
        .mail("u1", "Inbox", "m1", "foo report")
        .mail("u1", "Inbox", "m2", "lunch")
        .mail("u1", "Archive", "m3", "foo archive")
        .contact("u1", "Contacts", "c1", "Alice")
        .event("u1", "Calendar", "e1", "foo standup")
        .mail("u2", "Inbox", "m4", "foo")
        .contact("u2", "Contacts", "c2", "Bob")
        .drive_file("u1", &["Work"], "plan.docx")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_subject_filter_keeps_only_matching_mail() {
        let deets = CatalogBuilder::new()
            .mail("u1", "Inbox", "m1", "foo")
            .mail("u1", "Inbox", "m2", "bar")
            .event("u1", "Calendar", "e1", "foo")
            .build();

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.filter(sel.mail_subject("foo"));

        let kept = sel.reduce(&deets, &Bus::default());
        assert_eq!(refs(&kept), vec![deets.entries[0].repo_ref.clone()]);
    }

    #[test]
    fn test_users_scope_cascades_to_every_category() {
        let deets = tenant_catalog();

        let mut sel = ExchangeBackup::new(&any());
        sel.include(sel.users(&["u1"]));

        let kept = sel.reduce(&deets, &Bus::default());
        info!("kept {} entries", kept.len());

        assert_eq!(kept.len(), 5);
        assert!(kept.entries.iter().all(|e| e.repo_ref.contains("/u1/")));
        assert!(kept.entries.iter().all(|e| !e.is_folder()));
        assert!(kept.entries.iter().all(|e| e.repo_ref.contains("/exchange/")));
    }

    #[test]
    fn test_include_filter_exclude_together() {
        let deets = tenant_catalog();

        let mut sel = ExchangeRestore::new(&["u1", "u2"]);
        sel.include(sel.mail_folders(&["Inbox"], &[]));
        sel.filter(sel.mail_subject("foo"));
        sel.exclude(sel.mails(&any(), &["m4"], &[]));

        let kept = sel.reduce(&deets, &Bus::default());
        assert_eq!(refs(&kept), vec!["tid/exchange/u1/email/Inbox/m1"]);
    }

    #[test]
    fn test_escaped_folder_names() {
        let deets = CatalogBuilder::new()
            .mail("u1", "a/b", "m1", "slash")
            .mail("u1", "a", "m2", "plain")
            .build();
        assert_eq!(deets.entries[0].repo_ref, r"tid/exchange/u1/email/a\/b/m1");

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.include(sel.mail_folders(&["a"], &[MatchOption::ExactMatch]));

        // the escaped folder "a/b" is one element, not a subfolder of "a"
        let kept = sel.reduce(&deets, &Bus::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.entries[0].repo_ref, "tid/exchange/u1/email/a/m2");
    }

    #[test]
    fn test_selector_survives_json_round_trip() {
        let deets = tenant_catalog();

        let mut sel = ExchangeRestore::new(&["u1", "u2"]);
        sel.include(sel.mail_folders(&["Inbox"], &[MatchOption::PrefixMatch]));
        sel.include(sel.contacts(&any(), &["c2"], &[]));
        sel.filter(sel.mail_received_after(&details::format_time(&at(2024, 1))));
        let before = sel.reduce(&deets, &Bus::default());

        let json = serde_json::to_string(sel.selector()).unwrap();
        let restored: Selector = serde_json::from_str(&json).unwrap();
        let after = restored.reduce(&deets, &Bus::default()).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_generic_reduce_matches_typed_reduce() {
        let deets = tenant_catalog();

        let mut sel = OneDriveBackup::new(&["u1"]);
        sel.include(sel.folders(&["Work"], &[]));

        let typed = sel.reduce(&deets, &Bus::default());
        let generic = sel.clone().into_selector().reduce(&deets, &Bus::default()).unwrap();
        assert_eq!(typed, generic);
        assert_eq!(typed.len(), 1);
    }

    #[test]
    fn test_bad_entries_are_recorded() {
        let mut deets = tenant_catalog();
        deets.add(Entry {
            repo_ref: "tid/exchange/u1/bogus/x/y".to_string(),
            short_ref: "bad".to_string(),
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info: ItemInfo::Exchange(ExchangeInfo::default()),
        });

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.include(sel.all_data());

        let bus = Bus::new(false);
        let kept = sel.reduce(&deets, &bus);
        assert_eq!(kept.len(), 5);
        assert_eq!(bus.recovered().len(), 1);
        assert!(bus.failure().is_none());
    }

    #[test]
    fn test_split_union_equals_original() {
        let deets = tenant_catalog();

        let mut sel = ExchangeRestore::new(&["u1", "u2"]);
        sel.include(sel.mail_folders(&["Inbox"], &[]));
        sel.include(sel.contacts(&any(), &any(), &[]));
        sel.exclude(sel.mails(&any(), &["m2"], &[]));
        let whole = sel.reduce(&deets, &Bus::default());

        let splits = sel.split_by_resource_owner(&["u1", "u2"]);
        assert_eq!(splits.len(), 2);

        let mut joined = Vec::new();
        for split in &splits {
            let owner = split.selector().id().to_string();
            let part = split.reduce(&deets, &Bus::default());
            assert!(part
                .entries
                .iter()
                .all(|e| e.repo_ref.contains(&format!("/{}/", owner))));
            joined.extend(part.entries);
        }

        let mut expected = whole.entries.clone();
        expected.sort_by(|a, b| a.repo_ref.cmp(&b.repo_ref));
        joined.sort_by(|a, b| a.repo_ref.cmp(&b.repo_ref));
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_reasons_for_chats() {
        let mut sel = TeamsChatsBackup::new(&["u1"]);
        sel.include(sel.all_data());

        let reasons = sel.reasons("tid", false);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].subtree_path().to_string(), "tid/teamschats/u1/chats");

        let deets = CatalogBuilder::new()
            .chat("u1", "c1", &["alice"])
            .chat("u1", "c2", &["bob"])
            .build();
        let mut restore = TeamsChatsRestore::new(&["u1"]);
        restore.filter(restore.chat_member("bob"));
        assert_eq!(restore.reduce(&deets, &Bus::default()).len(), 1);
    }

    #[test]
    fn test_destination_per_category() {
        let mut dest = Destination::<ExchangeCategory>::new();
        dest.set(ExchangeCategory::MailFolder, "Restored Mail").unwrap();
        dest.set(ExchangeCategory::ContactFolder, "").unwrap();

        assert_eq!(
            dest.get_or_default(ExchangeCategory::MailFolder, "Inbox"),
            "Restored Mail"
        );
        assert_eq!(
            dest.get_or_default(ExchangeCategory::ContactFolder, "Contacts"),
            "Contacts"
        );
        assert!(matches!(
            dest.set(ExchangeCategory::MailFolder, "Again"),
            Err(SelectorError::ExistingDestination(_))
        ));
    }

    #[test]
    fn test_values_with_commas() {
        let deets = CatalogBuilder::new()
            .mail("u1", "Projects, 2023", "m1", "Re: budget, Q3")
            .mail("u1", "Projects", "m2", "Q3 offsite")
            .mail("u1", "2023", "m3", "budget")
            .build();

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.include(sel.mail_folders(&["Projects, 2023"], &[]));
        let kept = sel.reduce(&deets, &Bus::default());
        let refs: Vec<&str> = kept.entries.iter().map(|e| e.repo_ref.as_str()).collect();
        assert_eq!(refs, vec!["tid/exchange/u1/email/Projects, 2023/m1"]);

        let mut sel = ExchangeRestore::new(&["u1"]);
        sel.filter(sel.mail_subject("Re: budget, Q3"));
        let kept = sel.reduce(&deets, &Bus::default());
        assert_eq!(kept.len(), 1);
        assert!(kept.entries[0].repo_ref.ends_with("/m1"));

        // the value survives a JSON round trip as one target
        let json = serde_json::to_string(sel.selector()).unwrap();
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reduce(&deets, &Bus::default()).unwrap(), kept);
    }
}
