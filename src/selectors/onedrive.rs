//! Drive selection
//!
//! Drive files live beneath `drives/<driveID>/root:` in the stored path.
//! Folder scopes compare against the folders after that prefix.

use super::scopes::{strings, Categorizer, CategoryScope, MatchOption, PathValues};
use super::{DomainSelector, SelectorKind};
use crate::details::{format_time, Entry, ItemInfo, ItemType};
use crate::error::{Result, SelectorError};
use crate::filters::Comparator;
use crate::path::{Builder, CategoryType, ResourcePath, ServiceType};
use crate::types::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const DRIVE_FOLDER_PREFIX_LEN: usize = 3;

/// Categories of drive data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OneDriveCategory {
    /// Unrecognized category
    Unknown,
    /// The drive's user
    User,
    /// Folder
    Folder,
    /// File
    Item,
    /// Creation, lower bound
    InfoCreatedAfter,
    /// Creation, upper bound
    InfoCreatedBefore,
    /// Last modification, lower bound
    InfoModifiedAfter,
    /// Last modification, upper bound
    InfoModifiedBefore,
}

use OneDriveCategory as OD;

const ALL: [OD; 7] = [
    OD::User,
    OD::Folder,
    OD::Item,
    OD::InfoCreatedAfter,
    OD::InfoCreatedBefore,
    OD::InfoModifiedAfter,
    OD::InfoModifiedBefore,
];

impl fmt::Display for OneDriveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Categorizer for OneDriveCategory {
    const SERVICE: ServiceType = ServiceType::OneDrive;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            OD::Unknown => "",
            OD::User => "OneDriveUser",
            OD::Folder => "OneDriveFolder",
            OD::Item => "OneDriveItem",
            OD::InfoCreatedAfter => "FileInfoCreatedAfter",
            OD::InfoCreatedBefore => "FileInfoCreatedBefore",
            OD::InfoModifiedAfter => "FileInfoModifiedAfter",
            OD::InfoModifiedBefore => "FileInfoModifiedBefore",
        }
    }

    fn unknown_cat() -> Self {
        OD::Unknown
    }

    fn root_cat() -> Self {
        OD::User
    }

    fn leaf_cat(&self) -> Self {
        match self {
            OD::Unknown | OD::User => *self,
            _ => OD::Item,
        }
    }

    fn cascade(&self) -> &'static [Self] {
        match self {
            OD::User => &[OD::Folder, OD::Item],
            OD::Folder => &[OD::Item],
            _ => &[],
        }
    }

    fn path_keys(&self) -> &'static [Self] {
        match self.leaf_cat() {
            OD::Item => &[OD::User, OD::Folder, OD::Item],
            OD::User => &[OD::User],
            _ => &[],
        }
    }

    fn path_type(&self) -> CategoryType {
        match self.leaf_cat() {
            OD::Item => CategoryType::Files,
            _ => CategoryType::Unknown,
        }
    }

    fn compares_paths(&self) -> bool {
        *self == OD::Folder
    }

    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>> {
        if self.leaf_cat() != OD::Item {
            return Err(SelectorError::UnrecognizedCategory(self.to_string()));
        }

        let mut pb = Builder::new().append(repo.folders());
        for _ in 0..DRIVE_FOLDER_PREFIX_LEN {
            pb = pb.pop_front();
        }

        let item = if cfg.only_match_item_names {
            entry
                .info
                .onedrive()
                .map(|i| i.item_name.clone())
                .ok_or_else(|| SelectorError::missing_info("no onedrive info in details"))?
        } else if entry.item_ref.is_empty() {
            repo.item().to_string()
        } else {
            entry.item_ref.clone()
        };

        let mut folders = vec![pb.elements().join("/")];
        if !entry.location_ref.is_empty() {
            folders.push(entry.location_ref.clone());
        }

        let mut values = HashMap::new();
        values.insert(OD::User, vec![repo.resource_owner().to_string()]);
        values.insert(OD::Folder, folders);
        values.insert(OD::Item, vec![item, entry.short_ref.clone()]);

        Ok(values)
    }

    fn from_path_category(category: CategoryType) -> Self {
        match category {
            CategoryType::Files => OD::Item,
            _ => OD::Unknown,
        }
    }

    fn from_item_type(item_type: ItemType) -> Self {
        match item_type {
            ItemType::OneDriveItem => OD::Item,
            _ => OD::Unknown,
        }
    }

    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>> {
        let info = info.onedrive()?;

        match self {
            OD::InfoCreatedAfter | OD::InfoCreatedBefore => Some(vec![format_time(&info.created)]),
            OD::InfoModifiedAfter | OD::InfoModifiedBefore => {
                Some(vec![format_time(&info.modified)])
            }
            _ => None,
        }
    }
}

/// Scope over drive data
pub type OneDriveScope = CategoryScope<OneDriveCategory>;

impl<K: SelectorKind> DomainSelector<OneDriveCategory, K> {
    /// Every file of the given users
    pub fn users<S: AsRef<str>>(&self, users: &[S]) -> Vec<OneDriveScope> {
        vec![self.root_scope(&strings(users))]
    }

    /// All drive data of the selector's owners
    pub fn all_data(&self) -> Vec<OneDriveScope> {
        self.folders(&super::any(), &[])
    }

    /// Folders, and every file in them
    pub fn folders<S: AsRef<str>>(
        &self,
        folders: &[S],
        opts: &[MatchOption],
    ) -> Vec<OneDriveScope> {
        vec![self.folder_scope(OD::Folder, &strings(folders), opts)]
    }

    /// Files within folders
    ///
    /// `opts` apply to the folder values.
    pub fn items<F: AsRef<str>, I: AsRef<str>>(
        &self,
        folders: &[F],
        items: &[I],
        opts: &[MatchOption],
    ) -> Vec<OneDriveScope> {
        vec![self.item_scope(OD::Item, &strings(items), OD::Folder, &strings(folders), opts)]
    }

    /// Files created after a formatted timestamp
    pub fn created_after(&self, time: &str) -> Vec<OneDriveScope> {
        vec![self.info_scope(OD::Item, OD::InfoCreatedAfter, time, Comparator::LessThan)]
    }

    /// Files created before a formatted timestamp
    pub fn created_before(&self, time: &str) -> Vec<OneDriveScope> {
        vec![self.info_scope(OD::Item, OD::InfoCreatedBefore, time, Comparator::GreaterThan)]
    }

    /// Files modified after a formatted timestamp
    pub fn modified_after(&self, time: &str) -> Vec<OneDriveScope> {
        vec![self.info_scope(OD::Item, OD::InfoModifiedAfter, time, Comparator::LessThan)]
    }

    /// Files modified before a formatted timestamp
    pub fn modified_before(&self, time: &str) -> Vec<OneDriveScope> {
        vec![self.info_scope(OD::Item, OD::InfoModifiedBefore, time, Comparator::GreaterThan)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::{Details, OneDriveInfo};
    use crate::fault::Bus;
    use crate::selectors::{any, OneDriveBackup, OneDriveRestore};
    use chrono::{TimeZone, Utc};

    const REPORT: &str = "tid/onedrive/uid/files/drives/d1/root:/Work/Reports/report.docx";
    const PHOTO: &str = "tid/onedrive/uid/files/drives/d1/root:/Photos/beach.jpg";
    const TOP: &str = "tid/onedrive/uid/files/drives/d1/root:/notes.txt";

    fn file(repo_ref: &str, name: &str, year: i32) -> Entry {
        let created = Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap();
        Entry {
            repo_ref: repo_ref.to_string(),
            short_ref: ResourcePath::from_data_layer_path(repo_ref, true)
                .unwrap()
                .short_ref(),
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info: ItemInfo::OneDrive(OneDriveInfo {
                item_type: ItemType::OneDriveItem,
                item_name: name.to_string(),
                drive_id: "d1".to_string(),
                created,
                modified: created,
                ..Default::default()
            }),
        }
    }

    fn catalog() -> Details {
        Details::new(vec![
            file(REPORT, "Q3 Report.docx", 2022),
            file(PHOTO, "Beach.jpg", 2023),
            file(TOP, "Notes.txt", 2024),
        ])
    }

    fn refs(d: &Details) -> Vec<&str> {
        d.entries.iter().map(|e| e.repo_ref.as_str()).collect()
    }

    #[test]
    fn test_categories() {
        assert_eq!(OD::Folder.leaf_cat(), OD::Item);
        assert_eq!(OD::InfoModifiedBefore.leaf_cat(), OD::Item);
        assert_eq!(OD::leaves(), vec![OD::Item]);
        assert_eq!(OD::Folder.path_type(), CategoryType::Files);
        assert_eq!(OD::parse("FileInfoCreatedAfter"), OD::InfoCreatedAfter);
        assert_eq!(OD::from_item_type(ItemType::OneDriveItem), OD::Item);
    }

    #[test]
    fn test_path_values_drop_drive_prefix() {
        let ent = file(REPORT, "Q3 Report.docx", 2022);
        let repo = ent.repo_path().unwrap();

        let pv = OD::Item.path_values(&repo, &ent, &Config::default()).unwrap();
        assert_eq!(pv[&OD::User], vec!["uid"]);
        assert_eq!(pv[&OD::Folder], vec!["Work/Reports"]);
        assert_eq!(pv[&OD::Item], vec!["report.docx".to_string(), ent.short_ref.clone()]);

        let top = file(TOP, "Notes.txt", 2024);
        let repo = top.repo_path().unwrap();
        let pv = OD::Item.path_values(&repo, &top, &Config::default()).unwrap();
        assert_eq!(pv[&OD::Folder], vec![""]);
    }

    #[test]
    fn test_only_match_item_names_needs_info() {
        let mut ent = file(PHOTO, "Beach.jpg", 2023);
        let repo = ent.repo_path().unwrap();
        let cfg = Config { only_match_item_names: true };

        let pv = OD::Item.path_values(&repo, &ent, &cfg).unwrap();
        assert_eq!(pv[&OD::Item][0], "Beach.jpg");

        ent.info = ItemInfo::Exchange(Default::default());
        assert!(matches!(
            OD::Item.path_values(&repo, &ent, &cfg),
            Err(SelectorError::MissingItemInfo(_))
        ));
    }

    #[test]
    fn test_reduce_scenarios() {
        let sel = OneDriveRestore::new(&["uid"]);

        let table: Vec<(&str, Vec<OneDriveScope>, Vec<OneDriveScope>, Vec<&str>)> = vec![
            ("all data", sel.all_data(), vec![], vec![REPORT, PHOTO, TOP]),
            ("user", sel.users(&["uid"]), vec![], vec![REPORT, PHOTO, TOP]),
            ("folder subtree", sel.folders(&["Work"], &[]), vec![], vec![REPORT]),
            ("nested folder", sel.folders(&["Reports"], &[]), vec![], vec![REPORT]),
            (
                "exact folder",
                sel.folders(&["Work"], &[MatchOption::ExactMatch]),
                vec![],
                vec![],
            ),
            (
                "prefix folder",
                sel.folders(&["Work/Rep"], &[MatchOption::PrefixMatch]),
                vec![],
                vec![],
            ),
            ("item by id", sel.items(&any(), &["beach.jpg"], &[]), vec![], vec![PHOTO]),
            ("item wrong case", sel.items(&any(), &["BEACH.JPG"], &[]), vec![], vec![]),
            (
                "exclude folder",
                sel.all_data(),
                sel.folders(&["Photos"], &[]),
                vec![REPORT, TOP],
            ),
        ];

        for (name, include, exclude, expect) in table {
            let mut s = sel.clone();
            s.include(include);
            s.exclude(exclude);
            assert_eq!(refs(&s.reduce(&catalog(), &Bus::default())), expect, "{}", name);
        }
    }

    #[test]
    fn test_time_filters() {
        let sel = OneDriveBackup::new(&["uid"]);
        let mid = format_time(&Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

        let table: Vec<(&str, Vec<OneDriveScope>, Vec<&str>)> = vec![
            ("created after", sel.created_after(&mid), vec![PHOTO, TOP]),
            ("created before", sel.created_before(&mid), vec![REPORT]),
            ("modified after", sel.modified_after(&mid), vec![PHOTO, TOP]),
            ("modified before", sel.modified_before(&mid), vec![REPORT]),
        ];

        for (name, filter, expect) in table {
            let mut s = sel.clone();
            s.include(s.all_data());
            s.filter(filter);
            assert_eq!(refs(&s.reduce(&catalog(), &Bus::default())), expect, "{}", name);
        }
    }

    #[test]
    fn test_item_names_compare_loosely() {
        let mut sel = OneDriveRestore::new(&["uid"]);
        sel.configure(Config { only_match_item_names: true });
        sel.include(sel.items(&any(), &["q3 report.docx"], &[]));

        assert_eq!(refs(&sel.reduce(&catalog(), &Bus::default())), vec![REPORT]);
    }
}
