//! Site selection
//!
//! A site holds three trees: document libraries, lists and pages. A site
//! can be named by id (the root category) or by web URL; both stand for
//! every category of the site.
//!
//! Library folders are stored beneath `drives/<driveID>/root:`. That prefix
//! is dropped before folder comparison, so library folder scopes are written
//! the way users see the folders.

use super::scopes::{strings, Categorizer, CategoryScope, MatchOption, PathValues};
use super::{DomainSelector, Restore, SelectorKind};
use crate::details::{format_time, Entry, ItemInfo, ItemType};
use crate::error::{Result, SelectorError};
use crate::filters::Comparator;
use crate::path::{Builder, CategoryType, ResourcePath, ServiceType};
use crate::types::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Folder elements in front of every library folder
const DRIVE_FOLDER_PREFIX_LEN: usize = 3;

/// Categories of site data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SharePointCategory {
    /// Unrecognized category
    Unknown,
    /// Site web URL, an alternative site identifier
    WebURL,
    /// The site
    Site,
    /// Site list
    List,
    /// List item
    ListItem,
    /// Document library folder
    LibraryFolder,
    /// Document library file
    LibraryItem,
    /// Page folder
    PageFolder,
    /// Site page
    Page,
    /// Creation, lower bound
    InfoCreatedAfter,
    /// Creation, upper bound
    InfoCreatedBefore,
    /// Modification, lower bound
    InfoModifiedAfter,
    /// Modification, upper bound
    InfoModifiedBefore,
    /// Library drive name or id
    InfoLibraryDrive,
}

use SharePointCategory as SP;

const ALL: [SP; 13] = [
    SP::WebURL,
    SP::Site,
    SP::List,
    SP::ListItem,
    SP::LibraryFolder,
    SP::LibraryItem,
    SP::PageFolder,
    SP::Page,
    SP::InfoCreatedAfter,
    SP::InfoCreatedBefore,
    SP::InfoModifiedAfter,
    SP::InfoModifiedBefore,
    SP::InfoLibraryDrive,
];

impl fmt::Display for SharePointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Categorizer for SharePointCategory {
    const SERVICE: ServiceType = ServiceType::SharePoint;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            SP::Unknown => "",
            SP::WebURL => "SharePointWebURL",
            SP::Site => "SharePointSite",
            SP::List => "SharePointList",
            SP::ListItem => "SharePointListItem",
            SP::LibraryFolder => "SharePointLibraryFolder",
            SP::LibraryItem => "SharePointLibraryItem",
            SP::PageFolder => "SharePointPageFolder",
            SP::Page => "SharePointPage",
            SP::InfoCreatedAfter => "SharePointInfoCreatedAfter",
            SP::InfoCreatedBefore => "SharePointInfoCreatedBefore",
            SP::InfoModifiedAfter => "SharePointInfoModifiedAfter",
            SP::InfoModifiedBefore => "SharePointInfoModifiedBefore",
            SP::InfoLibraryDrive => "SharePointInfoLibraryDrive",
        }
    }

    fn unknown_cat() -> Self {
        SP::Unknown
    }

    fn root_cat() -> Self {
        SP::Site
    }

    fn leaf_cat(&self) -> Self {
        match self {
            SP::LibraryFolder
            | SP::LibraryItem
            | SP::InfoLibraryDrive
            | SP::InfoCreatedAfter
            | SP::InfoCreatedBefore
            | SP::InfoModifiedAfter
            | SP::InfoModifiedBefore => SP::LibraryItem,
            SP::List | SP::ListItem => SP::ListItem,
            SP::PageFolder | SP::Page => SP::Page,
            other => *other,
        }
    }

    fn is_union(&self) -> bool {
        matches!(self, SP::Site | SP::WebURL)
    }

    fn cascade(&self) -> &'static [Self] {
        match self {
            SP::Site => &[
                SP::LibraryFolder,
                SP::LibraryItem,
                SP::List,
                SP::ListItem,
                SP::PageFolder,
                SP::Page,
            ],
            SP::LibraryFolder => &[SP::LibraryItem],
            SP::List => &[SP::ListItem],
            SP::PageFolder => &[SP::Page],
            _ => &[],
        }
    }

    fn path_keys(&self) -> &'static [Self] {
        match self.leaf_cat() {
            SP::LibraryItem => &[SP::Site, SP::LibraryFolder, SP::LibraryItem],
            SP::ListItem => &[SP::Site, SP::List, SP::ListItem],
            SP::Page => &[SP::Site, SP::PageFolder, SP::Page],
            SP::Site => &[SP::Site],
            _ => &[],
        }
    }

    fn path_type(&self) -> CategoryType {
        match self.leaf_cat() {
            SP::LibraryItem => CategoryType::Libraries,
            SP::ListItem => CategoryType::Lists,
            SP::Page => CategoryType::Pages,
            _ => CategoryType::Unknown,
        }
    }

    fn compares_paths(&self) -> bool {
        matches!(self, SP::LibraryFolder | SP::List | SP::PageFolder)
    }

    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>> {
        let (folder_cat, item_cat) = match self.leaf_cat() {
            SP::LibraryItem => (SP::LibraryFolder, SP::LibraryItem),
            SP::ListItem => (SP::List, SP::ListItem),
            SP::Page => (SP::PageFolder, SP::Page),
            _ => return Err(SelectorError::UnrecognizedCategory(self.to_string())),
        };

        let folder = if item_cat == SP::LibraryItem {
            if entry.info.sharepoint().is_none() {
                return Err(SelectorError::missing_info("no sharepoint info in details"));
            }

            let mut pb = Builder::new().append(repo.folders());
            for _ in 0..DRIVE_FOLDER_PREFIX_LEN {
                pb = pb.pop_front();
            }
            pb.elements().join("/")
        } else {
            repo.folder(false)
        };

        let mut item = if entry.item_ref.is_empty() {
            repo.item().to_string()
        } else {
            entry.item_ref.clone()
        };

        if cfg.only_match_item_names {
            item = entry
                .info
                .sharepoint()
                .map(|i| i.item_name.clone())
                .ok_or_else(|| SelectorError::missing_info("no sharepoint info in details"))?;
        }

        let mut folders = vec![folder];
        if !entry.location_ref.is_empty() {
            folders.push(entry.location_ref.clone());
        }

        let mut values = HashMap::new();
        values.insert(SP::Site, vec![repo.resource_owner().to_string()]);
        values.insert(folder_cat, folders);
        values.insert(item_cat, vec![item, entry.short_ref.clone()]);

        Ok(values)
    }

    fn from_path_category(category: CategoryType) -> Self {
        match category {
            CategoryType::Libraries => SP::LibraryItem,
            CategoryType::Lists => SP::ListItem,
            CategoryType::Pages => SP::Page,
            _ => SP::Unknown,
        }
    }

    fn from_item_type(item_type: ItemType) -> Self {
        match item_type {
            ItemType::SharePointLibrary => SP::LibraryItem,
            ItemType::SharePointList => SP::ListItem,
            ItemType::SharePointPage => SP::Page,
            _ => SP::Unknown,
        }
    }

    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>> {
        let info = info.sharepoint()?;

        let values = match self {
            SP::WebURL => vec![info.web_url.clone()],
            SP::InfoCreatedAfter | SP::InfoCreatedBefore => vec![format_time(&info.created)],
            SP::InfoModifiedAfter | SP::InfoModifiedBefore => vec![format_time(&info.modified)],
            SP::InfoLibraryDrive => [&info.drive_name, &info.drive_id]
                .into_iter()
                .filter(|v| !v.is_empty())
                .cloned()
                .collect(),
            _ => return None,
        };

        Some(values)
    }
}

/// Scope over site data
pub type SharePointScope = CategoryScope<SharePointCategory>;

impl<K: SelectorKind> DomainSelector<SharePointCategory, K> {
    /// Every library, list and page of the given sites
    pub fn sites<S: AsRef<str>>(&self, sites: &[S]) -> Vec<SharePointScope> {
        vec![self.root_scope(&strings(sites))]
    }

    /// All site data of the selector's owners
    pub fn all_data(&self) -> Vec<SharePointScope> {
        [SP::LibraryFolder, SP::List, SP::PageFolder]
            .into_iter()
            .map(|cat| self.folder_scope(cat, &super::any(), &[]))
            .collect()
    }

    /// Lists, and every item in them
    pub fn lists<S: AsRef<str>>(&self, lists: &[S], opts: &[MatchOption]) -> Vec<SharePointScope> {
        vec![self.folder_scope(SP::List, &strings(lists), opts)]
    }

    /// Items within lists
    ///
    /// `opts` apply to the list values.
    pub fn list_items<F: AsRef<str>, I: AsRef<str>>(
        &self,
        lists: &[F],
        items: &[I],
        opts: &[MatchOption],
    ) -> Vec<SharePointScope> {
        vec![self.item_scope(SP::ListItem, &strings(items), SP::List, &strings(lists), opts)]
    }

    /// Files in the library drive with the given name or id
    pub fn library(&self, drive: &str) -> Vec<SharePointScope> {
        vec![self.info_scope(SP::LibraryItem, SP::InfoLibraryDrive, drive, Comparator::EqualTo)]
    }

    /// Library folders, and every file in them
    pub fn library_folders<S: AsRef<str>>(
        &self,
        folders: &[S],
        opts: &[MatchOption],
    ) -> Vec<SharePointScope> {
        vec![self.folder_scope(SP::LibraryFolder, &strings(folders), opts)]
    }

    /// Files within library folders
    pub fn library_items<F: AsRef<str>, I: AsRef<str>>(
        &self,
        folders: &[F],
        items: &[I],
        opts: &[MatchOption],
    ) -> Vec<SharePointScope> {
        vec![self.item_scope(
            SP::LibraryItem,
            &strings(items),
            SP::LibraryFolder,
            &strings(folders),
            opts,
        )]
    }

    /// Page folders, and every page in them
    pub fn pages<S: AsRef<str>>(&self, pages: &[S], opts: &[MatchOption]) -> Vec<SharePointScope> {
        vec![self.folder_scope(SP::PageFolder, &strings(pages), opts)]
    }

    /// Pages within page folders
    pub fn page_items<F: AsRef<str>, I: AsRef<str>>(
        &self,
        pages: &[F],
        items: &[I],
        opts: &[MatchOption],
    ) -> Vec<SharePointScope> {
        vec![self.item_scope(SP::Page, &strings(items), SP::PageFolder, &strings(pages), opts)]
    }

    /// Library files created after a formatted timestamp
    pub fn created_after(&self, time: &str) -> Vec<SharePointScope> {
        vec![self.info_scope(SP::LibraryItem, SP::InfoCreatedAfter, time, Comparator::LessThan)]
    }

    /// Library files created before a formatted timestamp
    pub fn created_before(&self, time: &str) -> Vec<SharePointScope> {
        vec![self.info_scope(SP::LibraryItem, SP::InfoCreatedBefore, time, Comparator::GreaterThan)]
    }

    /// Library files modified after a formatted timestamp
    pub fn modified_after(&self, time: &str) -> Vec<SharePointScope> {
        vec![self.info_scope(SP::LibraryItem, SP::InfoModifiedAfter, time, Comparator::LessThan)]
    }

    /// Library files modified before a formatted timestamp
    pub fn modified_before(&self, time: &str) -> Vec<SharePointScope> {
        vec![self.info_scope(
            SP::LibraryItem,
            SP::InfoModifiedBefore,
            time,
            Comparator::GreaterThan,
        )]
    }
}

impl DomainSelector<SharePointCategory, Restore> {
    /// Everything on the sites at the given web URLs
    ///
    /// URLs match exactly unless a prefix or suffix option is given.
    pub fn web_url<S: AsRef<str>>(&self, urls: &[S], opts: &[MatchOption]) -> Vec<SharePointScope> {
        let comparator = if opts.contains(&MatchOption::PrefixMatch) {
            Comparator::TargetPathPrefix
        } else if opts.contains(&MatchOption::SuffixMatch) {
            Comparator::TargetPathSuffix
        } else {
            Comparator::TargetPathEquals
        };

        let urls = strings(urls);
        [SP::LibraryItem, SP::ListItem, SP::Page]
            .into_iter()
            .map(|cat| self.info_scope_with(cat, SP::WebURL, &urls, comparator, &[]))
            .collect()
    }
}
