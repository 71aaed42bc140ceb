//! Group selection
//!
//! Groups own channel messages and the files of the group's site library.
//! Folder values for both come from the display path recorded in the
//! item's groups info rather than from the stored path, which holds ids.

use super::scopes::{strings, Categorizer, CategoryScope, MatchOption, PathValues};
use super::{DomainSelector, Restore, SelectorKind};
use crate::details::{format_time, Entry, ItemInfo, ItemType};
use crate::error::{Result, SelectorError};
use crate::filters::Comparator;
use crate::path::{CategoryType, ResourcePath, ServiceType};
use crate::types::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categories of group data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupsCategory {
    /// Unrecognized category
    Unknown,
    /// The group
    Group,
    /// Channel
    Channel,
    /// Channel message
    ChannelMessage,
    /// Site library folder
    LibraryFolder,
    /// Site library file
    LibraryItem,
    /// Library drive name or id
    InfoSiteLibraryDrive,
    /// Channel name or id
    InfoChannel,
    /// Author of a message
    InfoChannelMessageCreator,
    /// Message creation, lower bound
    InfoChannelMessageCreatedAfter,
    /// Message creation, upper bound
    InfoChannelMessageCreatedBefore,
    /// Most recent reply, lower bound
    InfoChannelMessageLastReplyAfter,
    /// Most recent reply, upper bound
    InfoChannelMessageLastReplyBefore,
}

use GroupsCategory as GC;

const ALL: [GC; 12] = [
    GC::Group,
    GC::Channel,
    GC::ChannelMessage,
    GC::LibraryFolder,
    GC::LibraryItem,
    GC::InfoSiteLibraryDrive,
    GC::InfoChannel,
    GC::InfoChannelMessageCreator,
    GC::InfoChannelMessageCreatedAfter,
    GC::InfoChannelMessageCreatedBefore,
    GC::InfoChannelMessageLastReplyAfter,
    GC::InfoChannelMessageLastReplyBefore,
];

impl fmt::Display for GroupsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Categorizer for GroupsCategory {
    const SERVICE: ServiceType = ServiceType::Groups;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            GC::Unknown => "",
            GC::Group => "GroupsGroup",
            GC::Channel => "GroupsChannel",
            GC::ChannelMessage => "GroupsChannelMessage",
            GC::LibraryFolder => "GroupsLibraryFolder",
            GC::LibraryItem => "GroupsLibraryItem",
            GC::InfoSiteLibraryDrive => "GroupsInfoSiteLibraryDrive",
            GC::InfoChannel => "GroupsInfoChannel",
            GC::InfoChannelMessageCreator => "GroupsInfoChannelMessageCreator",
            GC::InfoChannelMessageCreatedAfter => "GroupsInfoChannelMessageCreatedAfter",
            GC::InfoChannelMessageCreatedBefore => "GroupsInfoChannelMessageCreatedBefore",
            GC::InfoChannelMessageLastReplyAfter => "GroupsInfoChannelMessageLastReplyAfter",
            GC::InfoChannelMessageLastReplyBefore => "GroupsInfoChannelMessageLastReplyBefore",
        }
    }

    fn unknown_cat() -> Self {
        GC::Unknown
    }

    fn root_cat() -> Self {
        GC::Group
    }

    fn leaf_cat(&self) -> Self {
        match self {
            GC::Channel
            | GC::ChannelMessage
            | GC::InfoChannel
            | GC::InfoChannelMessageCreator
            | GC::InfoChannelMessageCreatedAfter
            | GC::InfoChannelMessageCreatedBefore
            | GC::InfoChannelMessageLastReplyAfter
            | GC::InfoChannelMessageLastReplyBefore => GC::ChannelMessage,
            GC::LibraryFolder | GC::LibraryItem | GC::InfoSiteLibraryDrive => GC::LibraryItem,
            other => *other,
        }
    }

    fn cascade(&self) -> &'static [Self] {
        match self {
            GC::Group => &[
                GC::Channel,
                GC::ChannelMessage,
                GC::LibraryFolder,
                GC::LibraryItem,
            ],
            GC::Channel => &[GC::ChannelMessage],
            GC::LibraryFolder => &[GC::LibraryItem],
            _ => &[],
        }
    }

    fn path_keys(&self) -> &'static [Self] {
        match self.leaf_cat() {
            GC::ChannelMessage => &[GC::Group, GC::Channel, GC::ChannelMessage],
            GC::LibraryItem => &[GC::Group, GC::LibraryFolder, GC::LibraryItem],
            GC::Group => &[GC::Group],
            _ => &[],
        }
    }

    fn path_type(&self) -> CategoryType {
        match self.leaf_cat() {
            GC::ChannelMessage => CategoryType::ChannelMessages,
            GC::LibraryItem => CategoryType::Libraries,
            _ => CategoryType::Unknown,
        }
    }

    fn compares_paths(&self) -> bool {
        matches!(self, GC::Channel | GC::LibraryFolder)
    }

    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>> {
        let info = entry
            .info
            .groups()
            .ok_or_else(|| SelectorError::missing_info("no groups info in details"))?;

        let (folder_cat, item_cat) = match self.leaf_cat() {
            GC::ChannelMessage => (GC::Channel, GC::ChannelMessage),
            GC::LibraryItem => (GC::LibraryFolder, GC::LibraryItem),
            _ => return Err(SelectorError::UnrecognizedCategory(self.to_string())),
        };

        let item = if cfg.only_match_item_names {
            info.item_name.clone()
        } else if entry.item_ref.is_empty() {
            repo.item().to_string()
        } else {
            entry.item_ref.clone()
        };

        let mut folders = vec![info.parent_path.clone()];
        if !entry.location_ref.is_empty() {
            folders.push(entry.location_ref.clone());
        }

        let mut values = HashMap::new();
        values.insert(GC::Group, vec![repo.resource_owner().to_string()]);
        values.insert(folder_cat, folders);
        values.insert(item_cat, vec![item, entry.short_ref.clone()]);

        Ok(values)
    }

    fn from_path_category(category: CategoryType) -> Self {
        match category {
            CategoryType::ChannelMessages => GC::ChannelMessage,
            CategoryType::Libraries => GC::LibraryItem,
            _ => GC::Unknown,
        }
    }

    fn from_item_type(item_type: ItemType) -> Self {
        match item_type {
            ItemType::GroupsChannelMessage => GC::ChannelMessage,
            ItemType::SharePointLibrary => GC::LibraryItem,
            _ => GC::Unknown,
        }
    }

    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>> {
        let info = info.groups()?;

        let non_empty = |vals: [&String; 2]| -> Vec<String> {
            vals.into_iter().filter(|v| !v.is_empty()).cloned().collect()
        };

        let values = match self {
            GC::InfoSiteLibraryDrive => non_empty([&info.drive_name, &info.drive_id]),
            GC::InfoChannel => non_empty([&info.channel_id, &info.channel_name]),
            GC::InfoChannelMessageCreator => vec![info.message_creator.clone()],
            GC::InfoChannelMessageCreatedAfter | GC::InfoChannelMessageCreatedBefore => {
                vec![format_time(&info.created)]
            }
            GC::InfoChannelMessageLastReplyAfter | GC::InfoChannelMessageLastReplyBefore => {
                vec![format_time(&info.last_reply_at)]
            }
            _ => return None,
        };

        Some(values)
    }
}

/// Scope over group data
pub type GroupsScope = CategoryScope<GroupsCategory>;

impl<K: SelectorKind> DomainSelector<GroupsCategory, K> {
    /// Every channel message and library file of the given groups
    pub fn groups<S: AsRef<str>>(&self, groups: &[S]) -> Vec<GroupsScope> {
        vec![self.root_scope(&strings(groups))]
    }

    /// All group data of the selector's owners
    pub fn all_data(&self) -> Vec<GroupsScope> {
        [GC::LibraryFolder, GC::Channel]
            .into_iter()
            .map(|cat| self.folder_scope(cat, &super::any(), &[]))
            .collect()
    }

    /// Messages in the channels with the given names or ids
    pub fn channels<S: AsRef<str>>(&self, channels: &[S]) -> Vec<GroupsScope> {
        vec![self.info_scope_with(
            GC::Channel,
            GC::InfoChannel,
            &strings(channels),
            Comparator::EqualTo,
            &[],
        )]
    }

    /// Messages within channels
    ///
    /// `opts` apply to the channel values.
    pub fn channel_messages<F: AsRef<str>, I: AsRef<str>>(
        &self,
        channels: &[F],
        messages: &[I],
        opts: &[MatchOption],
    ) -> Vec<GroupsScope> {
        vec![self.item_scope(
            GC::ChannelMessage,
            &strings(messages),
            GC::Channel,
            &strings(channels),
            opts,
        )]
    }

    /// Files in the library drive with the given name or id
    pub fn library(&self, drive: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(GC::LibraryItem, GC::InfoSiteLibraryDrive, drive, Comparator::EqualTo)]
    }

    /// Library folders, and every file in them
    pub fn library_folders<S: AsRef<str>>(
        &self,
        folders: &[S],
        opts: &[MatchOption],
    ) -> Vec<GroupsScope> {
        vec![self.folder_scope(GC::LibraryFolder, &strings(folders), opts)]
    }

    /// Files within library folders
    pub fn library_items<F: AsRef<str>, I: AsRef<str>>(
        &self,
        folders: &[F],
        items: &[I],
        opts: &[MatchOption],
    ) -> Vec<GroupsScope> {
        vec![self.item_scope(
            GC::LibraryItem,
            &strings(items),
            GC::LibraryFolder,
            &strings(folders),
            opts,
        )]
    }
}

impl DomainSelector<GroupsCategory, Restore> {
    /// Messages whose author contains `creator`
    pub fn message_creator(&self, creator: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(
            GC::ChannelMessage,
            GC::InfoChannelMessageCreator,
            creator,
            Comparator::TargetIn,
        )]
    }

    /// Messages created after a formatted timestamp
    pub fn message_created_after(&self, time: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(
            GC::ChannelMessage,
            GC::InfoChannelMessageCreatedAfter,
            time,
            Comparator::LessThan,
        )]
    }

    /// Messages created before a formatted timestamp
    pub fn message_created_before(&self, time: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(
            GC::ChannelMessage,
            GC::InfoChannelMessageCreatedBefore,
            time,
            Comparator::GreaterThan,
        )]
    }

    /// Messages last replied to after a formatted timestamp
    pub fn message_last_reply_after(&self, time: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(
            GC::ChannelMessage,
            GC::InfoChannelMessageLastReplyAfter,
            time,
            Comparator::LessThan,
        )]
    }

    /// Messages last replied to before a formatted timestamp
    pub fn message_last_reply_before(&self, time: &str) -> Vec<GroupsScope> {
        vec![self.info_scope(
            GC::ChannelMessage,
            GC::InfoChannelMessageLastReplyBefore,
            time,
            Comparator::GreaterThan,
        )]
    }
}
