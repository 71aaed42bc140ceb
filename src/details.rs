//! Catalog of previously backed-up items
//!
//! A backup produces a [`Details`] catalog: one [`Entry`] per item or folder,
//! each naming its location with a canonical resource path and carrying the
//! metadata of exactly one data domain in its [`ItemInfo`] payload. The
//! selector reduce engine consumes and produces catalogs of this shape.
//!
//! ## Serialized form
//!
//! ```json
//! {
//!   "entries": [
//!     {
//!       "repoRef": "tid/exchange/uid/email/Inbox/mid",
//!       "shortRef": "3f1c2a9b0d7e",
//!       "itemRef": "mid",
//!       "info": { "exchange": { "itemType": "exchangeMail", "subject": "hi" } }
//!     }
//!   ]
//! }
//! ```

use crate::error::Result;
use crate::path::ResourcePath;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Render a timestamp so that string order matches chronological order
///
/// Info filters compare times as strings; every time value, whether taken
/// from an entry or supplied as a filter target, should pass through here.
pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Discriminator for the kind of item an info payload describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    /// Unset or unrecognized
    #[default]
    Unknown = 0,
    /// Address book entry
    ExchangeContact = 1,
    /// Calendar event
    ExchangeEvent = 2,
    /// Mail message
    ExchangeMail = 3,
    /// Document library file
    SharePointLibrary = 101,
    /// List item
    SharePointList = 102,
    /// Site page
    SharePointPage = 103,
    /// Drive file
    OneDriveItem = 205,
    /// Any folder
    FolderItem = 306,
    /// Channel message
    GroupsChannelMessage = 401,
    /// Chat thread
    TeamsChat = 501,
}

/// Metadata for a folder entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderInfo {
    /// Always [`ItemType::FolderItem`]
    pub item_type: ItemType,
    /// Name shown to users
    pub display_name: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Aggregate size in bytes
    pub size: i64,
    /// Item type of the folder's contents
    pub data_type: ItemType,
    /// Owning drive name, for drive-backed folders
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    /// Owning drive id, for drive-backed folders
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
}

/// Metadata for mail, contact and event items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExchangeInfo {
    /// Mail, contact or event
    pub item_type: ItemType,
    /// Mail sender address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sender: String,
    /// Mail or event subject
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    /// Mail recipients
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient: Vec<String>,
    /// Display path of the containing folder
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    /// Mail receipt time
    pub received: DateTime<Utc>,
    /// Event start time
    pub event_start: DateTime<Utc>,
    /// Event end time
    pub event_end: DateTime<Utc>,
    /// Event organizer
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organizer: String,
    /// Contact display name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contact_name: String,
    /// Whether the event repeats
    pub event_recurs: bool,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Size in bytes
    pub size: i64,
}

/// Metadata for site library, list and page items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharePointInfo {
    /// Library, list or page
    pub item_type: ItemType,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Library drive name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    /// Library drive id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    /// Item display name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    /// Item owner
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
    /// Display path of the containing folder
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    /// Size in bytes
    pub size: i64,
    /// Site web URL
    #[serde(rename = "webUrl", skip_serializing_if = "String::is_empty")]
    pub web_url: String,
    /// Site id
    #[serde(rename = "siteID", skip_serializing_if = "String::is_empty")]
    pub site_id: String,
}

/// Metadata for personal drive files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneDriveInfo {
    /// Always [`ItemType::OneDriveItem`]
    pub item_type: ItemType,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Drive id
    #[serde(rename = "driveID", skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    /// Drive name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    /// File display name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    /// File owner
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
    /// Display path of the containing folder
    pub parent_path: String,
    /// Size in bytes
    pub size: i64,
}

/// Metadata for group channel messages and group library files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupsInfo {
    /// Channel message or library file
    pub item_type: ItemType,
    /// Item display name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_name: String,
    /// Display path of the containing folder or channel
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    /// Library drive name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drive_name: String,
    /// Library drive id
    #[serde(rename = "driveID", skip_serializing_if = "String::is_empty")]
    pub drive_id: String,
    /// Group site id
    #[serde(rename = "siteID", skip_serializing_if = "String::is_empty")]
    pub site_id: String,
    /// Channel id
    #[serde(rename = "channelID", skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    /// Channel name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_name: String,
    /// Author of the channel message
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message_creator: String,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Time of the most recent reply
    pub last_reply_at: DateTime<Utc>,
    /// Size in bytes
    pub size: i64,
}

/// Chat thread properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatInfo {
    /// Chat topic, if any
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Member display names or ids
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the latest message
    pub last_message_at: DateTime<Utc>,
    /// Number of messages in the thread
    pub message_count: i64,
}

/// Metadata for chat threads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamsChatsInfo {
    /// Always [`ItemType::TeamsChat`]
    pub item_type: ItemType,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Display path of the containing folder
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_path: String,
    /// Chat properties
    pub chat: ChatInfo,
}

/// Domain-specific metadata of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemInfo {
    /// A folder in any domain
    Folder(FolderInfo),
    /// Mail, contact or event
    Exchange(ExchangeInfo),
    /// Site library, list or page item
    SharePoint(SharePointInfo),
    /// Drive file
    OneDrive(OneDriveInfo),
    /// Group channel message or library file
    Groups(GroupsInfo),
    /// Chat thread
    TeamsChats(TeamsChatsInfo),
}

impl ItemInfo {
    /// The item type discriminator of whichever payload is set
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemInfo::Folder(i) => i.item_type,
            ItemInfo::Exchange(i) => i.item_type,
            ItemInfo::SharePoint(i) => i.item_type,
            ItemInfo::OneDrive(i) => i.item_type,
            ItemInfo::Groups(i) => i.item_type,
            ItemInfo::TeamsChats(i) => i.item_type,
        }
    }

    /// Mail, contact or event payload
    pub fn exchange(&self) -> Option<&ExchangeInfo> {
        match self {
            ItemInfo::Exchange(i) => Some(i),
            _ => None,
        }
    }

    /// Site payload
    pub fn sharepoint(&self) -> Option<&SharePointInfo> {
        match self {
            ItemInfo::SharePoint(i) => Some(i),
            _ => None,
        }
    }

    /// Drive payload
    pub fn onedrive(&self) -> Option<&OneDriveInfo> {
        match self {
            ItemInfo::OneDrive(i) => Some(i),
            _ => None,
        }
    }

    /// Group payload
    pub fn groups(&self) -> Option<&GroupsInfo> {
        match self {
            ItemInfo::Groups(i) => Some(i),
            _ => None,
        }
    }

    /// Chat payload
    pub fn teams_chats(&self) -> Option<&TeamsChatsInfo> {
        match self {
            ItemInfo::TeamsChats(i) => Some(i),
            _ => None,
        }
    }
}

/// One recorded item or folder in a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Canonical, escaped resource path of the item
    pub repo_ref: String,
    /// Short reference of the repo path
    pub short_ref: String,
    /// Short reference of the parent folder
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_ref: String,
    /// Human-readable folder location, escaped
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location_ref: String,
    /// Stable id of the item, when it differs from the last path element
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub item_ref: String,
    /// Whether the item changed in the backup that recorded it
    #[serde(default)]
    pub updated: bool,
    /// Domain-specific metadata
    pub info: ItemInfo,
}

impl Entry {
    /// Parse the repo ref into a resource path
    ///
    /// Folder entries parse without an item; everything else treats the
    /// last element as the item.
    pub fn repo_path(&self) -> Result<ResourcePath> {
        ResourcePath::from_data_layer_path(&self.repo_ref, !self.is_folder())
    }

    /// True for folder entries
    pub fn is_folder(&self) -> bool {
        matches!(self.info, ItemInfo::Folder(_))
    }

    /// Item type of the info payload
    pub fn item_type(&self) -> ItemType {
        self.info.item_type()
    }
}

/// A catalog of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    /// Entries in recording order
    pub entries: Vec<Entry>,
}

impl Details {
    /// Create a catalog from entries
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Append an entry
    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Entries that describe items rather than folders
    pub fn items(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| !e.is_folder()).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
