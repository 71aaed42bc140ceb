//! Chat selection
//!
//! Chats hang directly off their user with no folder level in between.
//! Chat data carries no display name of its own, so item scopes compare
//! against chat ids and short references only.

use super::scopes::{strings, Categorizer, CategoryScope, MatchOption, PathValues};
use super::{DomainSelector, Restore, SelectorKind};
use crate::details::{Entry, ItemInfo, ItemType};
use crate::error::{Result, SelectorError};
use crate::filters::Comparator;
use crate::path::{CategoryType, ResourcePath, ServiceType};
use crate::types::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categories of chat data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamsChatsCategory {
    /// Unrecognized category
    Unknown,
    /// The chat participant whose chats were backed up
    User,
    /// Chat thread
    Chat,
    /// Chat member
    InfoChatMember,
    /// Chat topic
    InfoChatName,
}

use TeamsChatsCategory as TC;

const ALL: [TC; 4] = [TC::User, TC::Chat, TC::InfoChatMember, TC::InfoChatName];

impl fmt::Display for TeamsChatsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Categorizer for TeamsChatsCategory {
    const SERVICE: ServiceType = ServiceType::TeamsChats;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            TC::Unknown => "",
            TC::User => "TeamsChatsUser",
            TC::Chat => "TeamsChatsChat",
            TC::InfoChatMember => "TeamsChatsInfoChatMember",
            TC::InfoChatName => "TeamsChatsInfoChatName",
        }
    }

    fn unknown_cat() -> Self {
        TC::Unknown
    }

    fn root_cat() -> Self {
        TC::User
    }

    fn leaf_cat(&self) -> Self {
        match self {
            TC::Chat | TC::InfoChatMember | TC::InfoChatName => TC::Chat,
            other => *other,
        }
    }

    fn cascade(&self) -> &'static [Self] {
        match self {
            TC::User => &[TC::Chat],
            _ => &[],
        }
    }

    fn path_keys(&self) -> &'static [Self] {
        match self.leaf_cat() {
            TC::Chat => &[TC::User, TC::Chat],
            TC::User => &[TC::User],
            _ => &[],
        }
    }

    fn path_type(&self) -> CategoryType {
        match self.leaf_cat() {
            TC::Chat => CategoryType::Chats,
            _ => CategoryType::Unknown,
        }
    }

    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>> {
        if *self != TC::Chat {
            return Err(SelectorError::UnrecognizedCategory(self.to_string()));
        }

        let item = if entry.item_ref.is_empty() {
            repo.item().to_string()
        } else {
            entry.item_ref.clone()
        };

        // chats have no name to match on, only ids
        let items = if cfg.only_match_item_names {
            vec![entry.short_ref.clone()]
        } else {
            vec![entry.short_ref.clone(), item]
        };

        let mut values = HashMap::new();
        values.insert(TC::User, vec![repo.resource_owner().to_string()]);
        values.insert(TC::Chat, items);

        Ok(values)
    }

    fn from_path_category(category: CategoryType) -> Self {
        match category {
            CategoryType::Chats => TC::Chat,
            _ => TC::Unknown,
        }
    }

    fn from_item_type(item_type: ItemType) -> Self {
        match item_type {
            ItemType::TeamsChat => TC::Chat,
            _ => TC::Unknown,
        }
    }

    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>> {
        let info = info.teams_chats()?;
        if Self::from_item_type(info.item_type) != TC::Chat {
            return None;
        }

        match self {
            TC::InfoChatMember => Some(vec![info.chat.members.join(",")]),
            TC::InfoChatName => Some(vec![info.chat.name.clone()]),
            _ => None,
        }
    }
}

/// Scope over chat data
pub type TeamsChatsScope = CategoryScope<TeamsChatsCategory>;

impl<K: SelectorKind> DomainSelector<TeamsChatsCategory, K> {
    /// Chats by id or short reference
    pub fn chats<S: AsRef<str>>(&self, chats: &[S]) -> Vec<TeamsChatsScope> {
        self.chats_with(chats, &[])
    }

    /// Chats by id or short reference, with extra comparison options
    pub fn chats_with<S: AsRef<str>>(
        &self,
        chats: &[S],
        opts: &[MatchOption],
    ) -> Vec<TeamsChatsScope> {
        vec![self.leaf_scope(TC::Chat, &strings(chats), opts)]
    }

    /// Every chat of the selector's owners
    pub fn all_data(&self) -> Vec<TeamsChatsScope> {
        vec![self.leaf_scope(TC::Chat, &super::any(), &[])]
    }
}

impl DomainSelector<TeamsChatsCategory, Restore> {
    /// Chats with a member containing `member`
    pub fn chat_member(&self, member: &str) -> Vec<TeamsChatsScope> {
        vec![self.info_scope(TC::Chat, TC::InfoChatMember, member, Comparator::TargetIn)]
    }

    /// Chats whose topic contains `name`
    pub fn chat_name(&self, name: &str) -> Vec<TeamsChatsScope> {
        vec![self.info_scope(TC::Chat, TC::InfoChatName, name, Comparator::TargetIn)]
    }
}
