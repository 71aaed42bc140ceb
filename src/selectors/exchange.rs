//! Mail, contact and calendar selection
//!
//! Exchange data is owned by a user and sorted into three trees: contact
//! folders, event calendars and mail folders. Each holds a single item
//! category.
//!
//! ```rust
//! use tenant_selectors::selectors::{any, ExchangeBackup};
//!
//! let mut sel = ExchangeBackup::new(&["u1"]);
//! sel.include(sel.mails(&["Inbox"], &any(), &[]));
//! sel.filter(sel.mail_subject("quarterly"));
//! assert_eq!(sel.scopes().len(), 1);
//! ```

use super::scopes::{
    category_matches, strings, Categorizer, CategoryScope, MatchOption, PathValues,
};
use super::{DomainSelector, SelectorKind};
use crate::details::{format_time, Entry, ItemInfo, ItemType};
use crate::error::{Result, SelectorError};
use crate::filters::Comparator;
use crate::path::{CategoryType, ResourcePath, ServiceType};
use crate::types::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categories of exchange data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExchangeCategory {
    /// Unrecognized category
    Unknown,
    /// The mailbox owner
    User,
    /// Contact folder
    ContactFolder,
    /// Contact
    Contact,
    /// Calendar
    EventCalendar,
    /// Calendar event
    Event,
    /// Mail folder
    MailFolder,
    /// Mail message
    Mail,
    /// Contact display name
    InfoContactName,
    /// Event organizer
    InfoEventOrganizer,
    /// Whether an event repeats
    InfoEventRecurs,
    /// Event start, lower bound
    InfoEventStartsAfter,
    /// Event start, upper bound
    InfoEventStartsBefore,
    /// Event subject
    InfoEventSubject,
    /// Mail sender
    InfoMailSender,
    /// Mail subject
    InfoMailSubject,
    /// Mail receipt, lower bound
    InfoMailReceivedAfter,
    /// Mail receipt, upper bound
    InfoMailReceivedBefore,
}

use ExchangeCategory as EC;

const ALL: [EC; 17] = [
    EC::User,
    EC::ContactFolder,
    EC::Contact,
    EC::EventCalendar,
    EC::Event,
    EC::MailFolder,
    EC::Mail,
    EC::InfoContactName,
    EC::InfoEventOrganizer,
    EC::InfoEventRecurs,
    EC::InfoEventStartsAfter,
    EC::InfoEventStartsBefore,
    EC::InfoEventSubject,
    EC::InfoMailSender,
    EC::InfoMailSubject,
    EC::InfoMailReceivedAfter,
    EC::InfoMailReceivedBefore,
];

impl fmt::Display for ExchangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Categorizer for ExchangeCategory {
    const SERVICE: ServiceType = ServiceType::Exchange;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn as_str(&self) -> &'static str {
        match self {
            EC::Unknown => "",
            EC::User => "ExchangeUser",
            EC::ContactFolder => "ExchangeContactFolder",
            EC::Contact => "ExchangeContact",
            EC::EventCalendar => "ExchangeEventCalendar",
            EC::Event => "ExchangeEvent",
            EC::MailFolder => "ExchangeMailFolder",
            EC::Mail => "ExchangeMail",
            EC::InfoContactName => "ExchangeInfoContactName",
            EC::InfoEventOrganizer => "ExchangeInfoEventOrganizer",
            EC::InfoEventRecurs => "ExchangeInfoEventRecurs",
            EC::InfoEventStartsAfter => "ExchangeInfoEventStartsAfter",
            EC::InfoEventStartsBefore => "ExchangeInfoEventStartsBefore",
            EC::InfoEventSubject => "ExchangeInfoEventSubject",
            EC::InfoMailSender => "ExchangeInfoMailSender",
            EC::InfoMailSubject => "ExchangeInfoMailSubject",
            EC::InfoMailReceivedAfter => "ExchangeInfoMailReceivedAfter",
            EC::InfoMailReceivedBefore => "ExchangeInfoMailReceivedBefore",
        }
    }

    fn unknown_cat() -> Self {
        EC::Unknown
    }

    fn root_cat() -> Self {
        EC::User
    }

    fn leaf_cat(&self) -> Self {
        match self {
            EC::ContactFolder | EC::Contact | EC::InfoContactName => EC::Contact,
            EC::EventCalendar
            | EC::Event
            | EC::InfoEventOrganizer
            | EC::InfoEventRecurs
            | EC::InfoEventStartsAfter
            | EC::InfoEventStartsBefore
            | EC::InfoEventSubject => EC::Event,
            EC::MailFolder
            | EC::Mail
            | EC::InfoMailSender
            | EC::InfoMailSubject
            | EC::InfoMailReceivedAfter
            | EC::InfoMailReceivedBefore => EC::Mail,
            other => *other,
        }
    }

    fn cascade(&self) -> &'static [Self] {
        match self {
            EC::User => &[
                EC::ContactFolder,
                EC::Contact,
                EC::EventCalendar,
                EC::Event,
                EC::MailFolder,
                EC::Mail,
            ],
            EC::ContactFolder => &[EC::Contact],
            EC::EventCalendar => &[EC::Event],
            EC::MailFolder => &[EC::Mail],
            _ => &[],
        }
    }

    fn path_keys(&self) -> &'static [Self] {
        match self.leaf_cat() {
            EC::Contact => &[EC::User, EC::ContactFolder, EC::Contact],
            EC::Event => &[EC::User, EC::EventCalendar, EC::Event],
            EC::Mail => &[EC::User, EC::MailFolder, EC::Mail],
            EC::User => &[EC::User],
            _ => &[],
        }
    }

    fn path_type(&self) -> CategoryType {
        match self.leaf_cat() {
            EC::Contact => CategoryType::Contacts,
            EC::Event => CategoryType::Events,
            EC::Mail => CategoryType::Email,
            _ => CategoryType::Unknown,
        }
    }

    fn compares_paths(&self) -> bool {
        matches!(self, EC::ContactFolder | EC::EventCalendar | EC::MailFolder)
    }

    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>> {
        let (folder_cat, item_cat) = match self.leaf_cat() {
            EC::Contact => (EC::ContactFolder, EC::Contact),
            EC::Event => (EC::EventCalendar, EC::Event),
            EC::Mail => (EC::MailFolder, EC::Mail),
            _ => return Err(SelectorError::UnrecognizedCategory(self.to_string())),
        };

        let mut item = if entry.item_ref.is_empty() {
            repo.item().to_string()
        } else {
            entry.item_ref.clone()
        };

        if cfg.only_match_item_names {
            let info = entry
                .info
                .exchange()
                .ok_or_else(|| SelectorError::missing_info("no exchange info in details"))?;
            item = match item_cat {
                EC::Contact => info.contact_name.clone(),
                _ => info.subject.clone(),
            };
        }

        let mut folders = vec![repo.folder(false)];
        if !entry.location_ref.is_empty() {
            folders.push(entry.location_ref.clone());
        }

        let mut values = HashMap::new();
        values.insert(EC::User, vec![repo.resource_owner().to_string()]);
        values.insert(folder_cat, folders);
        values.insert(item_cat, vec![item, entry.short_ref.clone()]);

        Ok(values)
    }

    fn from_path_category(category: CategoryType) -> Self {
        match category {
            CategoryType::Contacts => EC::Contact,
            CategoryType::Events => EC::Event,
            CategoryType::Email => EC::Mail,
            _ => EC::Unknown,
        }
    }

    fn from_item_type(item_type: ItemType) -> Self {
        match item_type {
            ItemType::ExchangeContact => EC::Contact,
            ItemType::ExchangeEvent => EC::Event,
            ItemType::ExchangeMail => EC::Mail,
            _ => EC::Unknown,
        }
    }

    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>> {
        let info = info.exchange()?;

        // an exchange payload describes a single item type
        if !category_matches(*self, Self::from_item_type(info.item_type)) {
            return None;
        }

        let value = match self {
            EC::InfoContactName => info.contact_name.clone(),
            EC::InfoEventOrganizer => info.organizer.clone(),
            EC::InfoEventRecurs => info.event_recurs.to_string(),
            EC::InfoEventStartsAfter | EC::InfoEventStartsBefore => format_time(&info.event_start),
            EC::InfoEventSubject | EC::InfoMailSubject => info.subject.clone(),
            EC::InfoMailSender => info.sender.clone(),
            EC::InfoMailReceivedAfter | EC::InfoMailReceivedBefore => format_time(&info.received),
            _ => return None,
        };

        Some(vec![value])
    }
}

/// Scope over exchange data
pub type ExchangeScope = CategoryScope<ExchangeCategory>;

impl<K: SelectorKind> DomainSelector<ExchangeCategory, K> {
    /// Every contact, event and mail of the given users
    pub fn users<S: AsRef<str>>(&self, users: &[S]) -> Vec<ExchangeScope> {
        vec![self.root_scope(&strings(users))]
    }

    /// All exchange data of the selector's owners
    pub fn all_data(&self) -> Vec<ExchangeScope> {
        [EC::ContactFolder, EC::EventCalendar, EC::MailFolder]
            .into_iter()
            .map(|cat| self.folder_scope(cat, &super::any(), &[]))
            .collect()
    }

    /// Contact folders, and every contact in them
    pub fn contact_folders<S: AsRef<str>>(
        &self,
        folders: &[S],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.folder_scope(EC::ContactFolder, &strings(folders), opts)]
    }

    /// Contacts within contact folders
    ///
    /// `opts` apply to the folder values.
    pub fn contacts<F: AsRef<str>, I: AsRef<str>>(
        &self,
        folders: &[F],
        contacts: &[I],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.item_scope(
            EC::Contact,
            &strings(contacts),
            EC::ContactFolder,
            &strings(folders),
            opts,
        )]
    }

    /// Calendars, and every event in them
    pub fn event_calendars<S: AsRef<str>>(
        &self,
        calendars: &[S],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.folder_scope(EC::EventCalendar, &strings(calendars), opts)]
    }

    /// Events within calendars
    pub fn events<F: AsRef<str>, I: AsRef<str>>(
        &self,
        calendars: &[F],
        events: &[I],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.item_scope(
            EC::Event,
            &strings(events),
            EC::EventCalendar,
            &strings(calendars),
            opts,
        )]
    }

    /// Mail folders, and every message in them
    pub fn mail_folders<S: AsRef<str>>(
        &self,
        folders: &[S],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.folder_scope(EC::MailFolder, &strings(folders), opts)]
    }

    /// Messages within mail folders
    pub fn mails<F: AsRef<str>, I: AsRef<str>>(
        &self,
        folders: &[F],
        mails: &[I],
        opts: &[MatchOption],
    ) -> Vec<ExchangeScope> {
        vec![self.item_scope(EC::Mail, &strings(mails), EC::MailFolder, &strings(folders), opts)]
    }

    /// Contacts whose name contains `name`
    pub fn contact_name(&self, name: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Contact, EC::InfoContactName, name, Comparator::TargetIn)]
    }

    /// Events organized by `organizer`
    pub fn event_organizer(&self, organizer: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Event, EC::InfoEventOrganizer, organizer, Comparator::TargetIn)]
    }

    /// Events that do (`"true"`) or do not (`"false"`) repeat
    pub fn event_recurs(&self, recurs: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Event, EC::InfoEventRecurs, recurs, Comparator::EqualTo)]
    }

    /// Events starting after a formatted timestamp
    pub fn event_starts_after(&self, time: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Event, EC::InfoEventStartsAfter, time, Comparator::LessThan)]
    }

    /// Events starting before a formatted timestamp
    pub fn event_starts_before(&self, time: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Event, EC::InfoEventStartsBefore, time, Comparator::GreaterThan)]
    }

    /// Events whose subject contains `subject`
    pub fn event_subject(&self, subject: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Event, EC::InfoEventSubject, subject, Comparator::TargetIn)]
    }

    /// Mail sent by `sender`
    pub fn mail_sender(&self, sender: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Mail, EC::InfoMailSender, sender, Comparator::TargetIn)]
    }

    /// Mail whose subject contains `subject`
    pub fn mail_subject(&self, subject: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Mail, EC::InfoMailSubject, subject, Comparator::TargetIn)]
    }

    /// Mail received after a formatted timestamp
    pub fn mail_received_after(&self, time: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Mail, EC::InfoMailReceivedAfter, time, Comparator::LessThan)]
    }

    /// Mail received before a formatted timestamp
    pub fn mail_received_before(&self, time: &str) -> Vec<ExchangeScope> {
        vec![self.info_scope(EC::Mail, EC::InfoMailReceivedBefore, time, Comparator::GreaterThan)]
    }
}
