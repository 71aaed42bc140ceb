//! # tenant-selectors - Selection and addressing for tenant-data backups
//!
//! Decide which items of a backed-up tenant an operation should touch, and
//! name every item with an escape-safe resource path.
//!
//! ## Overview
//!
//! Backups of a tenant's mailboxes, drives, sites, groups and chats produce a
//! catalog ([`Details`]) with one entry per item. This crate provides:
//! - Resource paths that survive `/` and `\` inside folder names
//! - A filter algebra of comparators with `Any`/`None` wildcards
//! - Scopes: per-category filter maps built by typed factories
//! - Selectors combining inclusions, filters and exclusions over owners
//! - A reduce engine that keeps the catalog entries a selector admits
//! - Reasons, which name the prior-backup subtrees a selector needs
//!
//! ## Architecture
//!
//! Every data domain implements the [`Categorizer`](selectors::Categorizer)
//! trait for its category enum. The scope, reduce, reason and split logic is
//! written once, generically over that trait:
//!
//! - **Exchange**: mail, contacts and events under a user
//! - **OneDrive**: files under a user's drive
//! - **SharePoint**: library files, list items and pages under a site
//! - **Groups**: channel messages and library files under a group
//! - **TeamsChats**: chats under a user
//!
//! ## Quick Start
//!
//! ```rust
//! use tenant_selectors::details::{Details, Entry, ExchangeInfo, ItemInfo, ItemType};
//! use tenant_selectors::fault::Bus;
//! use tenant_selectors::selectors::ExchangeRestore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = Entry {
//!     repo_ref: "tid/exchange/u1/email/Inbox/m1".to_string(),
//!     short_ref: "m1ref".to_string(),
//!     parent_ref: String::new(),
//!     location_ref: String::new(),
//!     item_ref: String::new(),
//!     updated: false,
//!     info: ItemInfo::Exchange(ExchangeInfo {
//!         item_type: ItemType::ExchangeMail,
//!         subject: "foo bar".to_string(),
//!         ..Default::default()
//!     }),
//! };
//!
//! let mut sel = ExchangeRestore::new(&["u1"]);
//! sel.filter(sel.mail_subject("foo"));
//!
//! let kept = sel.reduce(&Details::new(vec![entry]), &Bus::default());
//! assert_eq!(kept.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T>`] with a [`SelectorError`].
//! Reduction never fails outright: entries that cannot be evaluated are
//! recorded on a fault [`Bus`](fault::Bus) and skipped.
//!
//! ## Module Organization
//!
//! - [`path`]: resource paths, escaping, service and category tags
//! - [`filters`]: comparators and filters
//! - [`details`]: backup catalog entries and item metadata
//! - [`selectors`]: scopes, selectors, reduce, reasons and destinations
//! - [`fault`]: recoverable error collection
//! - [`types`]: configuration and shared enums
//! - [`error`]: error types

pub mod details;
pub mod error;
pub mod fault;
pub mod filters;
pub mod path;
pub mod selectors;
pub mod types;

pub use details::{Details, Entry, ItemInfo};
pub use error::{Result, SelectorError};
pub use fault::Bus;
pub use filters::{Comparator, Filter};
pub use path::{Builder, CategoryType, ResourcePath, ServiceType};
pub use selectors::{Reason, Selector};
pub use types::*;
