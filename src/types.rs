//! Shared value types for selectors
//!
//! ## Overview
//!
//! - **Configuration**: [`Config`] tunes how item scopes compare values
//! - **Scope metadata**: [`Granularity`] tags what a scope was built to select
//! - **Reports**: [`PathCategories`] lists the data categories a selector touches
//!
//! ## Examples
//!
//! ```rust
//! use tenant_selectors::types::Config;
//!
//! // Match items by display name instead of by id
//! let cfg = Config {
//!     only_match_item_names: true,
//! };
//! assert!(cfg.only_match_item_names);
//! ```

use crate::path::CategoryType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector behavior settings
///
/// Carried inside the selector so that a serialized selector replays with
/// the same matching rules it was built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Compare item scopes against item display names
    ///
    /// When false, items are identified by id and compared case-sensitively.
    pub only_match_item_names: bool,
}

/// How much data a scope was built to select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// A resource owner or a folder, with everything beneath it
    Group,
    /// Specific items
    Item,
    /// A refinement over item metadata
    Filter,
}

impl Granularity {
    /// Value stored in a scope's granularity key
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Group => "group",
            Granularity::Item => "item",
            Granularity::Filter => "filter",
        }
    }

    /// Parse a stored granularity value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "group" => Some(Granularity::Group),
            "item" => Some(Granularity::Item),
            "filter" => Some(Granularity::Filter),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path categories referenced by each scope list of a selector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathCategories {
    /// Categories named by inclusions
    pub includes: Vec<CategoryType>,
    /// Categories named by exclusions
    pub excludes: Vec<CategoryType>,
    /// Categories named by filters
    pub filters: Vec<CategoryType>,
}
