//! Restore destinations
//!
//! A restore can redirect each category into a differently named container
//! (a folder, list or drive). Each category gets at most one destination.

use super::scopes::Categorizer;
use crate::error::{Result, SelectorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Destination container names keyed by category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Destination<C: Categorizer> {
    names: BTreeMap<String, String>,
    #[serde(skip)]
    marker: PhantomData<C>,
}

impl<C: Categorizer> Default for Destination<C> {
    fn default() -> Self {
        Self {
            names: BTreeMap::new(),
            marker: PhantomData,
        }
    }
}

impl<C: Categorizer> Destination<C> {
    /// Create an empty destination map
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the destination for `cat`
    ///
    /// An empty `dest` is ignored. Declaring a second destination for the
    /// same category is an error and leaves the first in place.
    pub fn set(&mut self, cat: C, dest: &str) -> Result<()> {
        if dest.is_empty() {
            return Ok(());
        }

        if self.names.contains_key(cat.as_str()) {
            return Err(SelectorError::ExistingDestination(cat.to_string()));
        }

        self.names.insert(cat.as_str().to_string(), dest.to_string());
        Ok(())
    }

    /// The destination for `cat`, if declared
    pub fn get(&self, cat: C) -> Option<&str> {
        self.names.get(cat.as_str()).map(String::as_str)
    }

    /// The destination for `cat`, or `default` when none was declared
    pub fn get_or_default<'a>(&'a self, cat: C, default: &'a str) -> &'a str {
        self.get(cat).unwrap_or(default)
    }

    /// True if no category has a destination
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
