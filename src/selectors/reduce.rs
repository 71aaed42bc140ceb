//! Catalog reduction
//!
//! [`reduce`] walks a catalog and keeps the entries a selector admits:
//!
//! 1. entries owned by someone outside the selector's owners are skipped
//! 2. the entry's leaf category is resolved from its path category
//! 3. the entry is compared only against scopes of that leaf category
//! 4. at least one inclusion must match, every filter must match, and no
//!    exclusion may match
//!
//! Entries that cannot be evaluated are recorded on the fault [`Bus`] and
//! skipped. Surviving entries keep their catalog order.

use super::scopes::{Categorizer, CategoryScope, PathValues};
use super::Selector;
use crate::details::{Details, Entry};
use crate::error::SelectorError;
use crate::fault::Bus;
use crate::filters::{self, Filter};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

/// Catalogs at least this large are evaluated in parallel
pub const PARALLEL_REDUCE_THRESHOLD: usize = 2048;

type ScopesByCategory<C> = HashMap<C, Vec<CategoryScope<C>>>;

/// Group scopes by the leaf categories they apply to
///
/// A scope is listed under every leaf it category-matches, so a root
/// scope appears under each leaf while a mail scope appears only under
/// mail.
pub fn scopes_by_category<C: Categorizer>(scopes: &[super::Scope]) -> ScopesByCategory<C> {
    let leaves = C::leaves();
    let mut grouped: ScopesByCategory<C> = leaves.iter().map(|c| (*c, Vec::new())).collect();

    for scope in scopes {
        let typed = CategoryScope::<C>::from(scope.clone());
        for leaf in &leaves {
            if typed.includes_category(*leaf) {
                if let Some(list) = grouped.get_mut(leaf) {
                    list.push(typed.clone());
                }
            }
        }
    }

    grouped
}

/// Decide whether an entry passes the scope lists of its category
///
/// With no inclusions and no filters nothing passes. Otherwise at least
/// one inclusion (if any exist) and every filter must match, and any
/// matching exclusion rejects the entry.
pub fn passes<C: Categorizer>(
    cat: C,
    values: &PathValues<C>,
    entry: &Entry,
    excludes: &[CategoryScope<C>],
    filters: &[CategoryScope<C>],
    includes: &[CategoryScope<C>],
) -> bool {
    if includes.is_empty() && filters.is_empty() {
        return false;
    }

    if !includes.is_empty() && !includes.iter().any(|s| s.matches_entry(cat, values, entry)) {
        return false;
    }

    if !filters.iter().all(|s| s.matches_entry(cat, values, entry)) {
        return false;
    }

    !excludes.iter().any(|s| s.matches_entry(cat, values, entry))
}

struct Reducer<'a, C: Categorizer> {
    selector: &'a Selector,
    owners: Filter,
    excludes: ScopesByCategory<C>,
    filters: ScopesByCategory<C>,
    includes: ScopesByCategory<C>,
    errs: &'a Bus,
}

impl<'a, C: Categorizer> Reducer<'a, C> {
    fn new(selector: &'a Selector, errs: &'a Bus) -> Self {
        // a discrete owner narrows the match to that owner alone
        let owners = if selector.discrete_owner.is_empty() {
            selector.resource_owners.clone()
        } else {
            filters::equal([selector.discrete_owner.as_str()])
        };

        Self {
            selector,
            owners,
            excludes: scopes_by_category(&selector.excludes),
            filters: scopes_by_category(&selector.filters),
            includes: scopes_by_category(&selector.includes),
            errs,
        }
    }

    fn evaluate(&self, entry: &Entry) -> bool {
        let repo = match entry.repo_path() {
            Ok(repo) => repo,
            Err(err) => {
                trace!(short_ref = %entry.short_ref, error = %err, "unparseable repo ref");
                self.errs.add_recoverable(err);
                return false;
            }
        };

        if repo.service() != C::SERVICE {
            trace!(short_ref = %entry.short_ref, service = %repo.service(), "other service");
            return false;
        }

        if !self.owners.compare(repo.resource_owner()) {
            return false;
        }

        let mut cat = C::from_path_category(repo.category());
        if cat == C::unknown_cat() {
            cat = C::from_item_type(entry.item_type());
        }
        if cat == C::unknown_cat() {
            self.errs.add_recoverable(SelectorError::UnrecognizedCategory(
                repo.category().to_string(),
            ));
            return false;
        }

        let empty = Vec::new();
        let excludes = self.excludes.get(&cat).unwrap_or(&empty);
        let filters = self.filters.get(&cat).unwrap_or(&empty);
        let includes = self.includes.get(&cat).unwrap_or(&empty);

        if includes.is_empty() && filters.is_empty() {
            return false;
        }

        let values = match cat.path_values(&repo, entry, &self.selector.cfg) {
            Ok(values) => values,
            Err(err) => {
                trace!(short_ref = %entry.short_ref, error = %err, "no path values");
                self.errs.add_recoverable(err);
                return false;
            }
        };

        passes(cat, &values, entry, excludes, filters, includes)
    }
}

/// Filter a catalog down to the entries the selector admits
///
/// Folder entries are never returned. The result is empty, never an error,
/// when nothing matches.
#[instrument(skip_all, fields(service = %C::SERVICE, entries = details.len()))]
pub fn reduce<C: Categorizer>(details: &Details, selector: &Selector, errs: &Bus) -> Details {
    let reducer = Reducer::<C>::new(selector, errs);
    let items = details.items();

    let entries: Vec<Entry> = if items.len() >= PARALLEL_REDUCE_THRESHOLD && !errs.is_fail_fast() {
        items
            .par_iter()
            .filter(|e| reducer.evaluate(e))
            .map(|e| (*e).clone())
            .collect()
    } else {
        let mut kept = Vec::new();
        for entry in items {
            if errs.is_fail_fast() && errs.failure().is_some() {
                debug!("stopping reduce after failure");
                break;
            }
            if reducer.evaluate(entry) {
                kept.push(entry.clone());
            }
        }
        kept
    };

    debug!(
        kept = entries.len(),
        includes = selector.includes.len(),
        filters = selector.filters.len(),
        excludes = selector.excludes.len(),
        "reduced catalog"
    );

    Details::new(entries)
}
