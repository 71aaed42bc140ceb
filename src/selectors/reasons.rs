//! Why a selector needs prior backup data
//!
//! A [`Reason`] names one subtree of earlier backups, keyed by tenant,
//! resource owner, service and category. Incremental backups read only the
//! subtrees a selector's inclusions and filters give a reason for;
//! exclusions never justify reading anything.

use super::scopes::{Categorizer, CategoryScope, Scope};
use super::Selector;
use crate::path::{Builder, CategoryType, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One (tenant, resource, service, category) subtree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    /// Tenant id
    pub tenant: String,
    /// Resource owner id or name
    pub resource: String,
    /// Service the data belongs to
    pub service: ServiceType,
    /// Category of data
    pub category: CategoryType,
}

impl Reason {
    /// Create a reason
    pub fn new(
        tenant: impl Into<String>,
        resource: impl Into<String>,
        service: ServiceType,
        category: CategoryType,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            resource: resource.into(),
            service,
            category,
        }
    }

    /// Path prefix of the subtree this reason covers
    pub fn subtree_path(&self) -> Builder {
        Builder::new().append([
            self.tenant.as_str(),
            self.service.as_str(),
            self.resource.as_str(),
            self.category.as_str(),
        ])
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subtree_path())
    }
}

/// Distinct path categories named by a list of scopes, sorted
///
/// Root and union scopes stand for every category of their domain.
pub fn path_categories_in<C: Categorizer>(scopes: &[Scope]) -> Vec<CategoryType> {
    let mut cats = BTreeSet::new();

    for scope in scopes {
        let cat = CategoryScope::<C>::from(scope.clone()).category();
        if cat == C::unknown_cat() {
            continue;
        }

        if cat.is_union() {
            cats.extend(C::leaves().iter().map(|leaf| leaf.path_type()));
            continue;
        }

        let pt = cat.path_type();
        if pt != CategoryType::Unknown {
            cats.insert(pt);
        }
    }

    cats.into_iter().collect()
}

/// Deduplicated reasons for a selector's inclusions and filters
pub fn reasons_for<C: Categorizer>(
    selector: &Selector,
    tenant: &str,
    use_owner_name_for_id: bool,
) -> Vec<Reason> {
    let resource = if use_owner_name_for_id {
        selector.name()
    } else {
        selector.id()
    };

    let mut reasons = BTreeSet::new();
    for list in [&selector.includes, &selector.filters] {
        for cat in path_categories_in::<C>(list) {
            reasons.insert(Reason::new(tenant, resource, C::SERVICE, cat));
        }
    }

    reasons.into_iter().collect()
}
