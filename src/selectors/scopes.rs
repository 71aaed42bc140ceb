//! Scopes and the category contract they are matched through
//!
//! A [`Scope`] is a string-keyed map of [`Filter`]s. Keys are either the
//! name of a domain category (the value to compare for that category) or
//! one of the metadata keys describing the scope itself. Each data domain
//! supplies a [`Categorizer`] enum; [`CategoryScope`] puts a typed face on
//! a raw scope so matching can be written once for every domain.
//!
//! ## Wildcards
//!
//! [`ANY_TGT`] and [`NONE_TGT`] are reserved target values. Scope builders
//! turn them into `Pass` and `Fail` filters, so `Any` matches every
//! candidate of a category and `None` matches nothing, itself included.
//!
//! ## Cascading defaults
//!
//! A scope built for a root or folder category fills the keys of the
//! categories beneath it with `Any` unless they were set explicitly. That is
//! what lets a `users(["u1"])` scope select all of u1's mail, contacts and
//! events without naming each one.

use crate::details::{Entry, ItemInfo, ItemType};
use crate::error::Result;
use crate::filters::{self, Comparator, Filter};
use crate::path::{CategoryType, ResourcePath, ServiceType};
use crate::types::{Config, Granularity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Target matching every value
pub const ANY_TGT: &str = "*";

/// Target matching no value
pub const NONE_TGT: &str = "∅";

/// Metadata key naming the scope's category
pub const SCOPE_KEY_CATEGORY: &str = "category";

/// Metadata key naming the info category of a filter scope
pub const SCOPE_KEY_INFO_CATEGORY: &str = "infoFilter";

/// Metadata key holding the scope granularity
pub const SCOPE_KEY_GRANULARITY: &str = "granularity";

/// Metadata key holding the resource owners the scope was built for
pub const SCOPE_KEY_RESOURCE: &str = "resource";

/// Metadata key naming the leaf data type
pub const SCOPE_KEY_DATA_TYPE: &str = "dataType";

const METADATA_KEYS: [&str; 5] = [
    SCOPE_KEY_CATEGORY,
    SCOPE_KEY_INFO_CATEGORY,
    SCOPE_KEY_GRANULARITY,
    SCOPE_KEY_RESOURCE,
    SCOPE_KEY_DATA_TYPE,
];

/// The set matching any value
pub fn any() -> Vec<String> {
    vec![ANY_TGT.to_string()]
}

/// The set matching no value
pub fn none() -> Vec<String> {
    vec![NONE_TGT.to_string()]
}

/// Candidate strings extracted from an entry, keyed by category
pub type PathValues<C> = HashMap<C, Vec<String>>;

/// Category enumeration of one data domain
///
/// Categories form a shallow tree: a root (the resource owner), folder-like
/// categories beneath it, and leaf item categories. Info categories name a
/// property of the item metadata and report the item category as their
/// leaf.
pub trait Categorizer:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Service whose catalog entries this domain reads
    const SERVICE: ServiceType;

    /// Every known category, excluding the unknown sentinel
    fn all() -> &'static [Self];

    /// Name used as the scope key for this category
    fn as_str(&self) -> &'static str;

    /// The sentinel for unrecognized categories
    fn unknown_cat() -> Self;

    /// The resource owner category
    fn root_cat() -> Self;

    /// The item category this category resolves to
    ///
    /// Leaves, the root and the unknown sentinel return themselves.
    fn leaf_cat(&self) -> Self;

    /// Categories beneath this one that default to `Any`
    fn cascade(&self) -> &'static [Self];

    /// Ordered categories that appear as path segments for this leaf
    fn path_keys(&self) -> &'static [Self];

    /// Path category of this category's leaf
    fn path_type(&self) -> CategoryType;

    /// Extract candidate values for each path key from an entry
    fn path_values(
        &self,
        repo: &ResourcePath,
        entry: &Entry,
        cfg: &Config,
    ) -> Result<PathValues<Self>>;

    /// Leaf category stored under a path category
    fn from_path_category(category: CategoryType) -> Self;

    /// Leaf category described by an item type
    fn from_item_type(item_type: ItemType) -> Self;

    /// Candidate values of this info category within an item's metadata
    ///
    /// `None` when the metadata belongs to another domain or item type.
    fn info_values(&self, info: &ItemInfo) -> Option<Vec<String>>;

    /// Whether folder-style path comparison applies to this category
    fn compares_paths(&self) -> bool {
        false
    }

    /// Look a category up by name, falling back to unknown
    fn parse(s: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .unwrap_or_else(Self::unknown_cat)
    }

    /// True if the category identifies the whole resource owner
    fn is_union(&self) -> bool {
        *self == Self::root_cat()
    }

    /// True for the lowest level categories
    fn is_leaf(&self) -> bool {
        *self == self.leaf_cat()
    }

    /// Leaf categories stored under a path category
    fn leaves() -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|c| c.is_leaf() && *c != Self::root_cat())
            .filter(|c| c.path_type() != CategoryType::Unknown)
            .collect()
    }
}

/// Whether two categories refer to overlapping data
///
/// False if either side is unknown, true if either side is a union (the
/// root included), otherwise true when both resolve to the same leaf.
pub fn category_matches<C: Categorizer>(a: C, b: C) -> bool {
    let unknown = C::unknown_cat();
    if a == unknown || b == unknown {
        return false;
    }

    if a.is_union() || b.is_union() {
        return true;
    }

    a.leaf_cat() == b.leaf_cat()
}

/// Comparator adjustments accepted by scope factories
///
/// None of these override an `Any` or `None` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOption {
    /// Match values starting with the target
    PrefixMatch,
    /// Match values ending with the target
    SuffixMatch,
    /// Match whole values instead of substrings or subpaths
    ExactMatch,
    /// Case-sensitive equality
    StrictEqualMatch,
}

/// Resolved comparator choices for one scope value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScopeConfig {
    use_path: bool,
    use_prefix: bool,
    use_suffix: bool,
    use_equals: bool,
    use_strict_equals: bool,
}

impl ScopeConfig {
    pub(crate) fn new(opts: &[MatchOption]) -> Self {
        let mut sc = ScopeConfig::default();
        for opt in opts {
            match opt {
                MatchOption::PrefixMatch => sc.use_prefix = true,
                MatchOption::SuffixMatch => sc.use_suffix = true,
                MatchOption::ExactMatch => sc.use_equals = true,
                MatchOption::StrictEqualMatch => sc.use_strict_equals = true,
            }
        }
        sc
    }

    /// Compare values as folder paths
    pub(crate) fn path_comparator(mut self) -> Self {
        self.use_path = true;
        self
    }
}

/// Options for item scopes under the given config
///
/// Item ids are case sensitive, so unless the selector matches on item
/// names, item scopes compare with strict equality.
pub(crate) fn default_item_options(cfg: &Config) -> Vec<MatchOption> {
    if cfg.only_match_item_names {
        Vec::new()
    } else {
        vec![MatchOption::StrictEqualMatch]
    }
}

pub(crate) fn strings<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_string()).collect()
}

/// Collapse a target list
///
/// Empty lists become `None`; a list holding `Any` or `None` collapses to
/// whichever wildcard appears first.
pub(crate) fn clean(targets: &[String]) -> Vec<String> {
    if targets.is_empty() {
        return none();
    }

    for t in targets {
        if t == ANY_TGT {
            return any();
        }
        if t == NONE_TGT {
            return none();
        }
    }

    targets.to_vec()
}

/// Turn a target list into a filter
///
/// Wildcards win over every option. Path comparison comes next, then
/// prefix, suffix and strict equality. A filter scope's own comparator is
/// used when no option applies; everything else compares with equality.
pub(crate) fn filterize(
    sc: &ScopeConfig,
    default_comparator: Option<Comparator>,
    targets: &[String],
) -> Filter {
    let targets = clean(targets);

    match targets.first().map(String::as_str) {
        None | Some(NONE_TGT) => return filters::fail(),
        Some(ANY_TGT) => return filters::pass(),
        _ => {}
    }

    if sc.use_path {
        if sc.use_equals {
            return filters::path_equals(&targets);
        }
        if sc.use_prefix {
            return filters::path_prefix(&targets);
        }
        if sc.use_suffix {
            return filters::path_suffix(&targets);
        }
        return filters::path_contains(&targets);
    }

    if sc.use_prefix {
        return filters::prefix(&targets);
    }

    if sc.use_suffix {
        return filters::suffix(&targets);
    }

    if sc.use_strict_equals {
        return filters::strict_equal(&targets);
    }

    if let Some(comparator) = default_comparator {
        return Filter::new(comparator, &targets, false);
    }

    filters::equal(&targets)
}

fn filter_for(sc: &ScopeConfig, targets: &[String]) -> Filter {
    filterize(sc, None, targets)
}

/// Untyped scope: category name or metadata key to filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(BTreeMap<String, Filter>);

impl Scope {
    /// Filter stored under `key`
    pub fn get(&self, key: &str) -> Option<&Filter> {
        self.0.get(key)
    }

    /// Store a filter under `key`, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, filter: Filter) {
        self.0.insert(key.into(), filter);
    }

    /// True if `key` holds a filter
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Every key, metadata included, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the scope holds no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn identity(&self, key: &str) -> &str {
        self.0.get(key).map(Filter::first_target).unwrap_or("")
    }

    /// Name of the scope's category
    pub fn category_name(&self) -> &str {
        self.identity(SCOPE_KEY_CATEGORY)
    }

    /// Name of the scope's info category; empty for path scopes
    pub fn info_category_name(&self) -> &str {
        self.identity(SCOPE_KEY_INFO_CATEGORY)
    }

    /// Name of the scope's leaf data type
    pub fn data_type_name(&self) -> &str {
        self.identity(SCOPE_KEY_DATA_TYPE)
    }

    /// What the scope was built to select
    pub fn granularity(&self) -> Option<Granularity> {
        Granularity::parse(self.identity(SCOPE_KEY_GRANULARITY))
    }

    /// Resource owners recorded when the scope was built
    pub fn resources(&self) -> Vec<&str> {
        self.0
            .get(SCOPE_KEY_RESOURCE)
            .map(Filter::targets)
            .unwrap_or_default()
    }

    fn render(&self, plain: bool) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, f)| {
                if plain || METADATA_KEYS.contains(&k.as_str()) {
                    format!("{}:{}", k, f.plain_string())
                } else {
                    format!("{}:{}", k, f.conceal())
                }
            })
            .collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// Render with category values masked
    pub fn conceal(&self) -> String {
        self.render(false)
    }

    /// Render every value in the clear
    pub fn plain_string(&self) -> String {
        self.render(true)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.conceal())
    }
}

/// A scope read through one domain's categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct CategoryScope<C: Categorizer> {
    scope: Scope,
    #[serde(skip)]
    domain: PhantomData<C>,
}

impl<C: Categorizer> From<Scope> for CategoryScope<C> {
    fn from(scope: Scope) -> Self {
        Self {
            scope,
            domain: PhantomData,
        }
    }
}

impl<C: Categorizer> From<CategoryScope<C>> for Scope {
    fn from(cs: CategoryScope<C>) -> Self {
        cs.scope
    }
}

impl<C: Categorizer> CategoryScope<C> {
    /// The untyped scope
    pub fn as_scope(&self) -> &Scope {
        &self.scope
    }

    /// The category the scope was built for
    pub fn category(&self) -> C {
        C::parse(self.scope.category_name())
    }

    /// The info category of a filter scope, or unknown
    pub fn info_category(&self) -> C {
        C::parse(self.scope.info_category_name())
    }

    /// What the scope was built to select
    pub fn granularity(&self) -> Option<Granularity> {
        self.scope.granularity()
    }

    /// True if the scope includes data of category `cat`
    pub fn includes_category(&self, cat: C) -> bool {
        category_matches(self.category(), cat)
    }

    /// True if the value for `cat` passes `input`
    ///
    /// Always false when `cat` does not match the scope's category or the
    /// input is empty.
    pub fn matches(&self, cat: C, input: &str) -> bool {
        if !category_matches(cat, self.category()) || input.is_empty() {
            return false;
        }

        self.scope
            .get(cat.as_str())
            .map(|f| f.compare(input))
            .unwrap_or(false)
    }

    /// True if the value for `cat` passes any of `inputs`
    pub fn matches_any<S: AsRef<str>>(&self, cat: C, inputs: &[S]) -> bool {
        if !category_matches(cat, self.category()) {
            return false;
        }

        let inputs: Vec<&str> = inputs
            .iter()
            .map(AsRef::as_ref)
            .filter(|i| !i.is_empty())
            .collect();
        if inputs.is_empty() {
            return false;
        }

        self.scope
            .get(cat.as_str())
            .map(|f| f.compare_any(inputs))
            .unwrap_or(false)
    }

    /// True if the scope names `target` for `cat`, directly or through `Any`
    pub fn contains(&self, cat: C, target: &str) -> bool {
        if self.is_any(cat) {
            return true;
        }
        if !category_matches(cat, self.category()) {
            return false;
        }

        self.get(cat).iter().any(|t| t == target)
    }

    /// True if the value for `cat` is the `Any` wildcard
    pub fn is_any(&self, cat: C) -> bool {
        category_matches(cat, self.category())
            && self
                .scope
                .get(cat.as_str())
                .map(|f| f.is_pass() && !f.negate)
                .unwrap_or(false)
    }

    /// True if the value for `cat` is the `None` wildcard
    pub fn is_none(&self, cat: C) -> bool {
        category_matches(cat, self.category())
            && self
                .scope
                .get(cat.as_str())
                .map(|f| f.is_fail() && !f.negate)
                .unwrap_or(false)
    }

    /// Target values stored for `cat`
    ///
    /// Wildcards come back as [`any()`] or [`none()`]; an unset category
    /// reads as `None`.
    pub fn get(&self, cat: C) -> Vec<String> {
        match self.scope.get(cat.as_str()) {
            None => none(),
            Some(f) if f.is_pass() => any(),
            Some(f) if f.is_fail() => none(),
            Some(f) => f.targets().into_iter().map(str::to_string).collect(),
        }
    }

    /// Copy of the scope with `cat` set to `values`
    ///
    /// Folder categories compare as paths.
    pub fn set<S: AsRef<str>>(&self, cat: C, values: &[S], opts: &[MatchOption]) -> Self {
        let mut sc = ScopeConfig::new(opts);
        if cat.compares_paths() {
            sc = sc.path_comparator();
        }

        let mut res = self.clone();
        res.scope
            .insert(cat.as_str(), filter_for(&sc, &strings(values)));
        res
    }

    /// Default unset child categories to `Any`
    pub fn set_defaults(&mut self) {
        for child in self.category().cascade() {
            if !self.scope.contains_key(child.as_str()) {
                self.scope.insert(child.as_str(), filters::pass());
            }
        }
    }

    /// Copy of the scope pinned to a single resource owner
    ///
    /// A root value that does not admit `owner` becomes `Fail`, so the copy
    /// can only match data the original could.
    pub fn for_owner(&self, owner: &str) -> Self {
        let root = C::root_cat();
        let admits = self
            .scope
            .get(root.as_str())
            .map(|f| f.compare(owner))
            .unwrap_or(true);

        let mut res = self.clone();
        let filter = if admits {
            filters::equal([owner])
        } else {
            filters::fail()
        };
        res.scope.insert(root.as_str(), filter);
        res.scope
            .insert(SCOPE_KEY_RESOURCE, filters::identity(owner));
        res
    }

    /// True if every path key of `cat` matches its path values
    ///
    /// A missing key, a `None` value or a key without path values fails the
    /// match; an `Any` value skips the comparison for that key.
    pub fn matches_path_values(&self, cat: C, values: &PathValues<C>) -> bool {
        for key in cat.path_keys() {
            if !category_matches(*key, self.category()) {
                return false;
            }

            let Some(filter) = self.scope.get(key.as_str()) else {
                return false;
            };

            if self.is_none(*key) {
                return false;
            }

            if filter.is_pass() && !filter.negate {
                continue;
            }

            match values.get(key) {
                Some(vals) if !vals.is_empty() => {
                    if !self.matches_any(*key, vals) {
                        return false;
                    }
                }
                _ => return false,
            }
        }

        true
    }

    /// True if the scope's info filter passes the item metadata
    pub fn matches_info(&self, info: &ItemInfo) -> bool {
        let info_cat = self.info_category();
        if info_cat == C::unknown_cat() {
            return false;
        }

        match info_cat.info_values(info) {
            Some(values) => self.matches_any(info_cat, &values),
            None => false,
        }
    }

    /// Path match first, then the item metadata for filter scopes
    pub fn matches_entry(&self, cat: C, values: &PathValues<C>, entry: &Entry) -> bool {
        if self.matches_path_values(cat, values) {
            return true;
        }

        self.info_category() != C::unknown_cat() && self.matches_info(&entry.info)
    }

    /// Render with category values masked
    pub fn conceal(&self) -> String {
        self.scope.conceal()
    }

    /// Render every value in the clear
    pub fn plain_string(&self) -> String {
        self.scope.plain_string()
    }
}

impl<C: Categorizer> fmt::Display for CategoryScope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.conceal())
    }
}

fn seed<C: Categorizer>(cat: C, granularity: Granularity, resources: &[String]) -> Scope {
    let resources = clean(resources);

    let mut scope = Scope::default();
    scope.insert(SCOPE_KEY_CATEGORY, filters::identity(cat.as_str()));
    scope.insert(
        SCOPE_KEY_DATA_TYPE,
        filters::identity(cat.leaf_cat().as_str()),
    );
    scope.insert(SCOPE_KEY_GRANULARITY, filters::identity(granularity.as_str()));
    scope.insert(
        SCOPE_KEY_RESOURCE,
        Filter::new(Comparator::IdentityValue, &resources, false),
    );
    scope.insert(
        C::root_cat().as_str(),
        filter_for(&ScopeConfig::default(), &resources),
    );
    scope
}

/// Build a path scope
///
/// The value filter is stored under the category's own key and the root
/// key is seeded with the resource owners.
pub(crate) fn make_scope<C: Categorizer>(
    granularity: Granularity,
    cat: C,
    resources: &[String],
    values: &[String],
    sc: &ScopeConfig,
) -> CategoryScope<C> {
    let mut scope = seed(cat, granularity, resources);
    scope.insert(cat.as_str(), filter_for(sc, values));
    CategoryScope::from(scope)
}

/// Build a filter scope over item metadata
///
/// `comparator` is the comparison used when no option overrides it.
pub(crate) fn make_filter_scope<C: Categorizer>(
    cat: C,
    info_cat: C,
    resources: &[String],
    values: &[String],
    comparator: Comparator,
    sc: &ScopeConfig,
) -> CategoryScope<C> {
    let mut scope = seed(cat, Granularity::Filter, resources);
    scope.insert(SCOPE_KEY_INFO_CATEGORY, filters::identity(info_cat.as_str()));
    scope.insert(info_cat.as_str(), filterize(sc, Some(comparator), values));
    CategoryScope::from(scope)
}
