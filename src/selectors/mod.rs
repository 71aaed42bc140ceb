//! Selectors
//!
//! A [`Selector`] describes which slice of a tenant's backed-up data an
//! operation should touch: the service, the resource owners, and three
//! lists of scopes.
//!
//! - **Inclusions** are OR'd: an entry must match at least one of them
//! - **Filters** are AND'd: an entry must match every one of them
//! - **Exclusions** win over everything: any match rejects the entry
//!
//! The untyped [`Selector`] is what gets stored and passed around. Building
//! scopes happens through a typed [`DomainSelector`], one per service and
//! purpose (for example [`ExchangeBackup`] or [`SharePointRestore`]), whose
//! factories only produce scopes of that service's categories.
//!
//! ## Examples
//!
//! ```rust
//! use tenant_selectors::details::Details;
//! use tenant_selectors::fault::Bus;
//! use tenant_selectors::selectors::{any, ExchangeRestore, Selector};
//!
//! let mut er = ExchangeRestore::new(&["u1"]);
//! er.include(er.mail_folders(&["Inbox"], &[]));
//! er.exclude(er.mails(&any(), &["draft-1"], &[]));
//!
//! // store it untyped, cast back when needed
//! let sel: Selector = er.into_selector();
//! let er = sel.to_exchange_restore().unwrap();
//!
//! let reduced = er.reduce(&Details::default(), &Bus::default());
//! assert!(reduced.is_empty());
//! ```

pub mod destination;
pub mod exchange;
pub mod groups;
pub mod onedrive;
pub mod reasons;
pub mod reduce;
pub mod scopes;
pub mod sharepoint;
pub mod teams_chats;

pub use destination::Destination;
pub use exchange::{ExchangeCategory, ExchangeScope};
pub use groups::{GroupsCategory, GroupsScope};
pub use onedrive::{OneDriveCategory, OneDriveScope};
pub use reasons::Reason;
pub use scopes::{any, none, Categorizer, CategoryScope, MatchOption, Scope, ANY_TGT, NONE_TGT};
pub use sharepoint::{SharePointCategory, SharePointScope};
pub use teams_chats::{TeamsChatsCategory, TeamsChatsScope};

use crate::details::Details;
use crate::error::{Result, SelectorError};
use crate::fault::Bus;
use crate::filters::{self, Filter};
use crate::path::ServiceType;
use crate::types::{Config, Granularity, PathCategories};
use scopes::{
    clean, default_item_options, filterize, make_filter_scope, make_scope, strings, ScopeConfig,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Run a generic body with `$cat` bound to the selector's category type
macro_rules! with_categorizer {
    ($sel:expr, $cat:ident => $body:expr) => {
        match $sel.service {
            ServiceType::Exchange => {
                type $cat = ExchangeCategory;
                Ok($body)
            }
            ServiceType::OneDrive => {
                type $cat = OneDriveCategory;
                Ok($body)
            }
            ServiceType::SharePoint => {
                type $cat = SharePointCategory;
                Ok($body)
            }
            ServiceType::Groups => {
                type $cat = GroupsCategory;
                Ok($body)
            }
            ServiceType::TeamsChats => {
                type $cat = TeamsChatsCategory;
                Ok($body)
            }
            ServiceType::Unknown => Err(SelectorError::UnrecognizedService(
                $sel.service.to_string(),
            )),
        }
    };
}

/// Purpose a typed selector is built for
///
/// Backup and restore selectors share every scope factory; restore
/// selectors add the factories that only make sense against an existing
/// catalog.
pub trait SelectorKind:
    Copy + Default + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Label used in logs
    const NAME: &'static str;
}

/// Marker for selectors driving a backup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Backup;

impl SelectorKind for Backup {
    const NAME: &'static str = "backup";
}

/// Marker for selectors driving a restore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restore;

impl SelectorKind for Restore {
    const NAME: &'static str = "restore";
}

/// Service-agnostic selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Service the scopes belong to
    pub service: ServiceType,

    /// Every resource owner the selector was created for
    pub resource_owners: Filter,

    /// The single owner an operation is currently looking at
    ///
    /// Set automatically when the selector is built for exactly one owner;
    /// otherwise populated by [`Selector::split_by_resource_owner`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discrete_owner: String,

    /// Display name of the discrete owner
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discrete_owner_name: String,

    /// Scopes that reject any entry they match
    #[serde(default, rename = "exclusions")]
    pub excludes: Vec<Scope>,

    /// Scopes every kept entry must match
    #[serde(default)]
    pub filters: Vec<Scope>,

    /// Scopes of which a kept entry must match at least one
    #[serde(default)]
    pub includes: Vec<Scope>,

    /// Matching behavior
    #[serde(default, rename = "config")]
    pub cfg: Config,
}

impl Selector {
    /// Create an empty selector over the given owners
    pub fn new<S: AsRef<str>>(service: ServiceType, owners: &[S]) -> Self {
        let owners = strings(owners);

        let discrete_owner = match owners.as_slice() {
            [only] if only != ANY_TGT && only != NONE_TGT => only.clone(),
            _ => String::new(),
        };

        Self {
            service,
            resource_owners: filterize(&ScopeConfig::default(), None, &owners),
            discrete_owner,
            discrete_owner_name: String::new(),
            excludes: Vec::new(),
            filters: Vec::new(),
            includes: Vec::new(),
            cfg: Config::default(),
        }
    }

    /// Stable id of the discrete owner
    pub fn id(&self) -> &str {
        &self.discrete_owner
    }

    /// Display name of the discrete owner, falling back to its id
    pub fn name(&self) -> &str {
        if self.discrete_owner_name.is_empty() {
            &self.discrete_owner
        } else {
            &self.discrete_owner_name
        }
    }

    /// Copy with the discrete owner's id and name replaced
    ///
    /// An empty id keeps the current owner and uses it as the name; an
    /// empty name defaults to the id.
    pub fn set_discrete_owner_id_name(&self, id: &str, name: &str) -> Self {
        let mut res = self.clone();

        if id.is_empty() {
            res.discrete_owner_name = self.discrete_owner.clone();
            return res;
        }

        res.discrete_owner = id.to_string();
        res.discrete_owner_name = if name.is_empty() { id } else { name }.to_string();
        res
    }

    /// The owners as a list of ids, or the `Any`/`None` wildcard
    pub fn discrete_resource_owners(&self) -> Vec<String> {
        if self.is_any_resource_owner() {
            return any();
        }
        if self.is_none_resource_owner() {
            return none();
        }
        clean(&strings(&self.resource_owners.targets()))
    }

    /// True if the selector was built for every owner
    pub fn is_any_resource_owner(&self) -> bool {
        self.resource_owners.is_pass()
    }

    /// True if the selector was built for no owner
    pub fn is_none_resource_owner(&self) -> bool {
        self.resource_owners.is_fail()
    }

    /// Replace the matching behavior
    pub fn configure(&mut self, cfg: Config) {
        self.cfg = cfg;
    }

    /// Reduce a catalog with the categories of the selector's service
    pub fn reduce(&self, details: &Details, errs: &Bus) -> Result<Details> {
        with_categorizer!(self, C => reduce::reduce::<C>(details, self, errs))
    }

    /// Path categories named by each scope list
    pub fn path_categories(&self) -> Result<PathCategories> {
        with_categorizer!(self, C => path_categories_of::<C>(self))
    }

    /// Prior-backup subtrees the selector needs
    pub fn reasons(&self, tenant: &str, use_owner_name_for_id: bool) -> Result<Vec<Reason>> {
        with_categorizer!(self, C => reasons::reasons_for::<C>(self, tenant, use_owner_name_for_id))
    }

    /// One selector per resource owner
    ///
    /// `all_owners` stands in for an `Any` owner list and should hold every
    /// owner of the service in the tenant.
    pub fn split_by_resource_owner<S: AsRef<str>>(
        &self,
        all_owners: &[S],
    ) -> Result<Vec<Selector>> {
        with_categorizer!(self, C => split_by_owner::<C>(self, &strings(all_owners)))
    }

    /// Cast to an exchange backup selector
    pub fn to_exchange_backup(&self) -> Result<ExchangeBackup> {
        ExchangeBackup::from_selector(self.clone())
    }

    /// Cast to an exchange restore selector
    pub fn to_exchange_restore(&self) -> Result<ExchangeRestore> {
        ExchangeRestore::from_selector(self.clone())
    }

    /// Cast to a onedrive backup selector
    pub fn to_onedrive_backup(&self) -> Result<OneDriveBackup> {
        OneDriveBackup::from_selector(self.clone())
    }

    /// Cast to a onedrive restore selector
    pub fn to_onedrive_restore(&self) -> Result<OneDriveRestore> {
        OneDriveRestore::from_selector(self.clone())
    }

    /// Cast to a sharepoint backup selector
    pub fn to_sharepoint_backup(&self) -> Result<SharePointBackup> {
        SharePointBackup::from_selector(self.clone())
    }

    /// Cast to a sharepoint restore selector
    pub fn to_sharepoint_restore(&self) -> Result<SharePointRestore> {
        SharePointRestore::from_selector(self.clone())
    }

    /// Cast to a groups backup selector
    pub fn to_groups_backup(&self) -> Result<GroupsBackup> {
        GroupsBackup::from_selector(self.clone())
    }

    /// Cast to a groups restore selector
    pub fn to_groups_restore(&self) -> Result<GroupsRestore> {
        GroupsRestore::from_selector(self.clone())
    }

    /// Cast to a chats backup selector
    pub fn to_teams_chats_backup(&self) -> Result<TeamsChatsBackup> {
        TeamsChatsBackup::from_selector(self.clone())
    }

    /// Cast to a chats restore selector
    pub fn to_teams_chats_restore(&self) -> Result<TeamsChatsRestore> {
        TeamsChatsRestore::from_selector(self.clone())
    }
}

/// Selectors print as their JSON document
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("error"),
        }
    }
}

fn path_categories_of<C: Categorizer>(sel: &Selector) -> PathCategories {
    PathCategories {
        includes: reasons::path_categories_in::<C>(&sel.includes),
        excludes: reasons::path_categories_in::<C>(&sel.excludes),
        filters: reasons::path_categories_in::<C>(&sel.filters),
    }
}

fn rewrite_for_owner<C: Categorizer>(scopes: &[Scope], owner: &str) -> Vec<Scope> {
    scopes
        .iter()
        .map(|s| Scope::from(CategoryScope::<C>::from(s.clone()).for_owner(owner)))
        .collect()
}

#[instrument(skip_all, fields(service = %sel.service, owners = all_owners.len()))]
fn split_by_owner<C: Categorizer>(sel: &Selector, all_owners: &[String]) -> Vec<Selector> {
    if sel.is_none_resource_owner() {
        debug!("selector admits no owners");
        return Vec::new();
    }

    let targets = if sel.is_any_resource_owner() {
        all_owners.to_vec()
    } else {
        sel.discrete_resource_owners()
    };

    let mut splits = Vec::with_capacity(targets.len());
    for owner in targets {
        let name = if owner == sel.discrete_owner {
            sel.discrete_owner_name.clone()
        } else {
            String::new()
        };

        splits.push(Selector {
            service: sel.service,
            resource_owners: filters::equal([owner.as_str()]),
            discrete_owner_name: name,
            excludes: rewrite_for_owner::<C>(&sel.excludes, &owner),
            filters: rewrite_for_owner::<C>(&sel.filters, &owner),
            includes: rewrite_for_owner::<C>(&sel.includes, &owner),
            cfg: sel.cfg,
            discrete_owner: owner,
        });
    }

    debug!(splits = splits.len(), "split selector by resource owner");
    splits
}

/// Selector typed to one service's categories and one purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct DomainSelector<C: Categorizer, K: SelectorKind> {
    selector: Selector,
    #[serde(skip)]
    marker: PhantomData<(C, K)>,
}

impl<C: Categorizer, K: SelectorKind> DomainSelector<C, K> {
    /// Create an empty selector over the given owners
    pub fn new<S: AsRef<str>>(owners: &[S]) -> Self {
        Self {
            selector: Selector::new(C::SERVICE, owners),
            marker: PhantomData,
        }
    }

    /// Wrap an untyped selector, checking its service
    pub fn from_selector(selector: Selector) -> Result<Self> {
        if selector.service != C::SERVICE {
            return Err(SelectorError::bad_cast(C::SERVICE, selector.service));
        }

        Ok(Self {
            selector,
            marker: PhantomData,
        })
    }

    /// The untyped selector
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Unwrap into the untyped selector
    pub fn into_selector(self) -> Selector {
        self.selector
    }

    /// Replace the matching behavior
    ///
    /// Applies to scopes built afterwards and to every reduction.
    pub fn configure(&mut self, cfg: Config) {
        self.selector.configure(cfg);
    }

    /// Current matching behavior
    pub fn config(&self) -> Config {
        self.selector.cfg
    }

    /// Copy with the discrete owner's id and name replaced
    pub fn set_discrete_owner_id_name(&self, id: &str, name: &str) -> Self {
        Self {
            selector: self.selector.set_discrete_owner_id_name(id, name),
            marker: PhantomData,
        }
    }

    fn append<I>(list: &mut Vec<Scope>, scopes: I)
    where
        I: IntoIterator<Item = CategoryScope<C>>,
    {
        for mut scope in scopes {
            scope.set_defaults();
            list.push(scope.into());
        }
    }

    /// Add inclusion scopes
    pub fn include<I>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = CategoryScope<C>>,
    {
        Self::append(&mut self.selector.includes, scopes);
    }

    /// Add exclusion scopes
    pub fn exclude<I>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = CategoryScope<C>>,
    {
        Self::append(&mut self.selector.excludes, scopes);
    }

    /// Add filter scopes
    pub fn filter<I>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = CategoryScope<C>>,
    {
        Self::append(&mut self.selector.filters, scopes);
    }

    /// The inclusion scopes
    pub fn scopes(&self) -> Vec<CategoryScope<C>> {
        self.selector
            .includes
            .iter()
            .cloned()
            .map(CategoryScope::from)
            .collect()
    }

    /// Keep the catalog entries this selector admits
    pub fn reduce(&self, details: &Details, errs: &Bus) -> Details {
        debug!(kind = K::NAME, service = %C::SERVICE, "reducing with typed selector");
        reduce::reduce::<C>(details, &self.selector, errs)
    }

    /// Path categories named by each scope list
    pub fn path_categories(&self) -> PathCategories {
        path_categories_of::<C>(&self.selector)
    }

    /// Prior-backup subtrees the selector needs
    pub fn reasons(&self, tenant: &str, use_owner_name_for_id: bool) -> Vec<Reason> {
        reasons::reasons_for::<C>(&self.selector, tenant, use_owner_name_for_id)
    }

    /// One selector per resource owner
    pub fn split_by_resource_owner<S: AsRef<str>>(&self, all_owners: &[S]) -> Vec<Self> {
        split_by_owner::<C>(&self.selector, &strings(all_owners))
            .into_iter()
            .map(|selector| Self {
                selector,
                marker: PhantomData,
            })
            .collect()
    }

    fn resources(&self) -> Vec<String> {
        self.selector.discrete_resource_owners()
    }

    /// Scope over whole resource owners
    pub(crate) fn root_scope(&self, owners: &[String]) -> CategoryScope<C> {
        make_scope(
            Granularity::Group,
            C::root_cat(),
            owners,
            owners,
            &ScopeConfig::default(),
        )
    }

    /// Scope over folder-like categories and everything beneath them
    pub(crate) fn folder_scope(
        &self,
        cat: C,
        values: &[String],
        opts: &[MatchOption],
    ) -> CategoryScope<C> {
        let mut sc = ScopeConfig::new(opts);
        if cat.compares_paths() {
            sc = sc.path_comparator();
        }
        make_scope(Granularity::Group, cat, &self.resources(), values, &sc)
    }

    /// Scope over individual items, compared per the selector config
    pub(crate) fn leaf_scope(
        &self,
        cat: C,
        items: &[String],
        opts: &[MatchOption],
    ) -> CategoryScope<C> {
        let mut item_opts = default_item_options(&self.selector.cfg);
        item_opts.extend_from_slice(opts);
        make_scope(
            Granularity::Item,
            cat,
            &self.resources(),
            items,
            &ScopeConfig::new(&item_opts),
        )
    }

    /// Scope over items within folders
    ///
    /// `opts` apply to the folder values only.
    pub(crate) fn item_scope(
        &self,
        item_cat: C,
        items: &[String],
        folder_cat: C,
        folders: &[String],
        opts: &[MatchOption],
    ) -> CategoryScope<C> {
        self.leaf_scope(item_cat, items, &[])
            .set(folder_cat, folders, opts)
    }

    /// Filter scope comparing one metadata value
    pub(crate) fn info_scope(
        &self,
        cat: C,
        info_cat: C,
        value: &str,
        comparator: filters::Comparator,
    ) -> CategoryScope<C> {
        self.info_scope_with(cat, info_cat, &[value.to_string()], comparator, &[])
    }

    /// Filter scope comparing several metadata values
    pub(crate) fn info_scope_with(
        &self,
        cat: C,
        info_cat: C,
        values: &[String],
        comparator: filters::Comparator,
        opts: &[MatchOption],
    ) -> CategoryScope<C> {
        let mut sc = ScopeConfig::new(opts);
        if info_cat.compares_paths() {
            sc = sc.path_comparator();
        }
        make_filter_scope(cat, info_cat, &self.resources(), values, comparator, &sc)
    }
}

impl<C: Categorizer, K: SelectorKind> From<DomainSelector<C, K>> for Selector {
    fn from(ds: DomainSelector<C, K>) -> Self {
        ds.selector
    }
}

impl<C: Categorizer, K: SelectorKind> fmt::Display for DomainSelector<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

/// Selects exchange data to back up
pub type ExchangeBackup = DomainSelector<ExchangeCategory, Backup>;
/// Selects exchange data to restore
pub type ExchangeRestore = DomainSelector<ExchangeCategory, Restore>;
/// Selects drive data to back up
pub type OneDriveBackup = DomainSelector<OneDriveCategory, Backup>;
/// Selects drive data to restore
pub type OneDriveRestore = DomainSelector<OneDriveCategory, Restore>;
/// Selects site data to back up
pub type SharePointBackup = DomainSelector<SharePointCategory, Backup>;
/// Selects site data to restore
pub type SharePointRestore = DomainSelector<SharePointCategory, Restore>;
/// Selects group data to back up
pub type GroupsBackup = DomainSelector<GroupsCategory, Backup>;
/// Selects group data to restore
pub type GroupsRestore = DomainSelector<GroupsCategory, Restore>;
/// Selects chats to back up
pub type TeamsChatsBackup = DomainSelector<TeamsChatsCategory, Backup>;
/// Selects chats to restore
pub type TeamsChatsRestore = DomainSelector<TeamsChatsCategory, Restore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::{Entry, ExchangeInfo, ItemInfo, ItemType};
    use crate::path::{CategoryType, ResourcePath};

    fn mail(owner: &str, id: &str) -> Entry {
        let repo_ref = format!("tid/exchange/{}/email/Inbox/{}", owner, id);
        Entry {
            short_ref: ResourcePath::from_data_layer_path(&repo_ref, true)
                .unwrap()
                .short_ref(),
            repo_ref,
            parent_ref: String::new(),
            location_ref: String::new(),
            item_ref: String::new(),
            updated: false,
            info: ItemInfo::Exchange(ExchangeInfo {
                item_type: ItemType::ExchangeMail,
                subject: "hi".to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_new_sets_discrete_owner() {
        let table: Vec<(Vec<&str>, &str)> = vec![
            (vec!["u1"], "u1"),
            (vec!["u1", "u2"], ""),
            (vec![ANY_TGT], ""),
            (vec![NONE_TGT], ""),
            (vec![], ""),
        ];

        for (owners, expect) in table {
            let sel = Selector::new(ServiceType::Exchange, &owners);
            assert_eq!(sel.discrete_owner, expect, "{:?}", owners);
        }
    }

    #[test]
    fn test_discrete_resource_owners() {
        let sel = Selector::new(ServiceType::OneDrive, &["a", "b"]);
        assert_eq!(sel.discrete_resource_owners(), vec!["a", "b"]);

        let all = Selector::new(ServiceType::OneDrive, &any());
        assert!(all.is_any_resource_owner());
        assert_eq!(all.discrete_resource_owners(), any());

        let nobody = Selector::new::<&str>(ServiceType::OneDrive, &[]);
        assert!(nobody.is_none_resource_owner());
        assert_eq!(nobody.discrete_resource_owners(), none());
    }

    #[test]
    fn test_set_discrete_owner_id_name() {
        let sel = Selector::new(ServiceType::Exchange, &["alias@example.com"]);

        let named = sel.set_discrete_owner_id_name("uid", "Some User");
        assert_eq!(named.id(), "uid");
        assert_eq!(named.name(), "Some User");

        let unnamed = sel.set_discrete_owner_id_name("uid", "");
        assert_eq!(unnamed.name(), "uid");

        let kept = sel.set_discrete_owner_id_name("", "ignored");
        assert_eq!(kept.id(), "alias@example.com");
        assert_eq!(kept.name(), "alias@example.com");

        // the receiver is untouched
        assert_eq!(sel.discrete_owner_name, "");
    }

    #[test]
    fn test_casts_check_service() {
        let sel = SharePointBackup::new(&["sid"]).into_selector();
        assert!(sel.to_sharepoint_restore().is_ok());

        let casts: Vec<(&str, bool)> = vec![
            ("exchange", sel.to_exchange_backup().is_err()),
            ("onedrive", sel.to_onedrive_restore().is_err()),
            ("groups", sel.to_groups_backup().is_err()),
            ("teamschats", sel.to_teams_chats_restore().is_err()),
        ];
        for (name, failed) in casts {
            assert!(failed, "cast to {} should fail", name);
        }

        assert_eq!(
            sel.to_groups_restore().unwrap_err(),
            SelectorError::bad_cast("groups", "sharepoint")
        );
    }

    #[test]
    fn test_unknown_service_is_an_error() {
        let sel = Selector::new(ServiceType::Unknown, &["u1"]);
        assert_eq!(
            sel.reduce(&Details::default(), &Bus::default()).unwrap_err(),
            SelectorError::UnrecognizedService("unknown".to_string())
        );
        assert!(sel.path_categories().is_err());
        assert!(sel.reasons("tid", false).is_err());
        assert!(sel.split_by_resource_owner(&["u1"]).is_err());
    }

    #[test]
    fn test_generic_reduce_dispatches_on_service() {
        let mut er = ExchangeRestore::new(&["u1"]);
        er.include(er.users(&any()));
        let sel = er.into_selector();

        let deets = Details::new(vec![mail("u1", "m1"), mail("u2", "m2")]);
        let reduced = sel.reduce(&deets, &Bus::default()).unwrap();
        assert_eq!(reduced.len(), 1);
    }

    #[test]
    fn test_include_appends_copies() {
        let mut er = ExchangeBackup::new(&["u1"]);
        let scopes = er.mail_folders(&["Inbox"], &[]);
        er.include(scopes.clone());
        er.include(scopes.clone());

        assert_eq!(er.scopes().len(), 2);
        // the caller's scopes did not receive defaults
        assert!(!scopes[0].as_scope().contains_key(ExchangeCategory::Mail.as_str()));
        assert!(er.scopes()[0].is_any(ExchangeCategory::Mail));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut er = ExchangeRestore::new(&["u1"]);
        er.configure(Config {
            only_match_item_names: true,
        });
        er.include(er.mails(&["Inbox"], &["hello"], &[]));
        er.exclude(er.contact_folders(&any(), &[]));
        er.filter(er.mail_subject("foo"));
        let sel = er.set_discrete_owner_id_name("u1", "User One").into_selector();

        let json = serde_json::to_string(&sel).unwrap();
        assert!(json.contains(r#""service":"exchange""#));
        assert!(json.contains(r#""exclusions":["#));
        assert!(json.contains(r#""discreteOwnerName":"User One""#));

        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
        assert_eq!(back.to_string(), json);
    }

    #[test]
    fn test_path_categories() {
        let mut er = ExchangeBackup::new(&["u1"]);
        er.include(er.mail_folders(&any(), &[]));
        er.exclude(er.contacts(&any(), &["c1"], &[]));
        er.filter(er.event_subject("standup"));

        let pc = er.into_selector().path_categories().unwrap();
        assert_eq!(pc.includes, vec![CategoryType::Email]);
        assert_eq!(pc.excludes, vec![CategoryType::Contacts]);
        assert_eq!(pc.filters, vec![CategoryType::Events]);
    }

    #[test]
    fn test_split_by_resource_owner() {
        let all = ["u1", "u2", "u3"];

        let listed = ExchangeBackup::new(&["u1", "u2"]);
        let ids: Vec<String> = listed
            .split_by_resource_owner(&all)
            .iter()
            .map(|s| s.selector().id().to_string())
            .collect();
        assert_eq!(ids, vec!["u1", "u2"]);

        let any_owner = ExchangeBackup::new(&any());
        assert_eq!(any_owner.split_by_resource_owner(&all).len(), 3);

        let no_owner = ExchangeBackup::new(&none());
        assert!(no_owner.split_by_resource_owner(&all).is_empty());
    }

    #[test]
    fn test_split_rewrites_root_keys() {
        let mut er = ExchangeRestore::new(&["u1", "u2"]);
        er.include(er.users(&["u1"]));
        er.include(er.mail_folders(&any(), &[]));

        let splits = er.split_by_resource_owner(&["u1", "u2"]);
        assert_eq!(splits.len(), 2);

        let u2 = splits[1].scopes();
        // the users(["u1"]) scope cannot match u2
        assert!(u2[0].is_none(ExchangeCategory::User));
        assert_eq!(u2[1].get(ExchangeCategory::User), vec!["u2"]);
        assert_eq!(splits[1].selector().resource_owners, filters::equal(["u2"]));
    }

    #[test]
    fn test_split_union_matches_original() {
        let mut er = ExchangeRestore::new(&any());
        er.include(er.mail_folders(&["Inbox"], &[]));

        let deets = Details::new(vec![mail("u1", "m1"), mail("u2", "m2"), mail("u3", "m3")]);
        let whole = er.reduce(&deets, &Bus::default());

        let mut joined = Vec::new();
        for split in er.split_by_resource_owner(&["u1", "u2", "u3"]) {
            joined.extend(split.reduce(&deets, &Bus::default()).entries);
        }

        assert_eq!(joined, whole.entries);
    }
}
