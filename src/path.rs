//! Escape-safe hierarchical paths
//!
//! Every backed-up item is named by a path of string elements. Elements are
//! kept unescaped in memory; the canonical string form escapes each literal
//! separator (`/`) and escape character (`\`) with a leading `\` and joins
//! the elements with `/`.
//!
//! ## Resource paths
//!
//! A [`ResourcePath`] fixes the first four elements to
//! `tenant/service/resourceOwner/category` and treats the remainder as
//! folders, optionally followed by an item:
//!
//! ```text
//! tenant-id/exchange/user-id/email/Inbox/Archive/message-id
//! |_______| |______| |_____| |___| |____________| |________|
//!  tenant   service   owner  cat.     folders        item
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use tenant_selectors::path::Builder;
//!
//! let pb = Builder::new().append(["this", "is/a", "path"]);
//! assert_eq!(pb.to_string(), r"this/is\/a/path");
//!
//! let parsed = Builder::new().split_unescape_append(r"this/is\/a/path").unwrap();
//! assert_eq!(parsed, pb);
//! ```

use crate::error::{Result, SelectorError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Character used to escape separators and itself
pub const ESCAPE_CHARACTER: char = '\\';

/// Character separating path elements
pub const PATH_SEPARATOR: char = '/';

/// Number of hex characters in a short reference
pub const SHORT_REF_CHARACTERS: usize = 12;

/// Elements in the resource prefix: tenant, service, owner, category
const RESOURCE_PREFIX_LEN: usize = 4;

fn needs_escape(c: char) -> bool {
    c == ESCAPE_CHARACTER || c == PATH_SEPARATOR
}

/// Escape every separator and escape character in a single element
pub fn escape_element(element: &str) -> String {
    let mut out = String::with_capacity(element.len());
    for c in element.chars() {
        if needs_escape(c) {
            out.push(ESCAPE_CHARACTER);
        }
        out.push(c);
    }
    out
}

/// Remove one level of escaping from an already validated element
///
/// An escape character is dropped unless the character before it was itself
/// a (dropped) escape.
pub fn unescape(element: &str) -> String {
    let mut out = String::with_capacity(element.len());
    let mut prev_was_escape = false;

    for c in element.chars() {
        if c != ESCAPE_CHARACTER || prev_was_escape {
            prev_was_escape = false;
            out.push(c);
            continue;
        }
        prev_was_escape = true;
    }

    out
}

/// Check that every separator or escape character in `element` is escaped
pub fn validate_escaped_element(element: &str) -> Result<()> {
    let mut prev_was_escape = false;

    for c in element.chars() {
        if prev_was_escape {
            prev_was_escape = false;
            if !needs_escape(c) {
                return Err(SelectorError::BadEscapeSequence(element.to_string()));
            }
            continue;
        }

        if c == ESCAPE_CHARACTER {
            prev_was_escape = true;
        } else if c == PATH_SEPARATOR {
            return Err(SelectorError::UnescapedSeparator(element.to_string()));
        }
    }

    if prev_was_escape {
        return Err(SelectorError::TrailingEscapeCharacter(element.to_string()));
    }

    Ok(())
}

/// Strip unescaped trailing separators from an escaped element
///
/// A trailing `/` is only removed when the run of escape characters in front
/// of it has even length, so `a\/` keeps its escaped separator while `a\\/`
/// loses the separator and keeps the escaped backslash.
pub fn trim_trailing_slash(element: &str) -> &str {
    let mut trimmed = element;

    while let Some(rest) = trimmed.strip_suffix(PATH_SEPARATOR) {
        let escapes = rest
            .chars()
            .rev()
            .take_while(|c| *c == ESCAPE_CHARACTER)
            .count();
        if escapes % 2 != 0 {
            break;
        }
        trimmed = rest;
    }

    trimmed
}

/// Split an escaped path on unescaped separators
///
/// Empty segments (leading, trailing, or doubled separators) are skipped.
/// The returned segments are still escaped.
pub fn split(segment: &str) -> Vec<String> {
    let mut res = Vec::new();
    let mut escapes = 0usize;
    let mut start = 0usize;
    // leading separators produce no element
    let mut prev_was_separator = true;

    for (i, c) in segment.char_indices() {
        if c == ESCAPE_CHARACTER {
            escapes += 1;
            prev_was_separator = false;
            continue;
        }

        if c != PATH_SEPARATOR || escapes % 2 != 0 {
            prev_was_separator = false;
            escapes = 0;
            continue;
        }

        if !prev_was_separator {
            res.push(segment[start..i].to_string());
        }

        start = i + c.len_utf8();
        escapes = 0;
        prev_was_separator = true;
    }

    if !prev_was_separator {
        res.push(segment[start..].to_string());
    }

    res
}

/// Escape each element and join them with the separator
pub fn join<I, S>(elements: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    elements
        .into_iter()
        .map(|e| escape_element(e.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Ordered sequence of unescaped path elements
///
/// All operations are copy-on-write: they return a new builder and leave
/// the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Builder {
    elements: Vec<String>,
}

impl Builder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unescaped elements, dropping empty ones
    pub fn append<I, S>(&self, elements: I) -> Builder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut res = self.clone();
        res.elements.extend(
            elements
                .into_iter()
                .map(|e| e.as_ref().to_string())
                .filter(|e| !e.is_empty()),
        );
        res
    }

    /// Append escaped elements, validating and unescaping each
    ///
    /// Unescaped trailing separators are trimmed first; an element that is
    /// empty afterwards is dropped.
    pub fn unescape_and_append<I, S>(&self, elements: I) -> Result<Builder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut res = self.clone();

        for element in elements {
            let trimmed = trim_trailing_slash(element.as_ref());
            if trimmed.is_empty() {
                continue;
            }

            validate_escaped_element(trimmed)?;
            res.elements.push(unescape(trimmed));
        }

        Ok(res)
    }

    /// Split an escaped path string and append its elements
    pub fn split_unescape_append(&self, path: &str) -> Result<Builder> {
        self.unescape_and_append(split(path))
    }

    /// Drop the first element
    pub fn pop_front(&self) -> Builder {
        Builder {
            elements: self.elements.iter().skip(1).cloned().collect(),
        }
    }

    /// Drop the last element
    pub fn dir(&self) -> Builder {
        let keep = self.elements.len().saturating_sub(1);
        Builder {
            elements: self.elements[..keep].to_vec(),
        }
    }

    /// Last element, or an empty string for an empty builder
    pub fn last_elem(&self) -> &str {
        self.elements.last().map(String::as_str).unwrap_or("")
    }

    /// Unescaped elements in order
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the builder holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Short, stable reference derived from the element contents
    ///
    /// The first bytes of a SHA-256 over the concatenated elements, hex
    /// encoded to [`SHORT_REF_CHARACTERS`] characters.
    pub fn short_ref(&self) -> String {
        if self.elements.is_empty() {
            return String::new();
        }

        let mut hasher = Sha256::new();
        for element in &self.elements {
            hasher.update(element.as_bytes());
        }
        let sum = hasher.finalize();

        hex::encode(&sum[..SHORT_REF_CHARACTERS / 2])
    }

    fn verify_prefix(&self, tenant: &str, resource_owner: &str) -> Result<()> {
        if tenant.is_empty() {
            return Err(SelectorError::invalid_path("missing tenant ID"));
        }
        if resource_owner.is_empty() {
            return Err(SelectorError::invalid_path("missing resource owner"));
        }
        if self.elements.is_empty() {
            return Err(SelectorError::invalid_path("missing path beyond prefix"));
        }
        Ok(())
    }

    /// Prefix the builder with the resource layout and return a resource path
    pub fn to_data_layer_path(
        &self,
        tenant: &str,
        resource_owner: &str,
        service: ServiceType,
        category: CategoryType,
        is_item: bool,
    ) -> Result<ResourcePath> {
        validate_service_and_category(service, category)?;
        self.verify_prefix(tenant, resource_owner)?;

        let mut elements = Vec::with_capacity(self.elements.len() + RESOURCE_PREFIX_LEN);
        elements.push(tenant.to_string());
        elements.push(service.as_str().to_string());
        elements.push(resource_owner.to_string());
        elements.push(category.as_str().to_string());
        elements.extend(self.elements.iter().cloned());

        Ok(ResourcePath {
            builder: Builder { elements },
            service,
            category,
            has_item: is_item,
        })
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.elements))
    }
}

/// Data domains a resource path can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Not a recognized service
    #[serde(rename = "unknown")]
    Unknown,
    /// Mail, contacts and calendars
    #[serde(rename = "exchange")]
    Exchange,
    /// Personal drives
    #[serde(rename = "onedrive")]
    OneDrive,
    /// Sites, libraries, lists and pages
    #[serde(rename = "sharepoint")]
    SharePoint,
    /// Group channels and group sites
    #[serde(rename = "groups")]
    Groups,
    /// One-on-one and group chats
    #[serde(rename = "teamschats")]
    TeamsChats,
}

impl ServiceType {
    /// Canonical string used in paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Unknown => "unknown",
            ServiceType::Exchange => "exchange",
            ServiceType::OneDrive => "onedrive",
            ServiceType::SharePoint => "sharepoint",
            ServiceType::Groups => "groups",
            ServiceType::TeamsChats => "teamschats",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "exchange" => Ok(ServiceType::Exchange),
            "onedrive" => Ok(ServiceType::OneDrive),
            "sharepoint" => Ok(ServiceType::SharePoint),
            "groups" => Ok(ServiceType::Groups),
            "teamschats" => Ok(ServiceType::TeamsChats),
            _ => Err(SelectorError::UnknownService(s.to_string())),
        }
    }
}

/// Kinds of data stored under a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryType {
    /// Not a recognized category
    Unknown,
    /// Mail messages
    Email,
    /// Address book entries
    Contacts,
    /// Calendar events
    Events,
    /// Drive files
    Files,
    /// Document libraries
    Libraries,
    /// Site lists
    Lists,
    /// Site pages
    Pages,
    /// Group channel messages
    ChannelMessages,
    /// Chat threads
    Chats,
}

impl CategoryType {
    /// Canonical string used in paths
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Unknown => "unknown",
            CategoryType::Email => "email",
            CategoryType::Contacts => "contacts",
            CategoryType::Events => "events",
            CategoryType::Files => "files",
            CategoryType::Libraries => "libraries",
            CategoryType::Lists => "lists",
            CategoryType::Pages => "pages",
            CategoryType::ChannelMessages => "channelMessages",
            CategoryType::Chats => "chats",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "email" => Ok(CategoryType::Email),
            "contacts" => Ok(CategoryType::Contacts),
            "events" => Ok(CategoryType::Events),
            "files" => Ok(CategoryType::Files),
            "libraries" => Ok(CategoryType::Libraries),
            "lists" => Ok(CategoryType::Lists),
            "pages" => Ok(CategoryType::Pages),
            "channelmessages" => Ok(CategoryType::ChannelMessages),
            "chats" => Ok(CategoryType::Chats),
            _ => Err(SelectorError::UnknownCategory(s.to_string())),
        }
    }
}

/// Categories each service may store
pub fn service_categories(service: ServiceType) -> &'static [CategoryType] {
    match service {
        ServiceType::Exchange => &[
            CategoryType::Email,
            CategoryType::Contacts,
            CategoryType::Events,
        ],
        ServiceType::OneDrive => &[CategoryType::Files],
        ServiceType::SharePoint => &[
            CategoryType::Libraries,
            CategoryType::Lists,
            CategoryType::Pages,
        ],
        ServiceType::Groups => &[CategoryType::Libraries, CategoryType::ChannelMessages],
        ServiceType::TeamsChats => &[CategoryType::Chats],
        ServiceType::Unknown => &[],
    }
}

/// Ensure `category` is valid for `service`
pub fn validate_service_and_category(service: ServiceType, category: CategoryType) -> Result<()> {
    if service == ServiceType::Unknown {
        return Err(SelectorError::UnknownService(service.to_string()));
    }
    if !service_categories(service).contains(&category) {
        return Err(SelectorError::UnknownCategory(format!(
            "{} is not a {} category",
            category, service
        )));
    }
    Ok(())
}

fn validate_service_and_category_strings(
    service: &str,
    category: &str,
) -> Result<(ServiceType, CategoryType)> {
    let service: ServiceType = service.parse()?;
    let category: CategoryType = category.parse()?;
    validate_service_and_category(service, category)?;
    Ok((service, category))
}

/// A path whose first elements name the tenant, service, owner and category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    builder: Builder,
    service: ServiceType,
    category: CategoryType,
    has_item: bool,
}

impl ResourcePath {
    /// Parse an escaped resource path string
    ///
    /// `is_item` states whether the final element names an item rather than
    /// a folder.
    pub fn from_data_layer_path(path: &str, is_item: bool) -> Result<ResourcePath> {
        let trimmed = trim_trailing_slash(path);
        if trimmed.is_empty() {
            return Err(SelectorError::invalid_path("logically empty path given"));
        }

        let builder = Builder::new().split_unescape_append(trimmed)?;
        if builder.len() <= RESOURCE_PREFIX_LEN {
            return Err(SelectorError::invalid_path(format!(
                "path has too few segments: {}",
                path
            )));
        }

        let (service, category) =
            validate_service_and_category_strings(&builder.elements[1], &builder.elements[3])?;

        Ok(ResourcePath {
            builder,
            service,
            category,
            has_item: is_item,
        })
    }

    /// Tenant the data belongs to
    pub fn tenant(&self) -> &str {
        &self.builder.elements[0]
    }

    /// Service the data was pulled from
    pub fn service(&self) -> ServiceType {
        self.service
    }

    /// User, site, group or other owner of the data
    pub fn resource_owner(&self) -> &str {
        &self.builder.elements[2]
    }

    /// Kind of data stored under the owner
    pub fn category(&self) -> CategoryType {
        self.category
    }

    fn folder_end(&self) -> usize {
        if self.has_item {
            self.builder.len() - 1
        } else {
            self.builder.len()
        }
    }

    /// Folder elements between the category and the item
    pub fn folders(&self) -> Vec<String> {
        let end = self.folder_end();
        if end <= RESOURCE_PREFIX_LEN {
            return Vec::new();
        }
        self.builder.elements[RESOURCE_PREFIX_LEN..end].to_vec()
    }

    /// Folders joined with `/`, escaped or not
    pub fn folder(&self, escaped: bool) -> String {
        let folders = self.folders();
        if escaped {
            join(&folders)
        } else {
            folders.join("/")
        }
    }

    /// The item element, empty when the path names a folder
    pub fn item(&self) -> &str {
        if self.has_item {
            self.builder.last_elem()
        } else {
            ""
        }
    }

    /// True if the final element is an item
    pub fn has_item(&self) -> bool {
        self.has_item
    }

    /// Parent folder path
    ///
    /// Fails when dropping the last element would cut into the resource
    /// prefix.
    pub fn dir(&self) -> Result<ResourcePath> {
        if self.builder.len() <= RESOURCE_PREFIX_LEN + 1 {
            return Err(SelectorError::invalid_path(format!(
                "unable to shorten path: {}",
                self
            )));
        }

        Ok(ResourcePath {
            builder: self.builder.dir(),
            service: self.service,
            category: self.category,
            has_item: false,
        })
    }

    /// Append a single element to a folder path
    pub fn append(&self, element: &str, is_item: bool) -> Result<ResourcePath> {
        if self.has_item {
            return Err(SelectorError::invalid_path("appending to an item path"));
        }

        Ok(ResourcePath {
            builder: self.builder.append([element]),
            service: self.service,
            category: self.category,
            has_item: is_item,
        })
    }

    /// Every element including the resource prefix
    pub fn elements(&self) -> &[String] {
        self.builder.elements()
    }

    /// Copy of the underlying builder
    pub fn to_builder(&self) -> Builder {
        self.builder.clone()
    }

    /// Short reference of the full path
    pub fn short_ref(&self) -> String {
        self.builder.short_ref()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.builder.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_escapes_on_display() {
        let cases: Vec<(Vec<&str>, &str)> = vec![
            (vec!["this", "is", "a", "path"], "this/is/a/path"),
            (vec!["this", "is", "", "a", "path"], "this/is/a/path"),
            (vec![], ""),
            (vec!["this", "is/a", "path"], r"this/is\/a/path"),
            (vec!["this", r"is\", "a", "path"], r"this/is\\/a/path"),
            (vec!["this", r"is\/a", "path"], r"this/is\\\/a/path"),
            (vec!["this", "is/", "a", "path"], r"this/is\//a/path"),
            (vec!["this", "is", "a", "path/"], r"this/is/a/path\/"),
        ];

        for (input, expected) in &cases {
            let pb = Builder::new().append(input);
            assert_eq!(pb.to_string(), *expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_unescape_and_append() {
        let cases: Vec<(Vec<&str>, &str)> = vec![
            (vec!["this", r"is\/a", "path"], r"this/is\/a/path"),
            (vec!["this", r"is\\", "a", "path"], r"this/is\\/a/path"),
            (vec!["this", r"is\\\/a", "path"], r"this/is\\\/a/path"),
            (vec!["this", r"is\/", "a", "path"], r"this/is\//a/path"),
            (vec!["this", "is", "a", r"path\/"], r"this/is/a/path\/"),
            (vec!["this", "is", "/", "a", "path"], "this/is/a/path"),
            (vec!["this", "is", "a/", "path"], "this/is/a/path"),
            (vec!["this", "is", "a///", "path"], "this/is/a/path"),
            (vec!["this", "is", "a", "path///"], "this/is/a/path"),
            (vec!["this", "is", "a", "path/", ""], "this/is/a/path"),
        ];

        for (input, expected) in &cases {
            let pb = Builder::new().unescape_and_append(input).unwrap();
            assert_eq!(pb.to_string(), *expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_unescaped_characters_fail() {
        for c in ["/", "\\"] {
            let elem = format!("i{}s", c);
            let err = Builder::new()
                .unescape_and_append(["this", elem.as_str(), "path"])
                .unwrap_err();
            assert!(err.is_path_error(), "{:?}", err);
        }

        let err = Builder::new().unescape_and_append(["a/b"]).unwrap_err();
        assert!(matches!(err, SelectorError::UnescapedSeparator(_)));
    }

    #[test]
    fn test_bad_escape_sequence() {
        for c in ['a', 'b', '#', '%'] {
            let elem = format!(r"i\{}s", c);
            let err = Builder::new()
                .unescape_and_append(["this", elem.as_str(), "path"])
                .unwrap_err();
            assert!(matches!(err, SelectorError::BadEscapeSequence(_)));
        }
    }

    #[test]
    fn test_trailing_escape_character() {
        let base = ["this", "is", "a", "path"];
        for i in 0..base.len() {
            let mut elems: Vec<String> = base.iter().map(|s| s.to_string()).collect();
            elems[i].push(ESCAPE_CHARACTER);
            let err = Builder::new().unescape_and_append(&elems).unwrap_err();
            assert!(matches!(err, SelectorError::TrailingEscapeCharacter(_)));
        }
    }

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(trim_trailing_slash("a/"), "a");
        assert_eq!(trim_trailing_slash("a///"), "a");
        assert_eq!(trim_trailing_slash(r"a\/"), r"a\/");
        assert_eq!(trim_trailing_slash(r"a\\/"), r"a\\");
        assert_eq!(trim_trailing_slash("/"), "");
        assert_eq!(trim_trailing_slash(""), "");
    }

    #[test]
    fn test_split() {
        assert_eq!(split("/a/b/"), vec!["a", "b"]);
        assert_eq!(split(r"a\/b/c"), vec![r"a\/b", "c"]);
        assert_eq!(split(r"a\\/b"), vec![r"a\\", "b"]);
        assert_eq!(split("a//b"), vec!["a", "b"]);
        assert!(split("").is_empty());
    }

    #[test]
    fn test_pop_front_and_dir() {
        let pb = Builder::new().append(["a", "b", "c"]);
        assert_eq!(pb.pop_front().elements(), &["b", "c"]);
        assert_eq!(pb.dir().elements(), &["a", "b"]);
        assert_eq!(pb.last_elem(), "c");
        assert!(Builder::new().dir().is_empty());
        // original is untouched
        assert_eq!(pb.len(), 3);
    }

    #[test]
    fn test_short_ref() {
        let pb = Builder::new().append(["a", "b"]);
        let sr = pb.short_ref();
        assert_eq!(sr.len(), SHORT_REF_CHARACTERS);
        assert_eq!(sr, Builder::new().append(["ab"]).short_ref());
        assert_ne!(sr, Builder::new().append(["a", "c"]).short_ref());
        assert_eq!(Builder::new().short_ref(), "");
    }

    #[test]
    fn test_resource_path_accessors() {
        let rp = ResourcePath::from_data_layer_path(
            "tid/exchange/uid/email/Inbox/Archive/msg",
            true,
        )
        .unwrap();

        assert_eq!(rp.tenant(), "tid");
        assert_eq!(rp.service(), ServiceType::Exchange);
        assert_eq!(rp.resource_owner(), "uid");
        assert_eq!(rp.category(), CategoryType::Email);
        assert_eq!(rp.folder(false), "Inbox/Archive");
        assert_eq!(rp.folders(), vec!["Inbox", "Archive"]);
        assert_eq!(rp.item(), "msg");

        let dir = rp.dir().unwrap();
        assert_eq!(dir.item(), "");
        assert_eq!(dir.folder(false), "Inbox/Archive");
    }

    #[test]
    fn test_resource_path_without_item() {
        let rp =
            ResourcePath::from_data_layer_path("tid/onedrive/uid/files/a/b", false).unwrap();
        assert_eq!(rp.item(), "");
        assert_eq!(rp.folder(false), "a/b");

        let item = rp.append("file.txt", true).unwrap();
        assert_eq!(item.item(), "file.txt");
        assert!(item.append("more", false).is_err());
    }

    #[test]
    fn test_resource_path_escaped_folder() {
        let rp = Builder::new()
            .append(["a/b", "c"])
            .to_data_layer_path("t", "u", ServiceType::OneDrive, CategoryType::Files, false)
            .unwrap();
        assert_eq!(rp.folder(true), r"a\/b/c");
        assert_eq!(rp.folder(false), "a/b/c");
        assert_eq!(rp.to_string(), r"t/onedrive/u/files/a\/b/c");

        let parsed = ResourcePath::from_data_layer_path(&rp.to_string(), false).unwrap();
        assert_eq!(parsed, rp);
    }

    #[test]
    fn test_resource_path_errors() {
        assert!(ResourcePath::from_data_layer_path("/", true).is_err());
        assert!(ResourcePath::from_data_layer_path("t/exchange/u/email", true).is_err());
        assert!(matches!(
            ResourcePath::from_data_layer_path("t/nope/u/email/i", true),
            Err(SelectorError::UnknownService(_))
        ));
        assert!(matches!(
            ResourcePath::from_data_layer_path("t/exchange/u/files/i", true),
            Err(SelectorError::UnknownCategory(_))
        ));

        let short = ResourcePath::from_data_layer_path("t/exchange/u/email/i", true).unwrap();
        assert!(short.dir().is_err());
    }

    #[test]
    fn test_to_data_layer_path_requires_prefix() {
        let pb = Builder::new().append(["folder"]);
        assert!(pb
            .to_data_layer_path("", "u", ServiceType::Exchange, CategoryType::Email, false)
            .is_err());
        assert!(pb
            .to_data_layer_path("t", "", ServiceType::Exchange, CategoryType::Email, false)
            .is_err());
        assert!(Builder::new()
            .to_data_layer_path("t", "u", ServiceType::Exchange, CategoryType::Email, false)
            .is_err());
        assert!(pb
            .to_data_layer_path("t", "u", ServiceType::Exchange, CategoryType::Chats, false)
            .is_err());
    }
}
