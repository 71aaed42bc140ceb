//! Comparator algebra
//!
//! A [`Filter`] pairs a [`Comparator`] with a target value and a negation
//! flag. It is the atomic predicate every scope is built from.
//!
//! A filter may hold several target values; it matches when any one of them
//! satisfies the comparator. Values are stored as given and never split, so
//! a target such as `"Projects, 2023"` stays a single value. Comparisons are case-insensitive and
//! ignore surrounding whitespace, except for [`Comparator::StrictEqualTo`].
//!
//! The comparator reads as "target OP input": `greater(["5"])` passes an
//! input of `"4"`, `contains(["smurfs"])` passes `"murf"`, while
//! `target_in(["userid"])` passes an input that contains `"userid"`.
//!
//! ```rust
//! use tenant_selectors::filters;
//!
//! let f = filters::equal(["Foo"]);
//! assert!(f.compare(" foo "));
//!
//! let not = filters::not_equal(["foo", "bar"]);
//! assert!(!not.compare("bar"));
//! assert!(not.compare("baz"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask printed in place of a concealed target value
const CONCEALED: &str = "***";

/// Wildcard target that is never concealed
const WILDCARD: &str = "*";

/// How a filter compares its target against an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Case-insensitive equality
    EqualTo,
    /// Case-sensitive equality
    StrictEqualTo,
    /// Target is greater than the input
    GreaterThan,
    /// Target is less than the input
    LessThan,
    /// Target contains the input as a substring
    TargetContains,
    /// Input contains the target as a substring
    TargetIn,
    /// Input starts with the target
    TargetPrefixes,
    /// Input ends with the target
    TargetSuffixes,
    /// Input path starts with the target path
    TargetPathPrefix,
    /// Input path contains the target path
    TargetPathContains,
    /// Input path ends with the target path
    TargetPathSuffix,
    /// Input path equals the target path
    TargetPathEquals,
    /// Always true
    Pass,
    /// Always false
    Fail,
    /// Stores a tag value; compares like equality
    IdentityValue,
}

impl Comparator {
    /// Stable name used in logs and concealed output
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::EqualTo => "EqualTo",
            Comparator::StrictEqualTo => "StrictEqualTo",
            Comparator::GreaterThan => "GreaterThan",
            Comparator::LessThan => "LessThan",
            Comparator::TargetContains => "TargetContains",
            Comparator::TargetIn => "TargetIn",
            Comparator::TargetPrefixes => "TargetPrefixes",
            Comparator::TargetSuffixes => "TargetSuffixes",
            Comparator::TargetPathPrefix => "TargetPathPrefix",
            Comparator::TargetPathContains => "TargetPathContains",
            Comparator::TargetPathSuffix => "TargetPathSuffix",
            Comparator::TargetPathEquals => "TargetPathEquals",
            Comparator::Pass => "Pass",
            Comparator::Fail => "Fail",
            Comparator::IdentityValue => "IdentityValue",
        }
    }

    fn is_path(&self) -> bool {
        matches!(
            self,
            Comparator::TargetPathPrefix
                | Comparator::TargetPathContains
                | Comparator::TargetPathSuffix
                | Comparator::TargetPathEquals
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Comparison applied between target and input
    pub comparator: Comparator,
    /// Target values, any of which may satisfy the comparator
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Flip the comparison result
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
}

impl Filter {
    /// Build a filter from any comparator
    pub fn new<I, S>(comparator: Comparator, targets: I, negate: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            comparator,
            targets: targets.into_iter().map(|t| t.as_ref().to_string()).collect(),
            negate,
        }
    }

    /// Individual target values
    pub fn targets(&self) -> Vec<&str> {
        self.targets.iter().map(String::as_str).collect()
    }

    /// First target value, or an empty string for target-less filters
    pub fn first_target(&self) -> &str {
        self.targets.first().map(String::as_str).unwrap_or("")
    }

    /// Targets in the form the comparator actually compares against
    pub fn normalized_targets(&self) -> Vec<String> {
        let targets = self.targets().into_iter();
        match self.comparator {
            Comparator::StrictEqualTo => targets.map(str::to_string).collect(),
            c if c.is_path() => targets.map(normalize_path).collect(),
            _ => targets.map(normalize).collect(),
        }
    }

    /// True if the filter always passes, ignoring negation
    pub fn is_pass(&self) -> bool {
        self.comparator == Comparator::Pass
    }

    /// True if the filter always fails, ignoring negation
    pub fn is_fail(&self) -> bool {
        self.comparator == Comparator::Fail
    }

    /// Compare the filter against a single input
    pub fn compare(&self, input: &str) -> bool {
        let result = match self.comparator {
            Comparator::Pass => true,
            Comparator::Fail => false,
            Comparator::StrictEqualTo => self.targets().iter().any(|t| *t == input),
            c if c.is_path() => {
                let input = normalize_path(input);
                self.normalized_targets()
                    .iter()
                    .any(|t| compare_normalized(c, t, &input))
            }
            c => {
                let input = normalize(input);
                self.normalized_targets()
                    .iter()
                    .any(|t| compare_normalized(c, t, &input))
            }
        };

        result != self.negate
    }

    /// True if any input satisfies the filter
    pub fn compare_any<I, S>(&self, inputs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs.into_iter().any(|i| self.compare(i.as_ref()))
    }

    fn label(&self) -> String {
        if self.negate {
            format!("Not{}", self.comparator)
        } else {
            self.comparator.to_string()
        }
    }

    /// Render the filter with every target value masked
    pub fn conceal(&self) -> String {
        if self.is_pass() || self.is_fail() {
            return self.label();
        }

        let masked = self
            .targets()
            .into_iter()
            .map(|t| if t == WILDCARD { WILDCARD } else { CONCEALED })
            .collect::<Vec<_>>()
            .join(",");

        format!("{}:{}", self.label(), masked)
    }

    /// Render the filter with target values in the clear
    pub fn plain_string(&self) -> String {
        if self.is_pass() || self.is_fail() {
            return self.label();
        }

        format!("{}:{}", self.label(), self.targets.join(","))
    }
}

/// Filters print concealed so targets never reach logs
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.conceal())
    }
}

fn compare_normalized(comparator: Comparator, target: &str, input: &str) -> bool {
    match comparator {
        Comparator::EqualTo | Comparator::IdentityValue | Comparator::TargetPathEquals => {
            target == input
        }
        Comparator::GreaterThan => target > input,
        Comparator::LessThan => target < input,
        Comparator::TargetContains => target.contains(input),
        Comparator::TargetIn | Comparator::TargetPathContains => input.contains(target),
        Comparator::TargetPrefixes | Comparator::TargetPathPrefix => input.starts_with(target),
        Comparator::TargetSuffixes | Comparator::TargetPathSuffix => input.ends_with(target),
        Comparator::StrictEqualTo => target == input,
        Comparator::Pass => true,
        Comparator::Fail => false,
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Lower-case a path and wrap its elements as `/a/b/`
///
/// Leading, trailing and doubled separators are ignored so that `fA`,
/// `/fA` and `fA/` all normalize to `/fa/`.
pub fn normalize_path(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let elems: Vec<&str> = lowered.split('/').filter(|e| !e.is_empty()).collect();
    if elems.is_empty() {
        return "/".to_string();
    }
    format!("/{}/", elems.join("/"))
}

/// Case-insensitive equality with any target
pub fn equal<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::EqualTo, targets, false)
}

/// Negated [`equal`]
pub fn not_equal<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::EqualTo, targets, true)
}

/// Case-sensitive equality with any target
pub fn strict_equal<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::StrictEqualTo, targets, false)
}

/// Negated [`strict_equal`]
pub fn not_strict_equal<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::StrictEqualTo, targets, true)
}

/// Passes inputs that are smaller than a target
pub fn greater<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::GreaterThan, targets, false)
}

/// Negated [`greater`]
pub fn not_greater<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::GreaterThan, targets, true)
}

/// Passes inputs that are larger than a target
pub fn less<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::LessThan, targets, false)
}

/// Negated [`less`]
pub fn not_less<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::LessThan, targets, true)
}

/// Passes inputs that are substrings of a target
pub fn contains<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetContains, targets, false)
}

/// Negated [`contains`]
pub fn not_contains<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetContains, targets, true)
}

/// Passes inputs that contain a target as a substring
pub fn target_in<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetIn, targets, false)
}

/// Negated [`target_in`]
pub fn not_target_in<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetIn, targets, true)
}

/// Passes inputs starting with a target
pub fn prefix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPrefixes, targets, false)
}

/// Negated [`prefix`]
pub fn not_prefix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPrefixes, targets, true)
}

/// Passes inputs ending with a target
pub fn suffix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetSuffixes, targets, false)
}

/// Negated [`suffix`]
pub fn not_suffix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetSuffixes, targets, true)
}

/// Passes paths whose leading elements equal a target path
pub fn path_prefix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathPrefix, targets, false)
}

/// Negated [`path_prefix`]
pub fn not_path_prefix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathPrefix, targets, true)
}

/// Passes paths containing a target path as a run of whole elements
pub fn path_contains<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathContains, targets, false)
}

/// Negated [`path_contains`]
pub fn not_path_contains<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathContains, targets, true)
}

/// Passes paths whose trailing elements equal a target path
pub fn path_suffix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathSuffix, targets, false)
}

/// Negated [`path_suffix`]
pub fn not_path_suffix<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathSuffix, targets, true)
}

/// Passes paths equal to a target path
pub fn path_equals<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathEquals, targets, false)
}

/// Negated [`path_equals`]
pub fn not_path_equals<I: IntoIterator<Item = S>, S: AsRef<str>>(targets: I) -> Filter {
    Filter::new(Comparator::TargetPathEquals, targets, true)
}

/// Always passes
pub fn pass() -> Filter {
    Filter::new(Comparator::Pass, std::iter::empty::<&str>(), false)
}

/// Always fails
pub fn fail() -> Filter {
    Filter::new(Comparator::Fail, std::iter::empty::<&str>(), false)
}

/// Tag value; compares like [`equal`]
pub fn identity(id: &str) -> Filter {
    Filter::new(Comparator::IdentityValue, [id], false)
}
