//! Error types for the selection engine
//!
//! Every fallible operation in the crate returns [`SelectorError`]. Path
//! parsing, selector casting and destination mapping all surface typed
//! variants so that callers can tell a wiring bug (casting a selector to the
//! wrong domain) apart from malformed input (an unescaped separator in a
//! user-typed folder).

use thiserror::Error;

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SelectorError>;

/// Main error type for path, filter and selector operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// A generic selector was coerced into the wrong domain wrapper
    #[error("wrong selector service type: {found} is not {expected}")]
    BadSelectorCast {
        /// Service the caller asked for
        expected: String,
        /// Service the selector actually holds
        found: String,
    },

    /// The selector carries a service tag no domain handles
    #[error("unrecognized service: {0}")]
    UnrecognizedService(String),

    /// No entries survived a reduction that required at least one
    #[error("no items match the provided selectors")]
    NoMatchingItems,

    /// An escape character preceded something other than `/` or `\`
    #[error("bad escape sequence in path element: {0}")]
    BadEscapeSequence(String),

    /// A raw `/` or `\` appeared without a preceding escape
    #[error("unescaped separator in path element: {0}")]
    UnescapedSeparator(String),

    /// The element ended in the middle of an escape sequence
    #[error("trailing escape character in path element: {0}")]
    TrailingEscapeCharacter(String),

    /// A resource path could not be built or parsed
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Unknown service string in a resource path
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// Unknown or mismatched category string in a resource path
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A restore destination was declared twice for one category
    #[error("destination is already declared for category {0}")]
    ExistingDestination(String),

    /// The entry lacks the info payload the category needs
    #[error("missing item info: {0}")]
    MissingItemInfo(String),

    /// The categorizer cannot produce path values for this category
    #[error("unrecognized category: {0}")]
    UnrecognizedCategory(String),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(String),

    /// I/O errors while reading selector or catalog documents
    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for SelectorError {
    fn from(err: serde_json::Error) -> Self {
        SelectorError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SelectorError {
    fn from(err: std::io::Error) -> Self {
        SelectorError::Io(err.to_string())
    }
}

impl SelectorError {
    /// Create a selector cast error from the expected and actual services
    pub fn bad_cast(expected: impl ToString, found: impl ToString) -> Self {
        SelectorError::BadSelectorCast {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create an invalid path error with a custom message
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        SelectorError::InvalidPath(msg.into())
    }

    /// Create a missing item info error with a custom message
    pub fn missing_info(msg: impl Into<String>) -> Self {
        SelectorError::MissingItemInfo(msg.into())
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors describe a single bad input (one entry, one path
    /// element, one cast). Reduce records them and keeps going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SelectorError::Io(_) | SelectorError::Json(_))
    }

    /// Check if this error came from path validation
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            SelectorError::BadEscapeSequence(_)
                | SelectorError::UnescapedSeparator(_)
                | SelectorError::TrailingEscapeCharacter(_)
                | SelectorError::InvalidPath(_)
                | SelectorError::UnknownService(_)
                | SelectorError::UnknownCategory(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            SelectorError::BadSelectorCast { expected, found } => {
                format!(
                    "Selector holds {} scopes but was used as {}. \
                     Build the selector with the {} constructors instead.",
                    found, expected, expected
                )
            }
            SelectorError::UnescapedSeparator(elem) => {
                format!(
                    "Path element {:?} contains a raw '/' or '\\'. Escape it with a leading '\\'.",
                    elem
                )
            }
            SelectorError::ExistingDestination(cat) => {
                format!(
                    "A restore destination for {} was already set. Declare each destination once.",
                    cat
                )
            }
            _ => self.to_string(),
        }
    }
}
