//! Error types shared by the text-level helpers.

use thiserror::Error;

/// Errors surfaced while interpreting tables, tag filters, and patterns.
///
/// # Examples
/// ```
/// use cress_patterns::PatternError;
/// let err = PatternError::DuplicateColumn { column: "name".into() };
/// assert_eq!(err.to_string(), "duplicate table column `name`");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A table header row declared the same column twice.
    #[error("duplicate table column `{column}`")]
    DuplicateColumn {
        /// The repeated column key.
        column: String,
    },
    /// A tag filter group contained an empty term, e.g. `@a,,@b`.
    #[error("empty tag term in filter group `{group}`")]
    EmptyTagTerm {
        /// The offending comma-joined group.
        group: String,
    },
    /// A `language:` marker named a locale with no keyword table.
    #[error("unknown language `{code}`")]
    UnknownLanguage {
        /// The locale code found in the document.
        code: String,
    },
    /// A regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}
