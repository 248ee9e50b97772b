//! Error types for loading documents and driving a run.
//!
//! Step-level failures live in [`crate::execution`]; everything here is fatal
//! to the operation that raised it.

use std::fmt;

use camino::Utf8PathBuf;
use cress_patterns::PatternError;
use thiserror::Error;

/// A malformed feature document.
///
/// Syntax errors are never recovered: the whole run stops at the first one.
///
/// # Examples
/// ```
/// use cress::SyntaxError;
///
/// let err = SyntaxError::new("unterminated multiline block").at_line(4);
/// assert_eq!(err.to_string(), "<string>:4: unterminated multiline block");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Source path, when the document was loaded from a file.
    pub path: Option<Utf8PathBuf>,
    /// 1-based line where the problem was detected.
    pub line: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl SyntaxError {
    /// Create an error with no location attached.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            line: None,
            message: message.into(),
        }
    }

    /// Attach a 1-based line number.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach the source path.
    #[must_use]
    pub fn in_file(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.path = path;
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.as_ref().map_or("<string>", |p| p.as_str());
        match self.line {
            Some(line) => write!(f, "{path}:{line}: {}", self.message),
            None => write!(f, "{path}: {}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Errors raised while turning text or files into features.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeatureError {
    /// The document is malformed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The document asked for a locale, or contained text, the helpers reject.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// A feature file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Read {
        /// The file being read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// A directory walk failed.
    #[error("failed to walk `{path}`: {source}")]
    Walk {
        /// The root being walked.
        path: Utf8PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },
    /// A discovered path was not valid UTF-8.
    #[error("feature path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),
}

/// A step definition could not be registered.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The pattern is not a valid regular expression.
    #[error("invalid step pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern text as supplied.
        pattern: String,
        /// Compilation error.
        source: regex::Error,
    },
}

/// Failures of a durable summary store.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the store failed.
    #[error("summary I/O failed for `{path}`: {source}")]
    Io {
        /// Store location.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The stored summary could not be encoded or decoded.
    #[error("summary encoding failed for `{path}`: {source}")]
    Encoding {
        /// Store location.
        path: Utf8PathBuf,
        /// The underlying serialisation error.
        source: serde_json::Error,
    },
}

/// Errors raised by the run controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Failed-only mode needs a previous summary to consult.
    #[error("failed-only mode requires a result persister")]
    MissingPersister,
    /// The persister failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The tag filter could not be parsed.
    #[error(transparent)]
    TagFilter(#[from] PatternError),
}

/// Errors that abort a whole invocation.
#[derive(Debug, Error)]
pub enum RunError {
    /// A feature failed to load or parse.
    #[error(transparent)]
    Feature(#[from] FeatureError),
    /// The controller could not read or write summaries.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl From<SyntaxError> for RunError {
    fn from(err: SyntaxError) -> Self {
        Self::Feature(FeatureError::Syntax(err))
    }
}

impl From<PersistError> for RunError {
    fn from(err: PersistError) -> Self {
        Self::Controller(ControllerError::Persist(err))
    }
}

/// An environment variable held a value the runner cannot use.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value `{value}` for {variable}: {expected}")]
pub struct ConfigError {
    /// Variable name.
    pub variable: &'static str,
    /// Raw value found.
    pub value: String,
    /// What was expected instead.
    pub expected: &'static str,
}
