//! Immutable document tree: features, scenarios, steps and tables.
//!
//! The parser builds these once; running never mutates them. Outcomes are
//! stored in separate records (see [`crate::results`]).

mod feature;
mod step;
mod table;

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

pub use feature::{Feature, Scenario};
pub use step::Step;
pub use table::{DataTable, TableRow};

/// Source path and 1-based line of a parsed element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// File the element came from; `None` for documents parsed from strings.
    pub path: Option<Utf8PathBuf>,
    /// 1-based line number.
    pub line: usize,
}

impl SourceLocation {
    /// Location in an unnamed document.
    #[must_use]
    pub const fn line(line: usize) -> Self {
        Self { path: None, line }
    }

    /// Location in a named file.
    #[must_use]
    pub fn in_file(path: Option<&Utf8Path>, line: usize) -> Self {
        Self {
            path: path.map(Utf8Path::to_path_buf),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}:{}", self.line),
            None => write!(f, "<string>:{}", self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_path_and_line() {
        let named = SourceLocation::in_file(Some(Utf8Path::new("a.feature")), 3);
        assert_eq!(named.to_string(), "a.feature:3");
        assert_eq!(SourceLocation::line(9).to_string(), "<string>:9");
    }
}
