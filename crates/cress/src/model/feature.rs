//! Features and scenarios.

use cress_patterns::{KeywordField, Language};

use super::{DataTable, SourceLocation, Step, TableRow};

/// A scenario or scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub(crate) name: String,
    pub(crate) tags: Vec<String>,
    pub(crate) steps: Vec<Step>,
    pub(crate) examples: Option<DataTable>,
    pub(crate) is_outline: bool,
    pub(crate) location: SourceLocation,
}

impl Scenario {
    /// Scenario name as written after the keyword.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved tags: the scenario's own, followed by its feature's.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Step templates in source order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Example table, when the body declared one.
    #[must_use]
    pub fn examples(&self) -> Option<&DataTable> {
        self.examples.as_ref()
    }

    /// Return `true` when the header used an outline keyword.
    #[must_use]
    pub const fn is_outline(&self) -> bool {
        self.is_outline
    }

    /// Where the header was written.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Example rows that each produce a concrete run.
    ///
    /// Empty when there is no table or the table has only a header, in which
    /// case the scenario runs once with its literal steps.
    pub fn example_rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.examples.iter().flat_map(DataTable::hashes)
    }

    /// Return `true` when the scenario expands into one run per example row.
    #[must_use]
    pub fn is_parameterised(&self) -> bool {
        self.examples.as_ref().is_some_and(|table| !table.is_empty())
    }

    /// Header line as it would be written in `language`.
    #[must_use]
    pub fn heading(&self, language: &Language) -> String {
        let field = if self.is_outline {
            KeywordField::ScenarioOutline
        } else {
            KeywordField::Scenario
        };
        format!("{}: {}", language.first_of(field), self.name)
    }
}

/// A parsed feature document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub(crate) name: String,
    pub(crate) language: &'static Language,
    pub(crate) tags: Vec<String>,
    pub(crate) description: String,
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) location: SourceLocation,
}

impl Feature {
    /// Feature name as written after the keyword.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locale the document was parsed with.
    #[must_use]
    pub fn language(&self) -> &'static Language {
        self.language
    }

    /// Tags declared above the feature header.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Free text between the header and the first scenario.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Scenarios in source order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Where the feature header was written.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Header line as written in the feature's own locale.
    #[must_use]
    pub fn heading(&self) -> String {
        format!(
            "{}: {}",
            self.language.first_of(KeywordField::Feature),
            self.name
        )
    }
}
