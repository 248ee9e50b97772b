//! Step templates.

use cress_patterns::{SnippetProposal, substitute_placeholders};

use super::{DataTable, SourceLocation};

/// One step sentence with its optional table and multiline block.
///
/// Steps are templates: they never carry run outcomes. The snippet proposal
/// is derived once from the literal sentence, so every concrete copy made
/// for an outline row shares the template's proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    sentence: String,
    table: Option<DataTable>,
    multiline: Option<String>,
    raw_multiline: Vec<String>,
    tags: Vec<String>,
    location: SourceLocation,
    proposal: SnippetProposal,
}

impl Step {
    /// Create a bare step from its sentence.
    #[must_use]
    pub fn new(sentence: impl Into<String>, location: SourceLocation) -> Self {
        let sentence = sentence.into();
        let proposal = SnippetProposal::from_sentence(&sentence);
        Self {
            sentence,
            table: None,
            multiline: None,
            raw_multiline: Vec::new(),
            tags: Vec::new(),
            location,
            proposal,
        }
    }

    /// Attach a data table.
    #[must_use]
    pub fn with_table(mut self, table: Option<DataTable>) -> Self {
        self.table = table;
        self
    }

    /// Attach a multiline block: the captured lines including delimiters,
    /// and the de-indented text between them.
    #[must_use]
    pub fn with_multiline(mut self, raw: Vec<String>, text: String) -> Self {
        self.raw_multiline = raw;
        self.multiline = Some(text);
        self
    }

    /// Attach tags declared directly above the step.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Build a fresh concrete step for one outline row.
    ///
    /// `<column>` tokens are replaced in the sentence, in every table cell and
    /// in the multiline text. The proposal and location stay those of the
    /// template.
    #[must_use]
    pub fn with_substitutions(&self, row: &[(String, String)]) -> Self {
        Self {
            sentence: substitute_placeholders(&self.sentence, row),
            table: self.table.as_ref().map(|table| table.with_substitutions(row)),
            multiline: self
                .multiline
                .as_deref()
                .map(|text| substitute_placeholders(text, row)),
            raw_multiline: self
                .raw_multiline
                .iter()
                .map(|line| substitute_placeholders(line, row))
                .collect(),
            tags: self.tags.clone(),
            location: self.location.clone(),
            proposal: self.proposal.clone(),
        }
    }

    /// The step sentence, including its leading keyword.
    #[must_use]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// Attached data table, if any.
    #[must_use]
    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    /// De-indented multiline text, if any.
    #[must_use]
    pub fn multiline(&self) -> Option<&str> {
        self.multiline.as_deref()
    }

    /// Multiline lines exactly as captured, delimiters included.
    #[must_use]
    pub fn raw_multiline(&self) -> &[String] {
        &self.raw_multiline
    }

    /// Tags declared on the step.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Where the step was written.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Suggested definition for this step's literal sentence.
    #[must_use]
    pub fn proposal(&self) -> &SnippetProposal {
        &self.proposal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn substitution_builds_independent_copy() {
        let table = DataTable::from_rows(vec![vec!["item".into()], vec!["<fruit>".into()]])
            .ok()
            .flatten();
        let template = Step::new("Given I buy <count> <fruit>", SourceLocation::line(7))
            .with_table(table)
            .with_multiline(
                vec!["\"\"\"".into(), "a <fruit>".into(), "\"\"\"".into()],
                "a <fruit>".into(),
            );

        let concrete = template.with_substitutions(&row(&[("count", "2"), ("fruit", "kiwis")]));

        assert_eq!(concrete.sentence(), "Given I buy 2 kiwis");
        assert_eq!(
            concrete.table().and_then(|t| t.values_under("item")),
            Some(vec!["kiwis"])
        );
        assert_eq!(concrete.multiline(), Some("a kiwis"));
        assert_eq!(template.sentence(), "Given I buy <count> <fruit>");
        assert_eq!(concrete.proposal().pattern, "Given I buy <count> <fruit>");
        assert_eq!(concrete.location().line, 7);
    }
}
