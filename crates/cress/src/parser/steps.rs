//! Step grouping: sentences with their table rows and multiline blocks.

use camino::Utf8Path;

use super::lines::{dedent, indentation};
use crate::error::SyntaxError;
use crate::model::{DataTable, SourceLocation, Step};

struct Multiline {
    indent: usize,
    raw: Vec<String>,
    text: Vec<String>,
}

struct PendingStep {
    sentence: String,
    line: usize,
    tags: Vec<String>,
    rows: Vec<Vec<String>>,
    first_row_line: Option<usize>,
    multiline: Option<Multiline>,
}

/// Accumulates consecutive step lines into [`Step`] values.
pub(super) struct StepGrouper<'p> {
    path: Option<&'p Utf8Path>,
    context: String,
    steps: Vec<Step>,
    current: Option<PendingStep>,
}

impl<'p> StepGrouper<'p> {
    /// `context` names the enclosing block in error messages.
    pub(super) fn new(path: Option<&'p Utf8Path>, context: impl Into<String>) -> Self {
        Self {
            path,
            context: context.into(),
            steps: Vec::new(),
            current: None,
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message)
            .at_line(line)
            .in_file(self.path.map(Utf8Path::to_path_buf))
    }

    fn orphan_error(&self, line: usize, what: &str) -> SyntaxError {
        self.error(
            line,
            format!(
                "invalid step in {}: a {what} must follow a step sentence",
                self.context
            ),
        )
    }

    /// Start a new step, closing the previous one.
    pub(super) fn sentence(
        &mut self,
        sentence: String,
        line: usize,
        tags: Vec<String>,
    ) -> Result<(), SyntaxError> {
        self.flush()?;
        self.current = Some(PendingStep {
            sentence,
            line,
            tags,
            rows: Vec::new(),
            first_row_line: None,
            multiline: None,
        });
        Ok(())
    }

    /// Append a table row to the current step.
    pub(super) fn table_row(&mut self, cells: Vec<String>, line: usize) -> Result<(), SyntaxError> {
        if self.current.is_none() {
            return Err(self.orphan_error(line, "table row"));
        }
        if let Some(current) = self.current.as_mut() {
            current.first_row_line.get_or_insert(line);
            current.rows.push(cells);
        }
        Ok(())
    }

    /// Open a multiline block on the current step.
    ///
    /// A further block on the same step continues the first one: its lines
    /// are appended, each block de-indented against its own opening line.
    pub(super) fn open_multiline(&mut self, raw: &str, line: usize) -> Result<(), SyntaxError> {
        let Some(current) = self.current.as_mut() else {
            return Err(self.orphan_error(line, "multiline block"));
        };
        let indent = indentation(raw);
        match current.multiline.as_mut() {
            Some(block) => {
                block.indent = indent;
                block.raw.push(raw.to_string());
            }
            None => {
                current.multiline = Some(Multiline {
                    indent,
                    raw: vec![raw.to_string()],
                    text: Vec::new(),
                });
            }
        }
        Ok(())
    }

    /// Add a line inside the open multiline block.
    pub(super) fn multiline_text(&mut self, raw: &str) {
        if let Some(block) = self.current.as_mut().and_then(|c| c.multiline.as_mut()) {
            block.raw.push(raw.to_string());
            block.text.push(dedent(raw, block.indent).to_string());
        }
    }

    /// Close the open multiline block.
    pub(super) fn close_multiline(&mut self, raw: &str) {
        if let Some(block) = self.current.as_mut().and_then(|c| c.multiline.as_mut()) {
            block.raw.push(raw.to_string());
        }
    }

    fn flush(&mut self) -> Result<(), SyntaxError> {
        let Some(pending) = self.current.take() else {
            return Ok(());
        };
        let table_line = pending.first_row_line.unwrap_or(pending.line);
        let table = DataTable::from_rows(pending.rows)
            .map_err(|err| self.error(table_line, err.to_string()))?;
        let location = SourceLocation::in_file(self.path, pending.line);
        let mut step = Step::new(pending.sentence, location)
            .with_table(table)
            .with_tags(pending.tags);
        if let Some(block) = pending.multiline {
            step = step.with_multiline(block.raw, block.text.join("\n"));
        }
        self.steps.push(step);
        Ok(())
    }

    /// Close the last step and return all of them.
    pub(super) fn finish(mut self) -> Result<Vec<Step>, SyntaxError> {
        self.flush()?;
        Ok(self.steps)
    }
}
