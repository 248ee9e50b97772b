//! Data tables attached to steps and outline examples.

use cress_patterns::{PatternError, render_table, substitute_placeholders};

/// A table whose first row supplies the column keys.
///
/// Every data row holds exactly one value per key: short rows are padded
/// with empty strings when the table is built.
///
/// # Examples
/// ```
/// use cress::DataTable;
///
/// let table = DataTable::from_rows(vec![
///     vec!["name".into(), "age".into()],
///     vec!["Ana".into(), "31".into()],
///     vec!["Rui".into()],
/// ])
/// .expect("unique keys")
/// .expect("non-empty");
/// assert_eq!(table.values_under("age"), Some(vec!["31", ""]));
/// assert_eq!(table.first().and_then(|row| row.get("name")), Some("Ana"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    keys: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one data row, keyed by the table's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow<'a> {
    keys: &'a [String],
    values: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Look up the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.keys
            .iter()
            .position(|candidate| candidate == key)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Collect the row as owned `(key, value)` pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl DataTable {
    /// Build a table from raw rows, the first being the header.
    ///
    /// Returns `Ok(None)` for an empty row list. Rows longer than the header
    /// are truncated with a warning.
    ///
    /// # Errors
    /// Returns [`PatternError::DuplicateColumn`] when the header repeats a key.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Option<Self>, PatternError> {
        let mut rows = rows.into_iter();
        let Some(keys) = rows.next() else {
            return Ok(None);
        };
        for (idx, key) in keys.iter().enumerate() {
            if keys.iter().take(idx).any(|earlier| earlier == key) {
                return Err(PatternError::DuplicateColumn {
                    column: key.clone(),
                });
            }
        }
        let width = keys.len();
        let rows = rows
            .map(|mut row| {
                if row.len() > width {
                    log::warn!(
                        "table row has {} cells but only {width} columns; extra cells dropped",
                        row.len()
                    );
                }
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Some(Self { keys, rows }))
    }

    /// Column keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of data rows (the header is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when the table has a header but no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over data rows as keyed views.
    pub fn hashes(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|values| TableRow {
            keys: &self.keys,
            values,
        })
    }

    /// Fetch the data row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        self.rows.get(index).map(|values| TableRow {
            keys: &self.keys,
            values,
        })
    }

    /// First data row.
    #[must_use]
    pub fn first(&self) -> Option<TableRow<'_>> {
        self.row(0)
    }

    /// Last data row.
    #[must_use]
    pub fn last(&self) -> Option<TableRow<'_>> {
        self.rows.len().checked_sub(1).and_then(|idx| self.row(idx))
    }

    /// Every value in column `key`, or `None` for an unknown key.
    #[must_use]
    pub fn values_under(&self, key: &str) -> Option<Vec<&str>> {
        let idx = self.keys.iter().position(|candidate| candidate == key)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx).map(String::as_str))
                .collect(),
        )
    }

    /// Copy the table with `<column>` tokens replaced in every data cell.
    #[must_use]
    pub fn with_substitutions(&self, row: &[(String, String)]) -> Self {
        Self {
            keys: self.keys.clone(),
            rows: self
                .rows
                .iter()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| substitute_placeholders(cell, row))
                        .collect()
                })
                .collect(),
        }
    }

    /// Render as aligned pipe rows, header first, escaping `|` in cells.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        render_table(&self.keys, &self.rows)
    }
}
