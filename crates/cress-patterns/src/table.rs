//! Pipe-delimited table rows.
//!
//! Cells are separated by unescaped `|` characters. A literal pipe inside a
//! cell is written as `\|`; every other backslash is kept verbatim.

/// Return `true` when `line` is a table row, i.e. starts with `|` once
/// leading whitespace is removed.
#[must_use]
pub fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Split a table row into trimmed, unescaped cell values.
///
/// Text before the first pipe is ignored, as is a blank segment after the
/// closing pipe. A row with no closing pipe keeps its final segment.
///
/// # Examples
/// ```
/// use cress_patterns::split_row;
///
/// assert_eq!(split_row("| a | b \\| c |"), vec!["a", "b | c"]);
/// assert_eq!(split_row("|  |x|"), vec!["", "x"]);
/// ```
#[must_use]
pub fn split_row(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        segments.push(current);
    }
    segments
        .into_iter()
        .skip(1)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Escape pipes in a cell value so it survives [`split_row`].
///
/// # Examples
/// ```
/// use cress_patterns::{escape_cell, split_row};
///
/// let row = format!("| {} |", escape_cell("a|b"));
/// assert_eq!(row, "| a\\|b |");
/// assert_eq!(split_row(&row), vec!["a|b"]);
/// ```
#[must_use]
pub fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Render a header and rows as aligned pipe-delimited lines.
///
/// Short rows are padded with empty cells. Column widths are measured in
/// characters after escaping.
#[must_use]
pub fn render_table<K, R, C>(keys: &[K], rows: &[R]) -> Vec<String>
where
    K: AsRef<str>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let header: Vec<String> = keys.iter().map(|key| escape_cell(key.as_ref())).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let cells = row.as_ref();
            (0..header.len())
                .map(|idx| cells.get(idx).map_or_else(String::new, |c| escape_cell(c.as_ref())))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|idx| {
            std::iter::once(&header)
                .chain(body.iter())
                .filter_map(|line| line.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    std::iter::once(&header)
        .chain(body.iter())
        .map(|line| render_line(line, &widths))
        .collect()
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        out.push(' ');
        out.push_str(cell);
        out.extend(std::iter::repeat_n(' ', pad));
        out.push_str(" |");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("| name | age |", vec!["name", "age"])]
    #[case("  |a|b|", vec!["a", "b"])]
    #[case("| a | | c |", vec!["a", "", "c"])]
    #[case("| open | ended", vec!["open", "ended"])]
    #[case("| path \\| pipe | C:\\temp |", vec!["path | pipe", "C:\\temp"])]
    #[case("|", vec![])]
    fn splits_rows(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_row(line), expected);
    }

    #[rstest]
    #[case("| a |", true)]
    #[case("   |", true)]
    #[case("Given | a", false)]
    fn detects_table_rows(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_table_row(line), expected);
    }

    #[test]
    fn escaped_cell_round_trips() {
        let value = "left|right";
        let row = format!("| {} | other |", escape_cell(value));
        assert_eq!(split_row(&row), vec![value.to_string(), "other".to_string()]);
    }

    #[test]
    fn renders_aligned_columns() {
        let lines = render_table(&["name", "n"], &[vec!["a|b", "10"], vec!["longer"]]);
        assert_eq!(
            lines,
            vec![
                "| name   | n  |".to_string(),
                "| a\\|b   | 10 |".to_string(),
                "| longer |    |".to_string(),
            ]
        );
    }
}
