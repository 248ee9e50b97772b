//! Line classification.
//!
//! Each source line is classified once, tracking whether it sits inside a
//! `"""` multiline block. Inside a block every line is kept verbatim, so
//! comments, tags and pipes there are plain text.

use cress_patterns::{KeywordField, Language, is_table_row, split_row, steal_tags_from_line};
use regex::{Regex, RegexBuilder};

use crate::error::SyntaxError;

const MULTILINE_DELIMITER: &str = "\"\"\"";

/// Header regexes for one locale.
pub(super) struct Keywords {
    feature: Regex,
    outline: Regex,
    scenario: Regex,
    examples: Regex,
}

impl Keywords {
    pub(super) fn for_language(language: &Language) -> Result<Self, regex::Error> {
        Ok(Self {
            feature: header_regex(language, KeywordField::Feature)?,
            outline: header_regex(language, KeywordField::ScenarioOutline)?,
            scenario: header_regex(language, KeywordField::Scenario)?,
            examples: header_regex(language, KeywordField::Examples)?,
        })
    }
}

/// Build `^\s*(?:kw1|kw2)\s*:(.*)$`, longest keyword first, ignoring case.
fn header_regex(language: &Language, field: KeywordField) -> Result<Regex, regex::Error> {
    let mut alternatives: Vec<_> = language.alternatives(field).collect();
    alternatives.sort_by_key(|keyword| std::cmp::Reverse(keyword.len()));
    let joined = alternatives
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"^\s*(?:{joined})\s*:(.*)$"))
        .case_insensitive(true)
        .build()
}

/// What a single line contributes to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LineKind {
    Blank,
    Comment,
    Tags(Vec<String>),
    Feature(String),
    Scenario { outline: bool, name: String },
    Examples,
    TableRow(Vec<String>),
    MultilineOpen,
    MultilineText,
    MultilineClose,
    Text(String),
}

/// A classified line with its 1-based number and original text.
#[derive(Debug, Clone)]
pub(super) struct Line<'a> {
    pub(super) number: usize,
    pub(super) raw: &'a str,
    pub(super) kind: LineKind,
}

/// Classify every line of `text`.
///
/// Fails when a multiline block is still open at the end of the text.
pub(super) fn classify<'a>(text: &'a str, keywords: &Keywords) -> Result<Vec<Line<'a>>, SyntaxError> {
    let mut lines = Vec::new();
    let mut open_block: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let trimmed = raw.trim();
        let kind = if open_block.is_some() {
            if trimmed == MULTILINE_DELIMITER {
                open_block = None;
                LineKind::MultilineClose
            } else {
                LineKind::MultilineText
            }
        } else if trimmed == MULTILINE_DELIMITER {
            open_block = Some(number);
            LineKind::MultilineOpen
        } else {
            classify_plain(trimmed, keywords)
        };
        lines.push(Line { number, raw, kind });
    }

    match open_block {
        Some(opened) => Err(SyntaxError::new("unterminated multiline block").at_line(opened)),
        None => Ok(lines),
    }
}

fn classify_plain(trimmed: &str, keywords: &Keywords) -> LineKind {
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    if is_table_row(trimmed) {
        return LineKind::TableRow(split_row(trimmed));
    }
    if let Some(tags) = steal_tags_from_line(trimmed) {
        return LineKind::Tags(tags);
    }
    if let Some(name) = header_name(&keywords.feature, trimmed) {
        return LineKind::Feature(name);
    }
    if header_name(&keywords.examples, trimmed).is_some() {
        return LineKind::Examples;
    }
    if let Some(name) = header_name(&keywords.outline, trimmed) {
        return LineKind::Scenario {
            outline: true,
            name,
        };
    }
    if let Some(name) = header_name(&keywords.scenario, trimmed) {
        return LineKind::Scenario {
            outline: false,
            name,
        };
    }
    LineKind::Text(trimmed.to_string())
}

fn header_name(regex: &Regex, line: &str) -> Option<String> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().trim().to_string())
}

/// Strip up to `indent` leading whitespace characters from `line`.
pub(super) fn dedent(line: &str, indent: usize) -> &str {
    let strip: usize = line
        .chars()
        .take(indent)
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    line.get(strip..).unwrap_or(line)
}

/// Count leading whitespace characters.
pub(super) fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
