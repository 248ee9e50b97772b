//! Feature document parser.
//!
//! Parsing runs in two passes. The first classifies every line (see
//! [`lines`]); the second assembles the feature header, description,
//! scenarios, steps and example tables from the classified lines. Any
//! structural problem is a [`SyntaxError`] and aborts the parse.

mod lines;
mod steps;

use camino::Utf8Path;
use cress_patterns::Language;

use self::lines::{Keywords, Line, LineKind, classify};
use self::steps::StepGrouper;
use crate::error::{FeatureError, SyntaxError};
use crate::model::{DataTable, Feature, Scenario, SourceLocation};

const ONLY_ONE_FEATURE: &str = "A feature file must contain ONLY ONE feature!";
const FEATURE_NAME_REQUIRED: &str = "Features must have a name that starts with a word letter \
     (not an odd character). e.g: \"Feature: This is my name\"";

/// Parse a feature document.
///
/// The locale is `language` when given, otherwise the one named by a
/// `language: <code>` marker in the text, otherwise English. `path` is
/// recorded in every source location.
///
/// # Errors
/// Returns [`FeatureError::Pattern`] for an unknown locale marker and
/// [`FeatureError::Syntax`] for a malformed document.
///
/// # Examples
/// ```
/// use cress::parse_feature;
///
/// let feature = parse_feature(
///     "@money\nFeature: Wallet\n  Keeps coins\n\n  Scenario: Add\n    Given I have 3 coins\n",
///     None,
///     None,
/// )
/// .expect("valid feature");
/// assert_eq!(feature.name(), "Wallet");
/// assert_eq!(feature.description(), "Keeps coins");
/// assert_eq!(feature.scenarios()[0].tags(), ["money"]);
/// ```
pub fn parse_feature(
    text: &str,
    path: Option<&Utf8Path>,
    language: Option<&'static Language>,
) -> Result<Feature, FeatureError> {
    let language = match language {
        Some(language) => language,
        None => Language::guess_from_str(text)?,
    };
    let keywords = Keywords::for_language(language).map_err(cress_patterns::PatternError::from)?;
    let lines = classify(text, &keywords).map_err(|err| err.in_file(path.map(Utf8Path::to_path_buf)))?;
    Ok(FeatureAssembler::new(path, language).assemble(&lines)?)
}

/// Parse free-standing step text, as used when one step delegates to others.
///
/// Lines are grouped exactly as inside a scenario; headers are rejected.
///
/// # Errors
/// Returns a [`SyntaxError`] for orphan table rows or multiline blocks,
/// unterminated blocks, duplicate table keys, or header lines.
pub fn parse_steps(
    text: &str,
    path: Option<&Utf8Path>,
) -> Result<Vec<crate::model::Step>, SyntaxError> {
    let keywords = Keywords::for_language(&Language::ENGLISH)
        .map_err(|err| SyntaxError::new(err.to_string()))?;
    let with_path = |err: SyntaxError| err.in_file(path.map(Utf8Path::to_path_buf));
    let lines = classify(text, &keywords).map_err(with_path)?;
    let mut grouper = StepGrouper::new(path, "step text");
    let mut pending_tags = Vec::new();
    for line in &lines {
        match &line.kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Tags(tags) => pending_tags.extend(tags.iter().cloned()),
            LineKind::Text(sentence) => {
                grouper.sentence(sentence.clone(), line.number, std::mem::take(&mut pending_tags))?;
            }
            LineKind::TableRow(cells) => grouper.table_row(cells.clone(), line.number)?,
            LineKind::MultilineOpen => grouper.open_multiline(line.raw, line.number)?,
            LineKind::MultilineText => grouper.multiline_text(line.raw),
            LineKind::MultilineClose => grouper.close_multiline(line.raw),
            LineKind::Feature(_) | LineKind::Scenario { .. } | LineKind::Examples => {
                return Err(with_path(
                    SyntaxError::new("headers are not allowed in step text").at_line(line.number),
                ));
            }
        }
    }
    grouper.finish()
}

struct ScenarioAssembler<'p> {
    name: String,
    is_outline: bool,
    tags: Vec<String>,
    location: SourceLocation,
    steps: StepGrouper<'p>,
    in_examples: bool,
    example_rows: Vec<Vec<String>>,
    first_example_line: Option<usize>,
}

impl ScenarioAssembler<'_> {
    fn finish(self, path: Option<&Utf8Path>) -> Result<Scenario, SyntaxError> {
        let steps = self.steps.finish()?;
        let examples = DataTable::from_rows(self.example_rows).map_err(|err| {
            SyntaxError::new(err.to_string())
                .at_line(self.first_example_line.unwrap_or(self.location.line))
                .in_file(path.map(Utf8Path::to_path_buf))
        })?;
        Ok(Scenario {
            name: self.name,
            tags: self.tags,
            steps,
            examples,
            is_outline: self.is_outline,
            location: self.location,
        })
    }
}

struct FeatureAssembler<'p> {
    path: Option<&'p Utf8Path>,
    language: &'static Language,
}

impl<'p> FeatureAssembler<'p> {
    fn new(path: Option<&'p Utf8Path>, language: &'static Language) -> Self {
        Self { path, language }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message)
            .at_line(line)
            .in_file(self.path.map(Utf8Path::to_path_buf))
    }

    fn assemble(&self, lines: &[Line<'_>]) -> Result<Feature, SyntaxError> {
        let (header_idx, name) = self.locate_header(lines)?;
        let header_line = lines.get(header_idx).map_or(1, |line| line.number);

        let feature_tags: Vec<String> = lines
            .iter()
            .take(header_idx)
            .filter_map(|line| match &line.kind {
                LineKind::Tags(tags) => Some(tags.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect();

        let mut description = Vec::new();
        let mut pending_tags: Vec<String> = Vec::new();
        let mut scenarios = Vec::new();
        let mut current: Option<ScenarioAssembler<'p>> = None;

        for line in lines.iter().skip(header_idx + 1) {
            match &line.kind {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Tags(tags) => pending_tags.extend(tags.iter().cloned()),
                LineKind::Feature(_) => return Err(self.error(line.number, ONLY_ONE_FEATURE)),
                LineKind::Scenario { outline, name } => {
                    if let Some(done) = current.take() {
                        scenarios.push(done.finish(self.path)?);
                    }
                    let mut tags = std::mem::take(&mut pending_tags);
                    tags.extend(feature_tags.iter().cloned());
                    current = Some(ScenarioAssembler {
                        name: name.clone(),
                        is_outline: *outline,
                        tags,
                        location: SourceLocation::in_file(self.path, line.number),
                        steps: StepGrouper::new(self.path, format!("scenario \"{name}\"")),
                        in_examples: false,
                        example_rows: Vec::new(),
                        first_example_line: None,
                    });
                }
                kind => match current.as_mut() {
                    None => match kind {
                        LineKind::Text(text) => description.push(text.clone()),
                        _ => description.push(line.raw.trim().to_string()),
                    },
                    Some(scenario) => self.scenario_line(scenario, line, &mut pending_tags)?,
                },
            }
        }
        if let Some(done) = current.take() {
            scenarios.push(done.finish(self.path)?);
        }

        Ok(Feature {
            name,
            language: self.language,
            tags: feature_tags,
            description: description.join("\n"),
            scenarios,
            location: SourceLocation::in_file(self.path, header_line),
        })
    }

    /// Find the single feature header and validate its name.
    fn locate_header(&self, lines: &[Line<'_>]) -> Result<(usize, String), SyntaxError> {
        let mut headers = lines.iter().enumerate().filter_map(|(idx, line)| match &line.kind {
            LineKind::Feature(name) => Some((idx, line.number, name)),
            _ => None,
        });
        let Some((idx, number, name)) = headers.next() else {
            return Err(
                SyntaxError::new(FEATURE_NAME_REQUIRED).in_file(self.path.map(Utf8Path::to_path_buf))
            );
        };
        if let Some((_, second, _)) = headers.next() {
            return Err(self.error(second, ONLY_ONE_FEATURE));
        }
        if !name.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return Err(self.error(number, FEATURE_NAME_REQUIRED));
        }
        Ok((idx, name.clone()))
    }

    fn scenario_line(
        &self,
        scenario: &mut ScenarioAssembler<'p>,
        line: &Line<'_>,
        pending_tags: &mut Vec<String>,
    ) -> Result<(), SyntaxError> {
        match &line.kind {
            LineKind::Examples => {
                scenario.in_examples = true;
                Ok(())
            }
            LineKind::TableRow(cells) if scenario.in_examples => {
                scenario.first_example_line.get_or_insert(line.number);
                scenario.example_rows.push(cells.clone());
                Ok(())
            }
            _ if scenario.in_examples => {
                log::debug!(
                    "ignoring line {} in the examples of scenario \"{}\"",
                    line.number,
                    scenario.name
                );
                Ok(())
            }
            LineKind::Text(sentence) => scenario.steps.sentence(
                sentence.clone(),
                line.number,
                std::mem::take(pending_tags),
            ),
            LineKind::TableRow(cells) => scenario.steps.table_row(cells.clone(), line.number),
            LineKind::MultilineOpen => scenario.steps.open_multiline(line.raw, line.number),
            LineKind::MultilineText => {
                scenario.steps.multiline_text(line.raw);
                Ok(())
            }
            LineKind::MultilineClose => {
                scenario.steps.close_multiline(line.raw);
                Ok(())
            }
            LineKind::Blank
            | LineKind::Comment
            | LineKind::Tags(_)
            | LineKind::Feature(_)
            | LineKind::Scenario { .. } => Ok(()),
        }
    }
}
