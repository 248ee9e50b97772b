//! Scenario outline expansion.

use std::borrow::Cow;

use cress_patterns::has_placeholder;

use crate::model::{Scenario, Step, TableRow};

/// One concrete run of a scenario: the plain scenario, or one outline row.
#[derive(Debug, Clone)]
pub struct ConcreteRun<'a> {
    /// 0-based example row index, for outline rows.
    pub row_index: Option<usize>,
    /// The example row the steps were built from.
    pub row: Option<TableRow<'a>>,
    /// Steps to execute, placeholders already substituted.
    pub steps: Cow<'a, [Step]>,
}

/// Expand `scenario` into its concrete runs.
///
/// A scenario with example rows yields one run per row, in table order,
/// each with fresh steps built by substituting that row's values. Anything
/// else, including an outline whose table has only a header, yields a single
/// run over the template steps.
///
/// # Examples
/// ```
/// use cress::{outline::expand, parse_feature};
///
/// let feature = parse_feature(
///     "Feature: F\n  Scenario Outline: O\n    Given <n> cats\n  Examples:\n    | n |\n    | 1 |\n    | 2 |\n",
///     None,
///     None,
/// )
/// .expect("valid feature");
/// let runs = expand(&feature.scenarios()[0]);
/// let sentences: Vec<_> = runs.iter().map(|run| run.steps[0].sentence()).collect();
/// assert_eq!(sentences, ["Given 1 cats", "Given 2 cats"]);
/// ```
#[must_use]
pub fn expand(scenario: &Scenario) -> Vec<ConcreteRun<'_>> {
    if !scenario.is_parameterised() {
        return vec![ConcreteRun {
            row_index: None,
            row: None,
            steps: Cow::Borrowed(scenario.steps()),
        }];
    }
    scenario
        .example_rows()
        .enumerate()
        .map(|(index, row)| {
            let pairs = row.to_pairs();
            let steps: Vec<Step> = scenario
                .steps()
                .iter()
                .map(|step| step.with_substitutions(&pairs))
                .collect();
            for step in steps.iter().filter(|step| has_placeholder(step.sentence())) {
                log::warn!(
                    "step \"{}\" ({}) keeps a placeholder after substituting example row {}",
                    step.sentence(),
                    step.location(),
                    index + 1
                );
            }
            ConcreteRun {
                row_index: Some(index),
                row: Some(row),
                steps: Cow::Owned(steps),
            }
        })
        .collect()
}
