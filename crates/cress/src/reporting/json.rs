//! JSON writer for run results.
//!
//! The report lists every feature with its concrete scenario runs and their
//! step outcomes, followed by the roll-up counts and the deduplicated
//! snippet proposals. Status labels are lowercase snake case.

use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::controller::ScenarioStatus;
use crate::execution::{FailureReason, StepRecord, StepStatus};
use crate::results::{FeatureResult, ScenarioResult, TotalResult};

#[derive(Serialize)]
struct JsonReport<'a> {
    features: Vec<JsonFeature<'a>>,
    totals: JsonTotals,
    snippets: Vec<JsonSnippet<'a>>,
    success: bool,
}

#[derive(Serialize)]
struct JsonFeature<'a> {
    name: &'a str,
    path: Option<&'a str>,
    line: usize,
    passed: bool,
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    id: u64,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<usize>,
    line: usize,
    tags: &'a [String],
    status: &'static str,
    steps: Vec<JsonStep<'a>>,
}

#[derive(Serialize)]
struct JsonStep<'a> {
    sentence: &'a str,
    line: usize,
    status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'a FailureReason>,
}

#[derive(Serialize)]
struct JsonTotals {
    features: usize,
    features_passed: usize,
    scenarios: usize,
    scenarios_passed: usize,
    scenarios_failed: usize,
    scenarios_not_run: usize,
    steps: usize,
    steps_passed: usize,
    steps_failed: usize,
    steps_skipped: usize,
    steps_undefined: usize,
}

#[derive(Serialize)]
struct JsonSnippet<'a> {
    pattern: &'a str,
    signature: String,
}

impl<'a> From<&'a TotalResult> for JsonReport<'a> {
    fn from(totals: &'a TotalResult) -> Self {
        Self {
            features: totals.features.iter().map(JsonFeature::from).collect(),
            totals: JsonTotals {
                features: totals.features_ran(),
                features_passed: totals.features_passed(),
                scenarios: totals.scenarios_ran(),
                scenarios_passed: totals.scenarios_passed(),
                scenarios_failed: totals.scenarios_failed(),
                scenarios_not_run: totals.scenarios_not_run(),
                steps: totals.steps(),
                steps_passed: totals.steps_passed(),
                steps_failed: totals.steps_failed(),
                steps_skipped: totals.steps_skipped(),
                steps_undefined: totals.steps_undefined(),
            },
            snippets: totals
                .proposed_definitions()
                .into_iter()
                .map(|proposal| JsonSnippet {
                    pattern: &proposal.pattern,
                    signature: proposal.signature(),
                })
                .collect(),
            success: totals.is_success(),
        }
    }
}

impl<'a> From<&'a FeatureResult> for JsonFeature<'a> {
    fn from(feature: &'a FeatureResult) -> Self {
        Self {
            name: &feature.name,
            path: feature.location.path.as_deref().map(Utf8Path::as_str),
            line: feature.location.line,
            passed: feature.is_passed(),
            scenarios: feature.scenarios.iter().map(JsonScenario::from).collect(),
        }
    }
}

impl<'a> From<&'a ScenarioResult> for JsonScenario<'a> {
    fn from(result: &'a ScenarioResult) -> Self {
        let status = match result.status() {
            ScenarioStatus::Passed => "passed",
            ScenarioStatus::Failed => "failed",
            ScenarioStatus::NotRun => "not_run",
        };
        Self {
            id: result.id.get(),
            name: &result.scenario_name,
            row: result.row_index,
            line: result.location.line,
            tags: &result.tags,
            status,
            steps: result.steps.iter().map(JsonStep::from).collect(),
        }
    }
}

impl<'a> From<&'a StepRecord> for JsonStep<'a> {
    fn from(record: &'a StepRecord) -> Self {
        Self {
            sentence: record.step.sentence(),
            line: record.step.location().line,
            status: record.status,
            definition: record.definition.as_ref().map(ToString::to_string),
            failure: record.failure.as_ref(),
        }
    }
}

/// Serialize `totals` into `writer`.
///
/// # Errors
/// Returns an error when serialization or the write fails.
pub fn write<W: Write>(writer: &mut W, totals: &TotalResult) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(totals))
}

/// Serialize `totals` into a string.
///
/// # Examples
/// ```rust
/// use cress::{TotalResult, reporting::json};
///
/// let text = json::to_string(&TotalResult::default()).expect("serializable");
/// assert!(text.contains("\"success\":true"));
/// ```
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string(totals: &TotalResult) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(totals))
}
