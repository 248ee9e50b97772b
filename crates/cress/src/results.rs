//! Outcome records and their roll-up.
//!
//! Counts roll up bottom-up: steps of one concrete scenario run, then a
//! feature's runs, then the whole invocation.

use cress_patterns::SnippetProposal;

use crate::controller::{ScenarioId, ScenarioStatus};
use crate::execution::{FailureReason, StepRecord, StepStatus};
use crate::model::{Scenario, SourceLocation};

/// Step outcome counts.
///
/// Not-run steps are counted as skipped, so `passed + failed + skipped +
/// undefined` always equals the number of steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    /// Steps that passed.
    pub passed: usize,
    /// Steps that failed.
    pub failed: usize,
    /// Steps skipped after a failure, or not run at all.
    pub skipped: usize,
    /// Steps with no matching definition.
    pub undefined: usize,
}

impl StepCounts {
    /// Count the statuses in `records`.
    #[must_use]
    pub fn of(records: &[StepRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            match record.status {
                StepStatus::Passed => counts.passed += 1,
                StepStatus::Failed => counts.failed += 1,
                StepStatus::Skipped | StepStatus::NotRun => counts.skipped += 1,
                StepStatus::Undefined => counts.undefined += 1,
            }
            counts
        })
    }

    /// Total number of steps.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.undefined
    }

    const fn merged(mut self, other: Self) -> Self {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.undefined += other.undefined;
        self
    }
}

/// Result of one concrete scenario run: a plain scenario or one outline row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    /// Id assigned by the run controller.
    pub id: ScenarioId,
    /// Name of the scenario.
    pub scenario_name: String,
    /// 0-based example row for outline runs.
    pub row_index: Option<usize>,
    /// Resolved scenario tags.
    pub tags: Vec<String>,
    /// Scenario header location.
    pub location: SourceLocation,
    /// Whether the controller excluded the run.
    pub not_run: bool,
    /// Per-step outcomes; empty for excluded runs.
    pub steps: Vec<StepRecord>,
}

impl ScenarioResult {
    /// Result of a run that executed (or visited) its steps.
    #[must_use]
    pub fn ran(
        id: ScenarioId,
        scenario: &Scenario,
        row_index: Option<usize>,
        steps: Vec<StepRecord>,
    ) -> Self {
        Self {
            id,
            scenario_name: scenario.name().to_string(),
            row_index,
            tags: scenario.tags().to_vec(),
            location: scenario.location().clone(),
            not_run: false,
            steps,
        }
    }

    /// Result of a run the controller excluded.
    #[must_use]
    pub fn excluded(id: ScenarioId, scenario: &Scenario, row_index: Option<usize>) -> Self {
        Self {
            not_run: true,
            ..Self::ran(id, scenario, row_index, Vec::new())
        }
    }

    /// Step outcome counts.
    #[must_use]
    pub fn counts(&self) -> StepCounts {
        StepCounts::of(&self.steps)
    }

    /// Ran, and every step passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        let counts = self.counts();
        !self.not_run && counts.passed == counts.total()
    }

    /// Status written to the persisted summary.
    #[must_use]
    pub fn status(&self) -> ScenarioStatus {
        if self.not_run {
            ScenarioStatus::NotRun
        } else if self.is_passed() {
            ScenarioStatus::Passed
        } else {
            ScenarioStatus::Failed
        }
    }

    /// Failure reasons of the failed steps, in step order.
    #[must_use]
    pub fn failures(&self) -> Vec<FailureReason> {
        self.steps
            .iter()
            .filter_map(|record| record.failure.clone())
            .collect()
    }

    /// Steps without a definition.
    pub fn undefined_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|record| record.status == StepStatus::Undefined)
    }
}

/// Results of every concrete run of one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureResult {
    /// Feature name.
    pub name: String,
    /// Feature header location.
    pub location: SourceLocation,
    /// Concrete runs in execution order.
    pub scenarios: Vec<ScenarioResult>,
}

impl FeatureResult {
    /// Every concrete run passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioResult::is_passed)
    }

    /// Step counts over all runs.
    #[must_use]
    pub fn counts(&self) -> StepCounts {
        self.scenarios
            .iter()
            .map(ScenarioResult::counts)
            .fold(StepCounts::default(), StepCounts::merged)
    }
}

/// Results of a whole invocation.
///
/// # Examples
/// ```
/// use cress::TotalResult;
///
/// let total = TotalResult::default();
/// assert_eq!(total.steps(), 0);
/// assert!(total.is_success());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalResult {
    /// Feature results in execution order.
    pub features: Vec<FeatureResult>,
}

impl TotalResult {
    /// Wrap feature results.
    #[must_use]
    pub fn new(features: Vec<FeatureResult>) -> Self {
        Self { features }
    }

    /// Every concrete run, in execution order.
    pub fn scenario_results(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.features.iter().flat_map(|feature| feature.scenarios.iter())
    }

    /// Step counts over the whole invocation.
    #[must_use]
    pub fn counts(&self) -> StepCounts {
        self.features
            .iter()
            .map(FeatureResult::counts)
            .fold(StepCounts::default(), StepCounts::merged)
    }

    /// Number of features run.
    #[must_use]
    pub fn features_ran(&self) -> usize {
        self.features.len()
    }

    /// Number of features whose runs all passed.
    #[must_use]
    pub fn features_passed(&self) -> usize {
        self.features.iter().filter(|f| f.is_passed()).count()
    }

    /// Number of concrete runs, excluded ones included.
    #[must_use]
    pub fn scenarios_ran(&self) -> usize {
        self.scenario_results().count()
    }

    /// Number of concrete runs that passed.
    #[must_use]
    pub fn scenarios_passed(&self) -> usize {
        self.scenario_results().filter(|s| s.is_passed()).count()
    }

    /// Number of concrete runs that ran but did not pass.
    #[must_use]
    pub fn scenarios_failed(&self) -> usize {
        self.scenario_results()
            .filter(|s| s.status() == ScenarioStatus::Failed)
            .count()
    }

    /// Number of concrete runs the controller excluded.
    #[must_use]
    pub fn scenarios_not_run(&self) -> usize {
        self.scenario_results().filter(|s| s.not_run).count()
    }

    /// Total steps visited.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.counts().total()
    }

    /// Steps that passed.
    #[must_use]
    pub fn steps_passed(&self) -> usize {
        self.counts().passed
    }

    /// Steps that failed.
    #[must_use]
    pub fn steps_failed(&self) -> usize {
        self.counts().failed
    }

    /// Steps skipped or not run.
    #[must_use]
    pub fn steps_skipped(&self) -> usize {
        self.counts().skipped
    }

    /// Steps without a definition.
    #[must_use]
    pub fn steps_undefined(&self) -> usize {
        self.counts().undefined
    }

    /// Snippet proposals for undefined steps, unique by pattern, in
    /// first-occurrence order.
    #[must_use]
    pub fn proposed_definitions(&self) -> Vec<&SnippetProposal> {
        let mut proposals: Vec<&SnippetProposal> = Vec::new();
        for record in self.scenario_results().flat_map(ScenarioResult::undefined_steps) {
            let proposal = record.step.proposal();
            if !proposals.contains(&proposal) {
                proposals.push(proposal);
            }
        }
        proposals
    }

    /// Exit contract: every visited step passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        let counts = self.counts();
        counts.total() == counts.passed
    }
}
