//! Scenario ids, tag selection and failed-only reruns.
//!
//! The controller hands out scenario ids in execution order. Every concrete
//! run consumes one, including runs that end up excluded, so ids stay stable
//! across invocations whichever filter excluded a run. At the end of a run
//! the status of every id is handed to the [`Persister`], which the next
//! failed-only run consults to skip everything that did not fail.

mod persist;

use std::collections::BTreeMap;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use cress_patterns::TagFilter;

use crate::config::RunOptions;
use crate::error::ControllerError;
use crate::model::Scenario;
use crate::results::TotalResult;

pub use persist::{JsonFilePersister, MemoryPersister, Persister};

/// 1-based id of a concrete scenario run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct ScenarioId(u64);

impl ScenarioId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Persisted outcome of one concrete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Ran and every step passed.
    Passed,
    /// Ran and some step did not pass.
    Failed,
    /// Excluded because it had not failed last time.
    NotRun,
}

/// Scenario statuses of one whole run, keyed by id.
pub type Summary = BTreeMap<ScenarioId, ScenarioStatus>;

/// Decides which scenarios and steps execute.
///
/// # Examples
/// ```
/// use cress::{MemoryPersister, RunController, ScenarioId, ScenarioStatus, Summary, TagFilter};
///
/// let previous = Summary::from([
///     (ScenarioId::new(1), ScenarioStatus::Failed),
///     (ScenarioId::new(2), ScenarioStatus::Passed),
/// ]);
/// let persister = MemoryPersister::with_summary(previous);
/// let mut controller = RunController::new(
///     TagFilter::default(),
///     true,
///     false,
///     Some(Box::new(persister)),
/// )
/// .expect("summary loads");
///
/// assert_eq!(controller.next_id(), ScenarioId::new(1));
/// assert!(controller.rerun_allows(ScenarioId::new(1)));
/// assert!(!controller.rerun_allows(ScenarioId::new(2)));
/// assert!(controller.rerun_allows(ScenarioId::new(9)));
/// ```
#[derive(Default)]
pub struct RunController {
    counter: u64,
    previous: Option<Summary>,
    tags: TagFilter,
    failed_only: bool,
    syntax_only: bool,
    persister: Option<Box<dyn Persister>>,
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("counter", &self.counter)
            .field("previous", &self.previous)
            .field("tags", &self.tags)
            .field("failed_only", &self.failed_only)
            .field("syntax_only", &self.syntax_only)
            .field("persister", &self.persister.is_some())
            .finish()
    }
}

impl RunController {
    /// Build a controller.
    ///
    /// In failed-only mode the previous summary is read here, once.
    ///
    /// # Errors
    /// Returns [`ControllerError::MissingPersister`] when `failed_only` is set
    /// without a persister, and [`ControllerError::Persist`] when the previous
    /// summary cannot be read.
    pub fn new(
        tags: TagFilter,
        failed_only: bool,
        syntax_only: bool,
        persister: Option<Box<dyn Persister>>,
    ) -> Result<Self, ControllerError> {
        let previous = match (&persister, failed_only) {
            (None, true) => return Err(ControllerError::MissingPersister),
            (Some(store), true) => store.read_previous()?,
            (_, false) => None,
        };
        Ok(Self {
            counter: 0,
            previous,
            tags,
            failed_only,
            syntax_only,
            persister,
        })
    }

    /// Build a controller from run options, persisting to their id file.
    ///
    /// # Errors
    /// Returns [`ControllerError::TagFilter`] for malformed tag groups and
    /// [`ControllerError::Persist`] when the previous summary cannot be read.
    pub fn from_options(options: &RunOptions) -> Result<Self, ControllerError> {
        let tags = TagFilter::parse(&options.tags)?;
        let persister = JsonFilePersister::new(options.id_file.clone());
        Self::new(
            tags,
            options.failed_only,
            options.syntax_only,
            Some(Box::new(persister)),
        )
    }

    /// Hand out the next scenario id. The first id is 1.
    pub fn next_id(&mut self) -> ScenarioId {
        self.counter += 1;
        ScenarioId(self.counter)
    }

    /// Whether steps execute at all; `false` in syntax-only mode.
    #[must_use]
    pub const fn should_run_step(&self) -> bool {
        !self.syntax_only
    }

    /// Whether failed-only mode lets `id` run.
    ///
    /// Ids missing from the previous summary always run.
    #[must_use]
    pub fn rerun_allows(&self, id: ScenarioId) -> bool {
        if !self.failed_only {
            return true;
        }
        match self.previous_status(id) {
            Some(ScenarioStatus::Failed) | None => true,
            Some(ScenarioStatus::Passed | ScenarioStatus::NotRun) => false,
        }
    }

    /// Status `id` had in the previous summary, if one was read and lists it.
    #[must_use]
    pub fn previous_status(&self, id: ScenarioId) -> Option<ScenarioStatus> {
        self.previous
            .as_ref()
            .and_then(|summary| summary.get(&id))
            .copied()
    }

    /// Whether `id` runs again because it failed last time. Ids new to this
    /// run are not reruns.
    #[must_use]
    pub fn is_rerun(&self, id: ScenarioId) -> bool {
        self.failed_only && self.previous_status(id) == Some(ScenarioStatus::Failed)
    }

    /// Decide whether the concrete run `id` of `scenario` executes.
    ///
    /// The failed-only check comes first, then the tag filter.
    #[must_use]
    pub fn should_run_scenario(&self, scenario: &Scenario, id: ScenarioId) -> bool {
        if !self.rerun_allows(id) {
            log::info!(
                "scenario {id} \"{}\" did not fail last run; not running it",
                scenario.name()
            );
            return false;
        }
        if self.is_rerun(id) {
            log::info!("re-running scenario {id} \"{}\"", scenario.name());
        }
        if !self.tags.matches(scenario.tags()) {
            log::info!(
                "scenario {id} \"{}\" excluded by the tag filter",
                scenario.name()
            );
            return false;
        }
        true
    }

    /// The summary read at construction, in failed-only mode.
    #[must_use]
    pub fn previous(&self) -> Option<&Summary> {
        self.previous.as_ref()
    }

    /// Whether failed-only mode is on.
    #[must_use]
    pub const fn failed_only(&self) -> bool {
        self.failed_only
    }

    /// Whether syntax-only mode is on.
    #[must_use]
    pub const fn syntax_only(&self) -> bool {
        self.syntax_only
    }

    /// The active tag filter.
    #[must_use]
    pub fn tags(&self) -> &TagFilter {
        &self.tags
    }

    /// Write the status of every concrete run to the persister.
    ///
    /// Without a persister this does nothing. Every run writes its summary,
    /// syntax-only runs included.
    ///
    /// # Errors
    /// Returns [`ControllerError::Persist`] when the write fails.
    pub fn finished(&mut self, totals: &TotalResult) -> Result<(), ControllerError> {
        let Some(persister) = self.persister.as_mut() else {
            return Ok(());
        };
        persister.write_results(&summarize(totals))?;
        Ok(())
    }
}

/// Status of every concrete run in `totals`, keyed by id.
#[must_use]
pub fn summarize(totals: &TotalResult) -> Summary {
    totals
        .scenario_results()
        .map(|result| (result.id, result.status()))
        .collect()
}
