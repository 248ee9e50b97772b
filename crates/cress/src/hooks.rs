//! Callbacks run around steps, scenarios, features and outline rows.
//!
//! Hooks receive the world, so they are where per-scenario isolation lives:
//! the runner itself never resets shared state between scenarios.

use std::fmt;

use crate::execution::{FailureReason, StepRecord};
use crate::model::{Feature, Scenario, Step, TableRow};
use crate::results::{FeatureResult, ScenarioResult};

type Hook<W, T> = Box<dyn Fn(&mut W, &T)>;
type OutlineHook<W> = Box<dyn Fn(&mut W, &Scenario, usize, TableRow<'_>, &[FailureReason])>;

/// Registered hooks for a world type `W`.
///
/// Every list runs in registration order.
///
/// # Examples
/// ```
/// use cress::Hooks;
///
/// let mut hooks = Hooks::<Vec<String>>::new();
/// hooks
///     .before_each_scenario(|world, _| world.clear())
///     .after_each_step(|world, record| world.push(record.step.sentence().to_string()));
/// assert_eq!(hooks.len(), 2);
/// ```
pub struct Hooks<W> {
    before_step: Vec<Hook<W, Step>>,
    after_step: Vec<Hook<W, StepRecord>>,
    before_scenario: Vec<Hook<W, Scenario>>,
    after_scenario: Vec<Hook<W, ScenarioResult>>,
    before_feature: Vec<Hook<W, Feature>>,
    after_feature: Vec<Hook<W, FeatureResult>>,
    outline_row: Vec<OutlineHook<W>>,
}

impl<W> Default for Hooks<W> {
    fn default() -> Self {
        Self {
            before_step: Vec::new(),
            after_step: Vec::new(),
            before_scenario: Vec::new(),
            after_scenario: Vec::new(),
            before_feature: Vec::new(),
            after_feature: Vec::new(),
            outline_row: Vec::new(),
        }
    }
}

impl<W> fmt::Debug for Hooks<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").field("len", &self.len()).finish()
    }
}

impl<W> Hooks<W> {
    /// No hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.before_step.len()
            + self.after_step.len()
            + self.before_scenario.len()
            + self.after_scenario.len()
            + self.before_feature.len()
            + self.after_feature.len()
            + self.outline_row.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run before every matched step.
    pub fn before_each_step(&mut self, hook: impl Fn(&mut W, &Step) + 'static) -> &mut Self {
        self.before_step.push(Box::new(hook));
        self
    }

    /// Run after every visited step, including skipped, undefined and not-run
    /// ones, with its outcome.
    pub fn after_each_step(&mut self, hook: impl Fn(&mut W, &StepRecord) + 'static) -> &mut Self {
        self.after_step.push(Box::new(hook));
        self
    }

    /// Run before every executed concrete scenario run.
    pub fn before_each_scenario(
        &mut self,
        hook: impl Fn(&mut W, &Scenario) + 'static,
    ) -> &mut Self {
        self.before_scenario.push(Box::new(hook));
        self
    }

    /// Run after every executed concrete scenario run, with its result.
    pub fn after_each_scenario(
        &mut self,
        hook: impl Fn(&mut W, &ScenarioResult) + 'static,
    ) -> &mut Self {
        self.after_scenario.push(Box::new(hook));
        self
    }

    /// Run before every feature.
    pub fn before_each_feature(&mut self, hook: impl Fn(&mut W, &Feature) + 'static) -> &mut Self {
        self.before_feature.push(Box::new(hook));
        self
    }

    /// Run after every feature, with its result.
    pub fn after_each_feature(
        &mut self,
        hook: impl Fn(&mut W, &FeatureResult) + 'static,
    ) -> &mut Self {
        self.after_feature.push(Box::new(hook));
        self
    }

    /// Run once per executed outline row with the 0-based row index, the
    /// row and the failure reasons of its steps.
    pub fn on_outline_row(
        &mut self,
        hook: impl Fn(&mut W, &Scenario, usize, TableRow<'_>, &[FailureReason]) + 'static,
    ) -> &mut Self {
        self.outline_row.push(Box::new(hook));
        self
    }

    pub(crate) fn run_before_step(&self, world: &mut W, step: &Step) {
        self.before_step.iter().for_each(|hook| hook(world, step));
    }

    pub(crate) fn run_after_step(&self, world: &mut W, record: &StepRecord) {
        self.after_step.iter().for_each(|hook| hook(world, record));
    }

    pub(crate) fn run_before_scenario(&self, world: &mut W, scenario: &Scenario) {
        self.before_scenario.iter().for_each(|hook| hook(world, scenario));
    }

    pub(crate) fn run_after_scenario(&self, world: &mut W, result: &ScenarioResult) {
        self.after_scenario.iter().for_each(|hook| hook(world, result));
    }

    pub(crate) fn run_before_feature(&self, world: &mut W, feature: &Feature) {
        self.before_feature.iter().for_each(|hook| hook(world, feature));
    }

    pub(crate) fn run_after_feature(&self, world: &mut W, result: &FeatureResult) {
        self.after_feature.iter().for_each(|hook| hook(world, result));
    }

    pub(crate) fn run_outline_row(
        &self,
        world: &mut W,
        scenario: &Scenario,
        index: usize,
        row: TableRow<'_>,
        failures: &[FailureReason],
    ) {
        for hook in &self.outline_row {
            hook(world, scenario, index, row, failures);
        }
    }
}
