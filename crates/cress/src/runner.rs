//! Drives features through the controller, executor and hooks.

use camino::Utf8Path;

use crate::config::RunOptions;
use crate::controller::RunController;
use crate::discovery::load_features;
use crate::error::RunError;
use crate::execution::Executor;
use crate::hooks::Hooks;
use crate::model::{Feature, Scenario};
use crate::outline::expand;
use crate::registry::Registry;
use crate::results::{FeatureResult, ScenarioResult, TotalResult};

/// Runs parsed features against a registry.
///
/// Features run in the order given, scenarios in source order and outline
/// rows in table order. Scenario ids are consumed in exactly that order.
///
/// # Examples
/// ```
/// use cress::{Registry, RunController, Runner, parse_feature};
///
/// let mut registry = Registry::<u32>::new();
/// registry
///     .step(r"I add (\d+)", |total, call| {
///         *total += call.arg(0).unwrap_or("0").parse::<u32>()?;
///         Ok(())
///     })
///     .expect("valid pattern");
///
/// let feature = parse_feature(
///     "Feature: Sum\n  Scenario: Add\n    Given I add 2\n    And I add 3\n",
///     None,
///     None,
/// )
/// .expect("valid feature");
///
/// let mut total = 0;
/// let mut runner = Runner::new(&registry, RunController::default());
/// let results = runner.run(&mut total, &[feature]).expect("run completes");
/// assert!(results.is_success());
/// assert_eq!(total, 5);
/// ```
pub struct Runner<'r, W> {
    registry: &'r Registry<W>,
    hooks: Option<&'r Hooks<W>>,
    controller: RunController,
    ignore_case: bool,
}

impl<'r, W> Runner<'r, W> {
    /// Runner matching case-sensitively, without hooks.
    #[must_use]
    pub fn new(registry: &'r Registry<W>, controller: RunController) -> Self {
        Self {
            registry,
            hooks: None,
            controller,
            ignore_case: false,
        }
    }

    /// Runner configured from `options`, persisting to their id file.
    ///
    /// # Errors
    /// Returns [`RunError::Controller`] when the tag filter is malformed or
    /// the previous summary cannot be read.
    pub fn from_options(registry: &'r Registry<W>, options: &RunOptions) -> Result<Self, RunError> {
        let controller = RunController::from_options(options)?;
        Ok(Self::new(registry, controller).ignore_case(options.ignore_case))
    }

    /// Call `hooks` around features, scenarios and steps.
    #[must_use]
    pub fn with_hooks(mut self, hooks: &'r Hooks<W>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Match step patterns case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// The controller, for inspecting ids or modes.
    #[must_use]
    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    /// Load every feature under `base`, run them all and persist the summary.
    ///
    /// Every file is parsed before anything runs, so a syntax error anywhere
    /// aborts the invocation without executing a step.
    ///
    /// # Errors
    /// Returns [`RunError::Feature`] for loading failures and
    /// [`RunError::Controller`] when the summary cannot be written.
    pub fn run_path(&mut self, world: &mut W, base: &Utf8Path) -> Result<TotalResult, RunError> {
        let features = load_features(base)?;
        self.run(world, &features)
    }

    /// Run `features` in order and persist the summary.
    ///
    /// # Errors
    /// Returns [`RunError::Controller`] when the summary cannot be written.
    pub fn run(&mut self, world: &mut W, features: &[Feature]) -> Result<TotalResult, RunError> {
        let results = features
            .iter()
            .map(|feature| self.run_feature(world, feature))
            .collect();
        let totals = TotalResult::new(results);
        self.controller.finished(&totals)?;
        Ok(totals)
    }

    /// Run every scenario of one feature. Does not persist anything.
    pub fn run_feature(&mut self, world: &mut W, feature: &Feature) -> FeatureResult {
        self.run_feature_with(world, feature, None)
    }

    /// Run the scenarios of `feature` at the given 1-based `indices`.
    ///
    /// Unlisted scenarios are not visited and consume no ids. `None` or an
    /// empty list runs every scenario.
    pub fn run_feature_with(
        &mut self,
        world: &mut W,
        feature: &Feature,
        indices: Option<&[usize]>,
    ) -> FeatureResult {
        let selected = |position: usize| {
            indices
                .filter(|list| !list.is_empty())
                .is_none_or(|list| list.contains(&position))
        };
        if let Some(hooks) = self.hooks {
            hooks.run_before_feature(world, feature);
        }
        let mut scenarios = Vec::new();
        for (position, scenario) in (1..).zip(feature.scenarios()) {
            if selected(position) {
                scenarios.extend(self.run_scenario(world, scenario));
            }
        }
        let result = FeatureResult {
            name: feature.name().to_string(),
            location: feature.location().clone(),
            scenarios,
        };
        if let Some(hooks) = self.hooks {
            hooks.run_after_feature(world, &result);
        }
        result
    }

    /// Run every concrete run of `scenario`, one id each.
    pub fn run_scenario(&mut self, world: &mut W, scenario: &Scenario) -> Vec<ScenarioResult> {
        let mut executor = Executor::new(self.registry)
            .ignore_case(self.ignore_case)
            .run_steps(self.controller.should_run_step());
        if let Some(hooks) = self.hooks {
            executor = executor.with_hooks(hooks);
        }
        let mut results = Vec::new();
        for run in expand(scenario) {
            let id = self.controller.next_id();
            if !self.controller.should_run_scenario(scenario, id) {
                results.push(ScenarioResult::excluded(id, scenario, run.row_index));
                continue;
            }
            if let Some(hooks) = self.hooks {
                hooks.run_before_scenario(world, scenario);
            }
            let records = executor.run(world, &run.steps);
            let result = ScenarioResult::ran(id, scenario, run.row_index, records);
            if let Some(hooks) = self.hooks {
                if let (Some(index), Some(row)) = (run.row_index, run.row) {
                    hooks.run_outline_row(world, scenario, index, row, &result.failures());
                }
                hooks.run_after_scenario(world, &result);
            }
            results.push(result);
        }
        results
    }
}

impl<W> std::fmt::Debug for Runner<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .field("controller", &self.controller)
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}
