//! Step matching and execution.
//!
//! The [`Executor`] walks the steps of one concrete scenario run and gives
//! each a terminal [`StepStatus`]. A step starts out not run and becomes
//! passed, failed or undefined once it has been matched and invoked. After
//! the first failed or undefined step, every later step of the same run is
//! visited but marked skipped without a match attempt.

mod error;

use std::panic::{AssertUnwindSafe, catch_unwind};

use cress_patterns::StepArguments;
use serde::Serialize;

use crate::hooks::Hooks;
use crate::model::{DataTable, Step};
use crate::parser::parse_steps;
use crate::registry::{DefinitionLocation, Registry, StepResult};

pub use error::{FailureReason, NO_DEFINITION_FOUND, StepError};

/// Terminal outcome of one step in one concrete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The handler returned successfully.
    Passed,
    /// The handler returned an error or panicked.
    Failed,
    /// An earlier step of the same run failed or was undefined.
    Skipped,
    /// No registered pattern matched the sentence.
    Undefined,
    /// Execution was switched off (syntax-only mode).
    NotRun,
}

impl StepStatus {
    /// Lowercase label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Undefined => "undefined",
            Self::NotRun => "not_run",
        }
    }

    const fn halts(self) -> bool {
        matches!(self, Self::Failed | Self::Undefined)
    }
}

/// Outcome of one concrete step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The step as executed, with outline placeholders already substituted.
    pub step: Step,
    /// Terminal status.
    pub status: StepStatus,
    /// Why the step failed; set only for [`StepStatus::Failed`].
    pub failure: Option<FailureReason>,
    /// Registration site of the matched definition.
    pub definition: Option<DefinitionLocation>,
}

impl StepRecord {
    fn unmatched(step: &Step, status: StepStatus) -> Self {
        Self {
            step: step.clone(),
            status,
            failure: None,
            definition: None,
        }
    }
}

/// What a step handler sees besides the world.
///
/// Gives access to the captured values, the step's table and multiline
/// text, and lets the handler delegate to further steps with
/// [`behave_as`](Self::behave_as).
pub struct StepCall<'a, W> {
    step: &'a Step,
    arguments: StepArguments,
    registry: &'a Registry<W>,
    ignore_case: bool,
}

impl<'a, W> StepCall<'a, W> {
    /// The step being executed.
    #[must_use]
    pub fn step(&self) -> &'a Step {
        self.step
    }

    /// All captured values.
    #[must_use]
    pub fn arguments(&self) -> &StepArguments {
        &self.arguments
    }

    /// Captured value at `index`, in pattern order.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index)
    }

    /// Captured value of a named group.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.arguments.named(name)
    }

    /// The step's data table, if any.
    #[must_use]
    pub fn table(&self) -> Option<&'a DataTable> {
        self.step.table()
    }

    /// The step's de-indented multiline text, if any.
    #[must_use]
    pub fn multiline(&self) -> Option<&'a str> {
        self.step.multiline()
    }

    /// Run `text` as further steps against the same registry and world.
    ///
    /// The nested steps follow the usual short-circuit rules and run without
    /// hooks.
    ///
    /// # Errors
    /// Returns [`StepError::Delegated`] with the original reason of the first
    /// nested step that failed, [`StepError::Undefined`] when a nested step
    /// has no definition, or a custom error when `text` is malformed.
    pub fn behave_as(&self, world: &mut W, text: &str) -> StepResult {
        let steps = parse_steps(text, self.step.location().path.as_deref())?;
        let executor = Executor::new(self.registry).ignore_case(self.ignore_case);
        for record in executor.run(world, &steps) {
            match record.status {
                StepStatus::Failed => {
                    let reason = record
                        .failure
                        .unwrap_or_else(|| StepError::failed("delegated step failed").reason());
                    return Err(StepError::Delegated(reason));
                }
                StepStatus::Undefined => {
                    return Err(StepError::Undefined {
                        sentence: record.step.sentence().to_string(),
                    });
                }
                StepStatus::Passed | StepStatus::Skipped | StepStatus::NotRun => {}
            }
        }
        Ok(())
    }

    /// Alias of [`behave_as`](Self::behave_as) for readability in handlers.
    ///
    /// # Errors
    /// As for [`behave_as`](Self::behave_as).
    pub fn given(&self, world: &mut W, text: &str) -> StepResult {
        self.behave_as(world, text)
    }

    /// Alias of [`behave_as`](Self::behave_as).
    ///
    /// # Errors
    /// As for [`behave_as`](Self::behave_as).
    pub fn when(&self, world: &mut W, text: &str) -> StepResult {
        self.behave_as(world, text)
    }

    /// Alias of [`behave_as`](Self::behave_as).
    ///
    /// # Errors
    /// As for [`behave_as`](Self::behave_as).
    pub fn then(&self, world: &mut W, text: &str) -> StepResult {
        self.behave_as(world, text)
    }
}

/// Runs the steps of one concrete scenario run.
///
/// # Examples
/// ```
/// use cress::{Executor, Registry, StepStatus, parse_steps};
///
/// let mut registry = Registry::<Vec<&str>>::new();
/// registry
///     .step("a step", |log, _| {
///         log.push("ran");
///         Ok(())
///     })
///     .expect("valid pattern");
///
/// let steps = parse_steps("Given a step\nThen something else\nAnd a step", None)
///     .expect("valid steps");
/// let mut log = Vec::new();
/// let records = Executor::new(&registry).run(&mut log, &steps);
/// let statuses: Vec<_> = records.iter().map(|r| r.status).collect();
/// assert_eq!(
///     statuses,
///     [StepStatus::Passed, StepStatus::Undefined, StepStatus::Skipped]
/// );
/// assert_eq!(log, ["ran"]);
/// ```
pub struct Executor<'a, W> {
    registry: &'a Registry<W>,
    hooks: Option<&'a Hooks<W>>,
    run_steps: bool,
    ignore_case: bool,
}

impl<'a, W> Executor<'a, W> {
    /// Executor with no hooks, running steps case-sensitively.
    #[must_use]
    pub fn new(registry: &'a Registry<W>) -> Self {
        Self {
            registry,
            hooks: None,
            run_steps: true,
            ignore_case: false,
        }
    }

    /// Call the before-step hooks ahead of every matched step and the
    /// after-step hooks once for every visited step, whatever its status.
    #[must_use]
    pub fn with_hooks(mut self, hooks: &'a Hooks<W>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Match patterns case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// When `false`, every step is left [`StepStatus::NotRun`].
    #[must_use]
    pub fn run_steps(mut self, run_steps: bool) -> Self {
        self.run_steps = run_steps;
        self
    }

    /// Execute `steps` in order, returning one record per step.
    pub fn run(&self, world: &mut W, steps: &[Step]) -> Vec<StepRecord> {
        let mut records = Vec::with_capacity(steps.len());
        let mut halted = false;
        for step in steps {
            let record = if halted {
                StepRecord::unmatched(step, StepStatus::Skipped)
            } else if self.run_steps {
                self.run_one(world, step)
            } else {
                StepRecord::unmatched(step, StepStatus::NotRun)
            };
            log::debug!(
                "{} ({}): {}",
                step.sentence(),
                step.location(),
                record.status.label()
            );
            if let Some(hooks) = self.hooks {
                hooks.run_after_step(world, &record);
            }
            halted |= record.status.halts();
            records.push(record);
        }
        records
    }

    fn run_one(&self, world: &mut W, step: &Step) -> StepRecord {
        let Some(found) = self.registry.find(step.sentence(), self.ignore_case) else {
            return StepRecord::unmatched(step, StepStatus::Undefined);
        };
        if let Some(hooks) = self.hooks {
            hooks.run_before_step(world, step);
        }
        let call = StepCall {
            step,
            arguments: found.arguments,
            registry: self.registry,
            ignore_case: self.ignore_case,
        };
        let definition = found.definition;
        let outcome = catch_unwind(AssertUnwindSafe(|| definition.invoke(world, &call)));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(failure_reason(&err, step)),
            Err(payload) => Some(failure_reason(&StepError::from_panic(payload.as_ref()), step)),
        };
        StepRecord {
            step: step.clone(),
            status: if failure.is_some() {
                StepStatus::Failed
            } else {
                StepStatus::Passed
            },
            failure,
            definition: Some(definition.location()),
        }
    }
}

/// Delegated reasons pass through untouched so the root cause survives.
fn failure_reason(err: &StepError, step: &Step) -> FailureReason {
    let mut reason = err.reason();
    if !matches!(err, StepError::Delegated(_)) {
        reason.trace.push_str(&format!(
            "\n  at step \"{}\" ({})",
            step.sentence(),
            step.location()
        ));
    }
    reason
}

#[cfg(test)]
mod tests;
