//! Core library for `cress`, a plain-text behaviour-driven development runner.
//!
//! Feature documents are parsed into an immutable tree of features,
//! scenarios and steps. A [`Runner`] walks that tree, matching each step
//! against a [`Registry`] of handlers, while a [`RunController`] hands out
//! scenario ids and decides what runs: tag filters, failed-only reruns and
//! syntax-only checks. Outcomes are collected into a [`TotalResult`] that
//! the [`reporting`] module can render.
//!
//! # Examples
//!
//! ```
//! use cress::{Registry, RunController, Runner, parse_feature};
//!
//! #[derive(Default)]
//! struct Lamp {
//!     on: bool,
//! }
//!
//! let mut registry = Registry::<Lamp>::new();
//! registry
//!     .step("I switch the lamp on", |lamp, _| {
//!         lamp.on = true;
//!         Ok(())
//!     })
//!     .expect("valid pattern");
//!
//! let feature = parse_feature(
//!     "Feature: Lamp\n  Scenario: Light\n    When I switch the lamp on\n    Then it glows\n",
//!     None,
//!     None,
//! )
//! .expect("valid feature");
//!
//! let mut lamp = Lamp::default();
//! let results = Runner::new(&registry, RunController::default())
//!     .run(&mut lamp, &[feature])
//!     .expect("run completes");
//! assert!(lamp.on);
//! assert_eq!(results.steps_undefined(), 1);
//! assert!(!results.is_success());
//! let proposals = results.proposed_definitions();
//! assert_eq!(proposals[0].pattern, "Then it glows");
//! ```

pub mod config;
mod controller;
mod discovery;
mod error;
mod execution;
mod hooks;
mod model;
pub mod outline;
mod parser;
mod registry;
pub mod reporting;
mod results;
mod runner;

pub use config::{RunOptions, RunOverrides};
pub use controller::{
    JsonFilePersister, MemoryPersister, Persister, RunController, ScenarioId, ScenarioStatus,
    Summary, summarize,
};
pub use cress_patterns::{
    KeywordField, LANGUAGES, Language, PatternError, SnippetProposal, StepArguments, TagFilter,
    TagTerm, first_alternative,
};
pub use discovery::{find_feature_files, load_feature_file, load_features};
pub use error::{
    ConfigError, ControllerError, FeatureError, PersistError, RegistryError, RunError,
    SyntaxError,
};
pub use execution::{
    Executor, FailureReason, NO_DEFINITION_FOUND, StepCall, StepError, StepRecord, StepStatus,
};
pub use hooks::Hooks;
pub use model::{DataTable, Feature, Scenario, SourceLocation, Step, TableRow};
pub use parser::{parse_feature, parse_steps};
pub use registry::{DefinitionLocation, Registry, StepDefinition, StepMatch, StepResult};
pub use results::{FeatureResult, ScenarioResult, StepCounts, TotalResult};
pub use runner::Runner;
