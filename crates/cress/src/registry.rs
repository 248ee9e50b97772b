//! Step registration and lookup.
//!
//! A [`Registry`] is an ordered list of step definitions. Lookup scans the
//! definitions in registration order and the first pattern that is found
//! anywhere in the step sentence wins, so more specific patterns belong
//! before general ones.

use std::fmt;
use std::panic::Location;

use cress_patterns::{StepArguments, extract_arguments};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::RegistryError;
use crate::execution::{StepCall, StepError};

/// Result type returned by step handlers.
pub type StepResult = Result<(), StepError>;

type StepHandler<W> = dyn Fn(&mut W, &StepCall<'_, W>) -> StepResult;

/// Source location where a step definition was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefinitionLocation {
    /// Source file of the registering call.
    pub file: &'static str,
    /// Line of the registering call.
    pub line: u32,
}

impl fmt::Display for DefinitionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single registered step definition.
pub struct StepDefinition<W> {
    pattern: String,
    regex: Regex,
    ci_regex: Regex,
    handler: Box<StepHandler<W>>,
    location: DefinitionLocation,
}

impl<W> StepDefinition<W> {
    /// Pattern text as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Where the definition was registered.
    #[must_use]
    pub fn location(&self) -> DefinitionLocation {
        self.location
    }

    fn regex(&self, ignore_case: bool) -> &Regex {
        if ignore_case { &self.ci_regex } else { &self.regex }
    }

    pub(crate) fn invoke(&self, world: &mut W, call: &StepCall<'_, W>) -> StepResult {
        (self.handler)(world, call)
    }
}

impl<W> fmt::Debug for StepDefinition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("pattern", &self.pattern)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// A definition matched against a sentence, with the captured values.
#[derive(Debug)]
pub struct StepMatch<'r, W> {
    /// The winning definition.
    pub definition: &'r StepDefinition<W>,
    /// Values captured by the definition's pattern.
    pub arguments: StepArguments,
}

/// Ordered collection of step definitions for a world type `W`.
///
/// # Examples
/// ```
/// use cress::Registry;
///
/// #[derive(Default)]
/// struct Cart {
///     items: u32,
/// }
///
/// let mut registry = Registry::<Cart>::new();
/// registry
///     .step(r"I add (\d+) items", |cart, call| {
///         cart.items += call.arg(0).unwrap_or("0").parse::<u32>()?;
///         Ok(())
///     })
///     .expect("valid pattern");
/// assert!(registry.find("Given I add 3 items", false).is_some());
/// assert!(registry.find("Given I remove 3 items", false).is_none());
/// ```
pub struct Registry<W> {
    definitions: Vec<StepDefinition<W>>,
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }
}

impl<W> fmt::Debug for Registry<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.definitions).finish()
    }
}

impl<W> Registry<W> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for sentences matching `pattern`.
    ///
    /// The caller's source location is recorded for reporting.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidPattern`] when `pattern` is not a
    /// valid regular expression.
    #[track_caller]
    pub fn step<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&mut W, &StepCall<'_, W>) -> StepResult + 'static,
    {
        let caller = Location::caller();
        let compile = |ignore_case: bool| {
            RegexBuilder::new(pattern)
                .case_insensitive(ignore_case)
                .build()
                .map_err(|source| RegistryError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
        };
        let definition = StepDefinition {
            pattern: pattern.to_string(),
            regex: compile(false)?,
            ci_regex: compile(true)?,
            handler: Box::new(handler),
            location: DefinitionLocation {
                file: caller.file(),
                line: caller.line(),
            },
        };
        if self.definitions.iter().any(|d| d.pattern == definition.pattern) {
            log::warn!(
                "step pattern `{}` registered again at {}; the earlier definition wins",
                definition.pattern,
                definition.location
            );
        }
        self.definitions.push(definition);
        Ok(self)
    }

    /// Find the first definition whose pattern occurs in `sentence`.
    #[must_use]
    pub fn find(&self, sentence: &str, ignore_case: bool) -> Option<StepMatch<'_, W>> {
        self.definitions.iter().find_map(|definition| {
            extract_arguments(definition.regex(ignore_case), sentence)
                .map(|arguments| StepMatch {
                    definition,
                    arguments,
                })
        })
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &StepDefinition<W>> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
