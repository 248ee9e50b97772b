//! Run options read from the environment.
//!
//! Every option has a `CRESS_*` environment variable. Builder methods and
//! [`RunOptions::apply_overrides`] let a front end layer its own flags on
//! top.

use camino::Utf8PathBuf;

use crate::error::ConfigError;

/// Environment variable enabling failed-only reruns.
pub const ENV_FAILED_ONLY: &str = "CRESS_FAILED_ONLY";
/// Environment variable enabling syntax-only runs.
pub const ENV_SYNTAX_ONLY: &str = "CRESS_SYNTAX_ONLY";
/// Environment variable controlling case-insensitive matching.
pub const ENV_IGNORE_CASE: &str = "CRESS_IGNORE_CASE";
/// Environment variable holding `;`-separated tag filter groups.
pub const ENV_TAGS: &str = "CRESS_TAGS";
/// Environment variable naming the summary file.
pub const ENV_ID_FILE: &str = "CRESS_ID_FILE";

/// Summary file used when none is configured.
pub const DEFAULT_ID_FILE: &str = ".cressids";

const BOOL_EXPECTED: &str = "one of 1/true/yes/on or 0/false/no/off";

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

fn split_tag_groups(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect()
}

/// Options controlling one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Only re-run scenarios that failed last time.
    pub failed_only: bool,
    /// Parse and match nothing; leave every step not run.
    pub syntax_only: bool,
    /// Match step patterns case-insensitively.
    pub ignore_case: bool,
    /// Tag filter OR-groups; each is a comma-joined list of AND-terms.
    pub tags: Vec<String>,
    /// Where scenario summaries are persisted.
    pub id_file: Utf8PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            failed_only: false,
            syntax_only: false,
            ignore_case: true,
            tags: Vec::new(),
            id_file: Utf8PathBuf::from(DEFAULT_ID_FILE),
        }
    }
}

/// Optional values layered over [`RunOptions`] by a front end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    /// Replacement for [`RunOptions::failed_only`].
    pub failed_only: Option<bool>,
    /// Replacement for [`RunOptions::syntax_only`].
    pub syntax_only: Option<bool>,
    /// Replacement for [`RunOptions::ignore_case`].
    pub ignore_case: Option<bool>,
    /// Replacement for [`RunOptions::tags`].
    pub tags: Option<Vec<String>>,
    /// Replacement for [`RunOptions::id_file`].
    pub id_file: Option<Utf8PathBuf>,
}

impl RunOptions {
    /// Read options from the `CRESS_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when a boolean variable holds unrecognised
    /// text.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read options through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    /// As for [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let flag = |variable: &'static str| -> Result<Option<bool>, ConfigError> {
            lookup(variable)
                .map(|value| {
                    parse_env_bool(&value).ok_or(ConfigError {
                        variable,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                })
                .transpose()
        };
        let defaults = Self::default();
        Ok(Self {
            failed_only: flag(ENV_FAILED_ONLY)?.unwrap_or(defaults.failed_only),
            syntax_only: flag(ENV_SYNTAX_ONLY)?.unwrap_or(defaults.syntax_only),
            ignore_case: flag(ENV_IGNORE_CASE)?.unwrap_or(defaults.ignore_case),
            tags: lookup(ENV_TAGS).map_or(defaults.tags, |value| split_tag_groups(&value)),
            id_file: lookup(ENV_ID_FILE).map_or(defaults.id_file, Utf8PathBuf::from),
        })
    }

    /// Replace every option for which `overrides` carries a value.
    #[must_use]
    pub fn apply_overrides(mut self, overrides: RunOverrides) -> Self {
        if let Some(failed_only) = overrides.failed_only {
            self.failed_only = failed_only;
        }
        if let Some(syntax_only) = overrides.syntax_only {
            self.syntax_only = syntax_only;
        }
        if let Some(ignore_case) = overrides.ignore_case {
            self.ignore_case = ignore_case;
        }
        if let Some(tags) = overrides.tags {
            self.tags = tags;
        }
        if let Some(id_file) = overrides.id_file {
            self.id_file = id_file;
        }
        self
    }

    /// Set failed-only mode.
    #[must_use]
    pub fn with_failed_only(mut self, failed_only: bool) -> Self {
        self.failed_only = failed_only;
        self
    }

    /// Set syntax-only mode.
    #[must_use]
    pub fn with_syntax_only(mut self, syntax_only: bool) -> Self {
        self.syntax_only = syntax_only;
        self
    }

    /// Set case-insensitive matching.
    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Set the tag filter groups.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the summary file.
    #[must_use]
    pub fn with_id_file(mut self, id_file: impl Into<Utf8PathBuf>) -> Self {
        self.id_file = id_file.into();
        self
    }
}
