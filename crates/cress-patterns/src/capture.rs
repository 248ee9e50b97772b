//! Regex capture helpers used when invoking step handlers.

use regex::{Captures, Regex};

/// Values captured from a step sentence.
///
/// When the matching pattern declares any named group, every group is
/// reported by name; otherwise groups are positional. Either way the values
/// follow the pattern's group order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArguments {
    /// Unnamed groups in match order.
    Positional(Vec<String>),
    /// Named groups in pattern order.
    Named(Vec<(String, String)>),
}

impl Default for StepArguments {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl StepArguments {
    /// Collect arguments from a successful capture.
    ///
    /// Groups that did not participate in the match yield empty strings so
    /// positions stay aligned with the pattern.
    #[must_use]
    pub fn from_captures(re: &Regex, caps: &Captures<'_>) -> Self {
        let value = |idx: usize| {
            caps.get(idx)
                .map_or_else(String::new, |m| m.as_str().to_string())
        };
        let has_names = re.capture_names().flatten().next().is_some();
        if has_names {
            Self::Named(
                re.capture_names()
                    .enumerate()
                    .skip(1)
                    .filter_map(|(idx, name)| name.map(|name| (name.to_string(), value(idx))))
                    .collect(),
            )
        } else {
            Self::Positional((1..caps.len()).map(value).collect())
        }
    }

    /// Number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(pairs) => pairs.len(),
        }
    }

    /// Return `true` when nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the value at `index`, whichever style was used.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            Self::Positional(values) => values.get(index).map(String::as_str),
            Self::Named(pairs) => pairs.get(index).map(|(_, value)| value.as_str()),
        }
    }

    /// Fetch a named value; positional arguments never match.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        match self {
            Self::Positional(_) => None,
            Self::Named(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }

    /// Iterate over the values in pattern order, dropping names.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        (0..self.len()).filter_map(|idx| self.get(idx))
    }
}

/// Search `text` with `re` and collect its arguments, or `None` without a match.
///
/// The search is unanchored, so a pattern matches anywhere in the sentence.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use cress_patterns::{extract_arguments, StepArguments};
/// let regex = Regex::new(r"(\d+) cukes").expect("valid regex");
/// let args = extract_arguments(&regex, "Given I have 12 cukes").expect("matches");
/// assert_eq!(args, StepArguments::Positional(vec!["12".into()]));
/// assert!(extract_arguments(&regex, "nope").is_none());
/// ```
#[must_use]
pub fn extract_arguments(re: &Regex, text: &str) -> Option<StepArguments> {
    re.captures(text)
        .map(|caps| StepArguments::from_captures(re, &caps))
}
