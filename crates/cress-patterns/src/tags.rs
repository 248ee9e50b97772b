//! Tag line recognition and tag filter evaluation.
//!
//! Tags are stored without their leading `@`. A filter is a list of OR-groups;
//! each group is a comma-joined list of AND-terms, and a term prefixed with `~`
//! requires the tag to be absent.

use crate::errors::PatternError;

/// Return the tag names on `line` when it consists solely of `@tag` tokens.
///
/// Returns `None` for any line carrying other text, including blank lines.
///
/// # Examples
/// ```
/// use cress_patterns::steal_tags_from_line;
///
/// assert_eq!(
///     steal_tags_from_line("  @slow @db  "),
///     Some(vec!["slow".to_string(), "db".to_string()])
/// );
/// assert_eq!(steal_tags_from_line("Given @slow things"), None);
/// ```
#[must_use]
pub fn steal_tags_from_line(line: &str) -> Option<Vec<String>> {
    let mut tags = Vec::new();
    for token in line.split_whitespace() {
        let name = token.strip_prefix('@')?;
        if name.is_empty() || name.contains('@') {
            return None;
        }
        tags.push(name.to_string());
    }
    (!tags.is_empty()).then_some(tags)
}

/// One AND-term of a filter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTerm {
    /// Tag name without `@` or `~`.
    pub name: String,
    /// `true` when the term requires the tag to be absent.
    pub negated: bool,
}

impl TagTerm {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (negated, rest) = raw
            .strip_prefix('~')
            .map_or((false, raw), |rest| (true, rest));
        let name = rest.trim_start_matches('@');
        (!name.is_empty()).then(|| Self {
            name: name.to_string(),
            negated,
        })
    }

    fn is_satisfied_by<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        let present = tags.iter().any(|tag| tag.as_ref() == self.name);
        present != self.negated
    }
}

/// Disjunction of conjunctive tag term groups.
///
/// # Examples
/// ```
/// use cress_patterns::TagFilter;
///
/// let filter = TagFilter::parse(&["@red,~@blue"]).expect("valid filter");
/// assert!(filter.matches(&["red", "primary"]));
/// assert!(!filter.matches(&["red", "blue"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    groups: Vec<Vec<TagTerm>>,
}

impl TagFilter {
    /// Parse one OR-group per entry of `groups`.
    ///
    /// Blank entries are ignored, so an all-blank list yields an empty filter
    /// that matches everything.
    ///
    /// # Errors
    /// Returns [`PatternError::EmptyTagTerm`] when a group contains an empty
    /// comma-separated term.
    pub fn parse<S: AsRef<str>>(groups: &[S]) -> Result<Self, PatternError> {
        let mut parsed = Vec::with_capacity(groups.len());
        for group in groups {
            let group = group.as_ref();
            if group.trim().is_empty() {
                continue;
            }
            let terms = group
                .split(',')
                .map(|term| {
                    TagTerm::parse(term).ok_or_else(|| PatternError::EmptyTagTerm {
                        group: group.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(terms);
        }
        Ok(Self { groups: parsed })
    }

    /// Return `true` when no groups were configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Access the parsed groups.
    #[must_use]
    pub fn groups(&self) -> &[Vec<TagTerm>] {
        &self.groups
    }

    /// Evaluate the filter against a resolved tag set.
    ///
    /// An empty filter matches every tag set.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.is_empty()
            || self
                .groups
                .iter()
                .any(|group| group.iter().all(|term| term.is_satisfied_by(tags)))
    }
}
