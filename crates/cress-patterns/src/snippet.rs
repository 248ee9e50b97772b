//! Definition proposals for undefined steps.
//!
//! A proposal turns a literal step sentence into a suggested pattern and an
//! ASCII handler name. Quoted substrings, in either quote style, become
//! capture groups numbered from left to right.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""[^"]+"|'[^']+'"#).ok());

/// Suggested definition for a step sentence.
///
/// Two proposals are equal when their patterns are equal; the handler name
/// does not take part in comparison.
///
/// # Examples
/// ```
/// use cress_patterns::SnippetProposal;
///
/// let a = SnippetProposal::from_sentence(r#"Given I have "a" and "b""#);
/// let b = SnippetProposal::from_sentence(r#"Given I have "c" and "d""#);
/// assert_eq!(a.pattern, r#"Given I have "(.*)" and "(.*)""#);
/// assert_eq!(a, b);
/// assert_eq!(a.signature(), "given_i_have_group1_and_group2(step, group1, group2)");
/// ```
#[derive(Debug, Clone)]
pub struct SnippetProposal {
    /// Suggested handler identifier.
    pub name: String,
    /// Suggested step pattern; keeps the sentence's original characters.
    pub pattern: String,
    /// Capture group names in pattern order.
    pub groups: Vec<String>,
}

impl SnippetProposal {
    /// Derive a proposal from a literal step sentence.
    #[must_use]
    pub fn from_sentence(sentence: &str) -> Self {
        let mut pattern = String::with_capacity(sentence.len());
        let mut name_source = String::with_capacity(sentence.len());
        let mut groups = Vec::new();
        let mut last = 0;

        for found in QUOTED.iter().flat_map(|re| re.find_iter(sentence)) {
            let before = sentence.get(last..found.start()).unwrap_or_default();
            let quote = found.as_str().chars().next().unwrap_or('"');
            let group = format!("group{}", groups.len() + 1);
            pattern.push_str(before);
            pattern.push_str(&format!("{quote}(.*){quote}"));
            name_source.push_str(before);
            name_source.push_str(&group);
            groups.push(group);
            last = found.end();
        }
        let rest = sentence.get(last..).unwrap_or_default();
        pattern.push_str(rest);
        name_source.push_str(rest);

        Self {
            name: ascii_identifier(&name_source),
            pattern,
            groups,
        }
    }

    /// Render the handler call shape, e.g. `i_have_group1(step, group1)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut params = vec!["step".to_string()];
        params.extend(self.groups.iter().cloned());
        format!("{}({})", self.name, params.join(", "))
    }
}

impl PartialEq for SnippetProposal {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for SnippetProposal {}

impl fmt::Display for SnippetProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.pattern, self.signature())
    }
}

/// Fold `text` to lowercase ASCII words joined by `_`.
fn ascii_identifier(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    ascii
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given I have 3 apples", "Given I have 3 apples", "given_i_have_3_apples")]
    #[case(
        r#"When I say "hello" to 'Bob'"#,
        r#"When I say "(.*)" to '(.*)'"#,
        "when_i_say_group1_to_group2"
    )]
    #[case(
        r#"Then "x" equals "x""#,
        r#"Then "(.*)" equals "(.*)""#,
        "then_group1_equals_group2"
    )]
    #[case("Então a Ação é válida", "Então a Ação é válida", "entao_a_acao_e_valida")]
    #[case(r#"Given an empty "" value"#, r#"Given an empty "" value"#, "given_an_empty_value")]
    fn derives_pattern_and_name(
        #[case] sentence: &str,
        #[case] pattern: &str,
        #[case] name: &str,
    ) {
        let proposal = SnippetProposal::from_sentence(sentence);
        assert_eq!(proposal.pattern, pattern);
        assert_eq!(proposal.name, name);
    }

    #[test]
    fn groups_are_numbered_across_quote_styles() {
        let proposal = SnippetProposal::from_sentence(r#"Given "a" then 'b' then "c""#);
        assert_eq!(proposal.groups, vec!["group1", "group2", "group3"]);
        assert_eq!(proposal.pattern, r#"Given "(.*)" then '(.*)' then "(.*)""#);
        assert_eq!(proposal.name, "given_group1_then_group2_then_group3");
        assert_eq!(
            proposal.signature(),
            "given_group1_then_group2_then_group3(step, group1, group2, group3)"
        );
    }

    #[test]
    fn quotes_nested_in_the_other_style_stay_literal() {
        let proposal = SnippetProposal::from_sentence(r#"Given 'a "b" c' and "it's""#);
        assert_eq!(proposal.pattern, r#"Given '(.*)' and "(.*)""#);
        assert_eq!(proposal.name, "given_group1_and_group2");
    }

    #[test]
    fn proposals_compare_by_pattern_only() {
        let first = SnippetProposal::from_sentence(r#"Given I have "a""#);
        let mut renamed = first.clone();
        renamed.name = "something_else".into();
        assert_eq!(first, renamed);
        assert_ne!(first, SnippetProposal::from_sentence("Given I have a"));
    }

    #[test]
    fn displays_pattern_and_signature() {
        let proposal = SnippetProposal::from_sentence("Given nothing");
        assert_eq!(proposal.to_string(), "Given nothing => given_nothing(step)");
    }
}
