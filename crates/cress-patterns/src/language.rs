//! Locale keyword records and lookup helpers.
//!
//! Each [`Language`] names the structural keywords of a feature document in one
//! locale. Several keywords accept alternatives separated by `|`; the first
//! alternative is the canonical spelling used when rendering, while parsing
//! accepts any of them. [`first_alternative`] derives the canonical view
//! instead of storing it separately.

use crate::errors::PatternError;

/// Structural keyword slots exposed by every [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordField {
    /// The feature header keyword.
    Feature,
    /// The plain scenario header keyword.
    Scenario,
    /// The parameterised scenario header keyword.
    ScenarioOutline,
    /// The keyword introducing an outline's example table.
    Examples,
}

/// Keyword record for a single locale.
///
/// # Examples
/// ```
/// use cress_patterns::{KeywordField, Language};
///
/// let pt = Language::lookup("pt-br").expect("pt-br is built in");
/// assert_eq!(pt.first_of(KeywordField::Scenario), "Cenário");
/// assert!(pt.alternatives(KeywordField::Scenario).any(|kw| kw == "Cenario"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Locale code, e.g. `en` or `pt-br`.
    pub code: &'static str,
    /// English name of the language.
    pub name: &'static str,
    /// Native name of the language.
    pub native: &'static str,
    /// `|`-delimited feature keywords.
    pub feature: &'static str,
    /// `|`-delimited scenario keywords.
    pub scenario: &'static str,
    /// `|`-delimited scenario outline keywords.
    pub scenario_outline: &'static str,
    /// `|`-delimited examples keywords.
    pub examples: &'static str,
}

/// Return the first `|`-delimited alternative of a keyword string.
///
/// # Examples
/// ```
/// use cress_patterns::first_alternative;
///
/// assert_eq!(first_alternative("Examples|Scenarios"), "Examples");
/// assert_eq!(first_alternative("Feature"), "Feature");
/// ```
#[must_use]
pub fn first_alternative(value: &str) -> &str {
    value.split('|').next().map_or(value, str::trim)
}

/// Built-in keyword tables.
pub static LANGUAGES: &[Language] = &[
    Language::ENGLISH,
    Language {
        code: "pt-br",
        name: "Portuguese",
        native: "Português",
        feature: "Funcionalidade",
        scenario: "Cenário|Cenario",
        scenario_outline: "Esquema do Cenário|Esquema do Cenario",
        examples: "Exemplos|Cenários",
    },
    Language {
        code: "pl",
        name: "Polish",
        native: "Polski",
        feature: "Właściwość",
        scenario: "Scenariusz",
        scenario_outline: "Zarys Scenariusza",
        examples: "Przykład",
    },
    Language {
        code: "ca",
        name: "Catalan",
        native: "Català",
        feature: "Funcionalitat",
        scenario: "Escenari",
        scenario_outline: "Esquema d'Escenari",
        examples: "Exemples",
    },
    Language {
        code: "es",
        name: "Spanish",
        native: "Español",
        feature: "Funcionalidad",
        scenario: "Escenario",
        scenario_outline: "Esquema de Escenario",
        examples: "Ejemplos",
    },
    Language {
        code: "fr",
        name: "French",
        native: "Français",
        feature: "Fonctionnalité|Fonction",
        scenario: "Scénario",
        scenario_outline: "Plan de Scénario|Plan du Scénario",
        examples: "Exemples|Scénarios",
    },
];

impl Language {
    /// The default locale used when a document carries no marker.
    pub const ENGLISH: Self = Self {
        code: "en",
        name: "English",
        native: "English",
        feature: "Feature",
        scenario: "Scenario",
        scenario_outline: "Scenario Outline",
        examples: "Examples|Scenarios",
    };

    /// Find a built-in locale by code, ignoring ASCII case.
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static Self> {
        LANGUAGES
            .iter()
            .find(|language| language.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Select the locale named by a `language: <code>` marker in `text`.
    ///
    /// Documents without a marker use [`Language::ENGLISH`].
    ///
    /// # Errors
    /// Returns [`PatternError::UnknownLanguage`] when the marker names a locale
    /// that has no built-in table.
    pub fn guess_from_str(text: &str) -> Result<&'static Self, PatternError> {
        match language_marker(text) {
            None => Ok(&DEFAULT_LANGUAGE),
            Some(code) => Self::lookup(code).ok_or_else(|| PatternError::UnknownLanguage {
                code: code.to_string(),
            }),
        }
    }

    /// Return the raw `|`-delimited keyword string for `field`.
    #[must_use]
    pub const fn keyword(&self, field: KeywordField) -> &'static str {
        match field {
            KeywordField::Feature => self.feature,
            KeywordField::Scenario => self.scenario,
            KeywordField::ScenarioOutline => self.scenario_outline,
            KeywordField::Examples => self.examples,
        }
    }

    /// Return the canonical (first) spelling of `field`.
    #[must_use]
    pub fn first_of(&self, field: KeywordField) -> &'static str {
        first_alternative(self.keyword(field))
    }

    /// Iterate over every accepted spelling of `field`.
    pub fn alternatives(&self, field: KeywordField) -> impl Iterator<Item = &'static str> {
        self.keyword(field)
            .split('|')
            .map(str::trim)
            .filter(|alternative| !alternative.is_empty())
    }

    /// Keywords that open a scenario block, longest first.
    ///
    /// Both plain and outline keywords separate scenarios. Ordering by length
    /// keeps `Scenario Outline` from being read as `Scenario`.
    #[must_use]
    pub fn scenario_separators(&self) -> Vec<&'static str> {
        let mut separators: Vec<_> = self
            .alternatives(KeywordField::ScenarioOutline)
            .chain(self.alternatives(KeywordField::Scenario))
            .collect();
        separators.sort_by_key(|keyword| std::cmp::Reverse(keyword.chars().count()));
        separators
    }
}

static DEFAULT_LANGUAGE: Language = Language::ENGLISH;

/// Extract the code following the first `language:` marker.
fn language_marker(text: &str) -> Option<&str> {
    let (_, rest) = text.split_once("language:")?;
    rest.trim_start_matches([' ', '\t'])
        .split(char::is_whitespace)
        .next()
        .filter(|code| !code.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Examples|Scenarios", "Examples")]
    #[case("Scenario", "Scenario")]
    #[case("", "")]
    fn first_alternative_takes_leading_entry(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(first_alternative(raw), expected);
    }

    #[test]
    fn english_is_the_default() {
        let language = Language::guess_from_str("Feature: no marker here")
            .unwrap_or_else(|err| panic!("english fallback: {err}"));
        assert_eq!(language.code, "en");
    }

    #[rstest]
    #[case("# language: pt-br\nFuncionalidade: x", "pt-br")]
    #[case("#language:fr\n", "fr")]
    #[case("# language:   PL\n", "pl")]
    fn reads_language_marker(#[case] text: &str, #[case] expected: &str) {
        let language = Language::guess_from_str(text)
            .unwrap_or_else(|err| panic!("marker should resolve: {err}"));
        assert_eq!(language.code, expected);
    }

    #[test]
    fn rejects_unknown_marker() {
        let Err(err) = Language::guess_from_str("# language: xx-yy\n") else {
            panic!("unknown locale should be rejected");
        };
        assert!(err.to_string().contains("xx-yy"));
    }

    #[test]
    fn separators_prefer_longer_keywords() {
        let separators = Language::ENGLISH.scenario_separators();
        assert_eq!(separators, vec!["Scenario Outline", "Scenario"]);
    }

    #[test]
    fn alternatives_split_on_pipes() {
        let found: Vec<_> = Language::ENGLISH
            .alternatives(KeywordField::Examples)
            .collect();
        assert_eq!(found, vec!["Examples", "Scenarios"]);
    }
}
