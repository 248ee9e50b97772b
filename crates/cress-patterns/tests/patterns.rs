//! Integration tests exercising the public helpers together.

use cress_patterns::{
    KeywordField, Language, SnippetProposal, TagFilter, escape_cell, extract_arguments,
    render_table, split_row, steal_tags_from_line, substitute_placeholders,
};
use regex::Regex;

#[test]
fn proposal_pattern_matches_the_sentence_it_came_from() {
    let sentence = r#"Given I have "a" and 'b'"#;
    let proposal = SnippetProposal::from_sentence(sentence);
    let Ok(regex) = Regex::new(&proposal.pattern) else {
        panic!("proposal pattern should compile: {}", proposal.pattern);
    };
    let Some(args) = extract_arguments(&regex, sentence) else {
        panic!("proposal should match its own sentence");
    };
    assert_eq!(args.values().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(args.len(), proposal.groups.len());
}

#[test]
fn similar_undefined_steps_share_one_proposal() {
    let first = SnippetProposal::from_sentence(r#"Given I have "a" and "b""#);
    let second = SnippetProposal::from_sentence(r#"Given I have "c" and "d""#);
    assert_eq!(first.pattern, r#"Given I have "(.*)" and "(.*)""#);
    assert_eq!(first, second);
}

#[test]
fn rendered_table_parses_back() {
    let rows = vec![vec!["a|b".to_string(), "plain".to_string()]];
    let lines = render_table(&["value", "other"], &rows);
    let Some(body) = lines.get(1) else {
        panic!("rendered table should have a body row");
    };
    assert!(body.contains("a\\|b"));
    assert_eq!(split_row(body), vec!["a|b", "plain"]);
    assert_eq!(escape_cell("x|y|z"), "x\\|y\\|z");
}

#[test]
fn substituted_outline_sentence_reads_naturally() {
    let row = [("who", "Ana"), ("n", "2")];
    let sentence = substitute_placeholders("Given <who> owns <n> cats", &row);
    assert_eq!(sentence, "Given Ana owns 2 cats");
}

#[test]
fn tag_lines_feed_filters() {
    let Some(tags) = steal_tags_from_line("@red @primary") else {
        panic!("tag line should be recognised");
    };
    let Ok(filter) = TagFilter::parse(&["@red,~@blue"]) else {
        panic!("filter should parse");
    };
    assert!(filter.matches(&tags));
}

#[test]
fn every_builtin_language_has_all_keywords() {
    for language in cress_patterns::LANGUAGES {
        for field in [
            KeywordField::Feature,
            KeywordField::Scenario,
            KeywordField::ScenarioOutline,
            KeywordField::Examples,
        ] {
            assert!(
                language.alternatives(field).next().is_some(),
                "{} lacks {field:?}",
                language.code
            );
        }
        assert_eq!(Language::lookup(language.code), Some(language));
    }
}
