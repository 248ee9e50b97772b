//! Behavioural tests for tag selection and syntax-only runs.

use camino::{Utf8Path, Utf8PathBuf};
use cress::{
    Feature, FeatureError, MemoryPersister, Registry, RunController, RunError, Runner,
    ScenarioId, ScenarioStatus, StepStatus, Summary, TagFilter, load_feature_file,
};
use rstest::{fixture, rstest};

#[fixture]
fn paints() -> Feature {
    let path = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/features/tags.feature");
    load_feature_file(&path).unwrap_or_else(|err| panic!("tags.feature should load: {err}"))
}

#[fixture]
fn registry() -> Registry<Vec<String>> {
    let mut registry = Registry::new();
    registry
        .step("the paint is mixed", |mixed: &mut Vec<String>, call| {
            mixed.push(call.step().location().line.to_string());
            Ok(())
        })
        .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
    registry
}

fn controller(groups: &[&str]) -> RunController {
    let tags = TagFilter::parse(groups).unwrap_or_else(|err| panic!("filter: {err}"));
    RunController::new(tags, false, false, None)
        .unwrap_or_else(|err| panic!("controller should build: {err}"))
}

fn statuses(registry: &Registry<Vec<String>>, paints: Feature, groups: &[&str]) -> Vec<ScenarioStatus> {
    let mut mixed = Vec::new();
    let totals = Runner::new(registry, controller(groups))
        .run(&mut mixed, &[paints])
        .unwrap_or_else(|err| panic!("run: {err}"));
    assert_eq!(totals.scenarios_ran(), 3);
    totals.scenario_results().map(cress::ScenarioResult::status).collect()
}

#[rstest]
#[case::conjunction(&["@red,~@blue"], [true, false, false])]
#[case::disjunction(&["@primary", "@black"], [true, false, true])]
#[case::feature_tags_are_inherited(&["@colours"], [true, true, true])]
#[case::no_filter(&[], [true, true, true])]
#[case::nothing_matches(&["@green"], [false, false, false])]
fn tag_groups_choose_scenarios(
    registry: Registry<Vec<String>>,
    paints: Feature,
    #[case] groups: &[&str],
    #[case] expected: [bool; 3],
) {
    let expected: Vec<ScenarioStatus> = expected
        .into_iter()
        .map(|runs| if runs { ScenarioStatus::Passed } else { ScenarioStatus::NotRun })
        .collect();
    assert_eq!(statuses(&registry, paints, groups), expected);
}

#[rstest]
fn excluded_scenarios_still_consume_ids(registry: Registry<Vec<String>>, paints: Feature) {
    let mut mixed = Vec::new();
    let totals = Runner::new(&registry, controller(&["@black"]))
        .run(&mut mixed, &[paints])
        .unwrap_or_else(|err| panic!("run: {err}"));
    let ids: Vec<(u64, bool)> = totals
        .scenario_results()
        .map(|run| (run.id.get(), run.not_run))
        .collect();
    assert_eq!(ids, [(1, true), (2, true), (3, false)]);
    assert_eq!(mixed.len(), 1);
    assert_eq!(totals.scenarios_not_run(), 2);
    assert!(totals.is_success());
}

#[rstest]
fn syntax_only_checks_without_running_but_persists(
    registry: Registry<Vec<String>>,
    paints: Feature,
) {
    let store = MemoryPersister::new();
    let controller = RunController::new(
        TagFilter::default(),
        false,
        true,
        Some(Box::new(store.clone())),
    )
    .unwrap_or_else(|err| panic!("controller should build: {err}"));
    let mut mixed = Vec::new();
    let totals = Runner::new(&registry, controller)
        .run(&mut mixed, &[paints])
        .unwrap_or_else(|err| panic!("run: {err}"));

    assert!(mixed.is_empty());
    assert!(
        totals
            .scenario_results()
            .flat_map(|run| &run.steps)
            .all(|record| record.status == StepStatus::NotRun)
    );
    assert_eq!(totals.steps_skipped(), 3);
    let expected: Summary = (1..=3)
        .map(|id| (ScenarioId::new(id), ScenarioStatus::Failed))
        .collect();
    assert_eq!(store.stored(), Some(expected));
}

#[rstest]
fn syntax_errors_abort_before_anything_runs(registry: Registry<Vec<String>>) {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non UTF-8 temp path: {}", path.display()));
    std::fs::write(
        base.join("a_good.feature"),
        "Feature: Fine\n  Scenario: Mix\n    Given the paint is mixed\n",
    )
    .unwrap_or_else(|err| panic!("write: {err}"));
    std::fs::write(base.join("b_broken.feature"), "Scenario: Orphan\n  Given the paint is mixed\n")
        .unwrap_or_else(|err| panic!("write: {err}"));

    let mut mixed = Vec::new();
    let result = Runner::new(&registry, RunController::default()).run_path(&mut mixed, &base);
    let Err(RunError::Feature(FeatureError::Syntax(error))) = &result else {
        panic!("expected a syntax error, got {result:?}");
    };
    assert_eq!(
        error.path.as_ref().and_then(|path| path.file_name()),
        Some("b_broken.feature")
    );
    assert!(mixed.is_empty());
}
