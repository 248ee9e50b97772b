//! Behavioural tests for scenario outlines run end to end.

use std::cell::RefCell;
use std::rc::Rc;

use camino::Utf8Path;
use cress::{
    Feature, FailureReason, Hooks, Registry, RunController, Runner, StepError, StepStatus,
    load_feature_file,
};
use rstest::{fixture, rstest};

#[derive(Debug, Default)]
struct Basket {
    count: u32,
    price: u32,
    paid: u32,
}

#[fixture]
fn checkout() -> Feature {
    let path = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/features/outline.feature");
    load_feature_file(&path).unwrap_or_else(|err| panic!("outline.feature should load: {err}"))
}

#[fixture]
fn registry() -> Registry<Basket> {
    let mut registry = Registry::new();
    registry
        .step(
            r#"a basket with (?P<count>\d+) "(?P<item>[^"]+)""#,
            |basket: &mut Basket, call| {
                basket.count = call.named("count").unwrap_or("0").parse()?;
                let item = call.named("item").unwrap_or_default();
                let row = call
                    .table()
                    .and_then(|table| table.hashes().find(|row| row.get("item") == Some(item)))
                    .ok_or_else(|| StepError::failed(format!("no price listed for {item}")))?;
                basket.price = row.get("price").unwrap_or("0").parse()?;
                Ok(())
            },
        )
        .and_then(|r| {
            r.step("I check out", |basket, _| {
                basket.paid = basket.count * basket.price;
                Ok(())
            })
        })
        .and_then(|r| {
            r.step(r"I pay (\d+)", |basket, call| {
                let expected: u32 = call.arg(0).unwrap_or("0").parse()?;
                if basket.paid == expected {
                    Ok(())
                } else {
                    Err(StepError::failed(format!(
                        "paid {}, expected {expected}",
                        basket.paid
                    )))
                }
            })
        })
        .unwrap_or_else(|err| panic!("patterns should compile: {err}"));
    registry
}

#[rstest]
fn each_example_row_is_one_concrete_run(registry: Registry<Basket>, checkout: Feature) {
    let mut basket = Basket::default();
    let totals = Runner::new(&registry, RunController::default())
        .run(&mut basket, &[checkout])
        .unwrap_or_else(|err| panic!("run: {err}"));

    let runs: Vec<_> = totals.scenario_results().collect();
    assert_eq!(runs.len(), 3);
    for (index, run) in runs.iter().enumerate() {
        assert_eq!(run.row_index, Some(index));
        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.tags, ["shop"]);
        let counts = run.counts();
        assert_eq!(
            counts.passed + counts.failed + counts.skipped + counts.undefined,
            counts.total()
        );
    }
    let ids: Vec<u64> = runs.iter().map(|run| run.id.get()).collect();
    assert_eq!(ids, [1, 2, 3]);

    let Some(second) = runs.get(1) else {
        panic!("expected a second run");
    };
    let sentences: Vec<&str> = second.steps.iter().map(|r| r.step.sentence()).collect();
    assert_eq!(
        sentences,
        ["Given a basket with 3 \"pear\"", "When I check out", "Then I pay 12"]
    );
    let cells = second
        .steps
        .first()
        .and_then(|record| record.step.table())
        .map(|table| table.values_under("price"));
    assert_eq!(cells, Some(Some(vec!["4"])));

    assert_eq!(totals.scenarios_passed(), 2);
    assert_eq!(totals.scenarios_failed(), 1);
    assert_eq!(
        runs.last().and_then(|run| run.steps.last()).map(|r| r.status),
        Some(StepStatus::Failed)
    );
}

#[rstest]
fn outline_row_hook_sees_each_row_and_its_failures(registry: Registry<Basket>, checkout: Feature) {
    type Seen = Vec<(usize, String, Vec<FailureReason>)>;
    let seen: Rc<RefCell<Seen>> = Rc::default();
    let sink = Rc::clone(&seen);
    let mut hooks = Hooks::new();
    hooks.on_outline_row(move |_: &mut Basket, _, index, row, failures| {
        sink.borrow_mut().push((
            index,
            row.get("item").unwrap_or_default().to_string(),
            failures.to_vec(),
        ));
    });

    let mut basket = Basket::default();
    Runner::new(&registry, RunController::default())
        .with_hooks(&hooks)
        .run(&mut basket, &[checkout])
        .unwrap_or_else(|err| panic!("run: {err}"));

    let seen = seen.borrow();
    let rows: Vec<(usize, &str, usize)> = seen
        .iter()
        .map(|(index, item, failures)| (*index, item.as_str(), failures.len()))
        .collect();
    assert_eq!(rows, [(0, "apple", 0), (1, "pear", 0), (2, "plum", 1)]);
    let message = seen
        .last()
        .and_then(|(_, _, failures)| failures.first())
        .map(|reason| reason.message.as_str());
    assert_eq!(message, Some("paid 5, expected 6"));
}

#[rstest]
fn selected_indices_skip_unlisted_scenarios(registry: Registry<Basket>, checkout: Feature) {
    let mut basket = Basket::default();
    let mut runner = Runner::new(&registry, RunController::default());
    let skipped = runner.run_feature_with(&mut basket, &checkout, Some([2].as_slice()));
    assert!(skipped.scenarios.is_empty());
    let everything: &[usize] = &[];
    let all = runner.run_feature_with(&mut basket, &checkout, Some(everything));
    assert_eq!(all.scenarios.len(), 3);
    assert_eq!(all.scenarios.first().map(|run| run.id.get()), Some(1));
}
