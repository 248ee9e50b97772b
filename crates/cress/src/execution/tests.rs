//! Unit tests for step execution.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use super::*;

#[derive(Debug, Default)]
struct World {
    log: Vec<String>,
    count: i64,
}

#[fixture]
fn registry() -> Registry<World> {
    let mut registry = Registry::new();
    registry
        .step("I add 2 and check for 5", |world: &mut World, call| {
            call.behave_as(world, "Given I add 2\nThen the count is 5")
        })
        .and_then(|r| {
            r.step(r"I add (\d+)", |world, call| {
                world.count += call.arg(0).unwrap_or("0").parse::<i64>()?;
                Ok(())
            })
        })
        .and_then(|r| {
            r.step(r"the count is (?P<expected>\S+)", |world, call| {
                let expected: i64 = call.named("expected").unwrap_or("").parse()?;
                if world.count == expected {
                    Ok(())
                } else {
                    Err(StepError::failed(format!(
                        "count was {}, expected {expected}",
                        world.count
                    )))
                }
            })
        })
        .and_then(|r| r.step("it explodes", |_, _| panic!("kaboom")))
        .and_then(|r| {
            r.step("I delegate to nothing", |world, call| {
                call.when(world, "When nobody defined this")
            })
        })
        .and_then(|r| {
            r.step("I note the table", |world, call| {
                let names = call
                    .table()
                    .and_then(|table| table.values_under("name"))
                    .ok_or("missing name column")?;
                world.log.extend(names.into_iter().map(str::to_string));
                Ok(())
            })
        })
        .unwrap_or_else(|err| panic!("patterns should compile: {err}"));
    registry
}

fn steps(text: &str) -> Vec<Step> {
    parse_steps(text, None).unwrap_or_else(|err| panic!("steps should parse: {err}"))
}

fn statuses(records: &[StepRecord]) -> Vec<StepStatus> {
    records.iter().map(|record| record.status).collect()
}

#[rstest]
fn passes_steps_in_order(registry: Registry<World>) {
    let mut world = World::default();
    let records =
        Executor::new(&registry).run(&mut world, &steps("Given I add 2\nAnd I add 3\nThen the count is 5"));
    assert_eq!(statuses(&records), [StepStatus::Passed; 3]);
    assert!(records.iter().all(|record| record.definition.is_some()));
}

#[rstest]
fn failure_skips_the_rest(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry).run(
        &mut world,
        &steps("Given I add 1\nThen the count is 2\nAnd I add 10\nAnd whatever"),
    );
    assert_eq!(
        statuses(&records),
        [
            StepStatus::Passed,
            StepStatus::Failed,
            StepStatus::Skipped,
            StepStatus::Skipped
        ]
    );
    assert_eq!(world.count, 1);
    let Some(reason) = records.get(1).and_then(|record| record.failure.as_ref()) else {
        panic!("failed step should carry a reason");
    };
    assert_eq!(reason.kind, "StepFailed");
    assert_eq!(reason.message, "count was 1, expected 2");
    assert!(reason.trace.contains("Then the count is 2"));
    assert_eq!(records.len(), 4);
}

#[rstest]
fn undefined_step_halts_the_run(registry: Registry<World>) {
    let mut world = World::default();
    let records =
        Executor::new(&registry).run(&mut world, &steps("Given nobody knows me\nWhen I add 1"));
    assert_eq!(statuses(&records), [StepStatus::Undefined, StepStatus::Skipped]);
    assert_eq!(world.count, 0);
}

#[rstest]
fn panics_become_failures(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry).run(&mut world, &steps("When it explodes"));
    let Some(reason) = records.first().and_then(|record| record.failure.as_ref()) else {
        panic!("panic should be recorded");
    };
    assert_eq!(reason.kind, "Panic");
    assert_eq!(reason.message, "kaboom");
}

#[rstest]
fn parse_errors_keep_their_type_name(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry).run(&mut world, &steps("Then the count is three"));
    assert_eq!(
        records
            .first()
            .and_then(|record| record.failure.as_ref())
            .map(|reason| reason.kind.as_str()),
        Some("ParseIntError")
    );
}

#[rstest]
fn not_run_mode_never_matches(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry)
        .run_steps(false)
        .run(&mut world, &steps("Given I add 1\nGiven nobody knows me"));
    assert_eq!(statuses(&records), [StepStatus::NotRun, StepStatus::NotRun]);
    assert_eq!(world.count, 0);
}

#[rstest]
fn case_folding_follows_the_executor(registry: Registry<World>) {
    let mut world = World::default();
    let sensitive = Executor::new(&registry).run(&mut world, &steps("Given I ADD 1"));
    assert_eq!(statuses(&sensitive), [StepStatus::Undefined]);
    let folded = Executor::new(&registry)
        .ignore_case(true)
        .run(&mut world, &steps("Given I ADD 1"));
    assert_eq!(statuses(&folded), [StepStatus::Passed]);
}

#[rstest]
fn delegation_surfaces_the_inner_reason(registry: Registry<World>) {
    let mut world = World { count: 1, ..World::default() };
    let records =
        Executor::new(&registry).run(&mut world, &steps("Given I add 2 and check for 5"));
    let Some(reason) = records.first().and_then(|record| record.failure.as_ref()) else {
        panic!("delegating step should fail");
    };
    assert_eq!(reason.kind, "StepFailed");
    assert_eq!(reason.message, "count was 3, expected 5");
    assert!(reason.trace.contains("Then the count is 5"));
    assert!(!reason.trace.contains("check for 5"));
}

#[rstest]
fn delegation_passes_when_nested_steps_pass(registry: Registry<World>) {
    let mut world = World { count: 3, ..World::default() };
    let records =
        Executor::new(&registry).run(&mut world, &steps("Given I add 2 and check for 5"));
    assert_eq!(statuses(&records), [StepStatus::Passed]);
}

#[rstest]
fn delegating_to_an_undefined_step_fails(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry).run(&mut world, &steps("Given I delegate to nothing"));
    let Some(reason) = records.first().and_then(|record| record.failure.as_ref()) else {
        panic!("delegating step should fail");
    };
    assert_eq!(reason.kind, NO_DEFINITION_FOUND);
    assert!(reason.message.contains("When nobody defined this"));
}

#[rstest]
fn handlers_read_step_tables(registry: Registry<World>) {
    let mut world = World::default();
    let records = Executor::new(&registry).run(
        &mut world,
        &steps("Given I note the table\n  | name |\n  | Ana  |\n  | Rui  |"),
    );
    assert_eq!(statuses(&records), [StepStatus::Passed]);
    assert_eq!(world.log, ["Ana", "Rui"]);
}

#[rstest]
fn after_step_hooks_see_every_visited_step(registry: Registry<World>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut hooks = Hooks::new();
    let before = Rc::clone(&seen);
    let after = Rc::clone(&seen);
    hooks
        .before_each_step(move |_: &mut World, step| {
            before.borrow_mut().push(format!("before {}", step.sentence()));
        })
        .after_each_step(move |_, record| {
            after.borrow_mut().push(format!(
                "after {} {}",
                record.step.sentence(),
                record.status.label()
            ));
        });
    let mut world = World::default();
    let records = Executor::new(&registry).with_hooks(&hooks).run(
        &mut world,
        &steps("Given I add 1\nThen the count is 2\nAnd I add 1\nAnd nobody knows me"),
    );
    assert_eq!(records.len(), 4);
    assert_eq!(
        *seen.borrow(),
        [
            "before Given I add 1",
            "after Given I add 1 passed",
            "before Then the count is 2",
            "after Then the count is 2 failed",
            "after And I add 1 skipped",
            "after And nobody knows me skipped",
        ]
    );
}

#[rstest]
fn after_step_hooks_see_undefined_and_not_run_steps(registry: Registry<World>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut hooks = Hooks::new();
    let after = Rc::clone(&seen);
    hooks.after_each_step(move |_: &mut World, record| {
        after.borrow_mut().push(record.status);
    });
    let mut world = World::default();
    Executor::new(&registry)
        .with_hooks(&hooks)
        .run(&mut world, &steps("Given nobody knows me\nWhen I add 1"));
    Executor::new(&registry)
        .with_hooks(&hooks)
        .run_steps(false)
        .run(&mut world, &steps("Given I add 1"));
    assert_eq!(
        *seen.borrow(),
        [StepStatus::Undefined, StepStatus::Skipped, StepStatus::NotRun]
    );
    assert_eq!(world.count, 0);
}
