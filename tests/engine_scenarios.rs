// tests/engine_scenarios.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, TaskConfigBuilder};
use crate::common::renderers::{RecordingRenderer, RenderEvent};
use crate::common::{failing_task, graph, init_tracing, ok_task, run_tasks};

use std::collections::BTreeMap;

use serde_json::json;

use detdag::dag::{SimulatedAction, Task};
use detdag::engine::{DlqEntry, ExecutionEngine};
use detdag::types::{FailureKind, TaskStatus};

/// a <- b, {a, b} <- c, with `a` configured to always fail.
fn failing_root_config() -> detdag::config::ConfigFile {
    ConfigFileBuilder::new()
        .with_seed(1)
        .with_task("task_a", TaskConfigBuilder::new().always_fail().build())
        .with_task("task_b", TaskConfigBuilder::new().after("task_a").build())
        .with_task(
            "task_c",
            TaskConfigBuilder::new().after("task_a").after("task_b").build(),
        )
        .build()
}

#[test]
fn failing_root_blocks_the_whole_chain() {
    init_tracing();

    let cfg = failing_root_config();
    let engine = ExecutionEngine::new(cfg.build_graph().unwrap(), cfg.seed());
    let result = engine.run();

    assert_eq!(result.seed(), 1);
    assert!(result.completed().is_empty());
    assert_eq!(result.failed(), ["task_a"]);
    assert_eq!(result.blocked(), ["task_b", "task_c"]);
    assert_eq!(result.execution_order(), ["task_a"]);

    assert_eq!(
        result.dlq(),
        [
            DlqEntry {
                task: "task_a".into(),
                reason: SimulatedAction::FAILURE_MESSAGE.into(),
                timestamp: 3,
                kind: FailureKind::TaskExecutionError,
            },
            DlqEntry {
                task: "task_b".into(),
                reason: "Failed dependencies: task_a".into(),
                timestamp: 4,
                kind: FailureKind::DependencyFailed,
            },
            DlqEntry {
                task: "task_c".into(),
                reason: "Failed dependencies: task_a, task_b".into(),
                timestamp: 5,
                kind: FailureKind::DependencyFailed,
            },
        ]
    );

    assert_eq!(
        result.task_durations(),
        &BTreeMap::from([("task_a".to_string(), 1)])
    );
    assert_eq!(result.total_duration(), 5);
    assert_eq!(result.summary().dlq_count, 3);
    assert_eq!(result.summary().total_tasks, 3);
}

#[test]
fn blocked_dependent_never_reaches_running() {
    init_tracing();

    let cfg = failing_root_config();
    let engine = ExecutionEngine::new(cfg.build_graph().unwrap(), cfg.seed());
    let mut recorder = RecordingRenderer::new();
    engine.run_with_renderer(Some(&mut recorder));

    assert_eq!(
        recorder.events,
        vec![
            RenderEvent::Start("task_a".into()),
            RenderEvent::End("task_a".into(), TaskStatus::Failed, 1),
            RenderEvent::End("task_b".into(), TaskStatus::Blocked, 0),
            RenderEvent::End("task_c".into(), TaskStatus::Blocked, 0),
            RenderEvent::RunComplete,
        ]
    );
}

#[test]
fn independent_branches_survive_a_failure() {
    init_tracing();

    let result = run_tasks(
        [
            ok_task("a", &[]),
            failing_task("b", &[], "boom"),
            ok_task("c", &["a"]),
            ok_task("d", &["b"]),
            ok_task("e", &["c"]),
        ],
        7,
    );

    assert_eq!(result.execution_order(), ["a", "b", "c", "e"]);
    assert_eq!(result.completed(), ["a", "c", "e"]);
    assert_eq!(result.failed(), ["b"]);
    assert_eq!(result.blocked(), ["d"]);

    let dlq = result.dlq();
    assert_eq!(dlq.len(), 2);
    assert_eq!(dlq[0].task, "b");
    assert_eq!(dlq[0].reason, "boom");
    assert_eq!(dlq[0].timestamp, 5);
    assert_eq!(dlq[1].task, "d");
    assert_eq!(dlq[1].reason, "Failed dependencies: b");
    assert_eq!(dlq[1].timestamp, 6);
    assert_eq!(result.total_duration(), 10);
}

#[test]
fn ties_are_broken_by_name_one_task_per_step() {
    init_tracing();

    // `a` only becomes eligible after `z`, even though it sorts first.
    let result = run_tasks(
        [ok_task("z", &[]), ok_task("a", &["z"]), ok_task("m", &[])],
        0,
    );

    assert_eq!(result.execution_order(), ["m", "z", "a"]);
    assert!(result.is_clean());
}

#[test]
fn blockage_cascades_regardless_of_name_order() {
    init_tracing();

    // `a` depends on `y`, which depends on the failing `x`. `a` is swept
    // before `y` is blocked, so it must be picked up on a later pass.
    let result = run_tasks(
        [
            failing_task("x", &[], "x broke"),
            ok_task("y", &["x"]),
            ok_task("a", &["y"]),
        ],
        3,
    );

    let dlq: Vec<(&str, &str, u64)> = result
        .dlq()
        .iter()
        .map(|e| (e.task.as_str(), e.reason.as_str(), e.timestamp))
        .collect();
    assert_eq!(
        dlq,
        vec![
            ("x", "x broke", 3),
            ("y", "Failed dependencies: x", 4),
            ("a", "Failed dependencies: y", 5),
        ]
    );
    assert_eq!(result.blocked(), ["a", "y"]);
}

#[test]
fn durations_follow_task_cost_on_the_logical_clock() {
    init_tracing();

    let result = run_tasks(
        [
            ok_task("first", &[]).with_cost(2),
            ok_task("second", &["first"]).with_cost(3),
        ],
        42,
    );

    assert_eq!(result.task_durations()["first"], 2);
    assert_eq!(result.task_durations()["second"], 3);
    // Each start ticks once, then the cost is added.
    assert_eq!(result.total_duration(), 7);
}

#[test]
fn context_exposes_snapshot_of_prior_results() {
    init_tracing();

    let producer = Task::from_fn("producer", |_, _| Ok(json!(41)));
    let consumer = Task::from_fn("consumer", |ctx, _| {
        assert_eq!(ctx.task(), "consumer");
        assert_eq!(ctx.seed(), 9);
        assert_eq!(ctx.now(), 3);
        assert_eq!(ctx.registry().status_of("producer"), Some(TaskStatus::Completed));
        assert_eq!(ctx.registry().status_of("consumer"), Some(TaskStatus::Running));
        let upstream = ctx
            .value_of("producer")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| detdag::errors::TaskError::new("producer value missing"))?;
        Ok(json!(upstream + 1))
    })
    .with_dependencies(["producer"]);

    let result = run_tasks([producer, consumer], 9);

    assert_eq!(result.completed(), ["consumer", "producer"]);
    assert_eq!(result.value_of("consumer"), Some(&json!(42)));
}

#[test]
fn panicking_task_is_recorded_as_failed() {
    init_tracing();

    let result = run_tasks(
        [
            Task::from_fn("explodes", |_, _| panic!("kaboom")),
            ok_task("after", &["explodes"]),
            ok_task("unrelated", &[]),
        ],
        5,
    );

    assert_eq!(result.failed(), ["explodes"]);
    assert_eq!(result.blocked(), ["after"]);
    assert_eq!(result.completed(), ["unrelated"]);
    assert_eq!(result.dlq()[0].reason, "task panicked: kaboom");
    assert_eq!(result.dlq()[0].kind, FailureKind::TaskExecutionError);
}

#[test]
fn repeated_runs_of_one_engine_are_identical() {
    init_tracing();

    let engine = ExecutionEngine::new(
        graph([
            Task::new("coin", SimulatedAction::new(0.5)),
            Task::new("dice", SimulatedAction::new(0.5)).with_dependencies(["coin"]),
            Task::new("other", SimulatedAction::new(0.5)),
        ]),
        2024,
    );

    let first = engine.run();
    for _ in 0..5 {
        assert_eq!(engine.run(), first);
    }
}

#[test]
fn every_task_ends_in_exactly_one_terminal_set() {
    init_tracing();

    let result = run_tasks(
        [
            ok_task("a", &[]),
            failing_task("b", &["a"], "nope"),
            ok_task("c", &["b"]),
            ok_task("d", &["a"]),
        ],
        11,
    );

    for name in ["a", "b", "c", "d"] {
        let hits = [result.completed(), result.failed(), result.blocked()]
            .iter()
            .filter(|set| set.iter().any(|t| t == name))
            .count();
        assert_eq!(hits, 1, "task {name} should be in exactly one set");
    }
    assert_eq!(result.status_of("c"), Some(TaskStatus::Blocked));
    assert_eq!(result.status_of("missing"), None);
}
