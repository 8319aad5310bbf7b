// tests/dlq.rs

mod common;
use crate::common::renderers::{RecordingRenderer, RenderEvent};
use crate::common::{failing_task, init_tracing, ok_task, run_tasks};

use detdag::dag::TaskGraph;
use detdag::engine::{DlqSystem, ExecutionEngine};
use detdag::engine::dlq::{dependency_failed_reason, missing_dependency_reason};
use detdag::types::{FailureKind, TaskStatus};

#[test]
fn entries_come_back_in_timestamp_then_name_order() {
    let mut dlq = DlqSystem::new();
    assert!(dlq.is_empty());

    dlq.record("late", FailureKind::DependencyFailed, "Failed dependencies: x", 9);
    dlq.record("zeta", FailureKind::TaskExecutionError, "boom", 2);
    dlq.record("alpha", FailureKind::MissingDependency, "Missing dependencies: y", 2);

    let tasks: Vec<String> = dlq.entries().into_iter().map(|e| e.task).collect();
    assert_eq!(tasks, vec!["alpha", "zeta", "late"]);
    assert_eq!(dlq.len(), 3);

    let deps = dlq.entries_of_kind(FailureKind::DependencyFailed);
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].task, "late");

    let owned = dlq.into_entries();
    assert_eq!(owned[0].task, "alpha");
}

#[test]
fn reason_strings_list_dependencies_comma_separated() {
    assert_eq!(dependency_failed_reason(&["a"]), "Failed dependencies: a");
    assert_eq!(
        dependency_failed_reason(&["task_a", "task_b"]),
        "Failed dependencies: task_a, task_b"
    );
    assert_eq!(
        missing_dependency_reason(&["ghost".to_string()]),
        "Missing dependencies: ghost"
    );
}

#[test]
fn dlq_holds_failed_and_blocked_tasks_only() {
    init_tracing();

    let result = run_tasks(
        [
            ok_task("fine", &[]),
            failing_task("bad", &[], "bad things"),
            ok_task("child", &["bad"]),
            ok_task("grandchild", &["child", "fine"]),
        ],
        17,
    );

    let mut in_dlq: Vec<&str> = result.dlq().iter().map(|e| e.task.as_str()).collect();
    in_dlq.sort();
    assert_eq!(in_dlq, vec!["bad", "child", "grandchild"]);

    let mut expected: Vec<&str> = result
        .failed()
        .iter()
        .chain(result.blocked())
        .map(String::as_str)
        .collect();
    expected.sort();
    assert_eq!(in_dlq, expected);

    // `fine` has not run yet when `grandchild` is blocked, so only the
    // disqualifying dependency is named.
    let grandchild = result
        .dlq()
        .iter()
        .find(|e| e.task == "grandchild")
        .unwrap();
    assert_eq!(grandchild.reason, "Failed dependencies: child");
    assert_eq!(grandchild.kind, FailureKind::DependencyFailed);
}

#[test]
fn timestamps_are_strictly_increasing() {
    init_tracing();

    let result = run_tasks(
        [
            failing_task("a", &[], "a"),
            failing_task("b", &[], "b"),
            ok_task("c", &["a", "b"]),
            ok_task("d", &["c"]),
        ],
        0,
    );

    let stamps: Vec<u64> = result.dlq().iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps.len(), 4);
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    assert!(stamps.iter().all(|&t| t <= result.total_duration()));
}

#[test]
fn dependency_missing_at_schedule_time_is_blocked() {
    init_tracing();

    let graph = TaskGraph::build_unchecked([
        ok_task("orphan", &["ghost"]),
        ok_task("downstream", &["orphan"]),
        ok_task("fine", &[]),
    ]);
    let mut recorder = RecordingRenderer::new();
    let result = ExecutionEngine::new(graph, 4).run_with_renderer(Some(&mut recorder));

    assert_eq!(result.blocked(), ["downstream", "orphan"]);
    assert_eq!(result.completed(), ["fine"]);
    assert_eq!(result.execution_order(), ["fine"]);

    let orphan = result.dlq().iter().find(|e| e.task == "orphan").unwrap();
    assert_eq!(orphan.kind, FailureKind::MissingDependency);
    assert_eq!(orphan.reason, "Missing dependencies: ghost");
    assert_eq!(orphan.timestamp, 1);

    let downstream = result.dlq().iter().find(|e| e.task == "downstream").unwrap();
    assert_eq!(downstream.kind, FailureKind::DependencyFailed);
    assert_eq!(downstream.reason, "Failed dependencies: orphan");
    // Swept before `orphan` in name order, so it is caught on the second pass.
    assert_eq!(downstream.timestamp, 2);

    assert!(!recorder.events.contains(&RenderEvent::Start("orphan".into())));
    assert!(recorder
        .events
        .contains(&RenderEvent::End("orphan".into(), TaskStatus::Blocked, 0)));
}

#[test]
fn stalled_tasks_are_drained_once_nothing_is_eligible() {
    init_tracing();

    // `ping` and `pong` wait on each other, so neither ever becomes eligible.
    let graph = TaskGraph::build_unchecked([
        ok_task("ping", &["pong"]),
        ok_task("pong", &["ping"]),
        ok_task("solo", &[]),
    ]);
    let mut recorder = RecordingRenderer::new();
    let result = ExecutionEngine::new(graph, 4).run_with_renderer(Some(&mut recorder));

    assert_eq!(result.completed(), ["solo"]);
    assert_eq!(result.blocked(), ["ping", "pong"]);

    let dlq: Vec<(&str, FailureKind, &str, u64)> = result
        .dlq()
        .iter()
        .map(|e| (e.task.as_str(), e.kind, e.reason.as_str(), e.timestamp))
        .collect();
    assert_eq!(
        dlq,
        vec![
            ("ping", FailureKind::DependencyFailed, "Failed dependencies: pong", 3),
            ("pong", FailureKind::DependencyFailed, "Failed dependencies: ping", 4),
        ]
    );
    assert_eq!(result.total_duration(), 4);

    let started: Vec<&RenderEvent> = recorder
        .events
        .iter()
        .filter(|e| matches!(e, RenderEvent::Start(_)))
        .collect();
    assert_eq!(started, vec![&RenderEvent::Start("solo".into())]);
}
