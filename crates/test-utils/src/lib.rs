pub mod builders;
pub mod renderers;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

use detdag::dag::{Task, TaskGraph};
use detdag::engine::{ExecutionEngine, ExecutionResult};
use detdag::errors::TaskError;
use detdag::types::Seed;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Task that always succeeds, returning its own name.
pub fn ok_task(name: &str, deps: &[&str]) -> Task {
    let owned = name.to_string();
    Task::from_fn(name, move |_, _| Ok(serde_json::json!(owned.clone())))
        .with_dependencies(deps.iter().copied())
}

/// Task that always fails with `message`.
pub fn failing_task(name: &str, deps: &[&str], message: &str) -> Task {
    let message = message.to_string();
    Task::from_fn(name, move |_, _| Err(TaskError::new(message.clone())))
        .with_dependencies(deps.iter().copied())
}

/// Build a graph from tasks, panicking if it is invalid.
pub fn graph(tasks: impl IntoIterator<Item = Task>) -> TaskGraph {
    TaskGraph::build(tasks).expect("test graph should be valid")
}

/// Build and run a graph once without a renderer.
pub fn run_tasks(tasks: impl IntoIterator<Item = Task>, seed: Seed) -> ExecutionResult {
    ExecutionEngine::new(graph(tasks), seed).run()
}
