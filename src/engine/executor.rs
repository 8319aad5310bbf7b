// src/engine/executor.rs

//! The scheduler.
//!
//! One run is a single-threaded loop:
//!
//! 1. block every `Pending` task that has a `Failed`/`Blocked` dependency,
//! 2. ask the graph for eligible tasks (sorted by name),
//! 3. run the first one, or drain whatever is still pending and stop.
//!
//! Exactly one task runs per step, so execution order, clock readings and
//! DLQ contents depend only on the graph and the seed.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::dag::{Task, TaskGraph};
use crate::engine::context::{ExecutionContext, LogicalClock, ResultRegistry};
use crate::engine::dlq::{DlqSystem, dependency_failed_reason, missing_dependency_reason};
use crate::engine::random::DeterministicRandomSource;
use crate::engine::result::{ExecutionResult, ResultParts};
use crate::errors::TaskError;
use crate::render::{Renderer, RendererGuard};
use crate::types::{FailureKind, Seed, TaskName, TaskStatus};

/// Runs a validated [`TaskGraph`] under a fixed seed.
///
/// The engine holds no per-run state; every call to [`ExecutionEngine::run`]
/// starts from scratch, so repeated runs give identical results.
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    graph: TaskGraph,
    seed: Seed,
}

impl ExecutionEngine {
    pub fn new(graph: TaskGraph, seed: Seed) -> Self {
        Self { graph, seed }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Run without a renderer.
    pub fn run(&self) -> ExecutionResult {
        self.run_with_renderer(None)
    }

    /// Run, reporting progress to `renderer` on a best-effort basis.
    pub fn run_with_renderer(&self, renderer: Option<&mut dyn Renderer>) -> ExecutionResult {
        info!(seed = self.seed, tasks = self.graph.len(), "starting run");

        let mut state = RunState::new(&self.graph, self.seed, RendererGuard::new(renderer));

        loop {
            state.block_disqualified();

            let next = self.graph.eligible_tasks(&state.registry).into_iter().next();
            match next {
                Some(task) => state.run_task(task),
                None => {
                    state.drain_pending();
                    break;
                }
            }
        }

        state.finish()
    }
}

/// Everything that changes during one run. Built fresh by every `run` call.
struct RunState<'g, 'r> {
    graph: &'g TaskGraph,
    seed: Seed,
    random: DeterministicRandomSource,
    registry: ResultRegistry,
    clock: LogicalClock,
    dlq: DlqSystem,
    execution_order: Vec<TaskName>,
    task_durations: BTreeMap<TaskName, u64>,
    renderer: RendererGuard<'r>,
}

impl<'g, 'r> RunState<'g, 'r> {
    fn new(graph: &'g TaskGraph, seed: Seed, renderer: RendererGuard<'r>) -> Self {
        Self {
            graph,
            seed,
            random: DeterministicRandomSource::new(seed),
            registry: ResultRegistry::with_pending(graph.task_names()),
            clock: LogicalClock::new(),
            dlq: DlqSystem::new(),
            execution_order: Vec::new(),
            task_durations: BTreeMap::new(),
            renderer,
        }
    }

    /// Run one eligible task to a terminal state.
    fn run_task(&mut self, task: &Task) {
        let name = task.name();

        self.registry.set_status(name, TaskStatus::Running);
        self.renderer
            .notify("on_task_start", |r| r.on_task_start(name));

        let started_at = self.clock.tick();
        debug!(task = %name, clock = started_at, "running task");

        let outcome = {
            let ctx = ExecutionContext::new(self.seed, started_at, name, self.registry.clone());
            let mut rng = self.random.for_task(name);
            panic::catch_unwind(AssertUnwindSafe(|| task.run(&ctx, &mut rng)))
                .unwrap_or_else(|payload| Err(TaskError::new(panic_reason(payload.as_ref()))))
        };

        let finished_at = self.clock.advance(task.cost());
        let duration = finished_at - started_at;

        self.execution_order.push(name.to_string());
        self.task_durations.insert(name.to_string(), duration);

        let status = match outcome {
            Ok(value) => {
                self.registry.complete(name, value);
                info!(task = %name, duration, "task completed");
                TaskStatus::Completed
            }
            Err(err) => {
                self.registry.set_status(name, TaskStatus::Failed);
                warn!(task = %name, error = %err, "task failed");
                self.record_dlq(name, FailureKind::TaskExecutionError, err.message().to_string());
                TaskStatus::Failed
            }
        };

        self.renderer
            .notify("on_task_end", |r| r.on_task_end(name, status, duration));
    }

    /// Block every pending task that can no longer run because a dependency
    /// failed, was blocked, or is missing. Repeats until nothing changes so
    /// blockage cascades through the graph in one step.
    fn block_disqualified(&mut self) {
        while self.block_pass(false) {}
    }

    /// Nothing is eligible: whatever is still pending can never run.
    fn drain_pending(&mut self) {
        if !self.registry.has_pending() {
            return;
        }
        warn!("no eligible tasks left; draining pending tasks to the DLQ");
        while self.block_pass(true) {}
    }

    /// One sweep over pending tasks in name order. Returns whether any task
    /// was blocked.
    ///
    /// With `unfinished_disqualifies`, dependencies that have not completed
    /// count against a task too; this is only used when draining.
    fn block_pass(&mut self, unfinished_disqualifies: bool) -> bool {
        let graph = self.graph;
        let mut changed = false;

        for task in graph.tasks() {
            if self.registry.status_of(task.name()) != Some(TaskStatus::Pending) {
                continue;
            }
            if let Some((kind, reason)) = self.disqualification(task, unfinished_disqualifies) {
                self.block(task.name(), kind, reason);
                changed = true;
            }
        }

        changed
    }

    fn disqualification(
        &self,
        task: &Task,
        unfinished_disqualifies: bool,
    ) -> Option<(FailureKind, String)> {
        let missing: Vec<&str> = task
            .dependencies()
            .iter()
            .filter(|dep| !self.graph.contains(dep))
            .map(|dep| dep.as_str())
            .collect();
        if !missing.is_empty() {
            return Some((
                FailureKind::MissingDependency,
                missing_dependency_reason(&missing),
            ));
        }

        let failed: Vec<&str> = task
            .dependencies()
            .iter()
            .filter(|dep| match self.registry.status_of(dep) {
                Some(status) if status.disqualifies_dependents() => true,
                Some(TaskStatus::Completed) => false,
                _ => unfinished_disqualifies,
            })
            .map(|dep| dep.as_str())
            .collect();
        if !failed.is_empty() {
            return Some((FailureKind::DependencyFailed, dependency_failed_reason(&failed)));
        }

        None
    }

    fn block(&mut self, name: &str, kind: FailureKind, reason: String) {
        self.registry.set_status(name, TaskStatus::Blocked);
        warn!(task = %name, %kind, %reason, "task blocked");
        self.record_dlq(name, kind, reason);
        self.renderer
            .notify("on_task_end", |r| r.on_task_end(name, TaskStatus::Blocked, 0));
    }

    fn record_dlq(&mut self, name: &str, kind: FailureKind, reason: String) {
        let timestamp = self.clock.tick();
        debug!(task = %name, %kind, timestamp, "recording DLQ entry");
        self.dlq.record(name, kind, reason, timestamp);
    }

    fn finish(self) -> ExecutionResult {
        let RunState {
            graph,
            seed,
            registry,
            clock,
            dlq,
            execution_order,
            task_durations,
            mut renderer,
            ..
        } = self;

        let result = ExecutionResult::from_parts(ResultParts {
            seed,
            total_tasks: graph.len(),
            execution_order,
            completed: registry.names_with_status(TaskStatus::Completed),
            failed: registry.names_with_status(TaskStatus::Failed),
            blocked: registry.names_with_status(TaskStatus::Blocked),
            dlq: dlq.into_entries(),
            task_durations,
            total_duration: clock.now(),
            values: registry.into_values(),
        });

        info!(
            seed,
            completed = result.completed().len(),
            failed = result.failed().len(),
            blocked = result.blocked().len(),
            total_duration = result.total_duration(),
            "run finished"
        );

        renderer.notify("on_run_complete", |r| r.on_run_complete(&result));

        result
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic payload>".to_string());
    format!("task panicked: {message}")
}
