// src/dag/task.rs

//! Task definitions and the actions they run.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};
use serde_json::json;

use crate::engine::{ExecutionContext, TaskRng};
use crate::errors::TaskError;
use crate::types::TaskName;

/// Value a task produces on success; stored in the result registry.
pub type TaskValue = serde_json::Value;

/// Explicit outcome of a single task invocation.
pub type TaskOutcome = std::result::Result<TaskValue, TaskError>;

/// Something a task can run.
///
/// The action receives a read-only snapshot of the run and its own random
/// stream. It must not read wall-clock time or OS entropy if the run is to
/// stay reproducible.
pub trait TaskAction: Send + Sync {
    fn run(&self, ctx: &ExecutionContext, rng: &mut TaskRng) -> TaskOutcome;
}

impl<F> TaskAction for F
where
    F: Fn(&ExecutionContext, &mut TaskRng) -> TaskOutcome + Send + Sync,
{
    fn run(&self, ctx: &ExecutionContext, rng: &mut TaskRng) -> TaskOutcome {
        self(ctx, rng)
    }
}

/// A named unit of work with its declared dependencies.
///
/// Tasks are immutable once built; the graph owns them for its lifetime.
#[derive(Clone)]
pub struct Task {
    name: TaskName,
    /// Sorted and de-duplicated.
    dependencies: Vec<TaskName>,
    /// Logical clock units consumed by one invocation.
    cost: u64,
    action: Arc<dyn TaskAction>,
}

impl Task {
    /// Create a task with no dependencies and a cost of one logical unit.
    pub fn new(name: impl Into<TaskName>, action: impl TaskAction + 'static) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            cost: 1,
            action: Arc::new(action),
        }
    }

    /// Create a task from a closure.
    ///
    /// Same as [`Task::new`], but the explicit `Fn` bound lets the closure's
    /// argument types be inferred.
    pub fn from_fn<F>(name: impl Into<TaskName>, f: F) -> Self
    where
        F: Fn(&ExecutionContext, &mut TaskRng) -> TaskOutcome + Send + Sync + 'static,
    {
        Self::new(name, f)
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self.dependencies.sort();
        self.dependencies.dedup();
        self
    }

    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = cost;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[TaskName] {
        &self.dependencies
    }

    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub(crate) fn run(&self, ctx: &ExecutionContext, rng: &mut TaskRng) -> TaskOutcome {
        self.action.run(ctx, rng)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

/// Action used for tasks declared in a config file.
///
/// It fails with probability `failure_rate`, decided by the task's own random
/// stream, so a given seed always fails the same tasks. On success it returns
/// a token drawn from the same stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedAction {
    failure_rate: f64,
}

impl SimulatedAction {
    pub const FAILURE_MESSAGE: &'static str = "task failed due to configured failure rate";

    /// `failure_rate` is clamped to `[0, 1]`; NaN counts as zero.
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl TaskAction for SimulatedAction {
    fn run(&self, _ctx: &ExecutionContext, rng: &mut TaskRng) -> TaskOutcome {
        if rng.gen_bool(self.failure_rate) {
            return Err(TaskError::new(Self::FAILURE_MESSAGE));
        }
        Ok(json!({ "token": rng.next_u64() }))
    }
}
