use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Global run seed. Any signed 64-bit integer is accepted, negatives included.
pub type Seed = i64;

/// Seed used when neither the CLI nor the config provides one.
pub const DEFAULT_SEED: Seed = 42;

/// Lifecycle state of a task within a single run.
///
/// Every run starts every task at `Pending`. `Completed`, `Failed` and
/// `Blocked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    /// The task's action ran and returned an error.
    Failed,
    /// The task never became eligible because a dependency did not complete.
    Blocked,
}

impl TaskStatus {
    /// Whether a dependent of a task in this state can never run.
    pub fn disqualifies_dependents(self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Blocked)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Blocked => "BLOCKED",
        };
        f.write_str(s)
    }
}

/// Closed taxonomy of per-task failures recorded in the DLQ.
///
/// Structural failures (cycles, unknown dependencies) are not in here: they
/// abort the run as a [`crate::errors::GraphError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureKind {
    /// A dependency name was not present in the graph at schedule time.
    MissingDependency,
    /// One or more dependencies ended `Failed` or `Blocked`.
    DependencyFailed,
    /// The task's action returned an error.
    TaskExecutionError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::MissingDependency => "MissingDependency",
            FailureKind::DependencyFailed => "DependencyFailed",
            FailureKind::TaskExecutionError => "TaskExecutionError",
        };
        f.write_str(s)
    }
}
