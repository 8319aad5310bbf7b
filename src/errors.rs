// src/errors.rs

//! Crate-wide error types.
//!
//! Only structural problems (bad config, cycles, unknown dependencies, IO)
//! are errors. Per-task failures never show up here; they are recorded as a
//! task status plus a DLQ entry.

use thiserror::Error;

use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum DetdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Structural problems found while building a [`crate::dag::TaskGraph`].
///
/// Any of these aborts the run before a single task executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// `cycle` lists the tasks on the cycle in dependency order, with the
    /// first task repeated at the end (`A -> B -> A`).
    #[error("cycle detected in task graph: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<TaskName> },

    #[error("task '{task}' has unknown dependency '{dependency}'")]
    UnknownDependency { task: TaskName, dependency: TaskName },

    #[error("task '{0}' is defined more than once")]
    DuplicateTask(TaskName),

    /// The summed task costs would overflow the logical clock.
    #[error("total task cost overflows the logical clock")]
    ClockOverflow,
}

/// Failure returned by a task action.
///
/// The message ends up verbatim as the DLQ reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TaskError {
    message: String,
}

impl TaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        TaskError::new(format!("{err:#}"))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DetdagError>;
