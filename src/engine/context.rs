// src/engine/context.rs

//! Engine-owned run state that task bodies may look at: the logical clock,
//! the result registry, and the immutable snapshot handed to each action.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dag::TaskValue;
use crate::types::{Seed, TaskName, TaskStatus};

/// Monotonic counter standing in for wall-clock time.
///
/// Only the engine advances it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock {
    now: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance by one unit and return the new reading.
    pub fn tick(&mut self) -> u64 {
        self.advance(1)
    }

    /// Advance by `units` and return the new reading.
    ///
    /// Saturates at `u64::MAX`. Validated graphs stay within
    /// [`clock_budget`], so a run never gets there.
    pub fn advance(&mut self, units: u64) -> u64 {
        self.now = self.now.saturating_add(units);
        self.now
    }
}

/// Largest clock reading a run over tasks with these costs can reach, or
/// `None` if it does not fit in a `u64`.
///
/// Each task ticks once when it starts (or once when it is blocked), adds its
/// cost while running, and ticks once more if it lands in the DLQ.
pub fn clock_budget(costs: impl IntoIterator<Item = u64>) -> Option<u64> {
    costs
        .into_iter()
        .try_fold(0u64, |total, cost| total.checked_add(cost)?.checked_add(2))
}

/// Status and (on success) value of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub value: Option<TaskValue>,
}

/// Mapping of task name to its current record within a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRegistry {
    records: BTreeMap<TaskName, TaskRecord>,
}

impl ResultRegistry {
    /// Registry with every given task `Pending`.
    pub fn with_pending<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let records = names
            .into_iter()
            .map(|name| {
                (
                    name.to_string(),
                    TaskRecord {
                        status: TaskStatus::Pending,
                        value: None,
                    },
                )
            })
            .collect();
        Self { records }
    }

    pub fn status_of(&self, task: &str) -> Option<TaskStatus> {
        self.records.get(task).map(|r| r.status)
    }

    pub fn value_of(&self, task: &str) -> Option<&TaskValue> {
        self.records.get(task).and_then(|r| r.value.as_ref())
    }

    pub fn is_completed(&self, task: &str) -> bool {
        self.status_of(task) == Some(TaskStatus::Completed)
    }

    /// Records ordered by task name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of tasks currently in `status`, ordered.
    pub fn names_with_status(&self, status: TaskStatus) -> Vec<TaskName> {
        self.records
            .iter()
            .filter(|(_, r)| r.status == status)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        self.records
            .values()
            .any(|r| r.status == TaskStatus::Pending)
    }

    pub(crate) fn set_status(&mut self, task: &str, status: TaskStatus) {
        if let Some(record) = self.records.get_mut(task) {
            record.status = status;
        }
    }

    pub(crate) fn complete(&mut self, task: &str, value: TaskValue) {
        if let Some(record) = self.records.get_mut(task) {
            record.status = TaskStatus::Completed;
            record.value = Some(value);
        }
    }

    pub(crate) fn into_values(self) -> BTreeMap<TaskName, TaskValue> {
        self.records
            .into_iter()
            .filter_map(|(name, record)| record.value.map(|v| (name, v)))
            .collect()
    }
}

/// Read-only snapshot handed to a task action.
///
/// A new context is built for every invocation and dropped right after it,
/// so nothing a task sees can change underneath it.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    seed: Seed,
    now: u64,
    task: TaskName,
    registry: ResultRegistry,
}

impl ExecutionContext {
    pub fn new(seed: Seed, now: u64, task: impl Into<TaskName>, registry: ResultRegistry) -> Self {
        Self {
            seed,
            now,
            task: task.into(),
            registry,
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Logical clock reading at the moment the task was started.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Name of the task being run.
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn registry(&self) -> &ResultRegistry {
        &self.registry
    }

    /// Value produced by an already-completed task (typically a dependency).
    pub fn value_of(&self, task: &str) -> Option<&TaskValue> {
        self.registry.value_of(task)
    }
}
