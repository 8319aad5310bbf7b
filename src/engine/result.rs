// src/engine/result.rs

//! Final output of a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dag::TaskValue;
use crate::engine::dlq::DlqEntry;
use crate::types::{Seed, TaskName, TaskStatus};

/// Counts reported alongside the detailed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub blocked_tasks: usize,
    pub dlq_count: usize,
}

/// Everything a run produced. Built once when the run ends.
///
/// The serialized form is the result artifact; its field names are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    seed: Seed,
    /// Tasks in the order they were attempted (completed or failed).
    execution_order: Vec<TaskName>,
    completed: Vec<TaskName>,
    failed: Vec<TaskName>,
    blocked: Vec<TaskName>,
    dlq: Vec<DlqEntry>,
    task_durations: BTreeMap<TaskName, u64>,
    total_duration: u64,
    summary: RunSummary,
    #[serde(skip)]
    values: BTreeMap<TaskName, TaskValue>,
}

/// Raw pieces collected by the engine during a run.
#[derive(Debug, Default)]
pub(crate) struct ResultParts {
    pub seed: Seed,
    pub total_tasks: usize,
    pub execution_order: Vec<TaskName>,
    pub completed: Vec<TaskName>,
    pub failed: Vec<TaskName>,
    pub blocked: Vec<TaskName>,
    pub dlq: Vec<DlqEntry>,
    pub task_durations: BTreeMap<TaskName, u64>,
    pub total_duration: u64,
    pub values: BTreeMap<TaskName, TaskValue>,
}

impl ExecutionResult {
    pub(crate) fn from_parts(parts: ResultParts) -> Self {
        let summary = RunSummary {
            total_tasks: parts.total_tasks,
            completed_tasks: parts.completed.len(),
            failed_tasks: parts.failed.len(),
            blocked_tasks: parts.blocked.len(),
            dlq_count: parts.dlq.len(),
        };

        Self {
            seed: parts.seed,
            execution_order: parts.execution_order,
            completed: parts.completed,
            failed: parts.failed,
            blocked: parts.blocked,
            dlq: parts.dlq,
            task_durations: parts.task_durations,
            total_duration: parts.total_duration,
            summary,
            values: parts.values,
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn execution_order(&self) -> &[TaskName] {
        &self.execution_order
    }

    pub fn completed(&self) -> &[TaskName] {
        &self.completed
    }

    pub fn failed(&self) -> &[TaskName] {
        &self.failed
    }

    pub fn blocked(&self) -> &[TaskName] {
        &self.blocked
    }

    pub fn dlq(&self) -> &[DlqEntry] {
        &self.dlq
    }

    pub fn task_durations(&self) -> &BTreeMap<TaskName, u64> {
        &self.task_durations
    }

    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Value returned by a completed task. Not part of the artifact.
    pub fn value_of(&self, task: &str) -> Option<&TaskValue> {
        self.values.get(task)
    }

    /// Terminal status of `task`, or `None` if the task is unknown.
    pub fn status_of(&self, task: &str) -> Option<TaskStatus> {
        let contains = |list: &[TaskName]| list.iter().any(|t| t == task);
        if contains(&self.completed) {
            Some(TaskStatus::Completed)
        } else if contains(&self.failed) {
            Some(TaskStatus::Failed)
        } else if contains(&self.blocked) {
            Some(TaskStatus::Blocked)
        } else {
            None
        }
    }

    /// Whether every task completed.
    pub fn is_clean(&self) -> bool {
        self.dlq.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
