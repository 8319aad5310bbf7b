// src/engine/dlq.rs

//! Dead letter queue: tasks that did not reach `Completed`.

use serde::{Deserialize, Serialize};

use crate::types::{FailureKind, TaskName};

/// One task that failed or was blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlqEntry {
    pub task: TaskName,
    /// Human-readable detail, e.g. `Failed dependencies: task_a`.
    pub reason: String,
    /// Logical clock reading when the entry was recorded.
    pub timestamp: u64,
    pub kind: FailureKind,
}

/// Append-only store, one per run.
#[derive(Debug, Clone, Default)]
pub struct DlqSystem {
    entries: Vec<DlqEntry>,
}

impl DlqSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        task: impl Into<TaskName>,
        kind: FailureKind,
        reason: impl Into<String>,
        timestamp: u64,
    ) {
        self.entries.push(DlqEntry {
            task: task.into(),
            reason: reason.into(),
            timestamp,
            kind,
        });
    }

    /// All entries ordered by timestamp, then task name.
    pub fn entries(&self) -> Vec<DlqEntry> {
        let mut entries = self.entries.clone();
        sort_entries(&mut entries);
        entries
    }

    pub fn entries_of_kind(&self, kind: FailureKind) -> Vec<DlqEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(mut self) -> Vec<DlqEntry> {
        sort_entries(&mut self.entries);
        self.entries
    }
}

fn sort_entries(entries: &mut [DlqEntry]) {
    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.task.cmp(&b.task)));
}

/// Reason text for a task whose dependencies ended `Failed` or `Blocked`.
pub fn dependency_failed_reason<S: AsRef<str>>(deps: &[S]) -> String {
    format!("Failed dependencies: {}", join(deps))
}

/// Reason text for a task whose dependencies are not in the graph.
pub fn missing_dependency_reason<S: AsRef<str>>(deps: &[S]) -> String {
    format!("Missing dependencies: {}", join(deps))
}

fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}
