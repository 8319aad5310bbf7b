// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::dag::{SimulatedAction, Task, TaskGraph};
use crate::errors::GraphError;
use crate::types::{DEFAULT_SEED, Seed, TaskName};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// seed = 1
///
/// [task.task_a]
/// failure_rate = 1.0
///
/// [task.task_b]
/// dependencies = ["task_a"]
/// cost = 2
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Run parameters from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<TaskName, TaskConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<TaskName, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<TaskName, TaskConfig>,
    ) -> Self {
        Self { config, task }
    }

    /// Seed from `[config]`, or [`DEFAULT_SEED`].
    pub fn seed(&self) -> Seed {
        self.config.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Tasks with their simulated actions, ordered by name.
    pub fn to_tasks(&self) -> Vec<Task> {
        self.task
            .iter()
            .map(|(name, tc)| tc.to_task(name))
            .collect()
    }

    /// Build the validated task graph; fails on unknown dependencies or
    /// cycles.
    pub fn build_graph(&self) -> Result<TaskGraph, GraphError> {
        TaskGraph::build(self.to_tasks())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Global seed; `None` means [`DEFAULT_SEED`].
    #[serde(default)]
    pub seed: Option<Seed>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Tasks that must complete before this one runs.
    #[serde(default, alias = "after")]
    pub dependencies: Vec<TaskName>,

    /// Logical clock units one run of this task consumes.
    #[serde(default = "default_cost", alias = "duration")]
    pub cost: u64,

    /// Probability in `[0, 1]` that the task fails, decided by its seeded
    /// random stream.
    #[serde(default)]
    pub failure_rate: f64,
}

fn default_cost() -> u64 {
    1
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            cost: default_cost(),
            failure_rate: 0.0,
        }
    }
}

impl TaskConfig {
    pub fn to_task(&self, name: &str) -> Task {
        Task::new(name, SimulatedAction::new(self.failure_rate))
            .with_dependencies(self.dependencies.iter().cloned())
            .with_cost(self.cost)
    }
}
