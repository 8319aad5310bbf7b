// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Control, DfsEvent, depth_first_search};
use tracing::debug;

use crate::dag::task::Task;
use crate::engine::{ResultRegistry, clock_budget};
use crate::errors::GraphError;
use crate::types::{TaskName, TaskStatus};

/// Validated, immutable task graph keyed by task name.
///
/// Construction rejects duplicate names, unknown dependencies and cycles, so
/// every graph that exists is a DAG whose edges all resolve. Tasks are kept in
/// a `BTreeMap`, which makes every iteration below ordered by name.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: BTreeMap<TaskName, Task>,
    /// Direct dependents: tasks that list the key among their dependencies.
    dependents: BTreeMap<TaskName, Vec<TaskName>>,
}

impl TaskGraph {
    /// Build and validate a graph.
    ///
    /// Checks run in this order: duplicate names, unknown dependencies,
    /// cycles, then whether the summed costs fit the logical clock. Errors
    /// are deterministic for a given set of tasks.
    pub fn build(tasks: impl IntoIterator<Item = Task>) -> Result<Self, GraphError> {
        let mut by_name: BTreeMap<TaskName, Task> = BTreeMap::new();
        for task in tasks {
            if by_name.contains_key(task.name()) {
                return Err(GraphError::DuplicateTask(task.name().to_string()));
            }
            by_name.insert(task.name().to_string(), task);
        }

        validate_dependencies(&by_name)?;
        detect_cycle(&by_name)?;
        if clock_budget(by_name.values().map(Task::cost)).is_none() {
            return Err(GraphError::ClockOverflow);
        }

        debug!(tasks = by_name.len(), "task graph validated");
        Ok(Self::index(by_name))
    }

    /// Build a graph with no validation at all.
    ///
    /// Unknown dependencies and cycles are kept as given; a later duplicate
    /// replaces an earlier task of the same name. The engine then handles
    /// them at schedule time (`MissingDependency`, stalled-run drain). Only
    /// meant for exercising those paths.
    #[doc(hidden)]
    pub fn build_unchecked(tasks: impl IntoIterator<Item = Task>) -> Self {
        let by_name = tasks
            .into_iter()
            .map(|task| (task.name().to_string(), task))
            .collect();
        Self::index(by_name)
    }

    fn index(tasks: BTreeMap<TaskName, Task>) -> Self {
        let mut dependents: BTreeMap<TaskName, Vec<TaskName>> = tasks
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        for (name, task) in &tasks {
            for dep in task.dependencies() {
                if let Some(list) = dependents.get_mut(dep) {
                    list.push(name.clone());
                }
            }
        }

        Self { tasks, dependents }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// All tasks, ordered by name.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// All task names, ordered.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a task, sorted.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.tasks
            .get(name)
            .map(|t| t.dependencies())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task, sorted.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.dependents
            .get(name)
            .map(|d| d.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks without dependencies.
    pub fn roots(&self) -> Vec<&str> {
        self.tasks()
            .filter(|t| t.dependencies().is_empty())
            .map(|t| t.name())
            .collect()
    }

    /// `Pending` tasks whose dependencies are all `Completed`, sorted by name.
    ///
    /// Name order is the only tie-break between tasks that become eligible at
    /// the same time; the engine always picks the first one.
    pub fn eligible_tasks(&self, registry: &ResultRegistry) -> Vec<&Task> {
        self.tasks()
            .filter(|task| registry.status_of(task.name()) == Some(TaskStatus::Pending))
            .filter(|task| {
                task.dependencies()
                    .iter()
                    .all(|dep| registry.status_of(dep) == Some(TaskStatus::Completed))
            })
            .collect()
    }

    /// A topological order that always picks the smallest ready name first.
    ///
    /// With every task succeeding, this is exactly the order the engine runs
    /// them in.
    pub fn topological_order(&self) -> Vec<&str> {
        let mut remaining: BTreeMap<&str, usize> = self
            .tasks()
            .map(|t| (t.name(), t.dependencies().len()))
            .collect();
        let mut ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, deps)| **deps == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(self.tasks.len());

        while let Some(name) = ready.pop_first() {
            order.push(name);
            for dependent in self.dependents_of(name) {
                if let Some(count) = remaining.get_mut(dependent.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent.as_str());
                    }
                }
            }
        }

        order
    }
}

fn validate_dependencies(tasks: &BTreeMap<TaskName, Task>) -> Result<(), GraphError> {
    for (name, task) in tasks {
        for dep in task.dependencies() {
            if !tasks.contains_key(dep) {
                return Err(GraphError::UnknownDependency {
                    task: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Three-colour depth-first search over the dependency edges.
///
/// A back edge (to a node that is discovered but not finished) closes a
/// cycle; the tasks on the DFS path from that node to the current one form
/// the reported cycle.
fn detect_cycle(tasks: &BTreeMap<TaskName, Task>) -> Result<(), GraphError> {
    // Edge direction: task -> dependency, so the cycle reads as "depends on".
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in tasks.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in tasks {
        for dep in task.dependencies() {
            graph.add_edge(name.as_str(), dep.as_str(), ());
        }
    }

    let mut path: Vec<&str> = Vec::new();
    let mut cycle: Option<Vec<TaskName>> = None;

    depth_first_search(&graph, graph.nodes(), |event| {
        match event {
            DfsEvent::Discover(node, _) => path.push(node),
            DfsEvent::Finish(_, _) => {
                path.pop();
            }
            DfsEvent::BackEdge(_, target) => {
                let start = path.iter().rposition(|n| *n == target).unwrap_or(0);
                let mut found: Vec<TaskName> =
                    path[start..].iter().map(|n| n.to_string()).collect();
                found.push(target.to_string());
                cycle = Some(found);
                return Control::Break(());
            }
            _ => {}
        }
        Control::Continue
    });

    match cycle {
        Some(cycle) => Err(GraphError::CycleDetected { cycle }),
        None => Ok(()),
    }
}
