// src/dag/mod.rs

//! Task graph representation.
//!
//! - [`task`] defines [`Task`] and the [`TaskAction`] capability it runs.
//! - [`graph`] holds the validated [`TaskGraph`] and answers the scheduler's
//!   "which tasks are eligible now" question.

pub mod graph;
pub mod task;

pub use graph::TaskGraph;
pub use task::{SimulatedAction, Task, TaskAction, TaskOutcome, TaskValue};
