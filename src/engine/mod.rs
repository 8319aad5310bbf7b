// src/engine/mod.rs

//! Deterministic execution engine.
//!
//! - [`executor`] owns the scheduling loop ([`ExecutionEngine`]).
//! - [`context`] holds the logical clock, the result registry and the
//!   per-invocation [`ExecutionContext`] snapshot.
//! - [`random`] derives a reproducible random stream per task.
//! - [`dlq`] records tasks that did not complete.
//! - [`result`] is the immutable [`ExecutionResult`] a run produces.

pub mod context;
pub mod dlq;
pub mod executor;
pub mod random;
pub mod result;

pub use context::{ExecutionContext, LogicalClock, ResultRegistry, TaskRecord, clock_budget};
pub use dlq::{DlqEntry, DlqSystem};
pub use executor::ExecutionEngine;
pub use random::{DeterministicRandomSource, TaskRng};
pub use result::{ExecutionResult, RunSummary};
pub use crate::types::TaskName;
