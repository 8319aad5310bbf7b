// src/render/mod.rs

//! Observers of run progress.
//!
//! The engine talks to a [`Renderer`] through [`guard::RendererGuard`], which
//! makes every call fire-and-forget: errors and panics are swallowed and the
//! renderer is switched off for the rest of the run. A renderer can never
//! change what the engine does.
//!
//! - [`console`] prints lifecycle lines to any `io::Write`.
//! - [`guard`] holds the isolation logic.

pub mod console;
pub mod guard;

use anyhow::Result;

use crate::engine::ExecutionResult;
use crate::types::TaskStatus;

pub use console::ConsoleRenderer;
pub use guard::RendererGuard;

/// Lifecycle callbacks. Every method defaults to doing nothing.
pub trait Renderer {
    /// A task is about to run.
    fn on_task_start(&mut self, _task: &str) -> Result<()> {
        Ok(())
    }

    /// A task reached a terminal status. Blocked tasks are reported here
    /// without a preceding `on_task_start`, with a duration of zero.
    fn on_task_end(&mut self, _task: &str, _status: TaskStatus, _duration: u64) -> Result<()> {
        Ok(())
    }

    fn on_run_complete(&mut self, _result: &ExecutionResult) -> Result<()> {
        Ok(())
    }
}

/// Renderer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {}
