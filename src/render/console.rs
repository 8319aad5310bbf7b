// src/render/console.rs

use std::io::{self, Write};

use anyhow::{Context, Result};

use super::Renderer;
use crate::engine::ExecutionResult;
use crate::types::TaskStatus;

/// Prints one line per lifecycle event.
///
/// ```text
/// [STARTED] build
/// [COMPLETED] build (1t)
/// [BLOCKED] deploy
/// run finished: 1 completed, 0 failed, 1 blocked, total 3t
/// ```
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.out, "{text}").context("writing renderer output")?;
        self.out.flush().context("flushing renderer output")
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn on_task_start(&mut self, task: &str) -> Result<()> {
        self.line(format_args!("[STARTED] {task}"))
    }

    fn on_task_end(&mut self, task: &str, status: TaskStatus, duration: u64) -> Result<()> {
        match status {
            TaskStatus::Blocked => self.line(format_args!("[{status}] {task}")),
            _ => self.line(format_args!("[{status}] {task} ({duration}t)")),
        }
    }

    fn on_run_complete(&mut self, result: &ExecutionResult) -> Result<()> {
        let summary = result.summary();
        self.line(format_args!(
            "run finished: {} completed, {} failed, {} blocked, total {}t",
            summary.completed_tasks,
            summary.failed_tasks,
            summary.blocked_tasks,
            result.total_duration()
        ))
    }
}
