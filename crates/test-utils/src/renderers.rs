//! Renderer doubles.

use anyhow::{Result, bail};

use detdag::engine::ExecutionResult;
use detdag::render::Renderer;
use detdag::types::TaskStatus;

/// One recorded renderer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Start(String),
    End(String, TaskStatus, u64),
    RunComplete,
}

/// Records every callback it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn on_task_start(&mut self, task: &str) -> Result<()> {
        self.events.push(RenderEvent::Start(task.to_string()));
        Ok(())
    }

    fn on_task_end(&mut self, task: &str, status: TaskStatus, duration: u64) -> Result<()> {
        self.events
            .push(RenderEvent::End(task.to_string(), status, duration));
        Ok(())
    }

    fn on_run_complete(&mut self, _result: &ExecutionResult) -> Result<()> {
        self.events.push(RenderEvent::RunComplete);
        Ok(())
    }
}

/// Returns an error from every callback and counts how often it was called.
#[derive(Debug, Default)]
pub struct FailingRenderer {
    pub calls: usize,
}

impl Renderer for FailingRenderer {
    fn on_task_start(&mut self, task: &str) -> Result<()> {
        self.calls += 1;
        bail!("renderer refused start of {task}")
    }

    fn on_task_end(&mut self, task: &str, _status: TaskStatus, _duration: u64) -> Result<()> {
        self.calls += 1;
        bail!("renderer refused end of {task}")
    }

    fn on_run_complete(&mut self, _result: &ExecutionResult) -> Result<()> {
        self.calls += 1;
        bail!("renderer refused run completion")
    }
}

/// Panics from every callback.
#[derive(Debug, Default)]
pub struct PanickingRenderer {
    pub calls: usize,
}

impl Renderer for PanickingRenderer {
    fn on_task_start(&mut self, task: &str) -> Result<()> {
        self.calls += 1;
        panic!("renderer exploded on {task}")
    }

    fn on_task_end(&mut self, task: &str, _status: TaskStatus, _duration: u64) -> Result<()> {
        self.calls += 1;
        panic!("renderer exploded on {task}")
    }

    fn on_run_complete(&mut self, _result: &ExecutionResult) -> Result<()> {
        self.calls += 1;
        panic!("renderer exploded on completion")
    }
}

/// Works normally until `fail_on` starts, then errors (the partial-failure
/// case: some events were already delivered).
#[derive(Debug)]
pub struct FailOnTaskRenderer {
    pub fail_on: String,
    pub inner: RecordingRenderer,
}

impl FailOnTaskRenderer {
    pub fn new(fail_on: &str) -> Self {
        Self {
            fail_on: fail_on.to_string(),
            inner: RecordingRenderer::new(),
        }
    }
}

impl Renderer for FailOnTaskRenderer {
    fn on_task_start(&mut self, task: &str) -> Result<()> {
        self.inner.on_task_start(task)?;
        if task == self.fail_on {
            bail!("intentional renderer failure on {task}");
        }
        Ok(())
    }

    fn on_task_end(&mut self, task: &str, status: TaskStatus, duration: u64) -> Result<()> {
        self.inner.on_task_end(task, status, duration)
    }

    fn on_run_complete(&mut self, result: &ExecutionResult) -> Result<()> {
        self.inner.on_run_complete(result)
    }
}
