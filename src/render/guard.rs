// src/render/guard.rs

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use super::Renderer;

/// Wraps an optional renderer so that calling it can never fail.
///
/// The first failure (error or panic) is logged once and disables the
/// renderer; later notifications are dropped without calling it.
pub struct RendererGuard<'a> {
    renderer: Option<&'a mut dyn Renderer>,
    disabled: bool,
}

impl<'a> RendererGuard<'a> {
    pub fn new(renderer: Option<&'a mut dyn Renderer>) -> Self {
        Self {
            renderer,
            disabled: false,
        }
    }

    /// A guard with no renderer behind it.
    pub fn none() -> Self {
        Self::new(None)
    }

    /// Whether a renderer is attached and still enabled.
    pub fn is_active(&self) -> bool {
        self.renderer.is_some() && !self.disabled
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Invoke `call` on the renderer, swallowing any failure.
    pub fn notify<F>(&mut self, event: &'static str, call: F)
    where
        F: FnOnce(&mut dyn Renderer) -> anyhow::Result<()>,
    {
        if self.disabled {
            return;
        }
        let Some(renderer) = self.renderer.as_deref_mut() else {
            return;
        };

        let failure = match panic::catch_unwind(AssertUnwindSafe(|| call(renderer))) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("renderer panicked: {}", panic_message(payload.as_ref())),
        };

        warn!(event, error = %failure, "renderer failed; disabling it for the rest of the run");
        self.disabled = true;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
