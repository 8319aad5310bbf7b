#![allow(dead_code, unused_imports)]

pub use detdag_test_utils::{builders, renderers};
pub use detdag_test_utils::{failing_task, graph, init_tracing, ok_task, run_tasks};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
