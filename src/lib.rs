// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod persist;
pub mod render;
pub mod types;

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate_fs};
use crate::dag::TaskGraph;
use crate::engine::{ExecutionEngine, ExecutionResult};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::persist::write_result;
use crate::render::ConsoleRenderer;
use crate::types::Seed;

/// High-level entry point used by `main.rs`.
///
/// Loads the config, validates the graph, runs it, and writes the result
/// artifact. Progress goes to stdout unless `--quiet` is set.
pub fn run(args: &CliArgs) -> Result<Option<ExecutionResult>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(args, &RealFileSystem, &mut out)
}

/// [`run`] with an explicit filesystem and output stream.
///
/// This wires together:
/// - config loading and validation
/// - task graph construction (cycles and unknown dependencies fail here,
///   before anything executes)
/// - the execution engine with an optional console renderer
/// - result persistence
///
/// Returns `None` for `--dry-run`, which prints the plan and stops.
pub fn run_with(
    args: &CliArgs,
    fs: &dyn FileSystem,
    out: &mut dyn Write,
) -> Result<Option<ExecutionResult>> {
    let cfg = load_and_validate_fs(fs, Path::new(&args.config))?;
    let graph = cfg.build_graph()?;
    let seed = args.seed.unwrap_or_else(|| cfg.seed());

    if args.dry_run {
        print_dry_run(out, &cfg, &graph, seed)?;
        return Ok(None);
    }

    info!(config = %args.config, seed, "config loaded; starting execution");

    let engine = ExecutionEngine::new(graph, seed);
    let result = if args.quiet {
        engine.run()
    } else {
        let mut console = ConsoleRenderer::new(&mut *out);
        engine.run_with_renderer(Some(&mut console))
    };

    write_result(fs, Path::new(&args.output), &result)?;
    Ok(Some(result))
}

/// Dry-run output: seed plus the order tasks would run in if all succeed.
fn print_dry_run(
    out: &mut dyn Write,
    cfg: &ConfigFile,
    graph: &TaskGraph,
    seed: Seed,
) -> Result<()> {
    writeln!(out, "detdag dry-run")?;
    writeln!(out, "  seed = {seed}")?;
    writeln!(out)?;

    let order = graph.topological_order();
    writeln!(out, "plan ({} tasks, assuming all complete):", order.len())?;
    for (i, name) in order.iter().enumerate() {
        writeln!(out, "  {}. {name}", i + 1)?;
        let deps = graph.dependencies_of(name);
        if !deps.is_empty() {
            writeln!(out, "      after: {}", deps.join(", "))?;
        }
        if let Some(tc) = cfg.task.get(*name) {
            writeln!(out, "      cost: {}", tc.cost)?;
            if tc.failure_rate > 0.0 {
                writeln!(out, "      failure_rate: {}", tc.failure_rate)?;
            }
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
