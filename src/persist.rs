// src/persist.rs

//! Writing and reading the result artifact.

use std::path::Path;

use tracing::info;

use crate::engine::ExecutionResult;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "result.json";

/// Serialize `result` as pretty JSON and write it to `path`.
///
/// Identical results always produce identical bytes.
pub fn write_result(fs: &dyn FileSystem, path: &Path, result: &ExecutionResult) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(result)?;
    bytes.push(b'\n');
    fs.write(path, &bytes)?;
    info!(path = %path.display(), "result written");
    Ok(())
}

/// Read back an artifact written by [`write_result`].
pub fn read_result(fs: &dyn FileSystem, path: &Path) -> Result<ExecutionResult> {
    let contents = fs.read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
