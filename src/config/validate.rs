// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::clock_budget;
use crate::errors::{DetdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DetdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

/// Config-level sanity checks.
///
/// Graph structure (unknown dependencies, cycles) is checked separately by
/// `TaskGraph::build`, so that those errors keep their own type.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_parameters(cfg)?;
    ensure_clock_fits(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(DetdagError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn ensure_clock_fits(cfg: &RawConfigFile) -> Result<()> {
    if clock_budget(cfg.task.values().map(|t| t.cost)).is_none() {
        return Err(DetdagError::ConfigError(format!(
            "total task cost is too large: a run could push the logical clock past {}",
            u64::MAX
        )));
    }
    Ok(())
}

fn validate_task_parameters(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if !task.failure_rate.is_finite() || !(0.0..=1.0).contains(&task.failure_rate) {
            return Err(DetdagError::ConfigError(format!(
                "task '{}' has failure_rate {} outside [0, 1]",
                name, task.failure_rate
            )));
        }
        if task.cost == 0 {
            return Err(DetdagError::ConfigError(format!(
                "task '{}' must have cost >= 1 (got 0)",
                name
            )));
        }
    }
    Ok(())
}
