// src/config/mod.rs

//! Configuration loading and validation for detdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file through the filesystem abstraction (`loader.rs`).
//! - Validate task parameters (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_PATH, load_and_validate, load_and_validate_fs, load_from_fs, load_from_path,
};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
