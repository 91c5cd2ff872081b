// src/config/mod.rs
//! Configuration management for the worker pool
//!
//! This module handles all configuration-related functionality including:
//! - Loading, parsing and validating TOML configuration files
//! - Generating configuration templates
//! - Detecting machine resources for auto thread count and hash mode

/// Core configuration implementation
///
/// Contains the [`Config`] struct and related types that define
/// the pool's configuration structure.
pub mod config;

/// Runtime resource detection
pub mod runtime;

// Re-export key items for easy access
pub use config::{Config, JobConfig, TelemetryConfig};
pub use runtime::CpuProfile;

use crate::utils::error::MinerError;
use std::path::PathBuf;

/// Loads pool configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the configuration file (anything convertible to PathBuf)
///
/// # Returns
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(MinerError)` - If the file couldn't be read, parsed or validated
pub fn load(path: impl Into<PathBuf>) -> Result<Config, MinerError> {
    Config::load(path)
}

/// Generates a commented configuration template
///
/// # Arguments
/// * `job` - Whether to include a sample startup job
pub fn generate_template(job: bool) -> String {
    Config::generate_template(job)
}
