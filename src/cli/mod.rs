// src/cli/mod.rs
//! Command-line interface definitions

/// Argument structures for each subcommand
pub mod commands;

pub use commands::{Action, BenchmarkOptions, Commands, ConfigOptions, StartOptions};
