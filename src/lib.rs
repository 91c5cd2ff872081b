//! XMR Workers - CPU hashing worker pool for Monero-style jobs
//!
//! This crate coordinates a pool of long-lived hashing threads:
//! - Versioned job publishing with pause/resume
//! - A shared result queue drained by a single controller
//! - Per-worker telemetry rings and periodic hash-rate reports
//! - Single and double hash worker variants

#![warn(missing_docs)]
#![deny(unsafe_code)]

/// Worker pool, job state, result queue and controller
pub mod miner;

/// Telemetry and hash-rate reporting
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{
    Algorithm, Controller, ControllerSettings, JobResult, JobResultListener, MiningJob,
    PoolContext, PoolOptions, WorkerPool,
};
pub use stats::{HashrateSink, LogSink, MiningStats, Telemetry};
pub use types::{AlgorithmType, HashMode};
pub use utils::{MinerError, init_logging};
