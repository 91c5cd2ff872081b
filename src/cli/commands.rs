// src/cli/commands.rs
use crate::types::{AlgorithmType, HashMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// XMR worker pool - multi-threaded CPU hashing with hash-rate telemetry
#[derive(Parser, Debug)]
#[command(name = "xmr-workers-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (start the pool, run benchmarks, or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Start the worker pool on the configured job
    Start(StartOptions),

    /// Measure hash-rate on a synthetic job
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for starting the worker pool
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Number of worker threads to use (overrides config)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Hashing algorithm to use (overrides config)
    #[arg(short, long)]
    pub algorithm: Option<AlgorithmType>,

    /// Hashes per worker iteration (overrides config)
    #[arg(short = 'm', long)]
    pub hash_mode: Option<HashMode>,
}

/// Options for running benchmarks
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Algorithm to benchmark
    #[arg(short, long, default_value_t = AlgorithmType::CryptoNightV7)]
    pub algorithm: AlgorithmType,

    /// Duration of benchmark in seconds
    #[arg(short, long, default_value_t = 60)]
    pub duration: u64,

    /// Number of threads to use (0 = auto-detect)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Hashes per worker iteration
    #[arg(short = 'm', long, default_value_t = HashMode::Auto)]
    pub hash_mode: HashMode,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,

    /// Include a sample startup job
    #[arg(short, long)]
    pub job: bool,
}
