// src/utils/error.rs
use crate::miner::job::JobResult;
use serde_json;
use std::io;
use thiserror::Error;

/// Main error type for the worker pool
///
/// Covers startup failures (threads, runtime, configuration) and the few
/// recoverable conditions surfaced by the hashing collaborators.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Errors reported by a hashing algorithm implementation
    #[error("Algorithm error: {0}")]
    AlgorithmError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Worker thread could not be created or joined
    #[error("Worker thread error: {0}")]
    ThreadError(String),

    /// Thread communication channel errors
    #[error("Thread communication error: {0}")]
    ChannelError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),
}

/// Converts crossbeam channel send errors for results into MinerError
///
/// Raised when the receiving side of a result channel has been dropped.
impl From<crossbeam_channel::SendError<JobResult>> for MinerError {
    fn from(e: crossbeam_channel::SendError<JobResult>) -> Self {
        MinerError::ChannelError(format!("Result send failed: {}", e))
    }
}

/// Converts hex decoding errors into MinerError
///
/// Used when a job blob or target in the configuration is not valid hex.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}
