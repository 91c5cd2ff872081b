// src/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported hashing algorithms for the worker pool
///
/// Each variant maps to an [`Algorithm`](crate::miner::Algorithm)
/// implementation that the workers run against published jobs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum AlgorithmType {
    /// RandomX algorithm (CPU-optimized, ASIC-resistant)
    ///
    /// Uses random code execution and memory-hard techniques.
    /// Recommended for modern CPUs with large caches.
    #[clap(name = "randomx")]
    #[serde(rename = "randomx")]
    RandomX,

    /// CryptoNight variant 7 algorithm
    ///
    /// Uses a 2 MiB scratchpad per hash, which is what the double
    /// hash mode was designed around.
    #[default]
    #[clap(name = "cryptonight-v7")]
    #[serde(rename = "cryptonight-v7")]
    CryptoNightV7,

    /// CryptoNight-R algorithm
    #[clap(name = "cryptonight-r")]
    #[serde(rename = "cryptonight-r")]
    CryptoNightR,
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmType::RandomX => write!(f, "randomx"),
            AlgorithmType::CryptoNightV7 => write!(f, "cryptonight-v7"),
            AlgorithmType::CryptoNightR => write!(f, "cryptonight-r"),
        }
    }
}

impl FromStr for AlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "randomx" | "rx/0" => Ok(AlgorithmType::RandomX),
            "cnv7" | "cn/1" | "cryptonight-v7" => Ok(AlgorithmType::CryptoNightV7),
            "cnr" | "cn/r" | "cryptonight-r" => Ok(AlgorithmType::CryptoNightR),
            _ => Err(format!("Unknown algorithm: {}", s)),
        }
    }
}

/// How many hashes a worker computes per loop iteration
///
/// `Auto` defers the decision to runtime capability detection, which
/// happens once, the first time a worker thread reports ready.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    /// Pick based on detected CPU resources
    #[default]
    Auto,
    /// One nonce per iteration
    Single,
    /// Two interleaved nonce lanes per iteration
    Double,
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashMode::Auto => write!(f, "auto"),
            HashMode::Single => write!(f, "single"),
            HashMode::Double => write!(f, "double"),
        }
    }
}
