// src/config/config.rs
use crate::miner::controller::ControllerSettings;
use crate::miner::job::MiningJob;
use crate::types::{AlgorithmType, HashMode};
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the worker pool
///
/// Contains algorithm selection, worker layout, telemetry cadence and
/// optionally a job to start hashing right away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Hashing algorithm to use (e.g., "randomx", "cryptonight-v7")
    #[serde(default)]
    pub algorithm: AlgorithmType,

    /// Number of worker threads (0 = auto-detect)
    #[serde(default)]
    pub threads: usize,

    /// Single, double or auto-detected hashing per worker
    #[serde(default)]
    pub hash_mode: HashMode,

    /// CPU bit mask to pin workers to (unset = no pinning)
    #[serde(default)]
    pub cpu_affinity: Option<u64>,

    /// Keep the pool-reserved top nonce byte
    #[serde(default)]
    pub nicehash: bool,

    /// Sampling and reporting cadence
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Job to publish at startup
    #[serde(default)]
    pub job: Option<JobConfig>,
}

/// Telemetry sampling and hash-rate reporting cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Milliseconds between progress samples
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Report the aggregate hash-rate every n-th tick
    #[serde(default = "default_report_every")]
    pub report_every: u64,

    /// Window for the per-worker rate, in milliseconds
    #[serde(default = "default_rate_window_ms")]
    pub rate_window_ms: u64,

    /// Samples kept per worker
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// A job given in the configuration file, hex encoded as a pool would send it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job identifier echoed in results
    pub job_id: String,
    /// Hex blob; the nonce goes at byte 39
    pub blob: String,
    /// Hex target, 4-byte compact or 8-byte
    pub target: String,
}

fn default_tick_ms() -> u64 {
    500
}

fn default_report_every() -> u64 {
    16
}

fn default_rate_window_ms() -> u64 {
    2500
}

fn default_capacity() -> usize {
    crate::stats::telemetry::DEFAULT_CAPACITY
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            tick_ms: default_tick_ms(),
            report_every: default_report_every(),
            rate_window_ms: default_rate_window_ms(),
            capacity: default_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: AlgorithmType::default(),
            threads: 0,
            hash_mode: HashMode::default(),
            cpu_affinity: None,
            nicehash: false,
            telemetry: TelemetryConfig::default(),
            job: None,
        }
    }
}

impl TelemetryConfig {
    /// Checks that the ring can actually serve the rate window
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.tick_ms == 0 {
            return Err(MinerError::ConfigError("telemetry.tick_ms must be > 0".into()));
        }
        if self.report_every == 0 {
            return Err(MinerError::ConfigError(
                "telemetry.report_every must be > 0".into(),
            ));
        }
        if self.capacity < 2 {
            return Err(MinerError::ConfigError(
                "telemetry.capacity must be at least 2".into(),
            ));
        }
        let covered = self.tick_ms.saturating_mul(self.capacity as u64 - 1);
        if self.rate_window_ms > covered {
            return Err(MinerError::ConfigError(format!(
                "telemetry.rate_window_ms ({}) exceeds the {} ms a ring of {} samples covers",
                self.rate_window_ms, covered, self.capacity
            )));
        }
        Ok(())
    }

    /// Controller settings for this cadence
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            tick: Duration::from_millis(self.tick_ms),
            report_every: self.report_every,
            rate_window_ms: self.rate_window_ms,
            telemetry_capacity: self.capacity,
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::parse(&config_str)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML configuration string
    pub fn parse(config_str: &str) -> Result<Self, MinerError> {
        let config: Config = toml::from_str(config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints
    pub fn validate(&self) -> Result<(), MinerError> {
        self.telemetry.validate()?;
        if self.cpu_affinity == Some(0) {
            return Err(MinerError::ConfigError(
                "cpu_affinity must select at least one CPU".into(),
            ));
        }
        if let Some(job) = &self.job {
            job.to_job(self.algorithm, self.nicehash)?;
        }
        Ok(())
    }

    /// Startup job, if one is configured
    pub fn startup_job(&self) -> Result<Option<MiningJob>, MinerError> {
        self.job
            .as_ref()
            .map(|job| job.to_job(self.algorithm, self.nicehash))
            .transpose()
    }

    /// Generates a configuration template string
    ///
    /// # Arguments
    /// * `job` - Include a sample `[job]` section
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template(job: bool) -> String {
        let mut template = String::new();
        template.push_str("# XMR worker pool configuration\n\n");
        template.push_str("# Supported algorithms: randomx, cryptonight-v7, cryptonight-r\n");
        template.push_str("algorithm = \"cryptonight-v7\"\n");
        template.push_str("# Number of worker threads (0 = auto-detect)\n");
        template.push_str("threads = 0\n");
        template.push_str("# Hashes per worker iteration: auto, single, double\n");
        template.push_str("hash_mode = \"auto\"\n");
        template.push_str("# Pin workers to CPUs from this bit mask (remove to disable)\n");
        template.push_str("# cpu_affinity = 15\n");
        template.push_str("nicehash = false\n\n");

        template.push_str("[telemetry]\n");
        template.push_str("# Milliseconds between progress samples\n");
        template.push_str("tick_ms = 500\n");
        template.push_str("# Log the pool hash-rate every n-th sample\n");
        template.push_str("report_every = 16\n");
        template.push_str("# Averaging window for the hash-rate, in milliseconds\n");
        template.push_str("rate_window_ms = 2500\n");
        template.push_str("# Samples kept per worker\n");
        template.push_str("capacity = 16\n");

        if job {
            template.push_str("\n# Job published at startup\n");
            template.push_str("[job]\n");
            template.push_str("job_id = \"1\"\n");
            template.push_str("blob = \"");
            template.push_str(&"00".repeat(76));
            template.push_str("\"\n");
            template.push_str("target = \"b88d0600\"\n");
        }

        template
    }
}

impl JobConfig {
    /// Decodes the hex fields into a publishable job
    pub fn to_job(&self, algorithm: AlgorithmType, nicehash: bool) -> Result<MiningJob, MinerError> {
        Ok(MiningJob::from_hex(&self.job_id, &self.blob, &self.target, algorithm)?
            .with_nicehash(nicehash))
    }
}
