// src/miner/mod.rs
//! Worker pool coordination
//!
//! This module contains everything between "a job arrived" and "a result
//! left":
//! - Shared job state with versioning and pause control
//! - The result queue and its wake signal
//! - Worker threads (single and double hash) and the pool that owns them
//! - The controller that samples telemetry and drains results

/// Hashing algorithm implementations
pub mod algorithm;

/// CPU pinning helpers
pub mod affinity;

/// Shared context handed to workers and the controller
pub mod context;

/// Telemetry tick and result drain loop
pub mod controller;

/// Per-worker bookkeeping and nonce partitioning
pub mod handle;

/// Job and result types
pub mod job;

/// Result consumers
pub mod listener;

/// Worker thread lifecycle
pub mod pool;

/// Result queue and wake signal
pub mod queue;

/// Current job, version counter and pause flags
pub mod state;

/// Single/double hash selection
pub mod variant;

/// Worker loop implementations
pub mod worker;

// Re-export main components for cleaner imports
pub use self::algorithm::Algorithm;
pub use self::context::PoolContext;
pub use self::controller::{Controller, ControllerSettings};
pub use self::handle::Handle;
pub use self::job::{JobResult, MiningJob};
pub use self::listener::{JobResultListener, LogListener};
pub use self::pool::{PoolOptions, WorkerPool};
pub use self::queue::{ResultQueue, Signal};
pub use self::state::{JobSnapshot, JobState};
pub use self::variant::{Variant, VariantSelector};
pub use self::worker::{DoubleWorker, SingleWorker, Worker};
