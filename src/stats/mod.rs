//! Statistics collection and reporting module
//!
//! - [`Telemetry`]: per-worker ring buffers and windowed rate calculation
//! - [`HashrateSink`]: where the periodic aggregate hash-rate goes
//! - [`MiningStats`]: run totals kept by the controller

/// Per-worker progress history
pub mod telemetry;

/// Aggregate hash-rate reporting
pub mod reporter;

// Re-export main components
pub use reporter::{HashrateSink, LogSink, MiningStats, format_hashrate};
pub use telemetry::Telemetry;
