// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Error handling, logging setup and the time sources shared by the
//! workers and the controller.

/// Error types and handling utilities
///
/// Contains the [`MinerError`] enum which defines all possible error conditions
/// for the worker pool, along with conversion implementations.
pub mod error;

/// Logging configuration and utilities
pub mod logging;

/// Millisecond clocks used for progress stamps
pub mod clock;

// Re-export for easier access
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::MinerError;
pub use logging::init_logging;
