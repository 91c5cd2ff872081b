// src/config/runtime.rs
//! Runtime resource detection
//!
//! Resolves the two settings that depend on the machine rather than the
//! configuration file: how many worker threads to run, and whether workers
//! should hash one or two nonces per iteration.

use crate::types::HashMode;
use sysinfo::System;

/// Scratchpad memory one hash lane keeps hot (CryptoNight / RandomX VM)
pub const SCRATCHPAD_BYTES: u64 = 2 * 1024 * 1024;

/// Memory multiple required per scratchpad before double hashing is enabled
const DOUBLE_HASH_HEADROOM: u64 = 4;

/// What the pool needs to know about the host CPU and memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuProfile {
    /// Logical CPUs (including SMT siblings)
    pub logical_cores: usize,
    /// Physical cores
    pub physical_cores: usize,
    /// Memory currently available to the process, in bytes
    pub available_memory: u64,
}

impl CpuProfile {
    /// Probes the running machine
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_memory();

        let profile = CpuProfile {
            logical_cores: num_cpus::get(),
            physical_cores: num_cpus::get_physical(),
            available_memory: system.available_memory(),
        };
        log::debug!(
            "Detected {} logical / {} physical cores, {} MiB available",
            profile.logical_cores,
            profile.physical_cores,
            profile.available_memory / (1024 * 1024)
        );
        profile
    }

    /// Number of worker threads to start
    ///
    /// A non-zero `requested` count is honoured as is. Zero means one thread
    /// per logical core, capped by how many scratchpads fit in memory.
    pub fn resolve_threads(&self, requested: usize, mode: HashMode) -> usize {
        if requested > 0 {
            return requested;
        }

        let lanes = if mode == HashMode::Double { 2 } else { 1 };
        let by_memory = (self.available_memory / (SCRATCHPAD_BYTES * lanes)) as usize;
        self.logical_cores.min(by_memory).max(1)
    }

    /// Whether `threads` workers can each keep two scratchpads hot
    ///
    /// SMT siblings share cache with their twin, so double hashing is only
    /// picked when every worker has a physical core to itself.
    pub fn supports_double_hash(&self, threads: usize) -> bool {
        let needed = threads as u64 * 2 * SCRATCHPAD_BYTES * DOUBLE_HASH_HEADROOM;
        self.physical_cores >= self.logical_cores && self.available_memory >= needed
    }
}
