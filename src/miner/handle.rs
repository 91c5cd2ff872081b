// src/miner/handle.rs
//! Per-worker bookkeeping owned by the pool

use crate::miner::job::MiningJob;
use crate::miner::worker::Worker;
use std::sync::{Arc, OnceLock};

/// Controller-side record of one worker thread
///
/// The worker instance is installed from the worker's own thread once it is
/// running, so the controller sees `None` until then.
pub struct Handle {
    thread_id: usize,
    threads: usize,
    cpu: Option<usize>,
    nicehash: bool,
    worker: OnceLock<Arc<dyn Worker>>,
}

impl Handle {
    /// Creates the handle for worker `thread_id` of `threads`
    pub fn new(thread_id: usize, threads: usize, cpu: Option<usize>, nicehash: bool) -> Self {
        Handle {
            thread_id,
            threads,
            cpu,
            nicehash,
            worker: OnceLock::new(),
        }
    }

    /// Index of this worker in the pool
    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    /// Total number of workers in the pool
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// CPU this worker is pinned to, if any
    pub fn cpu(&self) -> Option<usize> {
        self.cpu
    }

    /// Whether nonce partitioning must keep the pool's top byte
    pub fn nicehash(&self) -> bool {
        self.nicehash
    }

    /// The running worker, once installed
    pub fn worker(&self) -> Option<&Arc<dyn Worker>> {
        self.worker.get()
    }

    /// Installs the worker; only the first call has an effect
    pub fn set_worker(&self, worker: Arc<dyn Worker>) -> bool {
        self.worker.set(worker).is_ok()
    }

    /// First nonce for one of this worker's lanes
    ///
    /// The 32-bit nonce space (24-bit with nicehash) is cut into
    /// `threads * lanes` equal slices. Lane `l` of worker `i` owns slice
    /// `i + l * threads`, so single and double workers never overlap.
    pub fn start_nonce(&self, job: &MiningJob, lane: usize, lanes: usize) -> u32 {
        let slices = (self.threads * lanes).max(1) as u32;
        let slice = (self.thread_id + lane * self.threads) as u32;

        if self.uses_nicehash(job) {
            (job.nonce() & 0xFF00_0000).wrapping_add((0x00FF_FFFF / slices).wrapping_mul(slice))
        } else {
            (0xFFFF_FFFF / slices).wrapping_mul(slice)
        }
    }

    /// Nicehash applies if either the pool options or the job ask for it
    pub fn uses_nicehash(&self, job: &MiningJob) -> bool {
        self.nicehash || job.nicehash
    }
}

/// Advances a nonce, keeping the reserved top byte for nicehash jobs
pub fn next_nonce(nonce: u32, nicehash: bool) -> u32 {
    if nicehash {
        (nonce & 0xFF00_0000) | (nonce.wrapping_add(1) & 0x00FF_FFFF)
    } else {
        nonce.wrapping_add(1)
    }
}
