// src/miner/worker.rs
//! Worker thread implementation
//!
//! A worker runs one fixed loop for the lifetime of its thread: wait while
//! paused, snapshot the job, hash until the job version moves, repeat.
//! [`SingleWorker`] tries one nonce per iteration, [`DoubleWorker`] two.

use crate::miner::context::PoolContext;
use crate::miner::handle::{Handle, next_nonce};
use crate::miner::job::{JobResult, set_nonce};
use crate::miner::variant::Variant;
use crate::utils::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Progress counters are published once every this many hashes
pub const STATS_INTERVAL: u64 = 16;

/// A compute strategy running on one worker thread
///
/// `start` blocks for the life of the thread. The counters are read by the
/// controller from another thread while `start` is running.
pub trait Worker: Send + Sync {
    /// Runs the hashing loop until the pool is stopped
    fn start(&self);

    /// Hashes computed so far (never decreases)
    fn hash_count(&self) -> u64;

    /// Clock reading of the last `hash_count` update, in milliseconds
    fn timestamp(&self) -> u64;

    /// Which strategy this is
    fn variant(&self) -> Variant;
}

/// Counters a worker publishes for telemetry
#[derive(Debug, Default)]
struct Progress {
    hash_count: AtomicU64,
    timestamp: AtomicU64,
}

impl Progress {
    fn store(&self, count: u64, clock: &dyn Clock) {
        self.timestamp.store(clock.now_ms(), Ordering::Relaxed);
        self.hash_count.store(count, Ordering::Release);
    }

    fn hash_count(&self) -> u64 {
        self.hash_count.load(Ordering::Acquire)
    }

    fn timestamp(&self) -> u64 {
        self.timestamp.load(Ordering::Relaxed)
    }
}

/// Worker hashing one nonce per iteration
pub struct SingleWorker {
    handle: Arc<Handle>,
    ctx: Arc<PoolContext>,
    progress: Progress,
}

impl SingleWorker {
    /// Creates the worker for `handle`
    pub fn new(handle: Arc<Handle>, ctx: Arc<PoolContext>) -> Self {
        SingleWorker {
            handle,
            ctx,
            progress: Progress::default(),
        }
    }
}

impl Worker for SingleWorker {
    fn start(&self) {
        let state = self.ctx.state();
        let clock = self.ctx.clock();
        let mut count = 0u64;
        // Where we left off, so a resumed job does not rehash its nonces.
        let mut resume: Option<(u64, u32)> = None;

        while let Some(snapshot) = state.wait_for_job() {
            let job = &snapshot.job;
            let nicehash = self.handle.uses_nicehash(job);
            let mut nonce = match resume {
                Some((version, nonce)) if version == snapshot.version => nonce,
                _ => self.handle.start_nonce(job, 0, 1),
            };
            let mut blob = job.blob.clone();

            while !state.is_outdated(snapshot.version) {
                if count % STATS_INTERVAL == 0 {
                    self.progress.store(count, clock);
                }

                set_nonce(&mut blob, nonce);
                match self.ctx.algorithm().hash(&blob) {
                    Ok(hash) if job.meets_target(&hash) => self.ctx.submit(JobResult::new(
                        job,
                        snapshot.version,
                        nonce,
                        self.handle.thread_id(),
                        hash,
                    )),
                    Ok(_) => {}
                    Err(e) => log::error!("Hashing failed: {}", e),
                }

                nonce = next_nonce(nonce, nicehash);
                count += 1;
            }

            self.progress.store(count, clock);
            resume = Some((snapshot.version, nonce));
        }
    }

    fn hash_count(&self) -> u64 {
        self.progress.hash_count()
    }

    fn timestamp(&self) -> u64 {
        self.progress.timestamp()
    }

    fn variant(&self) -> Variant {
        Variant::Single
    }
}

/// Worker hashing two independent nonce lanes per iteration
pub struct DoubleWorker {
    handle: Arc<Handle>,
    ctx: Arc<PoolContext>,
    progress: Progress,
}

impl DoubleWorker {
    /// Creates the worker for `handle`
    pub fn new(handle: Arc<Handle>, ctx: Arc<PoolContext>) -> Self {
        DoubleWorker {
            handle,
            ctx,
            progress: Progress::default(),
        }
    }
}

impl Worker for DoubleWorker {
    fn start(&self) {
        let state = self.ctx.state();
        let clock = self.ctx.clock();
        let thread_id = self.handle.thread_id();
        let mut count = 0u64;
        let mut resume: Option<(u64, [u32; 2])> = None;

        while let Some(snapshot) = state.wait_for_job() {
            let job = &snapshot.job;
            let nicehash = self.handle.uses_nicehash(job);
            let mut nonces = match resume {
                Some((version, nonces)) if version == snapshot.version => nonces,
                _ => [
                    self.handle.start_nonce(job, 0, 2),
                    self.handle.start_nonce(job, 1, 2),
                ],
            };
            let mut blobs = [job.blob.clone(), job.blob.clone()];

            while !state.is_outdated(snapshot.version) {
                if count % STATS_INTERVAL == 0 {
                    self.progress.store(count, clock);
                }

                set_nonce(&mut blobs[0], nonces[0]);
                set_nonce(&mut blobs[1], nonces[1]);
                match self.ctx.algorithm().hash_pair(&blobs[0], &blobs[1]) {
                    Ok(hashes) => {
                        for (hash, nonce) in hashes.into_iter().zip(nonces) {
                            if job.meets_target(&hash) {
                                self.ctx.submit(JobResult::new(
                                    job,
                                    snapshot.version,
                                    nonce,
                                    thread_id,
                                    hash,
                                ));
                            }
                        }
                    }
                    Err(e) => log::error!("Double hashing failed: {}", e),
                }

                nonces = nonces.map(|nonce| next_nonce(nonce, nicehash));
                count += 2;
            }

            self.progress.store(count, clock);
            resume = Some((snapshot.version, nonces));
        }
    }

    fn hash_count(&self) -> u64 {
        self.progress.hash_count()
    }

    fn timestamp(&self) -> u64 {
        self.progress.timestamp()
    }

    fn variant(&self) -> Variant {
        Variant::Double
    }
}
