// src/miner/pool.rs
//! Worker pool lifecycle
//!
//! Spawns one OS thread per worker, publishes jobs through the shared
//! context, and stops and joins the threads on shutdown.

use crate::miner::affinity;
use crate::miner::context::PoolContext;
use crate::miner::handle::Handle;
use crate::miner::job::{JobResult, MiningJob};
use crate::miner::state::JobSnapshot;
use crate::miner::variant::Variant;
use crate::miner::worker::{DoubleWorker, SingleWorker, Worker};
use crate::utils::error::MinerError;
use std::sync::Arc;
use std::thread::JoinHandle;

/// How the pool lays out its workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Number of worker threads (already resolved, must be non-zero)
    pub threads: usize,
    /// CPU bit mask to pin workers to; `None` leaves placement to the OS
    pub affinity: Option<u64>,
    /// Keep the pool's top nonce byte on every job
    pub nicehash: bool,
}

/// Owns the worker threads of one pool
pub struct WorkerPool {
    ctx: Arc<PoolContext>,
    handles: Vec<Arc<Handle>>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the workers
    ///
    /// Workers start paused and begin hashing on the first
    /// [`set_job`](Self::set_job).
    ///
    /// # Errors
    /// Returns `MinerError::ThreadError` if a thread cannot be spawned. Any
    /// workers already running are stopped before returning.
    pub fn start(ctx: Arc<PoolContext>, options: PoolOptions) -> Result<Self, MinerError> {
        if options.threads == 0 {
            return Err(MinerError::ConfigError("Pool needs at least one thread".into()));
        }

        let mut pool = WorkerPool {
            ctx,
            handles: Vec::with_capacity(options.threads),
            threads: Vec::with_capacity(options.threads),
        };

        for thread_id in 0..options.threads {
            let cpu = options
                .affinity
                .and_then(|mask| affinity::cpu_for_thread(mask, thread_id));
            let handle = Arc::new(Handle::new(thread_id, options.threads, cpu, options.nicehash));

            let ctx = pool.ctx.clone();
            let worker_handle = handle.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("xmr-worker-{}", thread_id))
                .spawn(move || on_ready(worker_handle, ctx));

            match spawned {
                Ok(thread) => {
                    pool.handles.push(handle);
                    pool.threads.push(thread);
                }
                Err(e) => {
                    pool.shutdown();
                    return Err(MinerError::ThreadError(format!(
                        "Failed to spawn worker {}: {}",
                        thread_id, e
                    )));
                }
            }
        }

        log::info!(
            "Started {} worker threads{}",
            options.threads,
            if options.nicehash { " (nicehash)" } else { "" }
        );
        Ok(pool)
    }

    /// Shared context of this pool
    pub fn context(&self) -> &Arc<PoolContext> {
        &self.ctx
    }

    /// Per-worker handles, indexed by thread id
    pub fn handles(&self) -> &[Arc<Handle>] {
        &self.handles
    }

    /// Current job snapshot
    pub fn job(&self) -> Option<Arc<JobSnapshot>> {
        self.ctx.job()
    }

    /// Publishes a job to every worker and returns its version
    pub fn set_job(&self, job: MiningJob) -> Result<u64, MinerError> {
        self.ctx.set_job(job)
    }

    /// Queues a result for the controller
    pub fn submit(&self, result: JobResult) {
        self.ctx.submit(result);
    }

    /// Halts hashing, keeping the current job
    pub fn pause(&self) {
        log::info!("Pausing workers");
        self.ctx.state().pause();
    }

    /// Continues the current job after [`pause`](Self::pause)
    pub fn resume(&self) -> bool {
        let resumed = self.ctx.state().resume();
        if resumed {
            log::info!("Resuming workers");
        }
        resumed
    }

    /// Number of workers whose compute loop is running
    pub fn ready_workers(&self) -> usize {
        self.handles.iter().filter(|h| h.worker().is_some()).count()
    }

    /// Stops every worker and waits for the threads to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.ctx.state().stop();
        let threads = std::mem::take(&mut self.threads);
        if threads.is_empty() {
            return;
        }

        for thread in threads {
            if thread.join().is_err() {
                log::error!("A worker thread panicked");
            }
        }
        log::info!("All {} worker threads stopped", self.handles.len());
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs on the freshly spawned worker thread
///
/// The variant is only decided here, once the thread exists, because it
/// depends on runtime detection shared by the whole pool.
fn on_ready(handle: Arc<Handle>, ctx: Arc<PoolContext>) {
    if let Some(cpu) = handle.cpu() {
        if handle.threads() > 1 {
            if let Err(e) = affinity::pin_current_thread(cpu) {
                log::warn!("Worker {}: failed to pin to CPU {}: {}", handle.thread_id(), cpu, e);
            }
        }
    }

    let worker: Arc<dyn Worker> = match ctx.variant().resolve() {
        Variant::Single => Arc::new(SingleWorker::new(handle.clone(), ctx.clone())),
        Variant::Double => Arc::new(DoubleWorker::new(handle.clone(), ctx.clone())),
    };
    handle.set_worker(worker.clone());
    log::debug!("Worker {} ready ({})", handle.thread_id(), worker.variant());

    worker.start();
    log::debug!("Worker {} exited", handle.thread_id());
}
