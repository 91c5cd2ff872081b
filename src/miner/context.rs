// src/miner/context.rs
//! State shared by every worker thread and the controller

use crate::miner::algorithm::Algorithm;
use crate::miner::job::{JobResult, MiningJob};
use crate::miner::queue::{ResultQueue, Signal};
use crate::miner::state::{JobSnapshot, JobState};
use crate::miner::variant::VariantSelector;
use crate::utils::clock::Clock;
use crate::utils::error::MinerError;
use std::sync::Arc;

/// Everything the workers of one pool have in common
///
/// Built once at startup and handed out as `Arc<PoolContext>`.
pub struct PoolContext {
    state: JobState,
    queue: ResultQueue,
    algorithm: Arc<dyn Algorithm>,
    clock: Arc<dyn Clock>,
    variant: VariantSelector,
}

impl PoolContext {
    /// Creates the shared context
    ///
    /// # Arguments
    /// * `algorithm` - Hash function every worker runs
    /// * `clock` - Time source for progress stamps
    /// * `signal` - Wake raised whenever a result is queued
    /// * `variant` - One-time single/double decision
    pub fn new(
        algorithm: Arc<dyn Algorithm>,
        clock: Arc<dyn Clock>,
        signal: Arc<dyn Signal>,
        variant: VariantSelector,
    ) -> Self {
        PoolContext {
            state: JobState::new(),
            queue: ResultQueue::new(signal),
            algorithm,
            clock,
            variant,
        }
    }

    /// Job, version and pause flags
    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Pending results
    pub fn queue(&self) -> &ResultQueue {
        &self.queue
    }

    /// Hash function
    pub fn algorithm(&self) -> &dyn Algorithm {
        self.algorithm.as_ref()
    }

    /// Progress time source
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Variant selection shared by all workers
    pub fn variant(&self) -> &VariantSelector {
        &self.variant
    }

    /// Current job snapshot
    pub fn job(&self) -> Option<Arc<JobSnapshot>> {
        self.state.job()
    }

    /// Publishes a job to every worker
    ///
    /// # Errors
    /// Returns `MinerError::InputError` if the blob cannot hold a nonce; the
    /// current job stays published.
    pub fn set_job(&self, job: MiningJob) -> Result<u64, MinerError> {
        job.validate()?;
        if job.algorithm != self.algorithm.algorithm_type() {
            log::warn!(
                "Job {} is for {} but workers run {}",
                job.job_id,
                job.algorithm,
                self.algorithm.algorithm_type()
            );
        }
        let job_id = job.job_id.clone();
        let version = self.state.set_job(job);
        log::debug!("Published job {} as version {}", job_id, version);
        Ok(version)
    }

    /// Queues a result and wakes the controller
    pub fn submit(&self, result: JobResult) {
        self.queue.submit(result);
    }
}
