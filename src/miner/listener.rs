// src/miner/listener.rs
//! Consumers of drained results

use crate::miner::job::JobResult;
use crossbeam_channel::Sender;

/// Receives every result the controller drains
///
/// Runs on the controller thread, once per result, in drain order. It shares
/// that thread with the tick and the wake handler, so it must not block for
/// long.
pub trait JobResultListener: Send {
    /// Handles one result
    fn on_job_result(&mut self, result: JobResult);
}

/// Forwards results to another thread, e.g. a pool submitter
impl JobResultListener for Sender<JobResult> {
    fn on_job_result(&mut self, result: JobResult) {
        if let Err(e) = self.send(result) {
            log::warn!("Dropping result for job {}: receiver gone", e.0.job_id);
        }
    }
}

/// Logs each result as one JSON line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl JobResultListener for LogListener {
    fn on_job_result(&mut self, result: JobResult) {
        match serde_json::to_string(&result) {
            Ok(line) => log::info!("Result found: {}", line),
            Err(e) => log::error!("Failed to encode result for job {}: {}", result.job_id, e),
        }
    }
}
