// src/miner/state.rs
//! Shared job state
//!
//! The controller publishes jobs here; every worker reads from it. A job and
//! the version it was published under are stored together in one snapshot,
//! so a reader can never pair one job with another job's version.

use crate::miner::job::MiningJob;
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// A published job together with the version it was published under
#[derive(Debug)]
pub struct JobSnapshot {
    /// Version assigned at publish time
    pub version: u64,
    /// The job itself
    pub job: MiningJob,
}

/// Current job, version counter and pause/stop flags
#[derive(Debug)]
pub struct JobState {
    /// Current active job (atomically swappable)
    current: ArcSwapOption<JobSnapshot>,
    /// Serialises publishers so snapshot and counter advance together
    publish: Mutex<()>,
    /// Version of the most recently published job
    sequence: AtomicU64,
    /// Set until the first publish, and while paused or stopped
    paused: AtomicBool,
    /// Set once; workers leave their loops
    stopped: AtomicBool,
    /// Idle workers sleep on `wakeup` under this lock
    idle: Mutex<()>,
    wakeup: Condvar,
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}

impl JobState {
    /// Creates an empty, paused state at version 0
    pub fn new() -> Self {
        JobState {
            current: ArcSwapOption::empty(),
            publish: Mutex::new(()),
            sequence: AtomicU64::new(0),
            paused: AtomicBool::new(true),
            stopped: AtomicBool::new(false),
            idle: Mutex::new(()),
            wakeup: Condvar::new(),
        }
    }

    /// Returns the current job snapshot, if any job has been published
    pub fn job(&self) -> Option<Arc<JobSnapshot>> {
        self.current.load_full()
    }

    /// Publishes a new job and returns its version
    ///
    /// The snapshot is stored before the counter moves, so a worker that sees
    /// the new version always finds the matching job. Clears the pause flag.
    pub fn set_job(&self, job: MiningJob) -> u64 {
        let _guard = self.publish.lock().unwrap_or_else(PoisonError::into_inner);

        let version = self.sequence.load(Ordering::Acquire) + 1;
        self.current.store(Some(Arc::new(JobSnapshot { version, job })));
        self.sequence.store(version, Ordering::Release);

        if !self.is_stopped() {
            self.paused.store(false, Ordering::Release);
        }
        self.wake_idle();
        version
    }

    /// Version of the most recently published job (0 before the first)
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Whether workers must currently stay idle
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Whether the pool has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Whether work computed against `version` should be abandoned
    pub fn is_outdated(&self, version: u64) -> bool {
        self.sequence() != version || self.is_paused()
    }

    /// Halts hashing without discarding the current job
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Lifts an explicit pause
    ///
    /// Returns `false` (and stays paused) when there is no job to resume or
    /// the state has been stopped.
    pub fn resume(&self) -> bool {
        if self.is_stopped() || self.current.load().is_none() {
            return false;
        }
        self.paused.store(false, Ordering::Release);
        self.wake_idle();
        true
    }

    /// Stops all workers for good
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.paused.store(true, Ordering::Release);
        self.wake_idle();
    }

    /// Blocks the calling worker until there is a job to hash
    ///
    /// Sleeps while paused until a publish, resume or stop wakes it.
    /// Returns `None` once the state is stopped.
    pub fn wait_for_job(&self) -> Option<Arc<JobSnapshot>> {
        let mut guard = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.is_stopped() {
                return None;
            }
            if !self.is_paused() {
                if let Some(snapshot) = self.job() {
                    return Some(snapshot);
                }
            }
            guard = self
                .wakeup
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    // Flags are stored before taking the lock, so a worker either sees them
    // on its next check or is already waiting and gets the notification.
    fn wake_idle(&self) {
        let _guard = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        self.wakeup.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::job::MIN_BLOB_LEN;
    use crate::types::AlgorithmType;
    use std::time::{Duration, Instant};

    fn job(id: &str) -> MiningJob {
        MiningJob {
            job_id: id.into(),
            blob: vec![0; MIN_BLOB_LEN],
            target: u64::MAX,
            algorithm: AlgorithmType::CryptoNightV7,
            nicehash: false,
        }
    }

    #[test]
    fn starts_paused_without_job() {
        let state = JobState::new();
        assert!(state.is_paused());
        assert_eq!(state.sequence(), 0);
        assert!(state.job().is_none());
    }

    #[test]
    fn every_publish_bumps_version_and_unpauses() {
        let state = JobState::new();
        let mut last = state.sequence();
        for i in 0..10 {
            let version = state.set_job(job(&i.to_string()));
            assert!(version > last);
            assert_eq!(state.sequence(), version);
            assert!(!state.is_paused());
            last = version;
        }
    }

    #[test]
    fn repeated_reads_return_identical_snapshot() {
        let state = JobState::new();
        state.set_job(job("a"));
        let first = state.job().unwrap();
        for _ in 0..5 {
            let again = state.job().unwrap();
            assert_eq!(again.version, first.version);
            assert_eq!(again.job, first.job);
        }
    }

    #[test]
    fn superseded_job_is_never_observed() {
        let state = JobState::new();
        state.set_job(job("j1"));
        let v2 = state.set_job(job("j2"));
        let snapshot = state.job().unwrap();
        assert_eq!(snapshot.version, v2);
        assert_eq!(snapshot.job.job_id, "j2");
    }

    #[test]
    fn pause_and_resume_keep_the_job() {
        let state = JobState::new();
        assert!(!state.resume());

        let version = state.set_job(job("a"));
        state.pause();
        assert!(state.is_outdated(version));
        assert!(state.resume());
        assert!(!state.is_outdated(version));
        assert_eq!(state.job().unwrap().job.job_id, "a");
    }

    #[test]
    fn stop_wins_over_publish() {
        let state = JobState::new();
        state.stop();
        state.set_job(job("late"));
        assert!(state.is_paused());
        assert!(state.wait_for_job().is_none());
    }

    #[test]
    fn idle_waiters_wake_on_publish_and_stop() {
        let state = Arc::new(JobState::new());
        let waiter = {
            let state = state.clone();
            std::thread::spawn(move || state.wait_for_job().map(|s| s.job.job_id.clone()))
        };
        std::thread::sleep(Duration::from_millis(20));
        let published = Instant::now();
        state.set_job(job("wake"));
        assert_eq!(waiter.join().unwrap().as_deref(), Some("wake"));
        assert!(published.elapsed() < Duration::from_millis(100));

        state.pause();
        let waiter = {
            let state = state.clone();
            std::thread::spawn(move || state.wait_for_job().is_none())
        };
        std::thread::sleep(Duration::from_millis(20));
        let stopped = Instant::now();
        state.stop();
        assert!(waiter.join().unwrap());
        assert!(stopped.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn concurrent_publishers_keep_job_and_version_paired() {
        let state = Arc::new(JobState::new());
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let state = state.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        let version = state.set_job(job(&format!("{w}-{i}")));
                        let snapshot = state.job().unwrap();
                        assert!(snapshot.version >= version);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(state.sequence(), 1000);
        assert_eq!(state.job().unwrap().version, 1000);
    }
}
