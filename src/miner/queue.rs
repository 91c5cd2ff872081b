// src/miner/queue.rs
//! Result queue shared by all workers
//!
//! Workers append under a mutex and then wake the controller. The controller
//! swaps the whole pending list out in one step, so the lock is never held
//! while results are being delivered.

use crate::miner::job::JobResult;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Cross-thread "there is work" notification
///
/// A wake is level-triggered: any number of calls before the consumer gets
/// around to draining may collapse into a single drain pass.
pub trait Signal: Send + Sync {
    /// Tells the consumer the queue needs draining
    fn wake(&self);
}

impl Signal for Notify {
    fn wake(&self) {
        // Stores at most one permit when nobody is waiting yet.
        self.notify_one();
    }
}

/// FIFO of results waiting for the controller
pub struct ResultQueue {
    pending: Mutex<Vec<JobResult>>,
    signal: Arc<dyn Signal>,
}

impl ResultQueue {
    /// Creates an empty queue that wakes `signal` on every submit
    pub fn new(signal: Arc<dyn Signal>) -> Self {
        ResultQueue {
            pending: Mutex::new(Vec::new()),
            signal,
        }
    }

    /// Appends a result and wakes the consumer
    ///
    /// Safe to call from any number of worker threads at once.
    pub fn submit(&self, result: JobResult) {
        self.lock().push(result);
        self.signal.wake();
    }

    /// Takes every pending result, oldest first
    pub fn drain(&self) -> Vec<JobResult> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of results waiting
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JobResult>> {
        // A worker that panicked mid-push cannot leave a half-written Vec.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::job::{MIN_BLOB_LEN, MiningJob};
    use crate::types::AlgorithmType;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSignal(AtomicUsize);

    impl Signal for CountingSignal {
        fn wake(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn result(thread_id: usize, nonce: u32) -> JobResult {
        let job = MiningJob {
            job_id: "q".into(),
            blob: vec![0; MIN_BLOB_LEN],
            target: u64::MAX,
            algorithm: AlgorithmType::CryptoNightV7,
            nicehash: false,
        };
        JobResult::new(&job, 1, nonce, thread_id, [0; 32])
    }

    #[test]
    fn submit_wakes_and_drain_empties() {
        let signal = Arc::new(CountingSignal::default());
        let queue = ResultQueue::new(signal.clone());

        queue.submit(result(0, 1));
        queue.submit(result(0, 2));
        assert_eq!(signal.0.load(Ordering::SeqCst), 2);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.iter().map(|r| r.nonce).collect::<Vec<_>>(), [1, 2]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn concurrent_producers_lose_nothing_and_keep_their_order() {
        let queue = Arc::new(ResultQueue::new(Arc::new(CountingSignal::default())));
        let producers: Vec<_> = (0..8)
            .map(|t| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    for n in 0..500 {
                        queue.submit(result(t, n));
                    }
                })
            })
            .collect();

        // Drain while producers are still running.
        let mut delivered = Vec::new();
        while delivered.len() < 8 * 500 {
            delivered.extend(queue.drain());
            std::thread::yield_now();
        }
        for producer in producers {
            producer.join().unwrap();
        }
        delivered.extend(queue.drain());

        assert_eq!(delivered.len(), 8 * 500);
        let unique: HashSet<_> = delivered.iter().map(|r| (r.thread_id, r.nonce)).collect();
        assert_eq!(unique.len(), delivered.len());

        for t in 0..8 {
            let nonces: Vec<_> = delivered
                .iter()
                .filter(|r| r.thread_id == t)
                .map(|r| r.nonce)
                .collect();
            assert!(nonces.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[tokio::test]
    async fn notify_coalesces_repeated_wakes() {
        let notify = Arc::new(Notify::new());
        let queue = ResultQueue::new(notify.clone());
        queue.submit(result(0, 1));
        queue.submit(result(1, 1));
        queue.submit(result(0, 2));

        notify.notified().await;
        assert_eq!(queue.drain().len(), 3);

        // Only a single permit was stored for the three wakes.
        let second = tokio::time::timeout(std::time::Duration::from_millis(20), notify.notified()).await;
        assert!(second.is_err());
    }
}
