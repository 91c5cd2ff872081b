// src/miner/controller.rs
//! The pool's single driver
//!
//! The controller owns two event sources: a periodic tick that samples each
//! worker's progress into [`Telemetry`] and now and then reports the pool's
//! hash-rate, and a wake that drains the result queue into the listener.
//! Both handlers are plain methods so they can be driven directly in tests;
//! [`Controller::run`] wires them to a tokio interval and `Notify`.

use crate::miner::context::PoolContext;
use crate::miner::handle::Handle;
use crate::miner::listener::JobResultListener;
use crate::stats::{HashrateSink, MiningStats, Telemetry};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};

/// Timing policy of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Period between telemetry samples
    pub tick: Duration,
    /// Aggregate hash-rate is reported on every n-th tick, starting with the first
    pub report_every: u64,
    /// Window passed to the per-worker rate calculation, in milliseconds
    pub rate_window_ms: u64,
    /// Samples kept per worker
    pub telemetry_capacity: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        ControllerSettings {
            tick: Duration::from_millis(500),
            report_every: 16,
            rate_window_ms: 2500,
            telemetry_capacity: crate::stats::telemetry::DEFAULT_CAPACITY,
        }
    }
}

/// Drives telemetry and result delivery for one pool
pub struct Controller {
    ctx: Arc<PoolContext>,
    handles: Vec<Arc<Handle>>,
    wake: Arc<Notify>,
    telemetry: Telemetry,
    settings: ControllerSettings,
    ticks: u64,
    listener: Box<dyn JobResultListener>,
    sink: Box<dyn HashrateSink>,
    stats: MiningStats,
}

impl Controller {
    /// Creates a controller for the workers behind `handles`
    ///
    /// `wake` must be the signal the context's result queue was built with.
    pub fn new(
        ctx: Arc<PoolContext>,
        handles: Vec<Arc<Handle>>,
        wake: Arc<Notify>,
        listener: Box<dyn JobResultListener>,
        sink: Box<dyn HashrateSink>,
        settings: ControllerSettings,
    ) -> Self {
        let settings = ControllerSettings {
            report_every: settings.report_every.max(1),
            ..settings
        };
        Controller {
            ctx,
            telemetry: Telemetry::new(handles.len(), settings.telemetry_capacity),
            handles,
            wake,
            settings,
            ticks: 0,
            listener,
            sink,
            stats: MiningStats::default(),
        }
    }

    /// Totals so far
    pub fn stats(&self) -> &MiningStats {
        &self.stats
    }

    /// Samples every running worker and, on report ticks, the pool hash-rate
    ///
    /// Returns the aggregate rate when one was reported. The report is
    /// skipped if any worker has no measurable rate yet.
    pub fn on_tick(&mut self) -> Option<f64> {
        let mut hashes_total = 0;
        for handle in &self.handles {
            if let Some(worker) = handle.worker() {
                let hash_count = worker.hash_count();
                hashes_total += hash_count;
                self.telemetry
                    .add(handle.thread_id(), hash_count, worker.timestamp());
            }
        }
        self.stats.hashes_total = hashes_total;

        let tick = self.ticks;
        self.ticks += 1;
        if tick % self.settings.report_every != 0 {
            return None;
        }

        let hashrate = self.aggregate_hashrate()?;
        self.sink.report(hashrate);
        self.stats.last_hashrate = Some(hashrate);
        self.stats.reports += 1;
        Some(hashrate)
    }

    /// Sum of per-worker rates, or `None` if any worker is not measurable
    pub fn aggregate_hashrate(&self) -> Option<f64> {
        let mut total = 0.0;
        for handle in &self.handles {
            let rate = self
                .telemetry
                .calc(handle.thread_id(), self.settings.rate_window_ms);
            if !rate.is_finite() {
                return None;
            }
            total += rate;
        }
        Some(total)
    }

    /// Delivers every queued result to the listener, returning how many
    ///
    /// The queue lock is released before the first delivery.
    pub fn drain(&mut self) -> usize {
        let results = self.ctx.queue().drain();
        let delivered = results.len();
        for result in results {
            self.listener.on_job_result(result);
        }
        self.stats.results_total += delivered as u64;
        delivered
    }

    /// Event loop: ticks and wake-driven drains until `shutdown` resolves
    ///
    /// `stop_workers` runs once `shutdown` resolves and must not return until
    /// no worker can submit any more; whatever they queued up to that point is
    /// drained before returning.
    pub async fn run<F, S>(mut self, shutdown: F, stop_workers: S) -> MiningStats
    where
        F: Future<Output = ()>,
        S: FnOnce(),
    {
        let mut ticker = time::interval_at(
            time::Instant::now() + self.settings.tick,
            self.settings.tick,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let wake = self.wake.clone();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = wake.notified() => {
                    let delivered = self.drain();
                    if delivered > 0 {
                        log::debug!("Delivered {} results", delivered);
                    }
                }
                _ = ticker.tick() => {
                    self.on_tick();
                }
            }
        }

        stop_workers();
        let delivered = self.drain();
        if delivered > 0 {
            log::debug!("Delivered {} results found before shutdown", delivered);
        }
        self.stats
    }
}
