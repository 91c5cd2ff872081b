//! End-to-end behaviour of a running pool: real worker threads, a cheap
//! in-test hash function, and a controller driven by hand.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use xmr_workers_rs::miner::job::{MIN_BLOB_LEN, NONCE_OFFSET};
use xmr_workers_rs::miner::{Variant, VariantSelector};
use xmr_workers_rs::utils::{ManualClock, MonotonicClock};
use xmr_workers_rs::*;

/// Echoes the blob nonce into the hash tail, so a target of N turns the
/// first N nonces of every range into results.
struct NonceEcho;

impl Algorithm for NonceEcho {
    fn hash(&self, blob: &[u8]) -> Result<[u8; 32], MinerError> {
        let mut out = [0u8; 32];
        out[24..28].copy_from_slice(&blob[NONCE_OFFSET..NONCE_OFFSET + 4]);
        Ok(out)
    }

    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::CryptoNightV7
    }
}

#[derive(Clone, Default)]
struct Collect(Arc<Mutex<Vec<JobResult>>>);

impl JobResultListener for Collect {
    fn on_job_result(&mut self, result: JobResult) {
        self.0.lock().unwrap().push(result);
    }
}

#[derive(Clone, Default)]
struct Reports(Arc<Mutex<Vec<f64>>>);

impl HashrateSink for Reports {
    fn report(&mut self, hashrate: f64) {
        self.0.lock().unwrap().push(hashrate);
    }
}

struct Running {
    pool: WorkerPool,
    controller: Controller,
    results: Collect,
    reports: Reports,
}

fn start(threads: usize, mode: HashMode, clock: Arc<dyn utils::Clock>) -> Running {
    let wake = Arc::new(Notify::new());
    let ctx = Arc::new(PoolContext::new(
        Arc::new(NonceEcho),
        clock,
        wake.clone(),
        VariantSelector::new(mode, threads),
    ));
    let pool = WorkerPool::start(
        ctx.clone(),
        PoolOptions {
            threads,
            affinity: None,
            nicehash: false,
        },
    )
    .unwrap();

    let results = Collect::default();
    let reports = Reports::default();
    let controller = Controller::new(
        ctx,
        pool.handles().to_vec(),
        wake,
        Box::new(results.clone()),
        Box::new(reports.clone()),
        ControllerSettings {
            report_every: 1,
            ..ControllerSettings::default()
        },
    );
    Running {
        pool,
        controller,
        results,
        reports,
    }
}

fn job(id: &str, target: u64) -> MiningJob {
    MiningJob {
        job_id: id.into(),
        blob: vec![0; MIN_BLOB_LEN],
        target,
        algorithm: AlgorithmType::CryptoNightV7,
        nicehash: false,
    }
}

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn pool_stays_paused_until_first_job() {
    let run = start(2, HashMode::Single, Arc::new(MonotonicClock::new()));
    let state = run.pool.context().state();
    assert!(state.is_paused());
    assert_eq!(state.sequence(), 0);
    assert!(run.pool.job().is_none());

    wait_until("workers ready", || run.pool.ready_workers() == 2);
    std::thread::sleep(Duration::from_millis(50));
    for handle in run.pool.handles() {
        assert_eq!(handle.worker().unwrap().hash_count(), 0);
    }

    let version = run.pool.set_job(job("j1", 0)).unwrap();
    assert!(!state.is_paused());
    assert_eq!(run.pool.job().unwrap().version, version);
    wait_until("both workers hashing", || {
        run.pool
            .handles()
            .iter()
            .all(|h| h.worker().is_some_and(|w| w.hash_count() > 0))
    });
    run.pool.stop();
}

#[test]
fn results_from_every_worker_reach_the_listener_once() {
    let mut run = start(2, HashMode::Single, Arc::new(MonotonicClock::new()));
    // Worker 0 starts at nonce 0 and worker 1 at 0x7FFFFFFF; a target of 3
    // gives worker 0 three results and worker 1 none from its own range.
    run.pool.set_job(job("j1", 3)).unwrap();
    wait_until("worker 0 results", || run.pool.context().queue().len() >= 3);

    // Two more for worker 1, submitted through the pool like a worker would.
    let snapshot = run.pool.job().unwrap();
    run.pool.submit(JobResult::new(&snapshot.job, snapshot.version, 0x7FFF_FFFF, 1, [0; 32]));
    run.pool.submit(JobResult::new(&snapshot.job, snapshot.version, 0x8000_0000, 1, [0; 32]));
    run.pool.stop();

    run.controller.drain();
    run.controller.drain();

    let delivered = run.results.0.lock().unwrap();
    assert_eq!(delivered.len(), 5);
    let unique: HashSet<_> = delivered.iter().map(|r| (r.thread_id, r.nonce)).collect();
    assert_eq!(unique.len(), 5);

    let per_worker = |t: usize| -> Vec<u32> {
        delivered.iter().filter(|r| r.thread_id == t).map(|r| r.nonce).collect()
    };
    assert_eq!(per_worker(0), [0, 1, 2]);
    assert_eq!(per_worker(1), [0x7FFF_FFFF, 0x8000_0000]);
    assert_eq!(run.controller.stats().results_total, 5);
}

#[test]
fn superseded_job_is_skipped() {
    let run = start(2, HashMode::Double, Arc::new(MonotonicClock::new()));
    let ctx = run.pool.context().clone();
    let v1 = run.pool.set_job(job("j1", 1)).unwrap();
    let v2 = run.pool.set_job(job("j2", 1)).unwrap();
    assert_eq!(v2, v1 + 1);
    assert_eq!(run.pool.job().unwrap().job.job_id, "j2");

    // Worker 0, lane 0 starts at nonce 0: the only result per job.
    wait_until("a result for j2", || {
        ctx.queue().drain().iter().any(|r| {
            assert!(
                (r.job_id == "j1" && r.version == v1) || (r.job_id == "j2" && r.version == v2),
                "job {} paired with version {}",
                r.job_id,
                r.version
            );
            r.job_id == "j2"
        })
    });
    run.pool.stop();
}

#[test]
fn hashrate_is_reported_from_worker_progress() {
    let clock = Arc::new(ManualClock::new(0));
    let mut run = start(2, HashMode::Single, clock.clone());
    run.pool.set_job(job("j1", 0)).unwrap();
    wait_until("workers ready", || run.pool.ready_workers() == 2);

    // Nothing measurable with a single sample.
    assert_eq!(run.controller.on_tick(), None);

    // Move the clock on so the next progress stamps differ.
    clock.advance(1000);
    let counts_before: Vec<u64> = counts(&run.pool);
    wait_until("fresh progress stamps", || {
        run.pool
            .handles()
            .iter()
            .all(|h| h.worker().is_some_and(|w| w.timestamp() == 1000))
    });

    let reported = run.controller.on_tick().expect("both workers measurable");
    assert!(reported.is_finite());
    assert!(reported > 0.0);
    assert!(counts(&run.pool).iter().zip(&counts_before).all(|(a, b)| a >= b));
    assert_eq!(*run.reports.0.lock().unwrap(), [reported]);
    run.pool.stop();
}

#[test]
fn variant_is_chosen_once_for_all_workers() {
    let run = start(3, HashMode::Double, Arc::new(MonotonicClock::new()));
    wait_until("workers ready", || run.pool.ready_workers() == 3);
    assert!(
        run.pool
            .handles()
            .iter()
            .all(|h| h.worker().unwrap().variant() == Variant::Double)
    );
    assert_eq!(run.pool.context().variant().resolved(), Some(Variant::Double));
    run.pool.stop();
}

fn counts(pool: &WorkerPool) -> Vec<u64> {
    pool.handles()
        .iter()
        .map(|h| h.worker().map_or(0, |w| w.hash_count()))
        .collect()
}

#[tokio::test]
async fn results_found_during_shutdown_reach_the_listener() {
    let Running {
        pool,
        controller,
        results,
        ..
    } = start(2, HashMode::Single, Arc::new(MonotonicClock::new()));
    let ctx = pool.context().clone();
    // Every nonce is a result, so workers submit right up to the stop.
    pool.set_job(job("j1", u64::MAX)).unwrap();

    let stats = controller
        .run(tokio::time::sleep(Duration::from_millis(300)), move || {
            pool.stop()
        })
        .await;

    assert!(ctx.queue().is_empty());
    let delivered = results.0.lock().unwrap().len() as u64;
    assert!(delivered > 0);
    assert_eq!(stats.results_total, delivered);
}
