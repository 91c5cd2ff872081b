// src/main.rs
use clap::Parser;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use xmr_workers_rs::config::CpuProfile;
use xmr_workers_rs::miner::{VariantSelector, algorithm};
use xmr_workers_rs::utils::{MonotonicClock, logging::init_bench_logging};
use xmr_workers_rs::*;

/// Difficulty of the synthetic benchmark job
const BENCH_DIFFICULTY: u64 = 100_000;

/// Main entry point
///
/// # Returns
/// - `Ok(())` on successful execution
/// - `Err(MinerError)` if any operation fails
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Start(opts) => start_pool(opts),
        cli::Action::Benchmark(opts) => run_benchmark(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Starts the worker pool on the configured job and runs until Ctrl-C
///
/// # Operations
/// 1. Initializes logging
/// 2. Loads configuration and applies CLI overrides
/// 3. Starts the pool and publishes the startup job
/// 4. Runs the controller until interrupted, then stops the workers
fn start_pool(opts: cli::StartOptions) -> Result<(), MinerError> {
    utils::init_logging();

    let mut config = config::load(&opts.config)?;
    // Apply CLI overrides
    if let Some(threads) = opts.threads {
        config.threads = threads;
    }
    if let Some(algo) = opts.algorithm {
        config.algorithm = algo;
    }
    if let Some(mode) = opts.hash_mode {
        config.hash_mode = mode;
    }
    config.validate()?;

    let job = config.startup_job()?.ok_or_else(|| {
        MinerError::ConfigError("No [job] section; nothing for the workers to hash".into())
    })?;

    let stats = run_pool(&config, job, Box::new(miner::LogListener), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
        log::info!("Shutting down");
    })?;

    log::info!(
        "Delivered {} results, {} hashes, {} hash-rate reports",
        stats.results_total,
        stats.hashes_total,
        stats.reports
    );
    Ok(())
}

/// Runs the pool on a synthetic job for a fixed time
///
/// # Operations
/// 1. Initializes benchmark-specific logging
/// 2. Builds a zero blob at a fixed difficulty
/// 3. Runs the normal controller loop, so reports look like real mining
/// 4. Logs the last measured hash-rate
fn run_benchmark(opts: cli::BenchmarkOptions) -> Result<(), MinerError> {
    init_bench_logging();

    let config = Config {
        algorithm: opts.algorithm,
        threads: opts.threads,
        hash_mode: opts.hash_mode,
        ..Config::default()
    };
    let job = MiningJob {
        job_id: "benchmark".into(),
        blob: vec![0u8; 76],
        target: u64::MAX / BENCH_DIFFICULTY,
        algorithm: opts.algorithm,
        nicehash: false,
    };

    log::info!(
        "Starting {} benchmark for {} seconds",
        opts.algorithm,
        opts.duration
    );

    let duration = Duration::from_secs(opts.duration);
    let stats = run_pool(&config, job, Box::new(miner::LogListener), async move {
        tokio::time::sleep(duration).await;
    })?;

    log::info!("Benchmark results:");
    log::info!("Total hashes: {}", stats.hashes_total);
    match stats.last_hashrate {
        Some(hashrate) => log::info!("Last hash-rate: {}", stats::format_hashrate(hashrate)),
        None => log::info!("Run was too short to measure a hash-rate"),
    }
    log::logger().flush(); // Ensure final results appear

    Ok(())
}

/// Generates configuration template file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let config = config::generate_template(opts.job);
    std::fs::write(opts.output, config)?;
    Ok(())
}

/// Starts a pool, publishes `job`, and drives it until `shutdown` resolves
///
/// The controller runs on a current-thread runtime on this thread; the
/// workers are plain OS threads.
fn run_pool<F>(
    config: &Config,
    job: MiningJob,
    listener: Box<dyn JobResultListener>,
    shutdown: F,
) -> Result<MiningStats, MinerError>
where
    F: Future<Output = ()>,
{
    let threads = CpuProfile::detect().resolve_threads(config.threads, config.hash_mode);
    let wake = Arc::new(Notify::new());
    let ctx = Arc::new(PoolContext::new(
        algorithm::create(config.algorithm),
        Arc::new(MonotonicClock::new()),
        wake.clone(),
        VariantSelector::new(config.hash_mode, threads),
    ));

    let pool = WorkerPool::start(
        ctx.clone(),
        PoolOptions {
            threads,
            affinity: config.cpu_affinity,
            nicehash: config.nicehash,
        },
    )?;
    let controller = Controller::new(
        ctx,
        pool.handles().to_vec(),
        wake,
        listener,
        Box::new(LogSink),
        config.telemetry.controller_settings(),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let version = pool.set_job(job)?;
    log::info!("Job published (version {})", version);
    let stats = runtime.block_on(controller.run(shutdown, move || pool.stop()));
    Ok(stats)
}
