// src/stats/reporter.rs
//! Hash-rate reporting and run statistics

/// Formats an aggregate hash-rate the way it appears in the log
pub fn format_hashrate(hashrate: f64) -> String {
    format!("{:03.1} H/s", hashrate)
}

/// Receives the periodic aggregate hash-rate
///
/// Called on the controller thread only when every worker had a measurable
/// rate for the interval.
pub trait HashrateSink: Send {
    /// Reports the summed hash-rate of all workers, in hashes per second
    fn report(&mut self, hashrate: f64);
}

/// Default sink: one info line per report
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl HashrateSink for LogSink {
    fn report(&mut self, hashrate: f64) {
        log::info!("{}", format_hashrate(hashrate));
    }
}

/// Statistics accumulated by the controller over a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningStats {
    /// Results delivered to the listener
    pub results_total: u64,
    /// Sum of all worker hash counters at the last tick
    pub hashes_total: u64,
    /// Most recent aggregate hash-rate that was reported
    pub last_hashrate: Option<f64>,
    /// Number of aggregate reports emitted
    pub reports: u64,
}
