// src/stats/telemetry.rs
//! Per-worker hash-rate history
//!
//! Every controller tick appends one (hash count, timestamp) sample per
//! worker to a fixed-size ring. Rates are computed from the newest sample and
//! the oldest one that still falls inside the requested window. The ring size
//! therefore caps both memory and the longest window that can be served.

/// Default number of samples kept per worker
pub const DEFAULT_CAPACITY: usize = 16;

/// One progress reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    /// Worker hash counter at sampling time
    pub hash_count: u64,
    /// Worker's own timestamp for that counter, in milliseconds
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
struct Track {
    samples: Vec<Sample>,
    /// Slot the next sample goes into
    top: usize,
    /// Filled slots, up to capacity
    len: usize,
}

impl Track {
    fn new(capacity: usize) -> Self {
        Track {
            samples: vec![Sample::default(); capacity],
            top: 0,
            len: 0,
        }
    }

    fn push(&mut self, sample: Sample) {
        let capacity = self.samples.len();
        self.samples[self.top] = sample;
        self.top = (self.top + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    /// Samples from newest to oldest
    fn newest_first(&self) -> impl Iterator<Item = &Sample> {
        let capacity = self.samples.len();
        (1..=self.len).map(move |back| &self.samples[(self.top + capacity - back) % capacity])
    }
}

/// Ring buffers of samples, one per worker thread
#[derive(Debug, Clone)]
pub struct Telemetry {
    tracks: Vec<Track>,
}

impl Telemetry {
    /// Creates empty tracks for `threads` workers
    ///
    /// Capacity below two is raised to two, the minimum for a rate.
    pub fn new(threads: usize, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Telemetry {
            tracks: (0..threads).map(|_| Track::new(capacity)).collect(),
        }
    }

    /// Number of tracked workers
    pub fn threads(&self) -> usize {
        self.tracks.len()
    }

    /// Records a sample for `thread_id`; unknown ids are ignored
    pub fn add(&mut self, thread_id: usize, hash_count: u64, timestamp: u64) {
        if let Some(track) = self.tracks.get_mut(thread_id) {
            track.push(Sample {
                hash_count,
                timestamp,
            });
        }
    }

    /// Hashes per second for `thread_id` over the last `window_ms`
    ///
    /// Returns NaN when fewer than two samples lie within the window of the
    /// newest one, or when they span no time. NaN means "not measurable yet".
    pub fn calc(&self, thread_id: usize, window_ms: u64) -> f64 {
        let Some(track) = self.tracks.get(thread_id) else {
            return f64::NAN;
        };

        let mut samples = track.newest_first();
        let Some(newest) = samples.next() else {
            return f64::NAN;
        };

        let oldest = samples
            .take_while(|s| newest.timestamp.saturating_sub(s.timestamp) <= window_ms)
            .last();
        let Some(oldest) = oldest else {
            return f64::NAN;
        };

        let elapsed = newest.timestamp.saturating_sub(oldest.timestamp);
        if elapsed == 0 {
            return f64::NAN;
        }

        let hashes = newest.hash_count.saturating_sub(oldest.hash_count);
        hashes as f64 / elapsed as f64 * 1000.0
    }
}
