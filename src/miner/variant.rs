// src/miner/variant.rs
//! One-time choice between the single and double hash workers

use crate::config::runtime::CpuProfile;
use crate::types::HashMode;
use std::fmt;
use std::sync::OnceLock;

/// Compute strategy a worker runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One nonce per loop iteration
    Single,
    /// Two nonce lanes per loop iteration
    Double,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Single => write!(f, "single"),
            Variant::Double => write!(f, "double"),
        }
    }
}

/// Resolves the configured [`HashMode`] into a [`Variant`]
///
/// `Auto` needs runtime detection, which runs the first time any worker
/// thread asks and is then cached for every other worker and every job.
pub struct VariantSelector {
    mode: HashMode,
    threads: usize,
    resolved: OnceLock<Variant>,
    detect: fn() -> CpuProfile,
}

impl VariantSelector {
    /// Selector for a pool of `threads` workers
    pub fn new(mode: HashMode, threads: usize) -> Self {
        Self::with_detector(mode, threads, CpuProfile::detect)
    }

    /// Selector with a custom resource probe
    pub fn with_detector(mode: HashMode, threads: usize, detect: fn() -> CpuProfile) -> Self {
        VariantSelector {
            mode,
            threads,
            resolved: OnceLock::new(),
            detect,
        }
    }

    /// The variant every worker of this pool runs
    pub fn resolve(&self) -> Variant {
        *self.resolved.get_or_init(|| {
            let variant = match self.mode {
                HashMode::Single => Variant::Single,
                HashMode::Double => Variant::Double,
                HashMode::Auto => {
                    if (self.detect)().supports_double_hash(self.threads) {
                        Variant::Double
                    } else {
                        Variant::Single
                    }
                }
            };
            log::info!("Hash mode {} resolved to {} workers", self.mode, variant);
            variant
        })
    }

    /// The variant, if some worker has already resolved it
    pub fn resolved(&self) -> Option<Variant> {
        self.resolved.get().copied()
    }
}
