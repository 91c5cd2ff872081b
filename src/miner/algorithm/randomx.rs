// src/miner/algorithm/randomx.rs
//! RandomX algorithm implementation

use crate::miner::algorithm::Algorithm;
use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use rust_randomx::{Context, Hasher};
use std::sync::Arc;

/// RandomX algorithm implementation
///
/// Holds the shared dataset. Hashers are cheap next to the dataset and are
/// created per call, so no lock is needed on the hot path.
#[derive(Clone)]
pub struct RandomX {
    /// Shared RandomX context containing the dataset
    context: Arc<Context>,
}

impl RandomX {
    /// Creates a new RandomX instance with initialized dataset
    ///
    /// # Arguments
    /// * `fast` - Enables fast mode when true (uses more memory but better performance)
    /// * `key` - The key/seed used to initialize the dataset (typically block seed)
    ///
    /// # Performance Notes
    /// - Initialization is expensive (dataset generation takes several seconds)
    /// - Fast mode requires ~2080MB RAM vs ~256MB in light mode
    pub fn new(fast: bool, key: &[u8]) -> Self {
        Self {
            context: Arc::new(Context::new(key, fast)),
        }
    }
}

impl Algorithm for RandomX {
    fn hash(&self, blob: &[u8]) -> Result<[u8; 32], MinerError> {
        let hasher = Hasher::new(Arc::clone(&self.context));
        let output = hasher.hash(blob);

        output
            .as_ref()
            .try_into()
            .map_err(|_| MinerError::AlgorithmError("RandomX output is not 32 bytes".into()))
    }

    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::RandomX
    }
}
