// src/miner/algorithm/mod.rs
//! Hashing algorithm implementations
//!
//! The worker pool treats the hash function as a collaborator: workers only
//! need something that turns a blob (nonce already written in) into 32 bytes.
//! Currently implements:
//! - RandomX (Monero's current algorithm)
//! - CryptoNight variants (v7 and R)

/// RandomX algorithm implementation
///
/// Requires significant memory allocation for the dataset.
pub mod randomx;

/// CryptoNight algorithm implementations
pub mod cryptonight;

use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use std::sync::Arc;

/// Common interface for all hashing algorithms
///
/// Implementations are shared between every worker thread, so they must be
/// `Send + Sync` and keep any per-call state local.
pub trait Algorithm: Send + Sync {
    /// Compute the hash of a blob that already carries its nonce
    ///
    /// # Returns
    /// 32-byte hash result or error if computation fails
    fn hash(&self, blob: &[u8]) -> Result<[u8; 32], MinerError>;

    /// Compute two hashes in one call
    ///
    /// Used by the double-hash worker. The default simply hashes twice;
    /// implementations with an interleaved kernel can override it.
    fn hash_pair(&self, first: &[u8], second: &[u8]) -> Result<[[u8; 32]; 2], MinerError> {
        Ok([self.hash(first)?, self.hash(second)?])
    }

    /// Get the algorithm type
    fn algorithm_type(&self) -> AlgorithmType;
}

/// Creates the algorithm instance for `algo`
///
/// RandomX is keyed with a fixed all-zero seed for the life of the pool.
pub fn create(algo: AlgorithmType) -> Arc<dyn Algorithm> {
    match algo {
        AlgorithmType::RandomX => {
            let temp_key = [0u8; 32];
            Arc::new(randomx::RandomX::new(true, &temp_key))
        }
        AlgorithmType::CryptoNightV7 => Arc::new(cryptonight::CryptoNightAlgo::v7()),
        AlgorithmType::CryptoNightR => Arc::new(cryptonight::CryptoNightAlgo::r()),
    }
}
