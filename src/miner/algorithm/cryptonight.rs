// src/miner/algorithm/cryptonight.rs
//! CryptoNight algorithm implementation
//!
//! Thin wrapper over the `cryptonight` crate for the v7 and R variants.

use crate::miner::algorithm::Algorithm;
use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use cryptonight::cryptonight;

/// CryptoNight algorithm implementation
///
/// The struct only tracks the variant; all hashing is handled by the
/// underlying cryptonight library.
pub struct CryptoNightAlgo {
    /// Variant id as understood by the library (1 = v7, 4 = R)
    variant: i32,
}

impl CryptoNightAlgo {
    /// CryptoNight v7
    pub fn v7() -> Self {
        Self { variant: 1 }
    }

    /// CryptoNight R
    pub fn r() -> Self {
        Self { variant: 4 }
    }
}

impl Algorithm for CryptoNightAlgo {
    fn hash(&self, blob: &[u8]) -> Result<[u8; 32], MinerError> {
        let hash = cryptonight(blob, blob.len(), self.variant);
        hash.try_into().map_err(|out: Vec<u8>| {
            MinerError::AlgorithmError(format!("CryptoNight returned {} bytes", out.len()))
        })
    }

    fn algorithm_type(&self) -> AlgorithmType {
        if self.variant == 4 {
            AlgorithmType::CryptoNightR
        } else {
            AlgorithmType::CryptoNightV7
        }
    }
}
