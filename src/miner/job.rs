// src/miner/job.rs
//! Job and result types exchanged between the controller and workers

use crate::types::AlgorithmType;
use crate::utils::error::MinerError;
use serde::{Serialize, Serializer};

/// Byte offset of the 32-bit little-endian nonce inside a block blob
pub const NONCE_OFFSET: usize = 39;

/// Smallest blob that still has room for the nonce
pub const MIN_BLOB_LEN: usize = NONCE_OFFSET + 4;

/// Represents a mining job received from the pool or node
///
/// A published job is never mutated; workers hash private copies of the
/// blob with their own nonce written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningJob {
    /// Unique identifier for the job
    pub job_id: String,
    /// Block data blob to be hashed
    pub blob: Vec<u8>,
    /// Hashes whose last 8 bytes (little-endian) are below this value are results
    pub target: u64,
    /// Algorithm to use for this job
    pub algorithm: AlgorithmType,
    /// Pool reserves the top nonce byte; workers only vary the low 24 bits
    pub nicehash: bool,
}

impl MiningJob {
    /// Builds a job from hex-encoded blob and target strings
    ///
    /// The target may be a 4-byte compact value or a full 8-byte
    /// little-endian value, as sent by stratum pools.
    pub fn from_hex(
        job_id: impl Into<String>,
        blob: &str,
        target: &str,
        algorithm: AlgorithmType,
    ) -> Result<Self, MinerError> {
        let job = MiningJob {
            job_id: job_id.into(),
            blob: hex::decode(blob)?,
            target: parse_target(target)?,
            algorithm,
            nicehash: false,
        };
        job.validate()?;
        Ok(job)
    }

    /// Checks that the blob has room for the nonce
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.blob.len() < MIN_BLOB_LEN {
            return Err(MinerError::InputError(format!(
                "Blob of job {} is {} bytes, need at least {}",
                self.job_id,
                self.blob.len(),
                MIN_BLOB_LEN
            )));
        }
        Ok(())
    }

    /// Marks the job as a nicehash job
    pub fn with_nicehash(mut self, nicehash: bool) -> Self {
        self.nicehash = nicehash;
        self
    }

    /// Nonce currently stored in the blob (zero if the blob is too short)
    pub fn nonce(&self) -> u32 {
        self.blob
            .get(NONCE_OFFSET..MIN_BLOB_LEN)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .unwrap_or(0)
    }

    /// Pool difficulty implied by the target
    pub fn difficulty(&self) -> u64 {
        if self.target == 0 {
            return u64::MAX;
        }
        u64::MAX / self.target
    }

    /// Whether a hash satisfies this job's target
    pub fn meets_target(&self, hash: &[u8; 32]) -> bool {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&hash[24..32]);
        u64::from_le_bytes(tail) < self.target
    }
}

/// Writes `nonce` into a blob at [`NONCE_OFFSET`]
///
/// Blobs too short to carry a nonce are left untouched.
pub fn set_nonce(blob: &mut [u8], nonce: u32) {
    if let Some(slot) = blob.get_mut(NONCE_OFFSET..MIN_BLOB_LEN) {
        slot.copy_from_slice(&nonce.to_le_bytes());
    }
}

/// Parses a stratum hex target into a 64-bit comparison value
pub fn parse_target(target: &str) -> Result<u64, MinerError> {
    let raw = hex::decode(target)?;
    match raw.len() {
        4 => {
            let compact = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as u64;
            if compact == 0 {
                return Err(MinerError::InputError("Target must not be zero".into()));
            }
            Ok(u64::MAX / (0xFFFF_FFFF / compact))
        }
        8 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&raw);
            Ok(u64::from_le_bytes(bytes))
        }
        n => Err(MinerError::InputError(format!(
            "Target must be 4 or 8 bytes, got {}",
            n
        ))),
    }
}

/// Represents a candidate result found by a worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    /// Job ID this result belongs to
    pub job_id: String,
    /// Version of the job state the result was computed against
    pub version: u64,
    /// Nonce that produced the hash
    pub nonce: u32,
    /// Index of the worker thread that found it
    pub thread_id: usize,
    /// Resulting hash that meets the target
    #[serde(serialize_with = "as_hex")]
    pub result: [u8; 32],
}

impl JobResult {
    /// Creates a result for `job` at `version`
    pub fn new(job: &MiningJob, version: u64, nonce: u32, thread_id: usize, result: [u8; 32]) -> Self {
        JobResult {
            job_id: job.job_id.clone(),
            version,
            nonce,
            thread_id,
            result,
        }
    }
}

fn as_hex<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const BLOB: &str = "0707f7a4f0d605b303260816ba3f10902e1a145ac5fad3aa3af6ea44c11869dc4f853f002b2eea0000000077b206a02ca5b1d4ce6bbfdf0acac38bded34d2dcdeef95cd20cefc12f61d56109";

    #[test]
    fn compact_target_expands_to_full_width() {
        // difficulty 1 sentinel
        assert_eq!(parse_target("ffffffff").unwrap(), u64::MAX);
        // "b88d0600" is difficulty ~10000
        let target = parse_target("b88d0600").unwrap();
        let job = MiningJob {
            job_id: "1".into(),
            blob: vec![0; MIN_BLOB_LEN],
            target,
            algorithm: AlgorithmType::CryptoNightV7,
            nicehash: false,
        };
        assert_eq!(job.difficulty(), 10_000);
    }

    #[test]
    fn full_target_is_little_endian() {
        assert_eq!(parse_target("0100000000000000").unwrap(), 1);
        assert!(parse_target("0102").is_err());
        assert!(parse_target("00000000").is_err());
    }

    #[test]
    fn nonce_lives_at_offset_39() {
        let job = MiningJob::from_hex("a", BLOB, "ffffffff", AlgorithmType::CryptoNightV7).unwrap();
        assert_eq!(job.nonce(), 0);

        let mut blob = job.blob.clone();
        set_nonce(&mut blob, 0xAABB_CCDD);
        assert_eq!(&blob[39..43], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(blob.len(), job.blob.len());
    }

    #[test]
    fn short_blobs_are_rejected() {
        let err = MiningJob::from_hex("a", "00ff", "ffffffff", AlgorithmType::RandomX).unwrap_err();
        assert!(matches!(err, MinerError::InputError(_)));

        let mut job =
            MiningJob::from_hex("b", &"00".repeat(MIN_BLOB_LEN), "ffffffff", AlgorithmType::RandomX)
                .unwrap();
        assert!(job.validate().is_ok());
        job.blob.truncate(10);
        assert!(matches!(job.validate(), Err(MinerError::InputError(_))));
    }

    #[test]
    fn target_compares_hash_tail() {
        let job = MiningJob {
            job_id: "t".into(),
            blob: vec![0; MIN_BLOB_LEN],
            target: 0x0000_0000_0000_1000,
            algorithm: AlgorithmType::CryptoNightV7,
            nicehash: false,
        };
        let below = hex!("ffffffffffffffffffffffffffffffffffffffffffffffffff0f000000000000");
        let above = hex!("0000000000000000000000000000000000000000000000000010000000000000");
        assert!(job.meets_target(&below));
        assert!(!job.meets_target(&above));
    }

    #[test]
    fn result_serializes_hash_as_hex() {
        let job = MiningJob {
            job_id: "j1".into(),
            blob: vec![0; MIN_BLOB_LEN],
            target: u64::MAX,
            algorithm: AlgorithmType::CryptoNightV7,
            nicehash: false,
        };
        let result = JobResult::new(&job, 3, 7, 1, [0xAB; 32]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["job_id"], "j1");
        assert_eq!(json["version"], 3);
        assert_eq!(json["nonce"], 7);
        assert_eq!(json["result"], "ab".repeat(32));
    }
}
