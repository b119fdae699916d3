//! Hash function traits and implementations
//!
//! The `HashAlgorithm` marker trait carries compile-time algorithm
//! parameters; `HashFunction` is the streaming capability interface the
//! rest of the crate programs against.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::error::Result;

pub mod sm3;

pub use sm3::Sm3;

/// Raw hash output as a byte vector
pub type Hash = Vec<u8>;

/// Marker trait describing a hash algorithm's static parameters
pub trait HashAlgorithm {
    /// Digest size in bytes
    const OUTPUT_SIZE: usize;
    /// Internal block size in bytes
    const BLOCK_SIZE: usize;
    /// Human-readable algorithm identifier
    const ALGORITHM_ID: &'static str;
}

/// Streaming hash function interface
pub trait HashFunction: Sized {
    /// The algorithm marker type
    type Algorithm: HashAlgorithm;
    /// The digest output type
    type Output: AsRef<[u8]>;

    /// Create a fresh hasher
    fn new() -> Self;

    /// Absorb data, returning `self` for chaining
    fn update(&mut self, data: &[u8]) -> Result<&mut Self>;

    /// Finish and produce the digest, resetting internal state
    fn finalize(&mut self) -> Result<Self::Output>;

    /// Digest size in bytes
    fn output_size() -> usize {
        Self::Algorithm::OUTPUT_SIZE
    }

    /// Internal block size in bytes
    fn block_size() -> usize {
        Self::Algorithm::BLOCK_SIZE
    }

    /// Human-readable algorithm name
    fn name() -> String {
        String::from(Self::Algorithm::ALGORITHM_ID)
    }

    /// One-shot convenience: hash `data` in a single call
    fn digest(data: &[u8]) -> Result<Self::Output> {
        let mut hasher = Self::new();
        hasher.update(data)?;
        hasher.finalize()
    }
}
