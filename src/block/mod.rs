//! Block cipher traits and implementations
//!
//! `CipherAlgorithm` carries an algorithm's static parameters;
//! `BlockCipher` is the single-block capability interface. The mode
//! wrappers in [`modes`] are generic over `BlockCipher`, so chaining logic
//! is written once and bolted to nothing.

pub mod modes;
pub mod sm4;

pub use sm4::{Sm4, Sm4Cipher};

use crate::error::Result;

/// Marker trait describing a block cipher's static parameters
pub trait CipherAlgorithm {
    /// Key size in bytes
    const KEY_SIZE: usize;
    /// Block size in bytes
    const BLOCK_SIZE: usize;

    /// Human-readable algorithm name
    fn name() -> &'static str;
}

/// Single-block encryption capability
pub trait BlockCipher: CipherAlgorithm + Sized {
    /// Create a cipher instance from raw key bytes
    fn new(key: &[u8]) -> Result<Self>;

    /// Encrypt one block in place
    fn encrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Decrypt one block in place
    fn decrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Block size in bytes
    fn block_size() -> usize {
        Self::BLOCK_SIZE
    }
}
