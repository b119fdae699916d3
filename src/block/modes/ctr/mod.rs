//! Counter (CTR) mode implementation
//!
//! CTR encrypts successive values of a counter block to produce the
//! keystream. The whole 16-byte block is treated as one 128-bit big-endian
//! integer that increments by one per block and wraps around at the top of
//! the range. Encryption and decryption are the same operation.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::block::BlockCipher;
use crate::error::{validate, Result};
use crate::types::Nonce;

/// CTR mode implementation
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ctr<B: BlockCipher + Zeroize + ZeroizeOnDrop> {
    cipher: B,
    initial_counter: Vec<u8>,
}

impl<B: BlockCipher + Zeroize + ZeroizeOnDrop> Ctr<B> {
    /// Creates a new CTR mode instance with the given cipher and initial
    /// counter block
    pub fn new<const N: usize>(cipher: B, iv: &Nonce<N>) -> Result<Self> {
        validate::length("CTR counter block", N, B::block_size())?;

        Ok(Self {
            cipher,
            initial_counter: iv.as_ref().to_vec(),
        })
    }

    /// Encrypts a message of arbitrary length using CTR mode
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.keystream_xor(plaintext)
    }

    /// Decrypts a message of arbitrary length using CTR mode
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.keystream_xor(ciphertext)
    }

    /// The CTR keystream XOR shared by both directions
    fn keystream_xor(&self, input: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        let mut output = Vec::with_capacity(input.len());
        let mut counter = Zeroizing::new(self.initial_counter.clone());

        for chunk in input.chunks(block_size) {
            let mut keystream = Zeroizing::new(counter.clone());
            self.cipher.encrypt_block(&mut keystream)?;

            for (i, &b) in chunk.iter().enumerate() {
                output.push(b ^ keystream[i]);
            }

            Self::increment_counter(&mut counter);
        }

        Ok(output)
    }

    /// Increment the counter block as a 128-bit big-endian integer,
    /// wrapping around at the top of the range
    fn increment_counter(counter: &mut [u8]) {
        for byte in counter.iter_mut().rev() {
            let (value, overflow) = byte.overflowing_add(1);
            *byte = value;
            if !overflow {
                break;
            }
        }
    }
}
