//! Cipher Block Chaining (CBC) mode implementation
//!
//! CBC XORs each plaintext block with the previous ciphertext block before
//! encryption; the first block is XORed with an initialization vector.
//! Provides secure memory handling with automatic zeroization of
//! sensitive data.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::BlockCipher;
use crate::error::{validate, Error, Result};
use crate::types::Nonce;

/// CBC mode implementation
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Cbc<B: BlockCipher + Zeroize + ZeroizeOnDrop> {
    cipher: B,
    iv: Vec<u8>,
}

impl<B: BlockCipher + Zeroize + ZeroizeOnDrop> Cbc<B> {
    /// Creates a new CBC mode instance with the given cipher and IV
    ///
    /// The IV must be the same size as the block size of the cipher.
    pub fn new<const N: usize>(cipher: B, iv: &Nonce<N>) -> Result<Self> {
        validate::length("CBC initialization vector", N, B::block_size())?;

        Ok(Self {
            cipher,
            iv: iv.as_ref().to_vec(),
        })
    }

    /// Encrypts a message using CBC mode
    ///
    /// The plaintext must be a multiple of the block size; padding is the
    /// caller's responsibility.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        if plaintext.len() % block_size != 0 {
            let expected_len = ((plaintext.len() / block_size) + 1) * block_size;
            return Err(Error::Length {
                context: "CBC plaintext",
                expected: expected_len,
                actual: plaintext.len(),
            });
        }

        let mut ciphertext = Vec::with_capacity(plaintext.len());
        let mut prev_block = self.iv.clone();

        for chunk in plaintext.chunks(block_size) {
            let mut block = [0u8; 16]; // SM4 block size is 16 bytes
            block[..chunk.len()].copy_from_slice(chunk);

            // XOR with previous ciphertext block (or IV for the first block)
            for i in 0..block_size {
                block[i] ^= prev_block[i];
            }

            self.cipher.encrypt_block(&mut block)?;

            ciphertext.extend_from_slice(&block);
            prev_block = block.to_vec();
        }

        Ok(ciphertext)
    }

    /// Decrypts a message using CBC mode
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        if ciphertext.len() % block_size != 0 {
            let expected_len = ((ciphertext.len() / block_size) + 1) * block_size;
            return Err(Error::Length {
                context: "CBC ciphertext",
                expected: expected_len,
                actual: ciphertext.len(),
            });
        }

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        let mut prev_block = self.iv.clone();

        for chunk in ciphertext.chunks(block_size) {
            let mut block = [0u8; 16];
            block[..chunk.len()].copy_from_slice(chunk);

            // Save current ciphertext block for the next chain step
            let current_block = block;

            self.cipher.decrypt_block(&mut block)?;

            // XOR with previous ciphertext block (or IV for the first block)
            for i in 0..block_size {
                block[i] ^= prev_block[i];
            }

            plaintext.extend_from_slice(&block);
            prev_block = current_block.to_vec();
        }

        Ok(plaintext)
    }
}
