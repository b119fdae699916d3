//! Cipher Feedback (CFB) mode implementation
//!
//! Full-block CFB turns the block cipher into a self-synchronizing stream
//! cipher: each keystream block is the encryption of the previous
//! ciphertext block (the IV for the first). Arbitrary input lengths are
//! supported; the final partial block uses a keystream prefix.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::block::BlockCipher;
use crate::error::{validate, Result};
use crate::types::Nonce;

/// CFB mode implementation
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Cfb<B: BlockCipher + Zeroize + ZeroizeOnDrop> {
    cipher: B,
    iv: Vec<u8>,
}

impl<B: BlockCipher + Zeroize + ZeroizeOnDrop> Cfb<B> {
    /// Creates a new CFB mode instance with the given cipher and IV
    pub fn new<const N: usize>(cipher: B, iv: &Nonce<N>) -> Result<Self> {
        validate::length("CFB initialization vector", N, B::block_size())?;

        Ok(Self {
            cipher,
            iv: iv.as_ref().to_vec(),
        })
    }

    /// Encrypts a message of arbitrary length using CFB mode
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        let mut ciphertext = Vec::with_capacity(plaintext.len());
        let mut feedback = Zeroizing::new(self.iv.clone());

        for chunk in plaintext.chunks(block_size) {
            // Keystream block = E(previous ciphertext block)
            let mut keystream = Zeroizing::new(feedback.clone());
            self.cipher.encrypt_block(&mut keystream)?;

            let start = ciphertext.len();
            for (i, &p) in chunk.iter().enumerate() {
                ciphertext.push(p ^ keystream[i]);
            }

            if chunk.len() == block_size {
                feedback.copy_from_slice(&ciphertext[start..]);
            }
        }

        Ok(ciphertext)
    }

    /// Decrypts a message of arbitrary length using CFB mode
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        let mut plaintext = Vec::with_capacity(ciphertext.len());
        let mut feedback = Zeroizing::new(self.iv.clone());

        for chunk in ciphertext.chunks(block_size) {
            let mut keystream = Zeroizing::new(feedback.clone());
            self.cipher.encrypt_block(&mut keystream)?;

            for (i, &c) in chunk.iter().enumerate() {
                plaintext.push(c ^ keystream[i]);
            }

            if chunk.len() == block_size {
                feedback.copy_from_slice(chunk);
            }
        }

        Ok(plaintext)
    }
}
