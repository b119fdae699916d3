//! Output Feedback (OFB) mode implementation
//!
//! OFB repeatedly encrypts its own output to produce a keystream that is
//! independent of the message, then XORs it with the data. Encryption and
//! decryption are the same operation; arbitrary input lengths are
//! supported.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::block::BlockCipher;
use crate::error::{validate, Result};
use crate::types::Nonce;

/// OFB mode implementation
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ofb<B: BlockCipher + Zeroize + ZeroizeOnDrop> {
    cipher: B,
    iv: Vec<u8>,
}

impl<B: BlockCipher + Zeroize + ZeroizeOnDrop> Ofb<B> {
    /// Creates a new OFB mode instance with the given cipher and IV
    pub fn new<const N: usize>(cipher: B, iv: &Nonce<N>) -> Result<Self> {
        validate::length("OFB initialization vector", N, B::block_size())?;

        Ok(Self {
            cipher,
            iv: iv.as_ref().to_vec(),
        })
    }

    /// Encrypts a message of arbitrary length using OFB mode
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.keystream_xor(plaintext)
    }

    /// Decrypts a message of arbitrary length using OFB mode
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.keystream_xor(ciphertext)
    }

    /// The OFB keystream XOR shared by both directions
    fn keystream_xor(&self, input: &[u8]) -> Result<Vec<u8>> {
        let block_size = B::block_size();
        let mut output = Vec::with_capacity(input.len());
        let mut feedback = Zeroizing::new(self.iv.clone());

        for chunk in input.chunks(block_size) {
            // Next keystream block = E(previous keystream block)
            self.cipher.encrypt_block(&mut feedback)?;

            for (i, &b) in chunk.iter().enumerate() {
                output.push(b ^ feedback[i]);
            }
        }

        Ok(output)
    }
}
