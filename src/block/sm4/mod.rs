//! SM4 block cipher implementation with enhanced memory safety
//!
//! Implements the SM4 cipher of GB/T 32907-2016: a 32-round unbalanced
//! Feistel network with 128-bit keys and blocks. Round keys live in a
//! zeroizing buffer; the key schedule wipes its working state.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::block::modes::{padding, Cbc, Cfb, Ctr, Ecb, ModeId, Ofb};
use crate::block::{BlockCipher, CipherAlgorithm};
use crate::error::{validate, Error, Result};
use crate::params::{SM4_BLOCK_SIZE, SM4_KEY_SIZE};
use crate::security::{SecretBuffer, ZeroizeGuard};
use crate::types::Nonce;
use byteorder::{BigEndian, ByteOrder};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(not(feature = "std"))]
use portable_atomic::{compiler_fence, Ordering};
#[cfg(feature = "std")]
use std::sync::atomic::{compiler_fence, Ordering};

#[cfg(test)]
mod tests;

/// S-box per GB/T 32907-2016
const SBOX: [u8; 256] = [
    0xd6, 0x90, 0xe9, 0xfe, 0xcc, 0xe1, 0x3d, 0xb7, 0x16, 0xb6, 0x14, 0xc2, 0x28, 0xfb, 0x2c,
    0x05, 0x2b, 0x67, 0x9a, 0x76, 0x2a, 0xbe, 0x04, 0xc3, 0xaa, 0x44, 0x13, 0x26, 0x49, 0x86,
    0x06, 0x99, 0x9c, 0x42, 0x50, 0xf4, 0x91, 0xef, 0x98, 0x7a, 0x33, 0x54, 0x0b, 0x43, 0xed,
    0xcf, 0xac, 0x62, 0xe4, 0xb3, 0x1c, 0xa9, 0xc9, 0x08, 0xe8, 0x95, 0x80, 0xdf, 0x94, 0xfa,
    0x75, 0x8f, 0x3f, 0xa6, 0x47, 0x07, 0xa7, 0xfc, 0xf3, 0x73, 0x17, 0xba, 0x83, 0x59, 0x3c,
    0x19, 0xe6, 0x85, 0x4f, 0xa8, 0x68, 0x6b, 0x81, 0xb2, 0x71, 0x64, 0xda, 0x8b, 0xf8, 0xeb,
    0x0f, 0x4b, 0x70, 0x56, 0x9d, 0x35, 0x1e, 0x24, 0x0e, 0x5e, 0x63, 0x58, 0xd1, 0xa2, 0x25,
    0x22, 0x7c, 0x3b, 0x01, 0x21, 0x78, 0x87, 0xd4, 0x00, 0x46, 0x57, 0x9f, 0xd3, 0x27, 0x52,
    0x4c, 0x36, 0x02, 0xe7, 0xa0, 0xc4, 0xc8, 0x9e, 0xea, 0xbf, 0x8a, 0xd2, 0x40, 0xc7, 0x38,
    0xb5, 0xa3, 0xf7, 0xf2, 0xce, 0xf9, 0x61, 0x15, 0xa1, 0xe0, 0xae, 0x5d, 0xa4, 0x9b, 0x34,
    0x1a, 0x55, 0xad, 0x93, 0x32, 0x30, 0xf5, 0x8c, 0xb1, 0xe3, 0x1d, 0xf6, 0xe2, 0x2e, 0x82,
    0x66, 0xca, 0x60, 0xc0, 0x29, 0x23, 0xab, 0x0d, 0x53, 0x4e, 0x6f, 0xd5, 0xdb, 0x37, 0x45,
    0xde, 0xfd, 0x8e, 0x2f, 0x03, 0xff, 0x6a, 0x72, 0x6d, 0x6c, 0x5b, 0x51, 0x8d, 0x1b, 0xaf,
    0x92, 0xbb, 0xdd, 0xbc, 0x7f, 0x11, 0xd9, 0x5c, 0x41, 0x1f, 0x10, 0x5a, 0xd8, 0x0a, 0xc1,
    0x31, 0x88, 0xa5, 0xcd, 0x7b, 0xbd, 0x2d, 0x74, 0xd0, 0x12, 0xb8, 0xe5, 0xb4, 0xb0, 0x89,
    0x69, 0x97, 0x4a, 0x0c, 0x96, 0x77, 0x7e, 0x65, 0xb9, 0xf1, 0x09, 0xc5, 0x6e, 0xc6, 0x84,
    0x18, 0xf0, 0x7d, 0xec, 0x3a, 0xdc, 0x4d, 0x20, 0x79, 0xee, 0x5f, 0x3e, 0xd7, 0xcb, 0x39,
    0x48,
];

/// System parameter FK
const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

/// Fixed key-schedule constants CK
const CK: [u32; 32] = [
    0x00070e15, 0x1c232a31, 0x383f464d, 0x545b6269, 0x70777e85, 0x8c939aa1, 0xa8afb6bd, 0xc4cbd2d9,
    0xe0e7eef5, 0xfc030a11, 0x181f262d, 0x343b4249, 0x50575e65, 0x6c737a81, 0x888f969d, 0xa4abb2b9,
    0xc0c7ced5, 0xdce3eaf1, 0xf8ff060d, 0x141b2229, 0x30373e45, 0x4c535a61, 0x686f767d, 0x848b9299,
    0xa0a7aeb5, 0xbcc3cad1, 0xd8dfe6ed, 0xf4fb0209, 0x10171e25, 0x2c333a41, 0x484f565d, 0x646b7279,
];

/// Number of rounds
const ROUNDS: usize = 32;

/// Byte-wise S-box substitution τ
#[inline(always)]
fn tau(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

/// Linear diffusion L for the round function
#[inline(always)]
fn linear(x: u32) -> u32 {
    x ^ x.rotate_left(2) ^ x.rotate_left(10) ^ x.rotate_left(18) ^ x.rotate_left(24)
}

/// Linear diffusion L' for the key schedule
#[inline(always)]
fn linear_key(x: u32) -> u32 {
    x ^ x.rotate_left(13) ^ x.rotate_left(23)
}

/// Marker type for the SM4 algorithm
pub enum Sm4Algorithm {}

impl CipherAlgorithm for Sm4Algorithm {
    const KEY_SIZE: usize = SM4_KEY_SIZE;
    const BLOCK_SIZE: usize = SM4_BLOCK_SIZE;

    fn name() -> &'static str {
        "SM4"
    }
}

/// SM4 block cipher instance holding expanded round keys
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sm4 {
    round_keys: SecretBuffer<128>, // 32 rounds × 4 bytes
}

impl CipherAlgorithm for Sm4 {
    const KEY_SIZE: usize = SM4_KEY_SIZE;
    const BLOCK_SIZE: usize = SM4_BLOCK_SIZE;

    fn name() -> &'static str {
        "SM4"
    }
}

impl Sm4 {
    /// Expand a 128-bit key into 32 round keys
    fn expand_key(key: &[u8]) -> Result<SecretBuffer<128>> {
        validate::length("SM4 key", key.len(), SM4_KEY_SIZE)?;

        compiler_fence(Ordering::SeqCst);

        // Working schedule, wiped before returning
        let mut k = [0u32; 36];
        let mut guard = ZeroizeGuard::new(&mut k);

        for i in 0..4 {
            guard[i] = BigEndian::read_u32(&key[i * 4..]) ^ FK[i];
        }
        for i in 0..ROUNDS {
            let t = guard[i + 1] ^ guard[i + 2] ^ guard[i + 3] ^ CK[i];
            guard[i + 4] = guard[i] ^ linear_key(tau(t));
        }

        let mut round_key_bytes = [0u8; 128];
        for i in 0..ROUNDS {
            BigEndian::write_u32(&mut round_key_bytes[i * 4..(i + 1) * 4], guard[i + 4]);
        }

        compiler_fence(Ordering::SeqCst);

        Ok(SecretBuffer::new(round_key_bytes))
    }

    /// Read round key i from the expanded schedule
    #[inline(always)]
    fn round_key(&self, i: usize) -> u32 {
        BigEndian::read_u32(&self.round_keys.as_slice()[i * 4..])
    }

    /// Run the 32-round network over one block; `reverse` selects the
    /// round-key order (decryption is the same network with keys reversed)
    fn crypt_block(&self, block: &mut [u8], reverse: bool) -> Result<()> {
        validate::length("SM4 block", block.len(), SM4_BLOCK_SIZE)?;

        let mut x = [0u32; 4];
        let mut guard = ZeroizeGuard::new(&mut x);
        for i in 0..4 {
            guard[i] = BigEndian::read_u32(&block[i * 4..]);
        }

        for round in 0..ROUNDS {
            let rk = if reverse {
                self.round_key(ROUNDS - 1 - round)
            } else {
                self.round_key(round)
            };
            let t = guard[1] ^ guard[2] ^ guard[3] ^ rk;
            let new = guard[0] ^ linear(tau(t));
            guard[0] = guard[1];
            guard[1] = guard[2];
            guard[2] = guard[3];
            guard[3] = new;
        }

        // Output is the reversed final word order
        for i in 0..4 {
            BigEndian::write_u32(&mut block[i * 4..(i + 1) * 4], guard[3 - i]);
        }

        compiler_fence(Ordering::SeqCst);

        Ok(())
    }
}

impl BlockCipher for Sm4 {
    fn new(key: &[u8]) -> Result<Self> {
        Ok(Sm4 {
            round_keys: Self::expand_key(key)?,
        })
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        self.crypt_block(block, false)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<()> {
        self.crypt_block(block, true)
    }
}

/// SM4 in a named mode of operation.
///
/// Block-aligned modes (ECB, CBC) apply PKCS#7 padding on encryption and
/// verify-and-strip it on decryption; the streaming modes (CFB, OFB, CTR)
/// accept arbitrary input lengths and use no padding.
pub struct Sm4Cipher {
    inner: ModeWrapper,
}

enum ModeWrapper {
    Ecb(Ecb<Sm4>),
    Cbc(Cbc<Sm4>),
    Cfb(Cfb<Sm4>),
    Ofb(Ofb<Sm4>),
    Ctr(Ctr<Sm4>),
}

impl Sm4Cipher {
    /// Create an SM4 cipher in the named mode.
    ///
    /// `mode` is matched case-insensitively against `ecb`, `cbc`, `cfb`,
    /// `ofb` and `ctr`; anything else is an `UnsupportedMode` error. ECB
    /// takes no IV; every other mode requires a 16-byte IV.
    pub fn new(key: &[u8], mode: &str, iv: Option<&[u8]>) -> Result<Self> {
        let mode_id: ModeId = mode.parse()?;
        let cipher = Sm4::new(key)?;

        let inner = match mode_id {
            ModeId::Ecb => {
                validate::parameter(iv.is_none(), "iv", "ECB mode does not take an IV")?;
                ModeWrapper::Ecb(Ecb::new(cipher))
            }
            ModeId::Cbc => ModeWrapper::Cbc(Cbc::new(cipher, &Self::require_iv(iv)?)?),
            ModeId::Cfb => ModeWrapper::Cfb(Cfb::new(cipher, &Self::require_iv(iv)?)?),
            ModeId::Ofb => ModeWrapper::Ofb(Ofb::new(cipher, &Self::require_iv(iv)?)?),
            ModeId::Ctr => ModeWrapper::Ctr(Ctr::new(cipher, &Self::require_iv(iv)?)?),
        };

        Ok(Sm4Cipher { inner })
    }

    fn require_iv(iv: Option<&[u8]>) -> Result<Nonce<SM4_BLOCK_SIZE>> {
        let iv = iv.ok_or_else(|| Error::param("iv", "This mode requires an IV"))?;
        Nonce::from_slice(iv)
    }

    /// Encrypt a message
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            ModeWrapper::Ecb(mode) => {
                let padded = padding::pkcs7_pad(plaintext, SM4_BLOCK_SIZE);
                mode.encrypt(&padded)
            }
            ModeWrapper::Cbc(mode) => {
                let padded = padding::pkcs7_pad(plaintext, SM4_BLOCK_SIZE);
                mode.encrypt(&padded)
            }
            ModeWrapper::Cfb(mode) => mode.encrypt(plaintext),
            ModeWrapper::Ofb(mode) => mode.encrypt(plaintext),
            ModeWrapper::Ctr(mode) => mode.encrypt(plaintext),
        }
    }

    /// Decrypt a message
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            ModeWrapper::Ecb(mode) => {
                let padded = mode.decrypt(ciphertext)?;
                padding::pkcs7_unpad(&padded, SM4_BLOCK_SIZE)
            }
            ModeWrapper::Cbc(mode) => {
                let padded = mode.decrypt(ciphertext)?;
                padding::pkcs7_unpad(&padded, SM4_BLOCK_SIZE)
            }
            ModeWrapper::Cfb(mode) => mode.decrypt(ciphertext),
            ModeWrapper::Ofb(mode) => mode.decrypt(ciphertext),
            ModeWrapper::Ctr(mode) => mode.decrypt(ciphertext),
        }
    }
}
