//! SM3 hash function implementation with enhanced memory safety
//!
//! Implements the SM3 cryptographic hash function as specified in
//! GB/T 32905-2016: 256-bit digests over 512-bit blocks, with additional
//! security measures for memory handling.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::error::Result;
use crate::hash::{Hash, HashAlgorithm, HashFunction};
use crate::params::{SM3_BLOCK_SIZE, SM3_OUTPUT_SIZE};
use crate::security::ZeroizeGuard;
use crate::types::Digest;
use byteorder::{BigEndian, ByteOrder};
use zeroize::Zeroize;

#[cfg(not(feature = "std"))]
use portable_atomic::{compiler_fence, Ordering};
#[cfg(feature = "std")]
use std::sync::atomic::{compiler_fence, Ordering};

#[cfg(test)]
mod tests;

/// Round constant for rounds 0..16
const T0: u32 = 0x79cc4519;
/// Round constant for rounds 16..64
const T1: u32 = 0x7a879d8a;

/// Initial state per GB/T 32905-2016
const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

/// Marker type for the SM3 algorithm
pub enum Sm3Algorithm {}

impl HashAlgorithm for Sm3Algorithm {
    const OUTPUT_SIZE: usize = SM3_OUTPUT_SIZE;
    const BLOCK_SIZE: usize = SM3_BLOCK_SIZE;
    const ALGORITHM_ID: &'static str = "SM3";
}

/// SM3 hash function with incremental input
#[derive(Clone)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: [u8; SM3_BLOCK_SIZE],
    buffer_idx: usize,
    total_bytes: u64,
}

impl Drop for Sm3 {
    fn drop(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
        self.buffer_idx = 0;
        self.total_bytes = 0;
    }
}

/// Permutation P0(x) = x ⊕ (x <<< 9) ⊕ (x <<< 17)
#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

/// Permutation P1(x) = x ⊕ (x <<< 15) ⊕ (x <<< 23)
#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// Boolean function FFj
#[inline(always)]
fn ff(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

/// Boolean function GGj
#[inline(always)]
fn gg(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | ((!x) & z)
    }
}

impl Sm3 {
    fn compress(state: &mut [u32; 8], block: &[u8; SM3_BLOCK_SIZE]) {
        // Message schedule, wiped before returning
        let mut w = [0u32; 68];
        let mut w_guard = ZeroizeGuard::new(&mut w);

        compiler_fence(Ordering::SeqCst);

        for i in 0..16 {
            w_guard[i] = BigEndian::read_u32(&block[i * 4..]);
        }
        for i in 16..68 {
            w_guard[i] = p1(w_guard[i - 16] ^ w_guard[i - 9] ^ w_guard[i - 3].rotate_left(15))
                ^ w_guard[i - 13].rotate_left(7)
                ^ w_guard[i - 6];
        }

        // Working variables, wiped before returning
        let mut working_vars = [
            state[0], state[1], state[2], state[3], state[4], state[5], state[6], state[7],
        ];
        let mut guard = ZeroizeGuard::new(&mut working_vars);

        let mut a = guard[0];
        let mut b = guard[1];
        let mut c = guard[2];
        let mut d = guard[3];
        let mut e = guard[4];
        let mut f = guard[5];
        let mut g = guard[6];
        let mut h = guard[7];

        for j in 0..64 {
            let t = if j < 16 { T0 } else { T1 };
            let ss1 = a
                .rotate_left(12)
                .wrapping_add(e)
                .wrapping_add(t.rotate_left((j % 32) as u32))
                .rotate_left(7);
            let ss2 = ss1 ^ a.rotate_left(12);
            let w1 = w_guard[j] ^ w_guard[j + 4];
            let tt1 = ff(a, b, c, j)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(w1);
            let tt2 = gg(e, f, g, j)
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add(w_guard[j]);

            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
        }

        guard[0] = a;
        guard[1] = b;
        guard[2] = c;
        guard[3] = d;
        guard[4] = e;
        guard[5] = f;
        guard[6] = g;
        guard[7] = h;

        // XOR feed-forward into the chaining state
        for i in 0..8 {
            state[i] ^= guard[i];
        }

        compiler_fence(Ordering::SeqCst);
    }

    fn update_internal(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            let fill = core::cmp::min(input.len(), SM3_BLOCK_SIZE - self.buffer_idx);
            self.buffer[self.buffer_idx..self.buffer_idx + fill].copy_from_slice(&input[..fill]);
            self.buffer_idx += fill;
            input = &input[fill..];
            if self.buffer_idx == SM3_BLOCK_SIZE {
                let mut block = [0u8; SM3_BLOCK_SIZE];
                block.copy_from_slice(&self.buffer);
                Self::compress(&mut self.state, &block);
                self.total_bytes += SM3_BLOCK_SIZE as u64;
                self.buffer_idx = 0;
            }
        }
    }

    fn finalize_internal(&mut self) -> Hash {
        self.total_bytes += self.buffer_idx as u64;
        let bit_len = self.total_bytes * 8;

        // Padding: 0x80, zeros to 56 mod 64, 64-bit big-endian bit length
        self.buffer[self.buffer_idx] = 0x80;
        if self.buffer_idx >= 56 {
            for b in &mut self.buffer[self.buffer_idx + 1..] {
                *b = 0;
            }
            let mut block = [0u8; SM3_BLOCK_SIZE];
            block.copy_from_slice(&self.buffer);
            Self::compress(&mut self.state, &block);
            self.buffer = [0u8; SM3_BLOCK_SIZE];
        } else {
            for b in &mut self.buffer[self.buffer_idx + 1..56] {
                *b = 0;
            }
        }

        BigEndian::write_u64(&mut self.buffer[56..], bit_len);
        let mut block = [0u8; SM3_BLOCK_SIZE];
        block.copy_from_slice(&self.buffer);
        Self::compress(&mut self.state, &block);

        let mut out = Vec::with_capacity(SM3_OUTPUT_SIZE);
        for &word in &self.state {
            out.extend_from_slice(&word.to_be_bytes());
        }
        self.reset();
        out
    }

    fn reset(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
        self.state = IV;
        self.buffer_idx = 0;
        self.total_bytes = 0;
    }
}

impl HashFunction for Sm3 {
    type Algorithm = Sm3Algorithm;
    type Output = Digest<SM3_OUTPUT_SIZE>;

    fn new() -> Self {
        Sm3 {
            state: IV,
            buffer: [0u8; SM3_BLOCK_SIZE],
            buffer_idx: 0,
            total_bytes: 0,
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.update_internal(data);
        Ok(self)
    }

    fn finalize(&mut self) -> Result<Self::Output> {
        let hash = self.finalize_internal();
        let mut digest = [0u8; SM3_OUTPUT_SIZE];
        digest.copy_from_slice(&hash);
        Ok(Digest::new(digest))
    }
}
