//! Counter-mode key derivation for SM2 public-key operations
//!
//! The KDF of GB/T 32918.3: T_i = H(Z || ct) for a 32-bit big-endian
//! counter starting at 1, concatenated and truncated to the requested
//! length. Generic over the hash so it follows the capability traits like
//! the cipher modes do.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use core::marker::PhantomData;

use crate::error::{validate, Result};
use crate::hash::{HashFunction, Sm3};
use byteorder::{BigEndian, ByteOrder};
use subtle::ConstantTimeEq;

/// Counter-mode KDF over a hash function
pub struct Kdf<H: HashFunction> {
    _marker: PhantomData<H>,
}

/// The SM2 KDF: counter mode over SM3
pub type Sm2Kdf = Kdf<Sm3>;

impl<H: HashFunction> Kdf<H> {
    /// Derive `klen` bytes of keying material from the shared value `z`.
    ///
    /// Callers must treat an all-zero result as a degenerate derivation
    /// and retry with fresh inputs; see [`is_all_zero`].
    pub fn derive_key(z: &[u8], klen: usize) -> Result<Vec<u8>> {
        validate::min_length("KDF output", klen, 1)?;

        let digest_size = H::output_size();
        let blocks = (klen + digest_size - 1) / digest_size;
        validate::parameter(
            blocks <= u32::MAX as usize,
            "klen",
            "Requested output exhausts the counter space",
        )?;

        let mut out = Vec::with_capacity(blocks * digest_size);
        let mut ct_bytes = [0u8; 4];
        for ct in 1..=blocks as u32 {
            BigEndian::write_u32(&mut ct_bytes, ct);
            let mut hasher = H::new();
            hasher.update(z)?;
            hasher.update(&ct_bytes)?;
            out.extend_from_slice(hasher.finalize()?.as_ref());
        }

        out.truncate(klen);
        Ok(out)
    }
}

/// Constant-time check for an all-zero derivation
pub fn is_all_zero(bytes: &[u8]) -> bool {
    let mut acc = 0u8;
    for &b in bytes {
        acc |= b;
    }
    acc.ct_eq(&0).into()
}
