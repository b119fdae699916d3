//! PKCS#7 padding for block-aligned modes
//!
//! Every message gains 1..=block_size bytes of padding, each equal to the
//! pad length, so unpadding is always unambiguous.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Pad `data` up to the next multiple of `block_size`
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Verify and strip PKCS#7 padding
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(Error::Padding {
            context: "PKCS#7 input length",
        });
    }

    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > block_size {
        return Err(Error::Padding {
            context: "PKCS#7 pad byte",
        });
    }

    let (body, pad) = data.split_at(data.len() - pad_len);
    if pad.iter().any(|&b| b as usize != pad_len) {
        return Err(Error::Padding {
            context: "PKCS#7 fill bytes",
        });
    }

    Ok(body.to_vec())
}
