//! ShangMi (SM) cryptographic primitives: SM2, SM3 and SM4.
//!
//! This crate implements the Chinese commercial cryptography suite over
//! the sm2p256v1 curve:
//!
//! - [`hash::Sm3`]: the SM3 cryptographic hash function (GB/T 32905)
//! - [`block::Sm4`]: the SM4 block cipher (GB/T 32907) with ECB, CBC,
//!   CFB, OFB and CTR modes behind [`block::Sm4Cipher`]
//! - [`sign::Sm2`]: SM2 digital signatures with SM3 (GB/T 32918.2)
//! - [`pke::Sm2Pke`]: SM2 public-key encryption (GB/T 32918.4)
//!
//! Secret material lives in zeroizing buffers and comparisons on
//! secret-dependent values go through constant-time primitives.
//!
//! ```
//! use gmsm::hash::{HashFunction, Sm3};
//!
//! let digest = Sm3::digest(b"abc").unwrap();
//! assert_eq!(
//!     digest.to_hex(),
//!     "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod block;
pub mod ec;
pub mod error;
pub mod hash;
pub mod kdf;
pub mod params;
pub mod pke;
pub mod security;
pub mod sign;
pub mod types;

pub use block::{Sm4, Sm4Cipher};
pub use error::{Error, Result};
pub use hash::Sm3;
pub use pke::{CiphertextOrdering, Sm2Ciphertext, Sm2Pke};
pub use sign::{NoncePolicy, Sm2, Sm2PublicKey, Sm2SecretKey, Sm2Signature};
