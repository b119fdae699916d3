//! SM2 public-key encryption (GB/T 32918.4)
//!
//! Hybrid encryption against a recipient point P: an ephemeral scalar k
//! yields C1 = k·G and the shared point (x2, y2) = k·P; the key stream is
//! t = KDF(x2 || y2, |M|), C2 = M xor t, and C3 = SM3(x2 || M || y2)
//! binds the plaintext. The wire form concatenates the components in
//! either the C1 || C3 || C2 ordering of the current standard or the
//! older C1 || C2 || C3 ordering.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::ec::{self, Point, Scalar};
use crate::error::{validate, Error, Result};
use crate::hash::{HashFunction, Sm3};
use crate::kdf::{self, Sm2Kdf};
use crate::params::{SM2_FIELD_ELEMENT_SIZE, SM2_POINT_UNCOMPRESSED_SIZE, SM3_OUTPUT_SIZE};
use crate::sign::{Sm2PublicKey, Sm2SecretKey};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;


/// Degenerate ephemeral draws tolerated before encryption gives up
const ENCRYPT_RETRY_LIMIT: u32 = 5;

/// Smallest well-formed wire ciphertext: C1, C3 and one byte of C2
const MIN_CIPHERTEXT_SIZE: usize = SM2_POINT_UNCOMPRESSED_SIZE + SM3_OUTPUT_SIZE + 1;

/// Component ordering of the serialized ciphertext
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CiphertextOrdering {
    /// C1 || C3 || C2, the ordering of the current standard
    #[default]
    C1C3C2,
    /// C1 || C2 || C3, the ordering of the 2009 draft kept for interop
    C1C2C3,
}

/// SM2 public-key encryption scheme
pub struct Sm2Pke;

/// A structured SM2 ciphertext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2Ciphertext {
    c1: [u8; SM2_POINT_UNCOMPRESSED_SIZE],
    c3: [u8; SM3_OUTPUT_SIZE],
    c2: Vec<u8>,
}

impl Sm2Ciphertext {
    /// The ephemeral point C1 in uncompressed form
    pub fn c1(&self) -> &[u8; SM2_POINT_UNCOMPRESSED_SIZE] {
        &self.c1
    }

    /// The masked plaintext C2
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// The binding digest C3
    pub fn c3(&self) -> &[u8; SM3_OUTPUT_SIZE] {
        &self.c3
    }

    /// Concatenate the components in the given ordering
    pub fn serialize(&self, ordering: CiphertextOrdering) -> Vec<u8> {
        let mut out = Vec::with_capacity(SM2_POINT_UNCOMPRESSED_SIZE + SM3_OUTPUT_SIZE + self.c2.len());
        out.extend_from_slice(&self.c1);
        match ordering {
            CiphertextOrdering::C1C3C2 => {
                out.extend_from_slice(&self.c3);
                out.extend_from_slice(&self.c2);
            }
            CiphertextOrdering::C1C2C3 => {
                out.extend_from_slice(&self.c2);
                out.extend_from_slice(&self.c3);
            }
        }
        out
    }

    /// Split a wire ciphertext back into components.
    ///
    /// Requires room for C1, C3 and at least one byte of C2; the curve
    /// check on C1 happens at decryption.
    pub fn parse(bytes: &[u8], ordering: CiphertextOrdering) -> Result<Self> {
        validate::min_length("SM2 ciphertext", bytes.len(), MIN_CIPHERTEXT_SIZE)?;

        let mut c1 = [0u8; SM2_POINT_UNCOMPRESSED_SIZE];
        c1.copy_from_slice(&bytes[..SM2_POINT_UNCOMPRESSED_SIZE]);
        let rest = &bytes[SM2_POINT_UNCOMPRESSED_SIZE..];

        let mut c3 = [0u8; SM3_OUTPUT_SIZE];
        let c2 = match ordering {
            CiphertextOrdering::C1C3C2 => {
                c3.copy_from_slice(&rest[..SM3_OUTPUT_SIZE]);
                rest[SM3_OUTPUT_SIZE..].to_vec()
            }
            CiphertextOrdering::C1C2C3 => {
                let split = rest.len() - SM3_OUTPUT_SIZE;
                c3.copy_from_slice(&rest[split..]);
                rest[..split].to_vec()
            }
        };

        Ok(Self { c1, c3, c2 })
    }
}

impl Sm2Pke {
    /// Scheme name
    pub fn name() -> &'static str {
        "SM2-PKE-SM3"
    }

    /// Encrypt a plaintext to the recipient key, returning the wire form
    /// in the given component ordering
    pub fn encrypt<R: CryptoRng + RngCore>(
        public_key: &Sm2PublicKey,
        plaintext: &[u8],
        ordering: CiphertextOrdering,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        Ok(Self::encrypt_components(public_key, plaintext, rng)?.serialize(ordering))
    }

    /// Decrypt a wire ciphertext in the given component ordering
    pub fn decrypt(
        secret_key: &Sm2SecretKey,
        ciphertext: &[u8],
        ordering: CiphertextOrdering,
    ) -> Result<Vec<u8>> {
        Self::decrypt_components(secret_key, &Sm2Ciphertext::parse(ciphertext, ordering)?)
    }

    /// Encrypt a plaintext to the recipient key.
    ///
    /// Degenerate ephemeral draws (shared point at infinity or an
    /// all-zero key stream) are retried up to the retry limit. Empty
    /// plaintexts are rejected.
    pub fn encrypt_components<R: CryptoRng + RngCore>(
        public_key: &Sm2PublicKey,
        plaintext: &[u8],
        rng: &mut R,
    ) -> Result<Sm2Ciphertext> {
        validate::parameter(
            !plaintext.is_empty(),
            "plaintext",
            "Empty message cannot be encrypted",
        )?;

        let p = public_key.to_point()?;
        if bool::from(p.is_identity()) {
            return Err(Error::param("Sm2PublicKey", "Identity is not a valid key"));
        }

        for _ in 0..ENCRYPT_RETRY_LIMIT {
            let k = Scalar::random(rng)?;
            let c1_point = ec::scalar_mult_base_g(&k)?;

            let shared = ec::scalar_mult(&k, &p)?;
            if bool::from(shared.is_identity()) {
                continue;
            }

            let x2 = Zeroizing::new(shared.x_bytes());
            let y2 = Zeroizing::new(shared.y_bytes());

            let t = Zeroizing::new(derive_stream(&x2, &y2, plaintext.len())?);
            if kdf::is_all_zero(&t) {
                continue;
            }

            let c2 = xor_stream(plaintext, &t);
            let c3 = binding_digest(&x2, plaintext, &y2)?;

            return Ok(Sm2Ciphertext {
                c1: c1_point.serialize_uncompressed(),
                c3,
                c2,
            });
        }

        Err(Error::RetryLimit {
            operation: "SM2 encryption",
            attempts: ENCRYPT_RETRY_LIMIT,
        })
    }

    /// Decrypt a structured ciphertext.
    ///
    /// C1 is validated against the curve equation; a C3 mismatch or a
    /// degenerate shared point surfaces as an integrity error.
    pub fn decrypt_components(
        secret_key: &Sm2SecretKey,
        ciphertext: &Sm2Ciphertext,
    ) -> Result<Vec<u8>> {
        let c1_point = Point::deserialize_uncompressed(&ciphertext.c1)?;
        if bool::from(c1_point.is_identity()) {
            return Err(Error::InvalidPoint {
                context: "SM2 ciphertext C1",
            });
        }

        let shared = ec::scalar_mult(secret_key.scalar(), &c1_point)?;
        if bool::from(shared.is_identity()) {
            return Err(Error::Integrity {
                context: "SM2 shared point",
            });
        }

        let x2 = Zeroizing::new(shared.x_bytes());
        let y2 = Zeroizing::new(shared.y_bytes());

        let t = Zeroizing::new(derive_stream(&x2, &y2, ciphertext.c2.len())?);
        if kdf::is_all_zero(&t) {
            return Err(Error::Integrity {
                context: "SM2 key derivation",
            });
        }

        let plaintext = Zeroizing::new(xor_stream(&ciphertext.c2, &t));
        let c3 = binding_digest(&x2, &plaintext, &y2)?;

        if bool::from(c3[..].ct_eq(&ciphertext.c3)) {
            Ok(plaintext.to_vec())
        } else {
            Err(Error::Integrity {
                context: "SM2 ciphertext C3",
            })
        }
    }
}

/// The key stream t = KDF(x2 || y2, len)
fn derive_stream(
    x2: &[u8; SM2_FIELD_ELEMENT_SIZE],
    y2: &[u8; SM2_FIELD_ELEMENT_SIZE],
    len: usize,
) -> Result<Vec<u8>> {
    let mut z = Zeroizing::new(Vec::with_capacity(2 * SM2_FIELD_ELEMENT_SIZE));
    z.extend_from_slice(x2);
    z.extend_from_slice(y2);
    Sm2Kdf::derive_key(&z, len)
}

/// The binding digest C3 = SM3(x2 || M || y2)
fn binding_digest(
    x2: &[u8; SM2_FIELD_ELEMENT_SIZE],
    plaintext: &[u8],
    y2: &[u8; SM2_FIELD_ELEMENT_SIZE],
) -> Result<[u8; SM3_OUTPUT_SIZE]> {
    let mut hasher = Sm3::new();
    hasher.update(x2)?;
    hasher.update(plaintext)?;
    hasher.update(y2)?;
    Ok(hasher.finalize()?.into_inner())
}

fn xor_stream(data: &[u8], stream: &[u8]) -> Vec<u8> {
    data.iter().zip(stream.iter()).map(|(a, b)| a ^ b).collect()
}
