//! SM2 digital signature over sm2p256v1 (GB/T 32918.2)
//!
//! The signer identity enters through the Z value: Z = SM3(ENTL || ID ||
//! a || b || Gx || Gy || Px || Py), where ENTL is the identity bit length
//! as a 16-bit big-endian integer. The message digest is e = SM3(Z || M),
//! and the signature equations are r = (e + x1) mod n and
//! s = (1 + d)^-1 (k - r·d) mod n.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::ec::{self, Point, Scalar};
use crate::error::{validate, Error, Result};
use crate::hash::{HashFunction, Sm3};
use crate::kdf::Sm2Kdf;
use crate::params::{
    SM2_FIELD_ELEMENT_SIZE, SM2_P256V1, SM2_POINT_UNCOMPRESSED_SIZE, SM2_SCALAR_SIZE,
    SM2_SIGNATURE_SIZE, SM3_OUTPUT_SIZE,
};
use byteorder::{BigEndian, ByteOrder};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

#[cfg(test)]
mod tests;

/// The identity used for Z computation when the caller does not supply one
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Upper bound on the identity length: ENTL must fit in 16 bits
const MAX_USER_ID_BYTES: usize = 8191;

/// Degenerate nonce draws tolerated before signing gives up
const SIGN_RETRY_LIMIT: u32 = 5;

/// Nonce generation strategy for signing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoncePolicy {
    /// Sample k uniformly from [1, n-1] for every attempt
    #[default]
    Random,
    /// Derive k from the secret key, the message digest and the attempt
    /// counter, so equal inputs yield equal signatures
    Deterministic,
}

/// SM2 signature scheme using the sm2p256v1 curve with SM3
pub struct Sm2;

/// SM2 public key in uncompressed format (0x04 || X || Y)
#[derive(Clone, Zeroize)]
pub struct Sm2PublicKey(pub [u8; SM2_POINT_UNCOMPRESSED_SIZE]);

/// SM2 secret key
///
/// Contains both the scalar d and its byte representation. The scalar
/// must satisfy 1 ≤ d ≤ n-1 where n is the order of the base point G.
#[derive(Clone)]
pub struct Sm2SecretKey {
    raw: Scalar,
    bytes: [u8; SM2_SCALAR_SIZE],
}

impl Zeroize for Sm2SecretKey {
    fn zeroize(&mut self) {
        // The Scalar's own buffer zeroizes on drop
        self.bytes.zeroize();
    }
}

impl Drop for Sm2SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// An SM2 signature as its raw (r, s) components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2Signature {
    r: [u8; SM2_SCALAR_SIZE],
    s: [u8; SM2_SCALAR_SIZE],
}

impl Sm2PublicKey {
    /// Wrap a curve point as a public key
    pub fn from_point(point: &Point) -> Self {
        Self(point.serialize_uncompressed())
    }

    /// Decode the key back into a validated curve point
    pub fn to_point(&self) -> Result<Point> {
        Point::deserialize_uncompressed(&self.0)
    }

    /// Parse a hex-encoded public key.
    ///
    /// Accepts the 130-digit `04`-prefixed uncompressed form and the
    /// 128-digit raw `X || Y` form.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|_| Error::param("Sm2PublicKey", "Invalid hex encoding"))?;
        let point = Point::deserialize_uncompressed(&bytes)?;
        Ok(Self::from_point(&point))
    }

    /// Hex-encode in the `04`-prefixed uncompressed form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn x_bytes(&self) -> &[u8] {
        &self.0[1..1 + SM2_FIELD_ELEMENT_SIZE]
    }

    fn y_bytes(&self) -> &[u8] {
        &self.0[1 + SM2_FIELD_ELEMENT_SIZE..]
    }
}

impl AsRef<[u8]> for Sm2PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Sm2SecretKey {
    /// Create a secret key from raw bytes, requiring 1 ≤ d ≤ n-1
    pub fn new(bytes: [u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        let raw = Scalar::new(bytes)?;
        Ok(Self { raw, bytes })
    }

    /// Parse a hex-encoded secret key (64 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let decoded = hex::decode(s)
            .map_err(|_| Error::param("Sm2SecretKey", "Invalid hex encoding"))?;
        validate::length("Sm2SecretKey", decoded.len(), SM2_SCALAR_SIZE)?;

        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        bytes.copy_from_slice(&decoded);
        Self::new(bytes)
    }

    /// Hex-encode the scalar
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Derive the corresponding public key d·G
    pub fn public_key(&self) -> Result<Sm2PublicKey> {
        let point = ec::scalar_mult_base_g(&self.raw)?;
        Ok(Sm2PublicKey::from_point(&point))
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.raw
    }
}

impl AsRef<[u8]> for Sm2SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Sm2Signature {
    /// Assemble a signature from its raw components
    pub fn new(r: [u8; SM2_SCALAR_SIZE], s: [u8; SM2_SCALAR_SIZE]) -> Self {
        Self { r, s }
    }

    /// The r component as 32 big-endian bytes
    pub fn r(&self) -> &[u8; SM2_SCALAR_SIZE] {
        &self.r
    }

    /// The s component as 32 big-endian bytes
    pub fn s(&self) -> &[u8; SM2_SCALAR_SIZE] {
        &self.s
    }

    /// Serialize as the fixed 64-byte `r || s` form
    pub fn to_bytes(&self) -> [u8; SM2_SIGNATURE_SIZE] {
        let mut out = [0u8; SM2_SIGNATURE_SIZE];
        out[..SM2_SCALAR_SIZE].copy_from_slice(&self.r);
        out[SM2_SCALAR_SIZE..].copy_from_slice(&self.s);
        out
    }

    /// Parse the fixed 64-byte `r || s` form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        validate::length("Sm2Signature", bytes.len(), SM2_SIGNATURE_SIZE)?;

        let mut r = [0u8; SM2_SCALAR_SIZE];
        let mut s = [0u8; SM2_SCALAR_SIZE];
        r.copy_from_slice(&bytes[..SM2_SCALAR_SIZE]);
        s.copy_from_slice(&bytes[SM2_SCALAR_SIZE..]);
        Ok(Self { r, s })
    }
}

impl Sm2 {
    /// Scheme name
    pub fn name() -> &'static str {
        "SM2-SM3"
    }

    /// Generate a keypair: d ∈ [1, n-1], P = d·G
    pub fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Sm2PublicKey, Sm2SecretKey)> {
        let (d, point) = ec::generate_keypair(rng)?;
        let secret = Sm2SecretKey {
            bytes: d.to_bytes(),
            raw: d,
        };
        Ok((Sm2PublicKey::from_point(&point), secret))
    }

    /// Sign a message.
    ///
    /// When `user_id` is `None` the conventional default identity
    /// [`DEFAULT_USER_ID`] is used. Degenerate draws (r = 0, r + k = 0
    /// or s = 0 mod n) are retried up to the retry limit.
    pub fn sign<R: CryptoRng + RngCore>(
        message: &[u8],
        secret_key: &Sm2SecretKey,
        public_key: &Sm2PublicKey,
        user_id: Option<&[u8]>,
        policy: NoncePolicy,
        rng: &mut R,
    ) -> Result<Sm2Signature> {
        let z = compute_z(user_id.unwrap_or(DEFAULT_USER_ID), public_key)?;
        let e_bytes = digest_with_z(&z, message)?;
        let e = Scalar::from_bytes_mod_n(&e_bytes);
        let d = secret_key.scalar();

        for attempt in 0..SIGN_RETRY_LIMIT {
            let k = match policy {
                NoncePolicy::Random => Scalar::random(rng)?,
                NoncePolicy::Deterministic => {
                    match derive_nonce(secret_key, &e_bytes, attempt)? {
                        Some(k) => k,
                        None => continue,
                    }
                }
            };

            let kg = ec::scalar_mult_base_g(&k)?;
            let x1 = Scalar::from_bytes_mod_n(&kg.x_bytes());

            let r = e.add_mod_n(&x1);
            if bool::from(r.is_zero()) {
                continue;
            }
            // r + k ≡ 0 mod n would make s independent of k
            if bool::from(r.add_mod_n(&k).is_zero()) {
                continue;
            }

            // s = (1 + d)^-1 (k - r·d) mod n
            let denom = scalar_one().add_mod_n(d).invert_mod_n()?;
            let s = denom.mul_mod_n(&k.sub_mod_n(&r.mul_mod_n(d)));
            if bool::from(s.is_zero()) {
                continue;
            }

            return Ok(Sm2Signature {
                r: r.to_bytes(),
                s: s.to_bytes(),
            });
        }

        Err(Error::RetryLimit {
            operation: "SM2 signing",
            attempts: SIGN_RETRY_LIMIT,
        })
    }

    /// Verify a signature.
    ///
    /// Checks r, s ∈ [1, n-1] and t = (r + s) mod n ≠ 0, computes
    /// (x1, y1) = s·G + t·P rejecting the identity, and accepts iff
    /// (e + x1) mod n equals r. All failures surface as integrity errors.
    pub fn verify(
        message: &[u8],
        signature: &Sm2Signature,
        public_key: &Sm2PublicKey,
        user_id: Option<&[u8]>,
    ) -> Result<()> {
        let r = Scalar::new(signature.r).map_err(|_| Error::Integrity {
            context: "SM2 signature r component",
        })?;
        let s = Scalar::new(signature.s).map_err(|_| Error::Integrity {
            context: "SM2 signature s component",
        })?;

        let z = compute_z(user_id.unwrap_or(DEFAULT_USER_ID), public_key)?;
        let e_bytes = digest_with_z(&z, message)?;
        let e = Scalar::from_bytes_mod_n(&e_bytes);

        let t = r.add_mod_n(&s);
        if bool::from(t.is_zero()) {
            return Err(Error::Integrity {
                context: "SM2 signature r + s",
            });
        }

        let p = public_key.to_point()?;
        let sg = ec::scalar_mult_base_g(&s)?;
        let tp = ec::scalar_mult(&t, &p)?;
        let point = sg.add(&tp)?;

        if bool::from(point.is_identity()) {
            return Err(Error::Integrity {
                context: "SM2 verification point",
            });
        }

        let x1 = Scalar::from_bytes_mod_n(&point.x_bytes());
        let v = e.add_mod_n(&x1);
        if bool::from(v.to_bytes()[..].ct_eq(&signature.r)) {
            Ok(())
        } else {
            Err(Error::Integrity {
                context: "SM2 signature verification",
            })
        }
    }
}

/// Compute the signer identity digest Z.
///
/// Z = SM3(ENTL || ID || a || b || Gx || Gy || Px || Py), with ENTL the
/// identity length in bits as a 16-bit big-endian integer.
pub fn compute_z(user_id: &[u8], public_key: &Sm2PublicKey) -> Result<[u8; SM3_OUTPUT_SIZE]> {
    validate::parameter(
        user_id.len() <= MAX_USER_ID_BYTES,
        "user_id",
        "Identity length exceeds the 16-bit ENTL range",
    )?;

    let point = public_key.to_point()?;
    if bool::from(point.is_identity()) {
        return Err(Error::param("Sm2PublicKey", "Identity is not a valid key"));
    }

    let mut entl = [0u8; 2];
    BigEndian::write_u16(&mut entl, (user_id.len() * 8) as u16);

    let mut hasher = Sm3::new();
    hasher.update(&entl)?;
    hasher.update(user_id)?;
    hasher.update(&SM2_P256V1.a)?;
    hasher.update(&SM2_P256V1.b)?;
    hasher.update(&SM2_P256V1.g_x)?;
    hasher.update(&SM2_P256V1.g_y)?;
    hasher.update(public_key.x_bytes())?;
    hasher.update(public_key.y_bytes())?;

    Ok(hasher.finalize()?.into_inner())
}

/// The full message digest e = SM3(Z || M) for the given signer identity
pub fn message_digest(
    user_id: &[u8],
    public_key: &Sm2PublicKey,
    message: &[u8],
) -> Result<[u8; SM3_OUTPUT_SIZE]> {
    let z = compute_z(user_id, public_key)?;
    digest_with_z(&z, message)
}

/// e = SM3(Z || M) for a precomputed Z value
fn digest_with_z(z: &[u8; SM3_OUTPUT_SIZE], message: &[u8]) -> Result<[u8; SM3_OUTPUT_SIZE]> {
    let mut hasher = Sm3::new();
    hasher.update(z)?;
    hasher.update(message)?;
    Ok(hasher.finalize()?.into_inner())
}

/// Deterministic nonce: k = KDF(d || e || attempt) reduced mod n.
///
/// Returns `None` on the (negligible) zero reduction so the caller can
/// burn an attempt and re-derive.
fn derive_nonce(
    secret_key: &Sm2SecretKey,
    e_bytes: &[u8; SM3_OUTPUT_SIZE],
    attempt: u32,
) -> Result<Option<Scalar>> {
    let mut seed = Zeroizing::new(Vec::with_capacity(SM2_SCALAR_SIZE + SM3_OUTPUT_SIZE + 4));
    seed.extend_from_slice(secret_key.as_ref());
    seed.extend_from_slice(e_bytes);
    seed.extend_from_slice(&attempt.to_be_bytes());

    let material = Zeroizing::new(Sm2Kdf::derive_key(&seed, SM2_SCALAR_SIZE)?);
    let mut bytes = [0u8; SM2_SCALAR_SIZE];
    bytes.copy_from_slice(&material);
    let k = Scalar::from_bytes_mod_n(&bytes);
    bytes.zeroize();

    if bool::from(k.is_zero()) {
        Ok(None)
    } else {
        Ok(Some(k))
    }
}

/// The scalar 1
fn scalar_one() -> Scalar {
    let mut bytes = [0u8; SM2_SCALAR_SIZE];
    bytes[SM2_SCALAR_SIZE - 1] = 1;
    Scalar::from_bytes_mod_n(&bytes)
}
