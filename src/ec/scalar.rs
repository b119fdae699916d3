//! Scalar arithmetic modulo the SM2 group order n
//!
//! Secret scalars live in a zeroizing buffer; the arithmetic itself is the
//! explicit-modulus engine in `field`, instantiated with n.

use crate::ec::field::FieldElement;
use crate::error::{Error, Result};
use crate::params::{SM2_P256V1, SM2_SCALAR_SIZE};
use crate::security::SecretBuffer;
use rand::{CryptoRng, RngCore};
use subtle::Choice;

/// Retry bound for rejection-sampling a uniform scalar
const SCALAR_SAMPLE_LIMIT: u32 = 64;

/// A scalar value in [0, n) where n is the SM2 group order
#[derive(Clone)]
pub struct Scalar(SecretBuffer<SM2_SCALAR_SIZE>);

impl Scalar {
    /// The group order n as a field-engine element
    pub(crate) fn order() -> FieldElement {
        FieldElement::from_bytes_raw(&SM2_P256V1.n)
    }

    /// Create a scalar from raw bytes, requiring 0 < value < n
    pub fn new(bytes: [u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        let fe = FieldElement::from_bytes(&bytes, &Self::order())
            .map_err(|_| Error::param("Scalar", "Value ≥ group order"))?;
        if bool::from(fe.is_zero()) {
            return Err(Error::param("Scalar", "Zero is not a valid scalar"));
        }
        Ok(Self(SecretBuffer::new(bytes)))
    }

    /// Create a scalar from raw bytes, reducing mod n.
    /// Used for message digests entering the signature equations.
    pub fn from_bytes_mod_n(bytes: &[u8; SM2_SCALAR_SIZE]) -> Self {
        let fe = FieldElement::from_bytes_reduced(bytes, &Self::order());
        Self(SecretBuffer::new(fe.to_bytes()))
    }

    /// Sample a uniform scalar in [1, n-1] by rejection
    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        for _ in 0..SCALAR_SAMPLE_LIMIT {
            let mut bytes = [0u8; SM2_SCALAR_SIZE];
            rng.fill_bytes(&mut bytes);
            if let Ok(scalar) = Self::new(bytes) {
                return Ok(scalar);
            }
        }
        Err(Error::RetryLimit {
            operation: "scalar sampling",
            attempts: SCALAR_SAMPLE_LIMIT,
        })
    }

    /// Serialize as 32 big-endian bytes
    pub fn to_bytes(&self) -> [u8; SM2_SCALAR_SIZE] {
        let mut out = [0u8; SM2_SCALAR_SIZE];
        out.copy_from_slice(self.0.as_slice());
        out
    }

    /// Borrow the big-endian byte representation
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Constant-time zero check
    pub fn is_zero(&self) -> Choice {
        self.to_field().is_zero()
    }

    /// Addition mod n
    pub fn add_mod_n(&self, other: &Self) -> Self {
        Self::from_field(self.to_field().add_mod(&other.to_field(), &Self::order()))
    }

    /// Subtraction mod n
    pub fn sub_mod_n(&self, other: &Self) -> Self {
        Self::from_field(self.to_field().sub_mod(&other.to_field(), &Self::order()))
    }

    /// Multiplication mod n
    pub fn mul_mod_n(&self, other: &Self) -> Self {
        Self::from_field(self.to_field().mul_mod(&other.to_field(), &Self::order()))
    }

    /// Inversion mod n; fails on zero
    pub fn invert_mod_n(&self) -> Result<Self> {
        Ok(Self::from_field(self.to_field().invert_mod(&Self::order())?))
    }

    pub(crate) fn to_field(&self) -> FieldElement {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        bytes.copy_from_slice(self.0.as_slice());
        FieldElement::from_bytes_raw(&bytes)
    }

    pub(crate) fn from_field(fe: FieldElement) -> Self {
        Self(SecretBuffer::new(fe.to_bytes()))
    }
}

impl core::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar([REDACTED])")
    }
}
