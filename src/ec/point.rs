//! Affine point arithmetic on the sm2p256v1 curve
//!
//! Points are kept in affine coordinates throughout; the group law is the
//! textbook chord-and-tangent construction with explicit modular
//! inversions for the slopes. This is the crate's one point
//! representation.

use crate::ec::field::FieldElement;
use crate::error::{Error, Result};
use crate::params::{SM2_FIELD_ELEMENT_SIZE, SM2_P256V1, SM2_POINT_UNCOMPRESSED_SIZE};
use subtle::{Choice, ConditionallySelectable};

/// Number of ladder iterations: every bit of a 256-bit scalar is visited
const SCALAR_BITS: usize = 256;

/// A point on the SM2 curve in affine coordinates, or the point at infinity
#[derive(Clone)]
pub struct Point {
    is_identity: Choice,
    x: FieldElement,
    y: FieldElement,
}

impl Point {
    /// The point at infinity
    pub fn identity() -> Self {
        Point {
            is_identity: Choice::from(1),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    /// The base point G of the recommended curve
    pub fn generator() -> Self {
        Point {
            is_identity: Choice::from(0),
            x: FieldElement::from_bytes_raw(&SM2_P256V1.g_x),
            y: FieldElement::from_bytes_raw(&SM2_P256V1.g_y),
        }
    }

    /// Create a point from affine coordinates, rejecting off-curve input
    pub fn new(
        x: &[u8; SM2_FIELD_ELEMENT_SIZE],
        y: &[u8; SM2_FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let p = curve_p();
        let x = FieldElement::from_bytes(x, &p)?;
        let y = FieldElement::from_bytes(y, &p)?;

        if !bool::from(Self::is_on_curve(&x, &y)) {
            return Err(Error::InvalidPoint {
                context: "affine coordinates",
            });
        }

        Ok(Point {
            is_identity: Choice::from(0),
            x,
            y,
        })
    }

    /// Whether this is the point at infinity
    pub fn is_identity(&self) -> Choice {
        self.is_identity
    }

    /// Big-endian x-coordinate (all zeros for the identity)
    pub fn x_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// Big-endian y-coordinate (all zeros for the identity)
    pub fn y_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    /// Check y² = x³ + ax + b (mod p)
    fn is_on_curve(x: &FieldElement, y: &FieldElement) -> Choice {
        let p = curve_p();
        let lhs = y.square_mod(&p);
        let x3 = x.square_mod(&p).mul_mod(x, &p);
        let ax = curve_a().mul_mod(x, &p);
        let rhs = x3.add_mod(&ax, &p).add_mod(&curve_b(), &p);
        lhs.ct_eq(&rhs)
    }

    /// Additive inverse: (x, p - y)
    pub fn negate(&self) -> Self {
        Point {
            is_identity: self.is_identity,
            x: self.x.clone(),
            y: self.y.negate_mod(&curve_p()),
        }
    }

    /// Group addition via the chord-and-tangent law.
    ///
    /// The identity absorbs; P + (-P) is the identity; equal inputs fall
    /// through to doubling. Slope inversions surface `NoInverse`.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if bool::from(self.is_identity) {
            return Ok(other.clone());
        }
        if bool::from(other.is_identity) {
            return Ok(self.clone());
        }

        let p = curve_p();
        if bool::from(self.x.ct_eq(&other.x)) {
            // Same x-coordinate: either inverses or the same point
            if bool::from(self.y.add_mod(&other.y, &p).is_zero()) {
                return Ok(Self::identity());
            }
            return self.double();
        }

        // λ = (y₂ - y₁) / (x₂ - x₁)
        let num = other.y.sub_mod(&self.y, &p);
        let den = other.x.sub_mod(&self.x, &p);
        let lambda = num.mul_mod(&den.invert_mod(&p)?, &p);

        Ok(self.apply_slope(&lambda, &other.x))
    }

    /// Point doubling: λ = (3x² + a) / (2y), with 2P = ∞ when y = 0
    pub fn double(&self) -> Result<Self> {
        if bool::from(self.is_identity) {
            return Ok(Self::identity());
        }
        if bool::from(self.y.is_zero()) {
            return Ok(Self::identity());
        }

        let p = curve_p();
        let x_sq = self.x.square_mod(&p);
        let three_x_sq = x_sq.add_mod(&x_sq, &p).add_mod(&x_sq, &p);
        let num = three_x_sq.add_mod(&curve_a(), &p);
        let den = self.y.add_mod(&self.y, &p);
        let lambda = num.mul_mod(&den.invert_mod(&p)?, &p);

        Ok(self.apply_slope(&lambda, &self.x))
    }

    /// Shared tail of addition and doubling:
    /// x₃ = λ² - x₁ - x₂,  y₃ = λ(x₁ - x₃) - y₁
    fn apply_slope(&self, lambda: &FieldElement, x2: &FieldElement) -> Self {
        let p = curve_p();
        let x3 = lambda
            .square_mod(&p)
            .sub_mod(&self.x, &p)
            .sub_mod(x2, &p);
        let y3 = self
            .x
            .sub_mod(&x3, &p)
            .mul_mod(lambda, &p)
            .sub_mod(&self.y, &p);
        Point {
            is_identity: Choice::from(0),
            x: x3,
            y: y3,
        }
    }

    /// Scalar multiplication: k·P with a fixed 256-iteration double-and-add.
    ///
    /// The scalar is reduced modulo the field prime p first (historical
    /// behavior of this suite; a no-op for scalars below the group order),
    /// every bit of the reduced scalar is visited, and the result is
    /// checked against the curve equation before being released.
    pub fn mul(&self, k: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let k = FieldElement::from_bytes_reduced(k, &curve_p());
        let k_bytes = k.to_bytes();

        let mut acc = Self::identity();
        for i in 0..SCALAR_BITS {
            acc = acc.double()?;
            let bit = (k_bytes[i / 8] >> (7 - (i % 8))) & 1;
            if bit == 1 {
                acc = acc.add(self)?;
            }
        }

        acc.check_result()
    }

    /// Scalar multiplication via a Montgomery ladder with constant-time
    /// conditional swaps. Hardened alternative to [`Point::mul`]; same
    /// reduction and result check.
    pub fn mul_ladder(&self, k: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let k = FieldElement::from_bytes_reduced(k, &curve_p());
        let k_bytes = k.to_bytes();

        let mut r0 = Self::identity();
        let mut r1 = self.clone();
        let mut swap = Choice::from(0);

        for i in 0..SCALAR_BITS {
            let bit = Choice::from((k_bytes[i / 8] >> (7 - (i % 8))) & 1);
            Self::conditional_swap(&mut r0, &mut r1, swap ^ bit);
            swap = bit;

            let sum = r0.add(&r1)?;
            r0 = r0.double()?;
            r1 = sum;
        }
        Self::conditional_swap(&mut r0, &mut r1, swap);

        r0.check_result()
    }

    /// Curve-equation check applied to every scalar multiplication result
    fn check_result(self) -> Result<Self> {
        if bool::from(self.is_identity) || bool::from(Self::is_on_curve(&self.x, &self.y)) {
            Ok(self)
        } else {
            Err(Error::InvalidPoint {
                context: "scalar multiplication result",
            })
        }
    }

    /// Constant-time swap of two points
    fn conditional_swap(a: &mut Point, b: &mut Point, choice: Choice) {
        for i in 0..crate::ec::field::NLIMBS {
            u32::conditional_swap(&mut a.x.0[i], &mut b.x.0[i], choice);
            u32::conditional_swap(&mut a.y.0[i], &mut b.y.0[i], choice);
        }
        let mut ai = a.is_identity.unwrap_u8();
        let mut bi = b.is_identity.unwrap_u8();
        u8::conditional_swap(&mut ai, &mut bi, choice);
        a.is_identity = Choice::from(ai);
        b.is_identity = Choice::from(bi);
    }

    /// Serialize in uncompressed form: `0x04 || X || Y`.
    /// The identity serializes as all zeros.
    pub fn serialize_uncompressed(&self) -> [u8; SM2_POINT_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; SM2_POINT_UNCOMPRESSED_SIZE];
        if bool::from(self.is_identity) {
            return out;
        }
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..65].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Deserialize an uncompressed point.
    ///
    /// Accepts the 65-byte `0x04`-prefixed form and the 64-byte raw
    /// `X || Y` form; all-zero input decodes to the identity. The point is
    /// validated against the curve equation.
    pub fn deserialize_uncompressed(bytes: &[u8]) -> Result<Self> {
        let coords: &[u8] = match bytes.len() {
            SM2_POINT_UNCOMPRESSED_SIZE => {
                if bytes.iter().all(|&b| b == 0) {
                    return Ok(Self::identity());
                }
                if bytes[0] != 0x04 {
                    return Err(Error::param(
                        "Point",
                        "Unsupported point encoding prefix",
                    ));
                }
                &bytes[1..]
            }
            64 => {
                if bytes.iter().all(|&b| b == 0) {
                    return Ok(Self::identity());
                }
                bytes
            }
            _ => {
                return Err(Error::Length {
                    context: "Point::deserialize_uncompressed",
                    expected: SM2_POINT_UNCOMPRESSED_SIZE,
                    actual: bytes.len(),
                })
            }
        };

        let mut x = [0u8; SM2_FIELD_ELEMENT_SIZE];
        let mut y = [0u8; SM2_FIELD_ELEMENT_SIZE];
        x.copy_from_slice(&coords[..32]);
        y.copy_from_slice(&coords[32..]);
        Self::new(&x, &y)
    }

    /// Constant-time point equality
    pub fn ct_eq(&self, other: &Self) -> Choice {
        let both_identity = self.is_identity & other.is_identity;
        let coords_equal = self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y)
            & !self.is_identity
            & !other.is_identity;
        both_identity | coords_equal
    }
}

impl core::fmt::Debug for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if bool::from(self.is_identity) {
            write!(f, "Point(identity)")
        } else {
            write!(f, "Point(x: {:x?}.., y: {:x?}..)", self.x.0[7], self.y.0[7])
        }
    }
}

/// Field prime p as an engine element
pub(crate) fn curve_p() -> FieldElement {
    FieldElement::from_bytes_raw(&SM2_P256V1.p)
}

/// Curve coefficient a as an engine element
pub(crate) fn curve_a() -> FieldElement {
    FieldElement::from_bytes_raw(&SM2_P256V1.a)
}

/// Curve coefficient b as an engine element
pub(crate) fn curve_b() -> FieldElement {
    FieldElement::from_bytes_raw(&SM2_P256V1.b)
}
