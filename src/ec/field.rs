//! 256-bit modular arithmetic with an explicit modulus argument
//!
//! One arithmetic engine serves both the SM2 field prime p and the group
//! order n: every operation takes the modulus as a parameter instead of
//! baking it into the type. Elements are canonical (value < modulus) and
//! stored as 8 little-endian 32-bit limbs.

use crate::error::{Error, Result};
use crate::params::SM2_FIELD_ELEMENT_SIZE;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Number of 32-bit limbs for a 256-bit element (8 × 32 = 256 bits)
pub(crate) const NLIMBS: usize = 8;

/// A 256-bit residue stored as 8 little-endian 32-bit limbs.
///
/// The modulus it lives under is supplied per operation, so the same type
/// carries coordinates mod p and scalars mod n.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct FieldElement(pub(crate) [u32; NLIMBS]);

impl FieldElement {
    /* ================================================================= */
    /*  Tiny helpers                                                     */
    /* ================================================================= */

    /// Build an element from a small literal (`0 ≤ n < 2³²`)
    #[inline]
    pub fn from_u32(n: u32) -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = n;
        FieldElement(limbs)
    }

    /// The additive identity: 0
    #[inline]
    pub fn zero() -> Self {
        FieldElement([0u32; NLIMBS])
    }

    /// The multiplicative identity: 1
    #[inline]
    pub fn one() -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = 1;
        FieldElement(limbs)
    }

    /// Create an element from big-endian bytes.
    /// Rejects values ≥ modulus; reduction is never silent.
    pub fn from_bytes(
        bytes: &[u8; SM2_FIELD_ELEMENT_SIZE],
        modulus: &FieldElement,
    ) -> Result<Self> {
        let limbs = Self::limbs_from_be(bytes);
        let (_, borrow) = Self::sbb8(limbs, modulus.0);
        if borrow == 0 {
            return Err(Error::param("FieldElement", "Value ≥ modulus"));
        }
        Ok(FieldElement(limbs))
    }

    /// Create an element from big-endian bytes, canonicalizing with a
    /// single conditional subtraction. Sound for any 256-bit input because
    /// both SM2 moduli exceed 2²⁵⁵.
    pub fn from_bytes_reduced(
        bytes: &[u8; SM2_FIELD_ELEMENT_SIZE],
        modulus: &FieldElement,
    ) -> Self {
        let limbs = Self::limbs_from_be(bytes);
        let (sub, borrow) = Self::sbb8(limbs, modulus.0);
        FieldElement(Self::conditional_select_limbs(
            &sub,
            &limbs,
            Choice::from(borrow as u8),
        ))
    }

    /// Create an element from big-endian bytes without canonicality
    /// checks. Reserved for the curve constants themselves.
    pub(crate) fn from_bytes_raw(bytes: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> Self {
        FieldElement(Self::limbs_from_be(bytes))
    }

    /// Convert this element into big-endian bytes.
    pub fn to_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        let mut out = [0u8; SM2_FIELD_ELEMENT_SIZE];
        for (i, &limb) in self.0.iter().enumerate() {
            let limb_bytes = limb.to_be_bytes();
            let offset = (NLIMBS - 1 - i) * 4;
            out[offset..offset + 4].copy_from_slice(&limb_bytes);
        }
        out
    }

    /// Constant-time zero check
    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u32;
        for &w in self.0.iter() {
            acc |= w;
        }
        acc.ct_eq(&0)
    }

    /// Return true if the element is odd (least-significant bit = 1).
    pub fn is_odd(&self) -> bool {
        (self.0[0] & 1) == 1
    }

    /// Branch-balanced equality over the full limb array
    pub fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = 0u32;
        for i in 0..NLIMBS {
            acc |= self.0[i] ^ other.0[i];
        }
        acc.ct_eq(&0)
    }

    /// Branch-balanced `self < other` over equal-length representations.
    /// Walks every limb via the full-width subtraction borrow chain.
    pub fn ct_lt(&self, other: &Self) -> Choice {
        let (_, borrow) = Self::sbb8(self.0, other.0);
        Choice::from(borrow as u8)
    }

    /* ================================================================= */
    /*  Modular arithmetic                                               */
    /* ================================================================= */

    /// Constant-time addition: (self + other) mod modulus
    pub fn add_mod(&self, other: &Self, modulus: &Self) -> Self {
        // Full 256-bit addition
        let (sum, carry) = Self::adc8(self.0, other.0);

        // Reduce if carry = 1 or sum ≥ modulus
        let (reduced, borrow) = Self::sbb8(sum, modulus.0);
        let need_reduce = (carry | (borrow ^ 1)) & 1;

        FieldElement(Self::conditional_select_limbs(
            &sum,
            &reduced,
            Choice::from(need_reduce as u8),
        ))
    }

    /// Constant-time subtraction: (self - other) mod modulus
    pub fn sub_mod(&self, other: &Self, modulus: &Self) -> Self {
        let (diff, borrow) = Self::sbb8(self.0, other.0);
        // If borrow == 1, add the modulus back
        let (diff_plus_m, _) = Self::adc8(diff, modulus.0);
        FieldElement(Self::conditional_select_limbs(
            &diff,
            &diff_plus_m,
            Choice::from(borrow as u8),
        ))
    }

    /// Additive inverse: (modulus - self) mod modulus
    pub fn negate_mod(&self, modulus: &Self) -> Self {
        Self::zero().sub_mod(self, modulus)
    }

    /// Modular multiplication: (self * other) mod modulus.
    /// Schoolbook 8×8 → 16-limb product, then generic reduction.
    pub fn mul_mod(&self, other: &Self, modulus: &Self) -> Self {
        // Phase 1: 8×8 → 16 128-bit partial accumulators
        let mut t = [0u128; NLIMBS * 2];
        for i in 0..NLIMBS {
            for j in 0..NLIMBS {
                t[i + j] += (self.0[i] as u128) * (other.0[j] as u128);
            }
        }

        // Phase 2: carry propagation into 16 32-bit limbs
        let mut wide = [0u32; NLIMBS * 2];
        let mut carry: u128 = 0;
        for k in 0..NLIMBS * 2 {
            let v = t[k] + carry;
            wide[k] = v as u32;
            carry = v >> 32;
        }

        Self::reduce_wide(&wide, modulus)
    }

    /// Modular squaring: (self * self) mod modulus
    pub fn square_mod(&self, modulus: &Self) -> Self {
        self.mul_mod(self, modulus)
    }

    /// Modular inverse via binary extended GCD (modulus must be odd).
    ///
    /// Returns `NoInverse` when gcd(self, modulus) ≠ 1, including for the
    /// zero element.
    pub fn invert_mod(&self, modulus: &Self) -> Result<Self> {
        if !modulus.is_odd() {
            return Err(Error::param("modulus", "Inversion requires an odd modulus"));
        }
        if bool::from(self.is_zero()) {
            return Err(Error::NoInverse {
                context: "modular inversion",
            });
        }

        // Invariants: self·x1 ≡ u and self·x2 ≡ v (mod modulus)
        let mut u = self.0;
        let mut v = modulus.0;
        let mut x1 = Self::one();
        let mut x2 = Self::zero();

        while !Self::limbs_is_zero(&u) {
            while !Self::limbs_is_zero(&u) && Self::limbs_is_even(&u) {
                Self::limbs_shr1(&mut u);
                x1 = Self::half_mod(&x1, modulus);
            }
            while Self::limbs_is_even(&v) {
                Self::limbs_shr1(&mut v);
                x2 = Self::half_mod(&x2, modulus);
            }

            let (diff, borrow) = Self::sbb8(u, v);
            if borrow == 0 {
                // u ≥ v
                u = diff;
                x1 = x1.sub_mod(&x2, modulus);
            } else {
                let (diff, _) = Self::sbb8(v, u);
                v = diff;
                x2 = x2.sub_mod(&x1, modulus);
            }
        }

        // v now holds gcd(self, modulus)
        if v == Self::one().0 {
            Ok(x2)
        } else {
            Err(Error::NoInverse {
                context: "modular inversion",
            })
        }
    }

    /* ================================================================= */
    /*  Limb helpers                                                     */
    /* ================================================================= */

    /// Big-endian bytes → little-endian limbs
    fn limbs_from_be(bytes: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> [u32; NLIMBS] {
        let mut limbs = [0u32; NLIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = (NLIMBS - 1 - i) * 4;
            *limb = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
        }
        limbs
    }

    /// 8-limb addition with carry out
    #[inline(always)]
    pub(crate) fn adc8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut out = [0u32; NLIMBS];
        let mut carry: u64 = 0;
        for i in 0..NLIMBS {
            let v = (a[i] as u64) + (b[i] as u64) + carry;
            out[i] = v as u32;
            carry = v >> 32;
        }
        (out, carry as u32)
    }

    /// 8-limb subtraction with borrow out (borrow = 1 means a < b)
    #[inline(always)]
    pub(crate) fn sbb8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut out = [0u32; NLIMBS];
        let mut borrow: i64 = 0;
        for i in 0..NLIMBS {
            let v = (a[i] as i64) - (b[i] as i64) - borrow;
            out[i] = v as u32;
            borrow = (v >> 32) & 1;
        }
        (out, borrow as u32)
    }

    /// Constant-time limb array selection: `a` if choice = 0, `b` if 1
    #[inline(always)]
    pub(crate) fn conditional_select_limbs(
        a: &[u32; NLIMBS],
        b: &[u32; NLIMBS],
        choice: Choice,
    ) -> [u32; NLIMBS] {
        let mut out = [0u32; NLIMBS];
        for i in 0..NLIMBS {
            out[i] = u32::conditional_select(&a[i], &b[i], choice);
        }
        out
    }

    fn limbs_is_zero(limbs: &[u32; NLIMBS]) -> bool {
        limbs.iter().all(|&w| w == 0)
    }

    fn limbs_is_even(limbs: &[u32; NLIMBS]) -> bool {
        (limbs[0] & 1) == 0
    }

    /// In-place right shift by one bit
    fn limbs_shr1(limbs: &mut [u32; NLIMBS]) {
        for i in 0..NLIMBS - 1 {
            limbs[i] = (limbs[i] >> 1) | (limbs[i + 1] << 31);
        }
        limbs[NLIMBS - 1] >>= 1;
    }

    /// Halve an element mod an odd modulus: x/2 if even, (x + m)/2 otherwise
    fn half_mod(x: &Self, modulus: &Self) -> Self {
        if Self::limbs_is_even(&x.0) {
            let mut limbs = x.0;
            Self::limbs_shr1(&mut limbs);
            FieldElement(limbs)
        } else {
            // x + m fits in 257 bits; shift the carry back in
            let (sum, carry) = Self::adc8(x.0, modulus.0);
            let mut limbs = sum;
            Self::limbs_shr1(&mut limbs);
            limbs[NLIMBS - 1] |= carry << 31;
            FieldElement(limbs)
        }
    }

    /// Reduce a 512-bit value modulo an arbitrary 256-bit modulus.
    ///
    /// Bit-serial shift-subtract long division: the remainder never exceeds
    /// 257 bits, so it is tracked in 9 limbs with a conditional subtraction
    /// per bit.
    fn reduce_wide(wide: &[u32; NLIMBS * 2], modulus: &Self) -> Self {
        let mut m9 = [0u32; NLIMBS + 1];
        m9[..NLIMBS].copy_from_slice(&modulus.0);

        let mut r = [0u32; NLIMBS + 1];
        for bit in (0..NLIMBS * 2 * 32).rev() {
            // r = (r << 1) | wide[bit]
            for i in (1..=NLIMBS).rev() {
                r[i] = (r[i] << 1) | (r[i - 1] >> 31);
            }
            r[0] = (r[0] << 1) | ((wide[bit / 32] >> (bit % 32)) & 1);

            // Conditionally subtract the modulus
            let mut sub = [0u32; NLIMBS + 1];
            let mut borrow: i64 = 0;
            for i in 0..=NLIMBS {
                let v = (r[i] as i64) - (m9[i] as i64) - borrow;
                sub[i] = v as u32;
                borrow = (v >> 32) & 1;
            }
            let keep_sub = Choice::from((borrow ^ 1) as u8);
            for i in 0..=NLIMBS {
                r[i] = u32::conditional_select(&r[i], &sub[i], keep_sub);
            }
        }

        let mut out = [0u32; NLIMBS];
        out.copy_from_slice(&r[..NLIMBS]);
        FieldElement(out)
    }
}
