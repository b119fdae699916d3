//! Elliptic curve operations for the SM2 recommended curve
//!
//! Affine point arithmetic, scalar arithmetic modulo the group order, and
//! keypair generation over sm2p256v1 (GB/T 32918.5).

pub mod field;
pub mod point;
pub mod scalar;

#[cfg(test)]
mod tests;

pub use field::FieldElement;
pub use point::Point;
pub use scalar::Scalar;

use crate::error::Result;
use rand::{CryptoRng, RngCore};

/// The base point G of the recommended curve
pub fn base_point_g() -> Point {
    Point::generator()
}

/// Scalar multiplication: k·P
pub fn scalar_mult(k: &Scalar, point: &Point) -> Result<Point> {
    point.mul(&k.to_bytes())
}

/// Scalar multiplication of the base point: k·G
pub fn scalar_mult_base_g(k: &Scalar) -> Result<Point> {
    Point::generator().mul(&k.to_bytes())
}

/// Generate an SM2 keypair: d ∈ [1, n-1] by rejection, public = d·G
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Scalar, Point)> {
    let d = Scalar::random(rng)?;
    let public = scalar_mult_base_g(&d)?;
    Ok((d, public))
}
