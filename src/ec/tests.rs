use super::field::FieldElement;
use super::point::Point;
use super::scalar::Scalar;
use super::{generate_keypair, scalar_mult_base_g};
use crate::params::SM2_P256V1;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn small_scalar(v: u8) -> [u8; 32] {
    let mut k = [0u8; 32];
    k[31] = v;
    k
}

#[test]
fn field_add_sub_roundtrip() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    let a = FieldElement::from_u32(1234567);
    let b = FieldElement::from_u32(7654321);
    let sum = a.add_mod(&b, &p);
    assert_eq!(sum.sub_mod(&b, &p), a);
    assert_eq!(sum.sub_mod(&a, &p), b);
}

#[test]
fn field_sub_wraps_below_zero() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    let one = FieldElement::one();
    let two = FieldElement::from_u32(2);
    // 1 - 2 = p - 1
    let wrapped = one.sub_mod(&two, &p);
    assert_eq!(wrapped.add_mod(&one, &p), FieldElement::zero());
}

#[test]
fn field_mul_small_values() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    let a = FieldElement::from_u32(0xFFFF_FFFF);
    let b = FieldElement::from_u32(0xFFFF_FFFF);
    let prod = a.mul_mod(&b, &p);
    // 0xFFFFFFFF^2 = 0xFFFFFFFE00000001, well below p
    let mut expected = [0u8; 32];
    expected[24..].copy_from_slice(&0xFFFF_FFFE_0000_0001u64.to_be_bytes());
    assert_eq!(prod.to_bytes(), expected);
}

#[test]
fn field_mul_generic_modulus() {
    // 7 * 8 mod 13 = 4
    let m = FieldElement::from_u32(13);
    let prod = FieldElement::from_u32(7).mul_mod(&FieldElement::from_u32(8), &m);
    assert_eq!(prod, FieldElement::from_u32(4));
}

#[test]
fn field_inversion_roundtrip() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    let a = FieldElement::from_bytes_raw(&SM2_P256V1.g_x);
    let inv = a.invert_mod(&p).unwrap();
    assert_eq!(a.mul_mod(&inv, &p), FieldElement::one());
}

#[test]
fn field_inversion_of_zero_fails() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    assert!(FieldElement::zero().invert_mod(&p).is_err());
}

#[test]
fn field_inversion_detects_common_factor() {
    // gcd(3, 9) = 3, so no inverse exists
    let m = FieldElement::from_u32(9);
    assert!(FieldElement::from_u32(3).invert_mod(&m).is_err());
    // gcd(2, 9) = 1: 2 * 5 = 10 ≡ 1 (mod 9)
    let inv = FieldElement::from_u32(2).invert_mod(&m).unwrap();
    assert_eq!(inv, FieldElement::from_u32(5));
}

#[test]
fn field_from_bytes_rejects_modulus() {
    let p = FieldElement::from_bytes_raw(&SM2_P256V1.p);
    assert!(FieldElement::from_bytes(&SM2_P256V1.p, &p).is_err());
    assert!(FieldElement::from_bytes(&SM2_P256V1.g_x, &p).is_ok());
}

#[test]
fn field_ct_compare() {
    let a = FieldElement::from_u32(5);
    let b = FieldElement::from_u32(6);
    assert!(bool::from(a.ct_lt(&b)));
    assert!(!bool::from(b.ct_lt(&a)));
    assert!(!bool::from(a.ct_lt(&a)));
    assert!(bool::from(a.ct_eq(&a)));
    assert!(!bool::from(a.ct_eq(&b)));
}

#[test]
fn generator_is_on_curve() {
    // Constructor validates the curve equation
    let g = Point::new(&SM2_P256V1.g_x, &SM2_P256V1.g_y).unwrap();
    assert!(!bool::from(g.is_identity()));
    assert_eq!(g.x_bytes(), SM2_P256V1.g_x);
}

#[test]
fn off_curve_point_rejected() {
    let mut bad_y = SM2_P256V1.g_y;
    bad_y[31] ^= 1;
    assert!(Point::new(&SM2_P256V1.g_x, &bad_y).is_err());
}

#[test]
fn identity_absorbs_in_addition() {
    let g = Point::generator();
    let id = Point::identity();
    assert!(bool::from(g.add(&id).unwrap().ct_eq(&g)));
    assert!(bool::from(id.add(&g).unwrap().ct_eq(&g)));
    assert!(bool::from(id.add(&id).unwrap().is_identity()));
}

#[test]
fn point_plus_negation_is_identity() {
    let g = Point::generator();
    let sum = g.add(&g.negate()).unwrap();
    assert!(bool::from(sum.is_identity()));
}

#[test]
fn doubling_matches_addition_chain() {
    let g = Point::generator();
    let two_g = g.double().unwrap();
    let three_g = two_g.add(&g).unwrap();

    assert!(bool::from(g.mul(&small_scalar(2)).unwrap().ct_eq(&two_g)));
    assert!(bool::from(g.mul(&small_scalar(3)).unwrap().ct_eq(&three_g)));
}

#[test]
fn scalar_mult_by_zero_is_identity() {
    let g = Point::generator();
    let result = g.mul(&[0u8; 32]).unwrap();
    assert!(bool::from(result.is_identity()));
}

#[test]
fn scalar_mult_by_group_order_is_identity() {
    let g = Point::generator();
    let result = g.mul(&SM2_P256V1.n).unwrap();
    assert!(bool::from(result.is_identity()));
}

#[test]
fn ladder_agrees_with_double_and_add() {
    let g = Point::generator();
    let mut k = [0u8; 32];
    k[0] = 0x11;
    k[15] = 0xA5;
    k[31] = 0x73;
    let a = g.mul(&k).unwrap();
    let b = g.mul_ladder(&k).unwrap();
    assert!(bool::from(a.ct_eq(&b)));
}

#[test]
fn serialization_roundtrip() {
    let g = Point::generator();
    let encoded = g.serialize_uncompressed();
    assert_eq!(encoded[0], 0x04);

    let decoded = Point::deserialize_uncompressed(&encoded).unwrap();
    assert!(bool::from(decoded.ct_eq(&g)));

    // Raw 64-byte form without the prefix is also accepted
    let decoded_raw = Point::deserialize_uncompressed(&encoded[1..]).unwrap();
    assert!(bool::from(decoded_raw.ct_eq(&g)));
}

#[test]
fn identity_serialization_roundtrip() {
    let encoded = Point::identity().serialize_uncompressed();
    assert_eq!(encoded, [0u8; 65]);
    let decoded = Point::deserialize_uncompressed(&encoded).unwrap();
    assert!(bool::from(decoded.is_identity()));
}

#[test]
fn deserialize_rejects_bad_input() {
    assert!(Point::deserialize_uncompressed(&[0x04; 12]).is_err());

    let mut tampered = Point::generator().serialize_uncompressed();
    tampered[0] = 0x05;
    assert!(Point::deserialize_uncompressed(&tampered).is_err());

    tampered[0] = 0x04;
    tampered[40] ^= 0xFF;
    assert!(Point::deserialize_uncompressed(&tampered).is_err());
}

#[test]
fn scalar_rejects_out_of_range() {
    assert!(Scalar::new([0u8; 32]).is_err());
    assert!(Scalar::new(SM2_P256V1.n).is_err());
    assert!(Scalar::new(small_scalar(1)).is_ok());
}

#[test]
fn scalar_arithmetic() {
    let a = Scalar::new(small_scalar(200)).unwrap();
    let b = Scalar::new(small_scalar(45)).unwrap();
    assert_eq!(a.add_mod_n(&b).to_bytes(), small_scalar(245));
    assert_eq!(a.sub_mod_n(&b).to_bytes(), small_scalar(155));
    assert_eq!(
        a.mul_mod_n(&b.invert_mod_n().unwrap()).mul_mod_n(&b).to_bytes(),
        a.to_bytes()
    );
}

#[test]
fn keypair_generation() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (d, public) = generate_keypair(&mut rng).unwrap();
    assert!(!bool::from(d.is_zero()));
    assert!(!bool::from(public.is_identity()));

    let recomputed = scalar_mult_base_g(&d).unwrap();
    assert!(bool::from(recomputed.ct_eq(&public)));
}
