use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const SECRET_HEX: &str = "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263";

fn fixed_keypair() -> (Sm2PublicKey, Sm2SecretKey) {
    let secret = Sm2SecretKey::from_hex(SECRET_HEX).unwrap();
    let public = secret.public_key().unwrap();
    (public, secret)
}

#[test]
fn test_keypair_generation() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let (public, secret) = Sm2::keypair(&mut rng).unwrap();

    // The public key decodes to a valid curve point and matches d·G
    let point = public.to_point().unwrap();
    assert!(!bool::from(point.is_identity()));
    assert_eq!(secret.public_key().unwrap().0, public.0);
}

#[test]
fn test_sign_and_verify() {
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let (public, secret) = fixed_keypair();
    let message = b"message digest";

    let sig = Sm2::sign(
        message,
        &secret,
        &public,
        None,
        NoncePolicy::Random,
        &mut rng,
    )
    .unwrap();
    assert!(Sm2::verify(message, &sig, &public, None).is_ok());
}

#[test]
fn test_deterministic_signatures_repeat() {
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let (public, secret) = fixed_keypair();
    let message = b"fixed message";

    let first = Sm2::sign(
        message,
        &secret,
        &public,
        None,
        NoncePolicy::Deterministic,
        &mut rng,
    )
    .unwrap();
    let second = Sm2::sign(
        message,
        &secret,
        &public,
        None,
        NoncePolicy::Deterministic,
        &mut rng,
    )
    .unwrap();

    assert_eq!(first, second);
    assert!(Sm2::verify(message, &first, &public, None).is_ok());
}

#[test]
fn test_verify_rejects_tampered_message() {
    let mut rng = ChaCha20Rng::seed_from_u64(14);
    let (public, secret) = fixed_keypair();

    let sig = Sm2::sign(
        b"original",
        &secret,
        &public,
        None,
        NoncePolicy::Deterministic,
        &mut rng,
    )
    .unwrap();
    assert!(matches!(
        Sm2::verify(b"tampered", &sig, &public, None),
        Err(Error::Integrity { .. })
    ));
}

#[test]
fn test_verify_rejects_wrong_user_id() {
    let mut rng = ChaCha20Rng::seed_from_u64(15);
    let (public, secret) = fixed_keypair();
    let message = b"identity bound";

    let sig = Sm2::sign(
        message,
        &secret,
        &public,
        Some(b"alice@example.com"),
        NoncePolicy::Deterministic,
        &mut rng,
    )
    .unwrap();

    assert!(Sm2::verify(message, &sig, &public, Some(b"alice@example.com")).is_ok());
    assert!(Sm2::verify(message, &sig, &public, None).is_err());
}

#[test]
fn test_verify_rejects_out_of_range_components() {
    let (public, _) = fixed_keypair();

    // r = 0 and s = n are both outside [1, n-1]
    let zero = [0u8; SM2_SCALAR_SIZE];
    let one = {
        let mut b = [0u8; SM2_SCALAR_SIZE];
        b[SM2_SCALAR_SIZE - 1] = 1;
        b
    };

    let sig = Sm2Signature::new(zero, one);
    assert!(matches!(
        Sm2::verify(b"m", &sig, &public, None),
        Err(Error::Integrity { .. })
    ));

    let sig = Sm2Signature::new(one, SM2_P256V1.n);
    assert!(matches!(
        Sm2::verify(b"m", &sig, &public, None),
        Err(Error::Integrity { .. })
    ));
}

#[test]
fn test_signature_serialization_roundtrip() {
    let mut r = [0u8; SM2_SCALAR_SIZE];
    let mut s = [0u8; SM2_SCALAR_SIZE];
    r[0] = 0xAB;
    s[31] = 0xCD;

    let sig = Sm2Signature::new(r, s);
    let bytes = sig.to_bytes();
    assert_eq!(bytes.len(), SM2_SIGNATURE_SIZE);
    assert_eq!(Sm2Signature::from_bytes(&bytes).unwrap(), sig);

    assert!(Sm2Signature::from_bytes(&bytes[..63]).is_err());
}

#[test]
fn test_public_key_hex_forms() {
    let (public, _) = fixed_keypair();

    let prefixed = public.to_hex();
    assert_eq!(prefixed.len(), 130);
    assert!(prefixed.starts_with("04"));

    // The raw X || Y form decodes to the same key
    let raw = &prefixed[2..];
    assert_eq!(Sm2PublicKey::from_hex(raw).unwrap().0, public.0);
    assert_eq!(Sm2PublicKey::from_hex(&prefixed).unwrap().0, public.0);

    assert!(Sm2PublicKey::from_hex("not hex").is_err());
    assert!(Sm2PublicKey::from_hex("0411").is_err());
}

#[test]
fn test_secret_key_hex_roundtrip() {
    let secret = Sm2SecretKey::from_hex(SECRET_HEX).unwrap();
    assert_eq!(secret.to_hex(), SECRET_HEX);

    // Zero and the group order are rejected
    let zero = "0".repeat(64);
    assert!(Sm2SecretKey::from_hex(&zero).is_err());
    assert!(Sm2SecretKey::from_hex(&hex::encode(SM2_P256V1.n)).is_err());
}

#[test]
fn test_compute_z_binds_identity() {
    let (public, _) = fixed_keypair();

    let default_z = compute_z(DEFAULT_USER_ID, &public).unwrap();
    let other_z = compute_z(b"someone else", &public).unwrap();
    assert_ne!(default_z, other_z);
}

#[test]
fn test_message_digest_matches_manual_construction() {
    let (public, _) = fixed_keypair();

    let z = compute_z(DEFAULT_USER_ID, &public).unwrap();
    let mut hasher = Sm3::new();
    hasher.update(&z).unwrap();
    hasher.update(b"msg").unwrap();
    let expected = hasher.finalize().unwrap().into_inner();

    assert_eq!(
        message_digest(DEFAULT_USER_ID, &public, b"msg").unwrap(),
        expected
    );
}

#[test]
fn test_compute_z_rejects_oversized_identity() {
    let (public, _) = fixed_keypair();
    let huge = vec![0x41u8; 8192];
    assert!(matches!(
        compute_z(&huge, &public),
        Err(Error::Parameter { .. })
    ));
}
