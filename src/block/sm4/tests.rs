use super::*;
use crate::block::{BlockCipher, CipherAlgorithm};

// GB/T 32907 appendix A.1
const KEY: [u8; 16] = [
    0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32, 0x10,
];

#[test]
fn test_sm4_standard_vector() {
    let expected = "681edf34d206965e86b3e94f536e4246";

    let cipher = Sm4::new(&KEY).unwrap();
    let mut block = KEY;
    cipher.encrypt_block(&mut block).unwrap();
    assert_eq!(hex::encode(block), expected);
}

#[test]
fn test_sm4_decrypt_inverts_encrypt() {
    let cipher = Sm4::new(&KEY).unwrap();
    let plaintext = *b"0123456789abcdef";

    let mut block = plaintext;
    cipher.encrypt_block(&mut block).unwrap();
    assert_ne!(block, plaintext);

    cipher.decrypt_block(&mut block).unwrap();
    assert_eq!(block, plaintext);
}

#[test]
fn test_sm4_rejects_bad_key_length() {
    assert!(Sm4::new(&KEY[..15]).is_err());
    assert!(Sm4::new(&[0u8; 32]).is_err());
}

#[test]
fn test_sm4_rejects_bad_block_length() {
    let cipher = Sm4::new(&KEY).unwrap();
    let mut short = [0u8; 15];
    assert!(cipher.encrypt_block(&mut short).is_err());
    assert!(cipher.decrypt_block(&mut short).is_err());
}

#[test]
fn test_sm4_metadata() {
    assert_eq!(Sm4::KEY_SIZE, 16);
    assert_eq!(Sm4::BLOCK_SIZE, 16);
    assert_eq!(Sm4::name(), "SM4");
}

#[test]
fn test_sm4_cbc_regression_vector() {
    // Interop vector: ASCII key and IV, UTF-8 plaintext, PKCS#7 padding
    let cipher = Sm4Cipher::new(b"0123456789abcdef", "cbc", Some(b"1234567887654321")).unwrap();
    let plaintext = "我爱你ILOVEYOU!".as_bytes();

    let ciphertext = cipher.encrypt(plaintext).unwrap();
    assert_eq!(
        hex::encode(&ciphertext),
        "1e1ea8358ccf811fb9c67964b67a8e11ff2b7b0fa928fc69f70d46098a10bab7"
    );

    let decrypted = cipher.decrypt(&ciphertext).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn test_sm4_cipher_roundtrip_all_modes() {
    let iv = b"1234567887654321";
    let plaintext = b"The quick brown fox jumps over the lazy dog";

    for mode in ["ecb", "cbc", "cfb", "ofb", "ctr"] {
        let iv_arg = if mode == "ecb" {
            None
        } else {
            Some(iv.as_slice())
        };
        let cipher = Sm4Cipher::new(b"0123456789abcdef", mode, iv_arg).unwrap();
        let ciphertext = cipher.encrypt(plaintext).unwrap();
        assert_ne!(&ciphertext[..], &plaintext[..], "mode {}", mode);

        let decrypted = cipher.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted, plaintext, "mode {}", mode);
    }
}

#[test]
fn test_sm4_cipher_mode_names_case_insensitive() {
    assert!(Sm4Cipher::new(b"0123456789abcdef", "CBC", Some(b"1234567887654321")).is_ok());
    assert!(Sm4Cipher::new(b"0123456789abcdef", "Ctr", Some(b"1234567887654321")).is_ok());
}

#[test]
fn test_sm4_cipher_rejects_unknown_mode() {
    let result = Sm4Cipher::new(b"0123456789abcdef", "gcm", Some(b"1234567887654321"));
    assert!(matches!(result, Err(Error::UnsupportedMode { .. })));
}

#[test]
fn test_sm4_cipher_iv_handling() {
    // ECB takes no IV
    assert!(Sm4Cipher::new(b"0123456789abcdef", "ecb", Some(b"1234567887654321")).is_err());
    assert!(Sm4Cipher::new(b"0123456789abcdef", "ecb", None).is_ok());

    // Chained and streaming modes require a 16-byte IV
    assert!(Sm4Cipher::new(b"0123456789abcdef", "cbc", None).is_err());
    assert!(Sm4Cipher::new(b"0123456789abcdef", "cbc", Some(b"short")).is_err());
}

#[test]
fn test_sm4_cipher_padded_modes_handle_aligned_input() {
    // A block-aligned message still gains a full padding block
    let cipher = Sm4Cipher::new(b"0123456789abcdef", "ecb", None).unwrap();
    let plaintext = [0x42u8; 32];

    let ciphertext = cipher.encrypt(&plaintext).unwrap();
    assert_eq!(ciphertext.len(), 48);
    assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
}

#[test]
fn test_sm4_cipher_stream_modes_preserve_length() {
    let cipher = Sm4Cipher::new(b"0123456789abcdef", "ctr", Some(b"1234567887654321")).unwrap();
    for len in [0usize, 1, 15, 16, 17, 100] {
        let plaintext = vec![0xA5u8; len];
        let ciphertext = cipher.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len(), len);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_sm4_cipher_invalid_padding_fails() {
    // Craft a ciphertext whose plaintext ends with the pad byte 0x00,
    // which no PKCS#7 message can produce
    let raw = Ecb::new(Sm4::new(b"0123456789abcdef").unwrap());
    let mut block = [0x11u8; 16];
    block[15] = 0x00;
    let ciphertext = raw.encrypt(&block).unwrap();

    let cipher = Sm4Cipher::new(b"0123456789abcdef", "ecb", None).unwrap();
    assert!(matches!(
        cipher.decrypt(&ciphertext),
        Err(Error::Padding { .. })
    ));
}
