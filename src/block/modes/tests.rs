use super::padding::{pkcs7_pad, pkcs7_unpad};
use super::{Cbc, Cfb, Ctr, Ecb, ModeId, Ofb};
use crate::block::sm4::Sm4;
use crate::block::BlockCipher;
use crate::types::Nonce;

const KEY: &[u8; 16] = b"0123456789abcdef";
const IV: [u8; 16] = *b"fedcba9876543210";

fn cipher() -> Sm4 {
    Sm4::new(KEY).unwrap()
}

fn iv() -> Nonce<16> {
    Nonce::new(IV)
}

#[test]
fn test_pkcs7_pad_lengths() {
    assert_eq!(pkcs7_pad(b"", 16).len(), 16);
    assert_eq!(pkcs7_pad(&[0u8; 15], 16).len(), 16);
    assert_eq!(pkcs7_pad(&[0u8; 16], 16).len(), 32);

    let padded = pkcs7_pad(b"abc", 16);
    assert_eq!(&padded[3..], &[13u8; 13]);
}

#[test]
fn test_pkcs7_unpad_roundtrip() {
    for len in [0usize, 1, 15, 16, 17, 31] {
        let data = vec![0x7Fu8; len];
        let padded = pkcs7_pad(&data, 16);
        assert_eq!(pkcs7_unpad(&padded, 16).unwrap(), data);
    }
}

#[test]
fn test_pkcs7_unpad_rejects_malformed() {
    // Empty and misaligned input
    assert!(pkcs7_unpad(&[], 16).is_err());
    assert!(pkcs7_unpad(&[1u8; 15], 16).is_err());

    // Pad byte out of range
    let mut block = [0u8; 16];
    assert!(pkcs7_unpad(&block, 16).is_err());
    block[15] = 17;
    assert!(pkcs7_unpad(&block, 16).is_err());

    // Mismatched fill bytes
    let mut block = [3u8; 16];
    block[14] = 2;
    assert!(pkcs7_unpad(&block, 16).is_err());
}

#[test]
fn test_ecb_roundtrip() {
    let mode = Ecb::new(cipher());
    let plaintext = [0x5Au8; 48];
    let ciphertext = mode.encrypt(&plaintext).unwrap();
    assert_eq!(mode.decrypt(&ciphertext).unwrap(), plaintext);

    // Equal plaintext blocks produce equal ciphertext blocks
    assert_eq!(&ciphertext[..16], &ciphertext[16..32]);
}

#[test]
fn test_ecb_rejects_partial_blocks() {
    let mode = Ecb::new(cipher());
    assert!(mode.encrypt(&[0u8; 20]).is_err());
    assert!(mode.decrypt(&[0u8; 20]).is_err());
}

#[test]
fn test_cbc_roundtrip() {
    let mode = Cbc::new(cipher(), &iv()).unwrap();
    let plaintext = [0x5Au8; 48];
    let ciphertext = mode.encrypt(&plaintext).unwrap();
    assert_eq!(mode.decrypt(&ciphertext).unwrap(), plaintext);

    // Chaining hides equal plaintext blocks
    assert_ne!(&ciphertext[..16], &ciphertext[16..32]);
}

#[test]
fn test_cbc_first_block_uses_iv() {
    let mode = Cbc::new(cipher(), &iv()).unwrap();
    let plaintext = [0u8; 16];
    let ciphertext = mode.encrypt(&plaintext).unwrap();

    // With an all-zero plaintext block, the cipher input is the IV itself
    let mut expected = IV;
    cipher().encrypt_block(&mut expected).unwrap();
    assert_eq!(&ciphertext[..], &expected[..]);
}

#[test]
fn test_cbc_rejects_partial_blocks() {
    let mode = Cbc::new(cipher(), &iv()).unwrap();
    assert!(mode.encrypt(&[0u8; 10]).is_err());
    assert!(mode.decrypt(&[0u8; 10]).is_err());
}

#[test]
fn test_cfb_roundtrip_arbitrary_lengths() {
    let mode = Cfb::new(cipher(), &iv()).unwrap();
    for len in [1usize, 15, 16, 17, 33, 64] {
        let plaintext = vec![0xC3u8; len];
        let ciphertext = mode.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len(), len);
        assert_eq!(mode.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_cfb_first_block_keystream() {
    let mode = Cfb::new(cipher(), &iv()).unwrap();
    let plaintext = [0u8; 16];
    let ciphertext = mode.encrypt(&plaintext).unwrap();

    // First keystream block is E(IV)
    let mut expected = IV;
    cipher().encrypt_block(&mut expected).unwrap();
    assert_eq!(&ciphertext[..], &expected[..]);
}

#[test]
fn test_ofb_roundtrip_arbitrary_lengths() {
    let mode = Ofb::new(cipher(), &iv()).unwrap();
    for len in [1usize, 15, 16, 17, 33, 64] {
        let plaintext = vec![0xC3u8; len];
        let ciphertext = mode.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len(), len);
        assert_eq!(mode.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_ofb_keystream_is_message_independent() {
    let mode = Ofb::new(cipher(), &iv()).unwrap();
    let zeros = mode.encrypt(&[0u8; 32]).unwrap();
    let ones = mode.encrypt(&[0xFFu8; 32]).unwrap();

    // c_zero ^ c_one == p_zero ^ p_one for a common keystream
    for i in 0..32 {
        assert_eq!(zeros[i] ^ ones[i], 0xFF);
    }
}

#[test]
fn test_ctr_roundtrip_arbitrary_lengths() {
    let mode = Ctr::new(cipher(), &iv()).unwrap();
    for len in [1usize, 15, 16, 17, 33, 64] {
        let plaintext = vec![0xC3u8; len];
        let ciphertext = mode.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len(), len);
        assert_eq!(mode.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_ctr_counter_increments_big_endian() {
    let mode = Ctr::new(cipher(), &iv()).unwrap();
    let ciphertext = mode.encrypt(&[0u8; 32]).unwrap();

    // Second keystream block is E(IV + 1)
    let mut counter = IV;
    counter[15] = counter[15].wrapping_add(1);
    cipher().encrypt_block(&mut counter).unwrap();
    assert_eq!(&ciphertext[16..], &counter[..]);
}

#[test]
fn test_ctr_counter_wraps_around() {
    let top = Nonce::new([0xFFu8; 16]);
    let mode = Ctr::new(cipher(), &top).unwrap();
    let ciphertext = mode.encrypt(&[0u8; 32]).unwrap();

    // After the all-ones block the counter wraps to zero
    let mut wrapped = [0u8; 16];
    cipher().encrypt_block(&mut wrapped).unwrap();
    assert_eq!(&ciphertext[16..], &wrapped[..]);
}

#[test]
fn test_iv_length_validation() {
    let short = Nonce::new([0u8; 8]);
    assert!(Cbc::new(cipher(), &short).is_err());
    assert!(Cfb::new(cipher(), &short).is_err());
    assert!(Ofb::new(cipher(), &short).is_err());
    assert!(Ctr::new(cipher(), &short).is_err());
}

#[test]
fn test_mode_id_parsing() {
    assert_eq!("ecb".parse::<ModeId>().unwrap(), ModeId::Ecb);
    assert_eq!("CBC".parse::<ModeId>().unwrap(), ModeId::Cbc);
    assert_eq!("Cfb".parse::<ModeId>().unwrap(), ModeId::Cfb);
    assert_eq!("OFB".parse::<ModeId>().unwrap(), ModeId::Ofb);
    assert_eq!("ctr".parse::<ModeId>().unwrap(), ModeId::Ctr);
    assert!("xts".parse::<ModeId>().is_err());
}
