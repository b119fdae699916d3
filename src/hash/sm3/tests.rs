use super::*;
use crate::hash::HashFunction;

#[test]
fn test_sm3_abc() {
    // GB/T 32905 appendix A vector: "abc"
    let expected = "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0";

    let hash = Sm3::digest(b"abc").unwrap();
    assert_eq!(hex::encode(hash.as_ref()), expected);
}

#[test]
fn test_sm3_empty() {
    let expected = "1ab21d8355cfa17f8e61194831e81a8f22bea49308be0c2ef1b0433ff1811ad6";

    let hash = Sm3::digest(&[]).unwrap();
    assert_eq!(hex::encode(hash.as_ref()), expected);
}

#[test]
fn test_sm3_two_blocks() {
    // GB/T 32905 appendix A vector: "abcd" repeated 16 times (512 bits)
    let expected = "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732";

    let input = b"abcd".repeat(16);
    let hash = Sm3::digest(&input).unwrap();
    assert_eq!(hex::encode(hash.as_ref()), expected);
}

#[test]
fn test_sm3_streaming_matches_one_shot() {
    let input = b"abcd".repeat(16);
    let one_shot = Sm3::digest(&input).unwrap();

    let mut hasher = Sm3::new();
    hasher.update(&input[..7]).unwrap();
    hasher.update(&input[7..40]).unwrap();
    hasher.update(&input[40..]).unwrap();
    let streamed = hasher.finalize().unwrap();

    assert_eq!(one_shot, streamed);
}

#[test]
fn test_sm3_padding_boundary() {
    // 55, 56 and 64 byte inputs exercise each padding branch
    for len in [55usize, 56, 63, 64, 65] {
        let input = vec![0x61u8; len];
        let mut hasher = Sm3::new();
        hasher.update(&input).unwrap();
        let streamed = hasher.finalize().unwrap();
        assert_eq!(streamed, Sm3::digest(&input).unwrap(), "length {}", len);
    }
}

#[test]
fn test_sm3_metadata() {
    assert_eq!(Sm3::output_size(), 32);
    assert_eq!(Sm3::block_size(), 64);
    assert_eq!(Sm3::name(), "SM3");
}

#[test]
fn test_sm3_reusable_after_finalize() {
    let mut hasher = Sm3::new();
    hasher.update(b"abc").unwrap();
    let first = hasher.finalize().unwrap();

    hasher.update(b"abc").unwrap();
    let second = hasher.finalize().unwrap();

    assert_eq!(first, second);
}
