//! Published CRC-32C test vectors through every public entry point.
//!
//! Vectors from RFC 3720 §B.4 (iSCSI) plus the usual check string.

use castagnoli::{
  Crc32c,
  __internal::{self as kernels, Interleave},
  crc32c,
};

const CHECK_STRING: &[u8] = b"123456789";
const CRC32C_CHECK: u32 = 0xE306_9283;

fn rfc3720_vectors() -> [(Vec<u8>, u32); 4] {
  [
    (vec![0x00; 32], 0x8A91_36AA),
    (vec![0xFF; 32], 0x62A8_AB43),
    ((0u8..32).collect(), 0x46DD_794E),
    ((0u8..32).rev().collect(), 0x113F_DB5C),
  ]
}

#[test]
fn check_string_produces_correct_result() {
  let result = crc32c(CHECK_STRING, 0);
  assert_eq!(
    result, CRC32C_CHECK,
    "CRC-32C mismatch: got {result:#010X}, expected {CRC32C_CHECK:#010X}"
  );
  assert_eq!(Crc32c::checksum(CHECK_STRING), CRC32C_CHECK);
}

#[test]
fn rfc3720_vectors_match() {
  for (data, expected) in rfc3720_vectors() {
    assert_eq!(crc32c(&data, 0), expected, "data={data:02x?}");
    assert_eq!(kernels::bitwise(&data, 0), expected);
    for tier in [Interleave::Off, Interleave::Short, Interleave::Long] {
      assert_eq!(kernels::portable(&data, 0, tier), expected);
      if let Some(hw) = kernels::hardware(&data, 0, tier) {
        assert_eq!(hw, expected);
      }
    }
  }
}

#[test]
fn pangram() {
  assert_eq!(crc32c(b"The quick brown fox jumps over the lazy dog", 0), 0x2262_0404);
}

#[test]
fn empty_buffer_returns_initial() {
  for initial in [0u32, 1, CRC32C_CHECK, u32::MAX] {
    assert_eq!(crc32c(&[], initial), initial);
    assert_eq!(kernels::portable(&[], initial, Interleave::Long), initial);
    assert_eq!(kernels::bitwise(&[], initial), initial);
  }
}

#[test]
fn streaming_matches_oneshot() {
  let mut hasher = Crc32c::new();
  for byte in CHECK_STRING {
    hasher.update(core::slice::from_ref(byte));
  }
  assert_eq!(hasher.finalize(), CRC32C_CHECK);
  // finalize does not consume or disturb the state
  hasher.update(b"");
  assert_eq!(hasher.finalize(), CRC32C_CHECK);
}

#[test]
fn backend_name_is_a_known_kernel() {
  castagnoli::init();
  let name = Crc32c::backend_name();
  assert!(
    ["portable/slice8", "x86_64/sse42", "aarch64/crc"].contains(&name),
    "unexpected kernel {name}"
  );
  assert_eq!(castagnoli::selected().name, name);
}
