//! CRC-32C property tests: engine agreement and cross-library validation.
//!
//! The `crc32c` crate serves as an independent reference implementation.

// Proptest uses getcwd() which fails under Miri isolation.
#![cfg(not(miri))]

use castagnoli::{
  Crc32c,
  __internal::{self as kernels, Interleave},
  crc32c,
};
use proptest::prelude::*;

fn interleave() -> impl Strategy<Value = Interleave> {
  prop_oneof![Just(Interleave::Off), Just(Interleave::Short), Just(Interleave::Long)]
}

proptest! {
  #[test]
  fn matches_crc32c_crate(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    prop_assert_eq!(crc32c(&data, 0), ::crc32c::crc32c(&data));
  }

  #[test]
  fn chaining_matches_crc32c_append(
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    initial in any::<u32>(),
  ) {
    prop_assert_eq!(crc32c(&data, initial), ::crc32c::crc32c_append(initial, &data));
  }

  #[test]
  fn hardware_matches_software(
    data in proptest::collection::vec(any::<u8>(), 0..=30_000),
    offset in 0usize..8,
    initial in any::<u32>(),
    tier in interleave(),
  ) {
    let data = &data[offset.min(data.len())..];
    if let Some(hw) = kernels::hardware(data, initial, tier) {
      prop_assert_eq!(hw, kernels::portable(data, initial, tier));
    }
  }

  #[test]
  fn tiers_match_single_lane(
    data in proptest::collection::vec(any::<u8>(), 0..=60_000),
    tier in interleave(),
  ) {
    prop_assert_eq!(
      kernels::portable(&data, 0, tier),
      kernels::portable(&data, 0, Interleave::Off)
    );
  }

  #[test]
  fn split_anywhere(data in proptest::collection::vec(any::<u8>(), 0..=4096), split in any::<prop::sample::Index>()) {
    let split = split.index(data.len() + 1);
    let (a, b) = data.split_at(split);
    let whole = crc32c(&data, 0);

    prop_assert_eq!(crc32c(b, crc32c(a, 0)), whole);
    prop_assert_eq!(Crc32c::combine(crc32c(a, 0), crc32c(b, 0), b.len()), whole);

    let mut h = Crc32c::new();
    h.update(a);
    h.update(b);
    prop_assert_eq!(h.finalize(), whole);
  }
}
