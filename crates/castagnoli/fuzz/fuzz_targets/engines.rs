//! Every engine and tier must agree, from any seed and starting offset.

#![no_main]

use castagnoli::__internal::{self as kernels, Interleave};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u32, u8, Vec<u8>)| {
  let (initial, offset, data) = input;
  let data = &data[(offset as usize % 8).min(data.len())..];

  let single = kernels::portable(data, initial, Interleave::Off);
  for tier in [Interleave::Short, Interleave::Long] {
    assert_eq!(kernels::portable(data, initial, tier), single, "tier={}", tier.as_str());
  }
  for tier in [Interleave::Off, Interleave::Short, Interleave::Long] {
    if let Some(hw) = kernels::hardware(data, initial, tier) {
      assert_eq!(hw, single, "hardware tier={}", tier.as_str());
    }
  }
  if data.len() <= 4096 {
    assert_eq!(kernels::bitwise(data, initial), single);
  }
});
