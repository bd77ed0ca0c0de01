//! Direct access to every CRC-32C engine and interleave tier.
//!
//! These bypass the dispatcher so tests and fuzzers can compare engines
//! against each other. All functions use the same convention as
//! [`crc32c`](crate::crc32c): pass `0` (or a previous result) as `initial`.

use crate::engine::Interleave;
use crate::{portable, tables::CRC32C_POLY};

/// Table-driven software engine, restricted to tiers up to `widest`.
#[inline]
#[must_use]
pub fn portable(data: &[u8], initial: u32, widest: Interleave) -> u32 {
  !portable::update(!initial, data, widest)
}

/// Hardware engine, restricted to tiers up to `widest`.
///
/// Returns `None` when this CPU (or target) has no CRC-32C instruction.
#[inline]
#[must_use]
#[allow(unused_variables)]
pub fn hardware(data: &[u8], initial: u32, widest: Interleave) -> Option<u32> {
  #[cfg(target_arch = "x86_64")]
  {
    crate::x86_64::Sse42::detect().map(|hw| !crate::x86_64::update(hw, !initial, data, widest))
  }
  #[cfg(target_arch = "aarch64")]
  {
    crate::aarch64::Crc::detect().map(|hw| !crate::aarch64::update(hw, !initial, data, widest))
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    None
  }
}

/// Name of the hardware kernel, if this CPU can run one.
#[must_use]
pub fn hardware_name() -> Option<&'static str> {
  #[cfg(target_arch = "x86_64")]
  {
    crate::x86_64::Sse42::detect().map(|_| <crate::x86_64::Sse42 as crate::engine::Backend>::NAME)
  }
  #[cfg(target_arch = "aarch64")]
  {
    crate::aarch64::Crc::detect().map(|_| <crate::aarch64::Crc as crate::engine::Backend>::NAME)
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    None
  }
}

/// Bit-at-a-time reference. Slow; shares no tables with the engines.
#[must_use]
pub fn bitwise(data: &[u8], initial: u32) -> u32 {
  let mut crc = !initial;
  for &byte in data {
    crc ^= u32::from(byte);
    for _ in 0..8 {
      crc = (crc >> 1) ^ (CRC32C_POLY & 0u32.wrapping_sub(crc & 1));
    }
  }
  !crc
}
