//! aarch64 hardware CRC-32C engine (ARMv8 CRC extension, `crc32c*`).
//!
//! # Safety
//!
//! Uses `unsafe` for ARM intrinsics. [`Crc`] is a capability token: it can
//! only be obtained once the CRC extension is known to be available.
#![allow(unsafe_code)]

use core::arch::aarch64::{__crc32cb, __crc32cd};

use platform::caps::aarch64;

use crate::engine::{self, Backend, Interleave};

/// ARMv8 CRC extension backend.
#[derive(Clone, Copy, Debug)]
pub struct Crc(());

impl Crc {
  /// Returns the backend if the CPU supports the CRC extension.
  #[inline]
  #[must_use]
  pub fn detect() -> Option<Self> {
    if platform::caps().has(aarch64::CRC_READY) {
      Some(Self(()))
    } else {
      None
    }
  }
}

impl Backend for Crc {
  const NAME: &'static str = "aarch64/crc";

  #[inline(always)]
  fn advance_byte(self, crc: u32, byte: u8) -> u32 {
    // SAFETY: a `Crc` value only exists after the CRC extension was detected.
    unsafe { __crc32cb(crc, byte) }
  }

  #[inline(always)]
  fn advance_word(self, crc: u32, word: u64) -> u32 {
    // SAFETY: a `Crc` value only exists after the CRC extension was detected.
    unsafe { __crc32cd(crc, word) }
  }
}

#[inline]
#[target_feature(enable = "crc")]
fn update_crc(backend: Crc, crc: u32, data: &[u8], widest: Interleave) -> u32 {
  engine::update(backend, crc, data, widest)
}

/// Update the raw register with the hardware engine, up to tier `widest`.
#[inline]
#[must_use]
pub fn update(backend: Crc, crc: u32, data: &[u8], widest: Interleave) -> u32 {
  // SAFETY: holding `backend` proves the CRC extension is available.
  unsafe { update_crc(backend, crc, data, widest) }
}

/// Dispatch kernel: hardware engine, all interleave tiers.
pub fn kernel(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: the dispatcher selects this kernel only when `caps` has CRC.
  unsafe { update_crc(Crc(()), crc, data, Interleave::Long) }
}
