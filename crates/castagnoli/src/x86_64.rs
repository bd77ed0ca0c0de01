//! x86_64 hardware CRC-32C engine (SSE4.2 `crc32` instruction).
//!
//! # Safety
//!
//! Uses `unsafe` for x86 intrinsics. [`Sse42`] is a capability token: it can
//! only be obtained once SSE4.2 is known to be available, which is what makes
//! its safe methods sound.
#![allow(unsafe_code)]

use core::arch::x86_64::{_mm_crc32_u8, _mm_crc32_u64};

use platform::caps::x86;

use crate::engine::{self, Backend, Interleave};

/// SSE4.2 `crc32` backend.
#[derive(Clone, Copy, Debug)]
pub struct Sse42(());

impl Sse42 {
  /// Returns the backend if the CPU supports SSE4.2.
  #[inline]
  #[must_use]
  pub fn detect() -> Option<Self> {
    if platform::caps().has(x86::CRC32C_READY) {
      Some(Self(()))
    } else {
      None
    }
  }
}

impl Backend for Sse42 {
  const NAME: &'static str = "x86_64/sse42";

  #[inline(always)]
  fn advance_byte(self, crc: u32, byte: u8) -> u32 {
    // SAFETY: an `Sse42` value only exists after SSE4.2 was detected.
    unsafe { _mm_crc32_u8(crc, byte) }
  }

  #[inline(always)]
  fn advance_word(self, crc: u32, word: u64) -> u32 {
    // SAFETY: an `Sse42` value only exists after SSE4.2 was detected.
    unsafe { _mm_crc32_u64(u64::from(crc), word) as u32 }
  }
}

/// Driver compiled with SSE4.2 enabled so the intrinsics inline into the loop.
#[inline]
#[target_feature(enable = "sse4.2")]
fn update_sse42(backend: Sse42, crc: u32, data: &[u8], widest: Interleave) -> u32 {
  engine::update(backend, crc, data, widest)
}

/// Update the raw register with the hardware engine, up to tier `widest`.
#[inline]
#[must_use]
pub fn update(backend: Sse42, crc: u32, data: &[u8], widest: Interleave) -> u32 {
  // SAFETY: holding `backend` proves SSE4.2 is available.
  unsafe { update_sse42(backend, crc, data, widest) }
}

/// Dispatch kernel: hardware engine, all interleave tiers.
///
/// Only bound by the dispatcher after SSE4.2 detection succeeded.
pub fn kernel(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: the dispatcher selects this kernel only when `caps` has SSE4.2,
  // and detection results never change for the life of the process.
  unsafe { update_sse42(Sse42(()), crc, data, Interleave::Long) }
}
