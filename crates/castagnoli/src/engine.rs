//! Engine driver shared by the software and hardware CRC-32C paths.
//!
//! A [`Backend`] supplies the per-unit register update (one byte, or one
//! little-endian 64-bit word). Everything else lives here and is identical for
//! every backend: the alignment prologue, the three-way interleaved bulk loop,
//! lane recombination through the zero-shift tables, and the tail epilogue.
//! Software and hardware results are therefore bit-identical.
//!
//! # Interleaving
//!
//! ```text
//!   group of 3·B bytes:  [  lane 0  |  lane 1  |  lane 2  ]
//!                           crc0       crc1=0     crc2=0
//!   after B bytes:  crc0 = shift_B(crc0) ^ crc1
//!                   crc0 = shift_B(crc0) ^ crc2
//! ```
//!
//! The three lanes have no data dependency on each other, so a CPU with a
//! three-cycle `crc32` latency and one-per-cycle throughput keeps its unit busy.

use crate::tables::{LONG_BLOCK, LONG_SHIFT, SHORT_BLOCK, SHORT_SHIFT, ShiftTable};

/// Per-unit CRC-32C register update.
///
/// Both methods operate on the raw (complemented) register.
pub trait Backend: Copy {
  /// Kernel name reported by introspection.
  const NAME: &'static str;

  /// Fold one byte into the register.
  fn advance_byte(self, crc: u32, byte: u8) -> u32;

  /// Fold one little-endian 64-bit word into the register.
  fn advance_word(self, crc: u32, word: u64) -> u32;
}

/// Widest interleave tier an engine may use.
///
/// Every tier falls back to the narrower ones for whatever it leaves over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interleave {
  /// Single lane only.
  Off,
  /// Three lanes of [`SHORT_BLOCK`] bytes, then single lane.
  Short,
  /// Three lanes of [`LONG_BLOCK`] bytes, then short, then single lane.
  #[default]
  Long,
}

impl Interleave {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Off => "single",
      Self::Short => "3way-256",
      Self::Long => "3way-8192",
    }
  }
}

/// Update the raw register `crc` with `data`.
///
/// Phases, in order:
/// 1. bytes until the read position is 8-byte aligned
/// 2. three-way groups of `3 * LONG_BLOCK`, then `3 * SHORT_BLOCK` (per `widest`)
/// 3. remaining whole words
/// 4. remaining bytes
#[inline(always)]
pub fn update<B: Backend>(backend: B, mut crc: u32, data: &[u8], widest: Interleave) -> u32 {
  let prologue = data.as_ptr().align_offset(8).min(data.len());
  let (head, mut rest) = data.split_at(prologue);
  for &byte in head {
    crc = backend.advance_byte(crc, byte);
  }

  if widest >= Interleave::Long {
    (crc, rest) = interleave3(backend, crc, rest, LONG_BLOCK, &LONG_SHIFT.0);
  }
  if widest >= Interleave::Short {
    (crc, rest) = interleave3(backend, crc, rest, SHORT_BLOCK, &SHORT_SHIFT.0);
  }

  let (words, tail) = rest.as_chunks::<8>();
  for word in words {
    crc = backend.advance_word(crc, u64::from_le_bytes(*word));
  }
  for &byte in tail {
    crc = backend.advance_byte(crc, byte);
  }

  crc
}

/// Consume as many `3 * block` groups as `data` holds; return the register and
/// the unconsumed remainder.
///
/// `block` must be a multiple of 8 and `shift` must shift by `block` zeros.
#[inline(always)]
fn interleave3<'a, B: Backend>(
  backend: B,
  mut crc0: u32,
  mut data: &'a [u8],
  block: usize,
  shift: &ShiftTable,
) -> (u32, &'a [u8]) {
  debug_assert!(block.is_multiple_of(8));

  while let Some((group, rest)) = data.split_at_checked(3 * block) {
    let (lane0, lanes12) = group.split_at(block);
    let (lane1, lane2) = lanes12.split_at(block);
    let (lane0, _) = lane0.as_chunks::<8>();
    let (lane1, _) = lane1.as_chunks::<8>();
    let (lane2, _) = lane2.as_chunks::<8>();

    let mut crc1 = 0u32;
    let mut crc2 = 0u32;
    for ((w0, w1), w2) in lane0.iter().zip(lane1).zip(lane2) {
      crc0 = backend.advance_word(crc0, u64::from_le_bytes(*w0));
      crc1 = backend.advance_word(crc1, u64::from_le_bytes(*w1));
      crc2 = backend.advance_word(crc2, u64::from_le_bytes(*w2));
    }

    crc0 = shift.apply(crc0) ^ crc1;
    crc0 = shift.apply(crc0) ^ crc2;
    data = rest;
  }

  (crc0, data)
}
