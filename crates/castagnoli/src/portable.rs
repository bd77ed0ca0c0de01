//! Portable CRC-32C engine using slicing-by-8 table lookups.
//!
//! For each 8-byte word:
//! 1. XOR the word with the current register
//! 2. Look up each of the 8 bytes in its own table row
//! 3. XOR the 8 entries together
//!
//! The 8 lookups are independent, so they overlap in the pipeline. This is the
//! reference path every other kernel is checked against.

// SAFETY: Table indices are masked with `& 0xFF` or shifted down to 8 bits.
#![allow(clippy::indexing_slicing)]

use crate::{
  engine::{self, Backend, Interleave},
  tables::{BYTE_TABLE, ByteTable},
};

/// Slicing-by-8 backend.
#[derive(Clone, Copy, Debug)]
pub struct Table(&'static ByteTable);

impl Table {
  #[inline(always)]
  #[must_use]
  pub fn new() -> Self {
    Self(&BYTE_TABLE.0)
  }
}

impl Default for Table {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Backend for Table {
  const NAME: &'static str = "portable/slice8";

  #[inline(always)]
  fn advance_byte(self, crc: u32, byte: u8) -> u32 {
    self.0[0][((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8)
  }

  #[inline(always)]
  fn advance_word(self, crc: u32, word: u64) -> u32 {
    let t = self.0;
    let v = u64::from(crc) ^ word;
    t[7][(v & 0xFF) as usize]
      ^ t[6][((v >> 8) & 0xFF) as usize]
      ^ t[5][((v >> 16) & 0xFF) as usize]
      ^ t[4][((v >> 24) & 0xFF) as usize]
      ^ t[3][((v >> 32) & 0xFF) as usize]
      ^ t[2][((v >> 40) & 0xFF) as usize]
      ^ t[1][((v >> 48) & 0xFF) as usize]
      ^ t[0][(v >> 56) as usize]
  }
}

/// Update the raw register with the software engine, up to tier `widest`.
#[inline]
#[must_use]
pub fn update(crc: u32, data: &[u8], widest: Interleave) -> u32 {
  engine::update(Table::new(), crc, data, widest)
}

/// Dispatch kernel: software engine, all interleave tiers.
pub fn kernel(crc: u32, data: &[u8]) -> u32 {
  update(crc, data, Interleave::Long)
}
