//! Lookup tables for CRC-32C, built at compile time.
//!
//! - [`BYTE_TABLE`]: 8×256 slicing-by-8 table for the software engine.
//! - [`SHORT_SHIFT`] / [`LONG_SHIFT`]: 4×256 zero-shift operators used to
//!   recombine the three interleaved lanes after each 256- or 8192-byte block.
//!
//! Every table is a `static` produced by a `const fn`, so it exists before any
//! caller can observe it and is never written afterwards.

// SAFETY: All array indexing in this module uses bounded indices: loop counters
// over 0..256 / 0..8, or values masked with `& 0xFF`.
#![allow(clippy::indexing_slicing)]

use crate::gf2::Gf2Matrix32;

/// CRC-32C polynomial, reflected form (normal form `0x1EDC6F41`).
pub const CRC32C_POLY: u32 = 0x82F6_3B78;

/// Sub-block size of the short three-way interleave.
pub const SHORT_BLOCK: usize = 256;

/// Sub-block size of the long three-way interleave.
pub const LONG_BLOCK: usize = 8192;

/// Force 64-byte (cache line) alignment so a table row never splits a line.
#[derive(Debug)]
#[repr(align(64))]
pub struct Aligned64<T>(pub T);

// ─────────────────────────────────────────────────────────────────────────────
// Byte Table (slicing-by-8)
// ─────────────────────────────────────────────────────────────────────────────

/// `table[k][b]`: contribution of byte `b` sitting `k` positions from the
/// least-significant end of an 8-byte word.
pub type ByteTable = [[u32; 256]; 8];

/// Build the slicing-by-8 table for a reflected polynomial.
///
/// Row 0 is the classical per-byte table; row `k` folds row `k - 1` through
/// row 0 once more.
#[must_use]
pub const fn byte_table(poly: u32) -> ByteTable {
  let mut table = [[0u32; 256]; 8];

  let mut i = 0usize;
  while i < 256 {
    let mut crc = i as u32;
    let mut bit = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      bit += 1;
    }
    table[0][i] = crc;
    i += 1;
  }

  let mut k = 1usize;
  while k < 8 {
    let mut i = 0usize;
    while i < 256 {
      let prev = table[k - 1][i];
      table[k][i] = table[0][(prev & 0xFF) as usize] ^ (prev >> 8);
      i += 1;
    }
    k += 1;
  }

  table
}

pub static BYTE_TABLE: Aligned64<ByteTable> = Aligned64(byte_table(CRC32C_POLY));

// ─────────────────────────────────────────────────────────────────────────────
// Zero-Shift Operators
// ─────────────────────────────────────────────────────────────────────────────

/// Operator that appends `len` zero bytes to a CRC register.
///
/// `len` is rounded down to a power of two; `0` behaves like `1`. Starting from
/// the one-bit operator, two squarings give four zero bits, and each further
/// squaring doubles the run until `len` has been shifted down to zero.
#[must_use]
pub const fn zeros_operator(len: usize) -> Gf2Matrix32 {
  let mut op = Gf2Matrix32::shift1(CRC32C_POLY).square().square();
  let mut len = len;
  loop {
    op = op.square();
    len >>= 1;
    if len == 0 {
      return op;
    }
  }
}

/// Byte-sliced form of a zero-shift operator.
///
/// Shifting a register costs four lookups instead of a 32-row matrix product.
#[derive(Debug)]
pub struct ShiftTable([[u32; 256]; 4]);

impl ShiftTable {
  /// Build the table shifting by `len` zero bytes (see [`zeros_operator`]).
  #[must_use]
  pub const fn new(len: usize) -> Self {
    let op = zeros_operator(len);
    let mut t = [[0u32; 256]; 4];
    let mut n = 0u32;
    while n < 256 {
      t[0][n as usize] = op.times(n);
      t[1][n as usize] = op.times(n << 8);
      t[2][n as usize] = op.times(n << 16);
      t[3][n as usize] = op.times(n << 24);
      n += 1;
    }
    Self(t)
  }

  /// Advance `crc` as if the table's zero run had been appended.
  #[inline(always)]
  #[must_use]
  pub fn apply(&self, crc: u32) -> u32 {
    self.0[0][(crc & 0xFF) as usize]
      ^ self.0[1][((crc >> 8) & 0xFF) as usize]
      ^ self.0[2][((crc >> 16) & 0xFF) as usize]
      ^ self.0[3][(crc >> 24) as usize]
  }
}

pub static SHORT_SHIFT: Aligned64<ShiftTable> = Aligned64(ShiftTable::new(SHORT_BLOCK));
pub static LONG_SHIFT: Aligned64<ShiftTable> = Aligned64(ShiftTable::new(LONG_BLOCK));

#[cfg(test)]
mod tests {
  use super::*;

  /// Append `n` zero bytes to a register, one byte at a time.
  fn zeros_bytewise(mut crc: u32, n: usize) -> u32 {
    for _ in 0..n {
      crc = BYTE_TABLE.0[0][(crc & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
  }

  #[test]
  fn test_byte_table_known_entries() {
    let t = &BYTE_TABLE.0;
    assert_eq!(t[0][0], 0);
    assert_eq!(t[0][1], 0xF26B_8303);
    assert_eq!(t[0][128], CRC32C_POLY);
    assert_eq!(t[0][255], 0xAD7D_5351);
  }

  #[test]
  fn test_byte_table_rows_fold_row_zero() {
    let t = &BYTE_TABLE.0;
    for k in 1..8 {
      for i in [0usize, 1, 77, 128, 255] {
        let prev = t[k - 1][i];
        assert_eq!(t[k][i], t[0][(prev & 0xFF) as usize] ^ (prev >> 8));
      }
    }
  }

  #[test]
  fn test_zeros_operator_matches_bytewise() {
    for len in [1usize, 2, 4, 8, 64, 256] {
      let op = zeros_operator(len);
      for crc in [1u32, 0xE306_9283, 0xFFFF_FFFF] {
        assert_eq!(op.times(crc), zeros_bytewise(crc, len), "len={len}");
      }
    }
  }

  #[test]
  fn test_zeros_operator_rounds_down_to_power_of_two() {
    assert_eq!(zeros_operator(0), zeros_operator(1));
    assert_eq!(zeros_operator(300), zeros_operator(256));
    assert_eq!(zeros_operator(8191), zeros_operator(4096));
  }

  #[test]
  fn test_shift_tables_match_bytewise() {
    for crc in [0u32, 1, 0x8000_0000, 0x1234_5678, 0xFFFF_FFFF] {
      assert_eq!(SHORT_SHIFT.0.apply(crc), zeros_bytewise(crc, SHORT_BLOCK));
      assert_eq!(LONG_SHIFT.0.apply(crc), zeros_bytewise(crc, LONG_BLOCK));
    }
  }

  #[test]
  fn test_shift_table_is_linear() {
    let (a, b) = (0xDEAD_BEEFu32, 0x0BAD_CAFEu32);
    let shift = &SHORT_SHIFT.0;
    assert_eq!(shift.apply(a ^ b), shift.apply(a) ^ shift.apply(b));
  }
}
