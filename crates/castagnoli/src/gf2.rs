//! GF(2) matrix algebra for CRC-32C zero-shift operators.
//!
//! A CRC register update is linear over GF(2), so "append N zero bytes" is a
//! 32×32 binary matrix. Squaring that matrix doubles N; this is how the
//! zero-shift tables and [`combine`](crate::Crc32c::combine) are built.

// SAFETY: All array indexing in this module uses bounded loop indices (0..32).
// Clippy cannot prove this in const fn contexts, but the bounds are statically
// guaranteed by the loop conditions.
#![allow(clippy::indexing_slicing)]

/// A 32×32 GF(2) matrix represented as 32 `u32` rows.
///
/// Row `i` is the image of the unit vector `1 << i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gf2Matrix32([u32; 32]);

impl Gf2Matrix32 {
  /// The identity operator (zero bits shifted).
  #[must_use]
  pub const fn identity() -> Self {
    let mut m = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      m[i] = 1 << i;
      i += 1;
    }
    Self(m)
  }

  /// Operator for one zero bit appended to a reflected CRC register.
  ///
  /// Bit 0 feeds back through `poly`; every other bit moves down by one.
  #[must_use]
  pub const fn shift1(poly: u32) -> Self {
    let mut m = [0u32; 32];
    m[0] = poly;
    let mut row = 1u32;
    let mut i = 1;
    while i < 32 {
      m[i] = row;
      row <<= 1;
      i += 1;
    }
    Self(m)
  }

  /// Apply the operator to `vec`: XOR of the rows selected by its set bits.
  #[inline]
  #[must_use]
  pub const fn times(&self, vec: u32) -> u32 {
    let mut sum = 0u32;
    let mut vec = vec;
    let mut i = 0;
    while vec != 0 {
      if vec & 1 != 0 {
        sum ^= self.0[i];
      }
      vec >>= 1;
      i += 1;
    }
    sum
  }

  /// Operator equivalent to applying `other` first, then `self`.
  #[must_use]
  pub const fn mul(&self, other: &Self) -> Self {
    let mut m = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      m[i] = self.times(other.0[i]);
      i += 1;
    }
    Self(m)
  }

  /// Operator equivalent to applying `self` twice.
  #[inline]
  #[must_use]
  pub const fn square(&self) -> Self {
    self.mul(self)
  }
}
