//! CPU detection for the castagnoli workspace.
//!
//! This crate is the single source of truth for "can this machine run the
//! hardware CRC-32C instruction?" Algorithm crates query [`caps()`] instead of
//! doing ad-hoc detection.
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::CRC32C_READY) {
//!   // SSE4.2 `crc32` path
//! }
//! println!("{}", platform::describe());
//! ```
//!
//! Detection runs once. With `std` the result lives in a `OnceLock`; without
//! it, in an atomic word. Compile-time target features are always honored, so
//! `-C target-cpu=native` builds see their features even under `no_std`.

#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

use core::fmt;

pub use caps::{Arch, Caps};
pub use detect::{caps, detect_uncached};

/// Human-readable summary of the detected platform.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Description {
  pub arch: Arch,
  pub caps: Caps,
}

/// Describe the current platform (architecture + detected features).
#[inline]
#[must_use]
pub fn describe() -> Description {
  Description {
    arch: Arch::current(),
    caps: caps(),
  }
}

impl fmt::Display for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Caps({}, [", self.arch)?;
    for (i, name) in self.caps.feature_names().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      f.write_str(name)?;
    }
    f.write_str("])")
  }
}

impl fmt::Debug for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::format;

  use super::*;

  #[test]
  fn test_description_format() {
    let desc = Description {
      arch: Arch::X86_64,
      caps: caps::x86::SSE2 | caps::x86::SSE42,
    };
    assert_eq!(format!("{desc}"), "Caps(x86_64, [sse2, sse4.2])");
  }

  #[test]
  fn test_describe_uses_current_arch() {
    assert_eq!(describe().arch, Arch::current());
  }
}
