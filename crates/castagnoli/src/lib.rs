//! CRC-32C (Castagnoli) with hardware acceleration.
//!
//! One polynomial, one input model: a contiguous byte buffer plus an optional
//! running CRC. The fastest engine the CPU supports is picked on first use and
//! cached for the life of the process.
//!
//! # Engines
//!
//! | Engine | Kernel | Per-unit step |
//! |--------|--------|---------------|
//! | Software | `portable/slice8` | 8 table lookups per 64-bit word |
//! | Hardware | `x86_64/sse42` | SSE4.2 `crc32` |
//! | Hardware | `aarch64/crc` | ARMv8 `crc32cx` |
//!
//! Both engines share one driver: an alignment prologue, three-way
//! interleaved lanes over 8 KiB and then 256-byte blocks (recombined with
//! precomputed zero-shift tables), a single-lane word loop, and a byte tail.
//! Their results are bit-identical for every input.
//!
//! # Example
//!
//! ```rust
//! use castagnoli::{Crc32c, crc32c};
//!
//! // One-shot
//! let crc = crc32c(b"123456789", 0);
//! assert_eq!(crc, 0xE306_9283);
//!
//! // Chained
//! assert_eq!(crc32c(b"56789", crc32c(b"1234", 0)), crc);
//!
//! // Streaming
//! let mut hasher = Crc32c::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), crc);
//!
//! // Combine independently computed parts
//! let combined = Crc32c::combine(crc32c(b"1234", 0), crc32c(b"56789", 0), 5);
//! assert_eq!(combined, crc);
//! ```
//!
//! # Selection
//!
//! The hardware engine is bound whenever the CPU has the instruction (SSE4.2
//! on x86_64, the CRC extension on aarch64); otherwise the software engine is.
//! Selection happens exactly once and has no other inputs. [`selected`] and
//! [`Crc32c::backend_name`] report the result.
//!
//! # no_std Support
//!
//! ```toml
//! [dependencies]
//! castagnoli = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std`, only compile-time target features enable the hardware
//! engine.

#![no_std]
#![deny(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]

#[cfg(test)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod crc;
mod dispatch;
mod engine;
mod gf2;
mod kernels;
mod portable;
mod tables;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

pub use crc::{Crc32c, crc32c, init, selected};
pub use dispatch::{Crc32cFn, Engine, Selected};

/// Direct engine access for differential tests and fuzzing. Not a stable API.
#[doc(hidden)]
pub mod __internal {
  pub use crate::{
    engine::Interleave,
    kernels::{bitwise, hardware, hardware_name, portable},
  };
}
