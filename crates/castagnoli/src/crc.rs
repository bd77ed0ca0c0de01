//! CRC-32C (Castagnoli) public API.
//!
//! - Polynomial: 0x1EDC6F41 (normal), 0x82F63B78 (reflected)
//! - Init: 0xFFFFFFFF, RefIn/RefOut: true, XorOut: 0xFFFFFFFF
//! - Check ("123456789"): 0xE3069283
//!
//! The register is complemented once on entry and once on exit. The engines
//! only ever see the raw register.

use platform::Caps;

use crate::{
  dispatch::{Dispatcher, Engine, Selected},
  gf2::Gf2Matrix32,
  portable,
  tables,
};

// ─────────────────────────────────────────────────────────────────────────────
// Kernel Selection
// ─────────────────────────────────────────────────────────────────────────────

const SOFTWARE: Selected = Selected::new(
  <portable::Table as crate::engine::Backend>::NAME,
  Engine::Software,
  portable::kernel,
);

#[cfg(target_arch = "x86_64")]
const HARDWARE: Option<Selected> = Some(Selected::new(
  <crate::x86_64::Sse42 as crate::engine::Backend>::NAME,
  Engine::Hardware,
  crate::x86_64::kernel,
));

#[cfg(target_arch = "aarch64")]
const HARDWARE: Option<Selected> = Some(Selected::new(
  <crate::aarch64::Crc as crate::engine::Backend>::NAME,
  Engine::Hardware,
  crate::aarch64::kernel,
));

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const HARDWARE: Option<Selected> = None;

/// Binding for a previously selected engine.
///
/// `Hardware` is only ever recorded after detection succeeded.
fn rebind(engine: Engine) -> Selected {
  match engine {
    Engine::Hardware => HARDWARE.unwrap_or(SOFTWARE),
    Engine::Software => SOFTWARE,
  }
}

/// Whether `caps` can run this target's hardware CRC-32C kernel.
#[inline]
#[must_use]
#[allow(unused_variables)] // `caps` only used on x86_64/aarch64
fn has_hwcrc(caps: Caps) -> bool {
  #[cfg(target_arch = "x86_64")]
  {
    caps.has(platform::caps::x86::CRC32C_READY)
  }
  #[cfg(target_arch = "aarch64")]
  {
    caps.has(platform::caps::aarch64::CRC_READY)
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    false
  }
}

/// Hardware when `caps` has the instruction, software otherwise.
fn select_for(caps: Caps) -> Selected {
  match HARDWARE {
    Some(hardware) if has_hwcrc(caps) => hardware,
    _ => SOFTWARE,
  }
}

fn select_crc32c() -> Selected {
  let selected = select_for(platform::caps());

  #[cfg(feature = "tracing")]
  tracing::debug!(
    kernel = selected.name,
    engine = selected.engine.as_str(),
    platform = %platform::describe(),
    "crc32c kernel bound"
  );

  selected
}

static CRC32C_DISPATCHER: Dispatcher = Dispatcher::new(select_crc32c, rebind);

/// Bind the CRC-32C kernel now instead of on first use.
///
/// Idempotent and cheap after the first call. Useful before spawning threads
/// that all start checksumming at once.
#[inline]
pub fn init() {
  let _ = CRC32C_DISPATCHER.get();
}

/// The kernel bound for this process (selecting it if needed).
#[inline]
#[must_use]
pub fn selected() -> Selected {
  CRC32C_DISPATCHER.get()
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the CRC-32C of `data`, continuing from `initial`.
///
/// Pass `0` to start a fresh checksum, or a previous result to extend it:
/// `crc32c(b, crc32c(a, 0))` equals the checksum of `a` followed by `b`.
/// An empty `data` returns `initial` unchanged.
///
/// ```
/// assert_eq!(castagnoli::crc32c(b"123456789", 0), 0xE306_9283);
///
/// let head = castagnoli::crc32c(b"1234", 0);
/// assert_eq!(castagnoli::crc32c(b"56789", head), 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub fn crc32c(data: &[u8], initial: u32) -> u32 {
  !CRC32C_DISPATCHER.call(!initial, data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming Hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming CRC-32C hasher.
///
/// # Example
///
/// ```
/// use castagnoli::Crc32c;
///
/// let mut hasher = Crc32c::new();
/// hasher.update(b"1234");
/// hasher.update(b"56789");
/// assert_eq!(hasher.finalize(), 0xE306_9283);
/// assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32c {
  state: u32,
}

impl Crc32c {
  /// Shift-by-one-byte operator for [`combine`](Self::combine).
  const SHIFT8: Gf2Matrix32 = tables::zeros_operator(1);

  /// Start a fresh checksum.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { state: !0 }
  }

  /// Continue from a previously finalized CRC value.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self { state: !crc }
  }

  /// Feed more bytes.
  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = CRC32C_DISPATCHER.call(self.state, data);
  }

  /// The CRC of everything fed so far. Does not consume the hasher.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    !self.state
  }

  #[inline]
  pub fn reset(&mut self) {
    self.state = !0;
  }

  /// One-shot checksum of `data`.
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    crc32c(data, 0)
  }

  /// Compute `crc(A ‖ B)` from `crc(A)`, `crc(B)` and `len(B)`.
  ///
  /// Runs in O(log `len_b`) 32×32 GF(2) matrix products; neither buffer is
  /// touched again.
  #[must_use]
  pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    if len_b == 0 {
      return crc_a;
    }

    let mut op = Self::SHIFT8;
    let mut acc = Gf2Matrix32::identity();
    let mut remaining = len_b;
    while remaining != 0 {
      if remaining & 1 != 0 {
        acc = acc.mul(&op);
      }
      op = op.square();
      remaining >>= 1;
    }

    acc.times(crc_a) ^ crc_b
  }

  /// Name of the bound kernel (e.g. `"portable/slice8"`, `"x86_64/sse42"`).
  #[must_use]
  pub fn backend_name() -> &'static str {
    CRC32C_DISPATCHER.get().name
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
