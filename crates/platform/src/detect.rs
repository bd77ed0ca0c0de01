//! CPU feature detection with one-time caching.
//!
//! Detection combines two sources:
//! - compile-time features (`-C target-feature=...` / `target-cpu=native`)
//! - runtime probing (`is_x86_feature_detected!` & co., `std` only)
//!
//! Results are cached in a `OnceLock` with `std`, and in an atomic once-cell
//! without it. Either way detection runs exactly once. Under Miri, detection
//! always reports portable-only caps.

use crate::caps::Caps;
#[cfg(target_arch = "aarch64")]
use crate::caps::aarch64;
#[cfg(target_arch = "x86_64")]
use crate::caps::x86;

/// Get the detected CPU capabilities, detecting on first call.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(all(not(miri), feature = "std"))]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Caps> = OnceLock::new();
    *CACHED.get_or_init(detect_uncached)
  }

  #[cfg(all(not(miri), not(feature = "std")))]
  {
    static CACHED: atomic_cache::AtomicCaps = atomic_cache::AtomicCaps::new();
    CACHED.get_or_init(detect_uncached)
  }
}

/// Detect capabilities without caching.
#[must_use]
pub fn detect_uncached() -> Caps {
  #[cfg(target_arch = "x86_64")]
  {
    compile_time_x86_64().union(runtime_x86_64())
  }

  #[cfg(target_arch = "aarch64")]
  {
    compile_time_aarch64().union(runtime_aarch64())
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Caps::NONE
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64
// ─────────────────────────────────────────────────────────────────────────────

/// Features enabled at compile time. SSE2 is baseline on x86_64.
#[cfg(target_arch = "x86_64")]
const fn compile_time_x86_64() -> Caps {
  if cfg!(target_feature = "sse4.2") {
    x86::SSE2.union(x86::SSE42)
  } else {
    x86::SSE2
  }
}

#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime_x86_64() -> Caps {
  if std::arch::is_x86_feature_detected!("sse4.2") {
    x86::SSE42
  } else {
    Caps::NONE
  }
}

/// Without `std` there is no runtime probe; compile-time features only.
#[cfg(all(target_arch = "x86_64", not(feature = "std")))]
const fn runtime_x86_64() -> Caps {
  Caps::NONE
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64
// ─────────────────────────────────────────────────────────────────────────────

/// Features enabled at compile time. NEON is baseline on aarch64.
#[cfg(target_arch = "aarch64")]
const fn compile_time_aarch64() -> Caps {
  if cfg!(target_feature = "crc") {
    aarch64::NEON.union(aarch64::CRC)
  } else {
    aarch64::NEON
  }
}

#[cfg(all(target_arch = "aarch64", feature = "std"))]
fn runtime_aarch64() -> Caps {
  if std::arch::is_aarch64_feature_detected!("crc") {
    aarch64::CRC
  } else {
    Caps::NONE
  }
}

#[cfg(all(target_arch = "aarch64", not(feature = "std")))]
const fn runtime_aarch64() -> Caps {
  Caps::NONE
}

// ─────────────────────────────────────────────────────────────────────────────
// no_std cache
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, not(feature = "std")))]
#[cfg_attr(miri, allow(dead_code))]
mod atomic_cache {
  use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

  use crate::caps::Caps;

  const UNINIT: u8 = 0;
  const BUSY: u8 = 1;
  const READY: u8 = 2;

  /// Once-cell for [`Caps`] built from two atomics.
  ///
  /// The first caller claims the cell with `UNINIT -> BUSY`, detects, stores
  /// the word and publishes `READY`. Everyone else spins until `READY`.
  pub struct AtomicCaps {
    state: AtomicU8,
    word: AtomicU64,
  }

  impl AtomicCaps {
    pub const fn new() -> Self {
      Self {
        state: AtomicU8::new(UNINIT),
        word: AtomicU64::new(0),
      }
    }

    #[inline]
    pub fn get_or_init(&self, detect: fn() -> Caps) -> Caps {
      // Fast path: already initialized
      if self.state.load(Ordering::Acquire) == READY {
        return self.load();
      }

      match self.state.compare_exchange(UNINIT, BUSY, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
          let caps = detect();
          self.word.store(caps.to_word(), Ordering::Relaxed);
          self.state.store(READY, Ordering::Release);
          caps
        }
        Err(_) => {
          while self.state.load(Ordering::Acquire) != READY {
            core::hint::spin_loop();
          }
          self.load()
        }
      }
    }

    fn load(&self) -> Caps {
      Caps::from_word(self.word.load(Ordering::Relaxed))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_caps_is_cached_and_stable() {
    assert_eq!(caps(), caps());
  }

  #[test]
  #[cfg(not(miri))]
  fn test_cached_matches_uncached() {
    assert_eq!(caps(), detect_uncached());
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn test_x86_64_baseline() {
    assert!(detect_uncached().has(x86::SSE2));
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn test_aarch64_baseline() {
    assert!(detect_uncached().has(aarch64::NEON));
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
  fn test_compile_time_feature_is_reported() {
    assert!(caps().has(x86::CRC32C_READY));
  }

  #[test]
  fn test_atomic_cache_detects_once_under_contention() {
    extern crate std;

    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::{sync::Barrier, thread, vec::Vec};

    use super::atomic_cache::AtomicCaps;

    static DETECTIONS: AtomicUsize = AtomicUsize::new(0);
    static CACHE: AtomicCaps = AtomicCaps::new();

    fn slow_detect() -> Caps {
      DETECTIONS.fetch_add(1, Ordering::SeqCst);
      thread::yield_now();
      Caps::bit(1) | Caps::bit(33)
    }

    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let seen: Vec<Caps> = thread::scope(|s| {
      let handles: Vec<_> = (0..THREADS)
        .map(|_| {
          s.spawn(|| {
            barrier.wait();
            CACHE.get_or_init(slow_detect)
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(DETECTIONS.load(Ordering::SeqCst), 1);
    assert!(seen.iter().all(|&c| c == Caps::bit(1) | Caps::bit(33)));
    assert_eq!(CACHE.get_or_init(slow_detect), Caps::bit(1) | Caps::bit(33));
    assert_eq!(DETECTIONS.load(Ordering::SeqCst), 1);
  }
}
