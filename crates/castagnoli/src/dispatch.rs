//! One-time kernel selection and caching.
//!
//! ```text
//!   Uninitialized ──first call──▶ Detecting ──▶ Bound(Software | Hardware)
//! ```
//!
//! The selector runs exactly once; every later call is a load plus an
//! indirect call. With `std` the binding lives in a `OnceLock`. Without it, an
//! atomic state byte is claimed with a compare-exchange; callers that lose the
//! race spin until the winner publishes the binding.

use core::fmt;

/// Raw register update: `fn(state, data) -> state`, no pre/post inversion.
pub type Crc32cFn = fn(u32, &[u8]) -> u32;

/// Which engine a binding runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
  /// Table-driven slicing-by-8.
  Software,
  /// CPU checksum instruction.
  Hardware,
}

impl Engine {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Software => "software",
      Self::Hardware => "hardware",
    }
  }
}

impl fmt::Display for Engine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy)]
pub struct Selected {
  /// Kernel name for diagnostics (e.g. `"x86_64/sse42"`).
  pub name: &'static str,
  pub engine: Engine,
  pub func: Crc32cFn,
}

impl Selected {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, engine: Engine, func: Crc32cFn) -> Self {
    Self { name, engine, func }
  }
}

impl fmt::Debug for Selected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Selected")
      .field("name", &self.name)
      .field("engine", &self.engine)
      .finish_non_exhaustive()
  }
}

/// Cached kernel dispatcher.
pub struct Dispatcher {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<Selected>,

  #[cfg(not(feature = "std"))]
  inner: AtomicBinding,

  /// Chooses the kernel; called on first access.
  selector: fn() -> Selected,
  /// Rebuilds a binding from its engine kind (no_std cache only).
  #[cfg_attr(feature = "std", allow(dead_code))]
  rebind: fn(Engine) -> Selected,
}

impl Dispatcher {
  /// Create a dispatcher. Nothing runs until the first [`get`](Self::get).
  #[must_use]
  pub const fn new(selector: fn() -> Selected, rebind: fn(Engine) -> Selected) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),
      #[cfg(not(feature = "std"))]
      inner: AtomicBinding::new(),
      selector,
      rebind,
    }
  }

  /// Get the selected kernel, selecting on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(self.selector)
    }

    #[cfg(not(feature = "std"))]
    {
      self.inner.get_or_init(self.selector, self.rebind)
    }
  }

  /// Whether selection has already happened.
  #[must_use]
  pub fn is_bound(&self) -> bool {
    self.inner.get().is_some()
  }

  /// Call the selected kernel on the raw register.
  #[inline]
  #[must_use]
  pub fn call(&self, crc: u32, data: &[u8]) -> u32 {
    (self.get().func)(crc, data)
  }
}

impl fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Dispatcher").field("bound", &self.is_bound()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// no_std binding
// ─────────────────────────────────────────────────────────────────────────────

/// Once-cell holding only the engine kind of a binding.
///
/// `UNINIT -> BUSY` is claimed by exactly one caller, which runs the selector
/// and publishes `SOFTWARE` or `HARDWARE`. Everyone else waits on `BUSY`.
#[cfg(any(test, not(feature = "std")))]
struct AtomicBinding(core::sync::atomic::AtomicU8);

#[cfg(any(test, not(feature = "std")))]
impl AtomicBinding {
  const UNINIT: u8 = 0;
  const BUSY: u8 = 1;
  const SOFTWARE: u8 = 2;
  const HARDWARE: u8 = 3;

  const fn new() -> Self {
    Self(core::sync::atomic::AtomicU8::new(Self::UNINIT))
  }

  const fn encode(engine: Engine) -> u8 {
    match engine {
      Engine::Software => Self::SOFTWARE,
      Engine::Hardware => Self::HARDWARE,
    }
  }

  /// The published engine, if any.
  fn get(&self) -> Option<Engine> {
    match self.0.load(core::sync::atomic::Ordering::Acquire) {
      Self::SOFTWARE => Some(Engine::Software),
      Self::HARDWARE => Some(Engine::Hardware),
      _ => None,
    }
  }

  fn get_or_init(&self, selector: fn() -> Selected, rebind: fn(Engine) -> Selected) -> Selected {
    use core::sync::atomic::Ordering;

    if let Some(engine) = self.get() {
      return rebind(engine);
    }

    match self.0.compare_exchange(Self::UNINIT, Self::BUSY, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let selected = selector();
        self.0.store(Self::encode(selected.engine), Ordering::Release);
        selected
      }
      Err(_) => loop {
        if let Some(engine) = self.get() {
          return rebind(engine);
        }
        core::hint::spin_loop();
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use core::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  fn identity(crc: u32, _data: &[u8]) -> u32 {
    crc
  }

  fn xor_len(crc: u32, data: &[u8]) -> u32 {
    crc ^ data.len() as u32
  }

  fn rebind(engine: Engine) -> Selected {
    match engine {
      Engine::Software => Selected::new("test/identity", Engine::Software, identity),
      Engine::Hardware => Selected::new("test/xor-len", Engine::Hardware, xor_len),
    }
  }

  static CALLS: AtomicUsize = AtomicUsize::new(0);

  fn counting_selector() -> Selected {
    CALLS.fetch_add(1, Ordering::SeqCst);
    rebind(Engine::Hardware)
  }

  #[test]
  fn test_selector_runs_once() {
    static DISPATCHER: Dispatcher = Dispatcher::new(counting_selector, rebind);
    assert!(!DISPATCHER.is_bound());
    for _ in 0..4 {
      assert_eq!(DISPATCHER.get().name, "test/xor-len");
    }
    assert!(DISPATCHER.is_bound());
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_call_uses_bound_kernel() {
    static DISPATCHER: Dispatcher = Dispatcher::new(|| rebind(Engine::Software), rebind);
    assert_eq!(DISPATCHER.call(0xAB, b"xyz"), 0xAB);
    assert_eq!(DISPATCHER.get().engine, Engine::Software);
  }

  #[test]
  fn test_atomic_binding_selects_once_under_contention() {
    extern crate std;

    use std::{sync::Barrier, thread, vec::Vec};

    static SELECTIONS: AtomicUsize = AtomicUsize::new(0);
    static BINDING: AtomicBinding = AtomicBinding::new();

    fn slow_selector() -> Selected {
      SELECTIONS.fetch_add(1, Ordering::SeqCst);
      thread::yield_now();
      rebind(Engine::Hardware)
    }

    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let names: Vec<&str> = thread::scope(|s| {
      let handles: Vec<_> = (0..THREADS)
        .map(|_| {
          s.spawn(|| {
            barrier.wait();
            BINDING.get_or_init(slow_selector, rebind).name
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(SELECTIONS.load(Ordering::SeqCst), 1);
    assert!(names.iter().all(|&name| name == "test/xor-len"));
    assert_eq!(BINDING.get(), Some(Engine::Hardware));
  }
}
