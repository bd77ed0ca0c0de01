//! Kernel selection depends on CPU capabilities alone.
//!
//! Kept in its own test binary: it mutates the process environment before the
//! dispatcher binds, so nothing else may run alongside it.

use castagnoli::{Crc32c, Engine, __internal as kernels};

#[test]
fn hardware_is_bound_whenever_available_regardless_of_environment() {
  // SAFETY: this is the only test in this binary, so no other thread reads
  // or writes the environment concurrently.
  unsafe {
    std::env::set_var("CASTAGNOLI_CRC32C_FORCE", "portable");
  }

  castagnoli::init();
  let bound = castagnoli::selected();

  match kernels::hardware_name() {
    Some(name) => {
      assert_eq!(bound.engine, Engine::Hardware, "hardware {name} available but {} bound", bound.name);
      assert_eq!(bound.name, name);
    }
    None => {
      assert_eq!(bound.engine, Engine::Software);
      assert_eq!(bound.name, "portable/slice8");
    }
  }
  assert_eq!(Crc32c::backend_name(), bound.name);
  assert_eq!(castagnoli::crc32c(b"123456789", 0), 0xE306_9283);
}
