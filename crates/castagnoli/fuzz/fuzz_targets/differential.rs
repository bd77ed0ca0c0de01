//! Differential fuzzing against the `crc32c` crate.

#![no_main]

use castagnoli::Crc32c;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let ours = castagnoli::crc32c(data, 0);
  let reference = crc32c::crc32c(data);
  assert_eq!(
    ours, reference,
    "CRC-32C differential mismatch: ours={:#010x}, reference={:#010x}, len={}",
    ours, reference, data.len()
  );

  // Streaming in uneven pieces must match one-shot
  let mut hasher = Crc32c::new();
  let step = (data.first().copied().unwrap_or(1) as usize).max(1);
  for part in data.chunks(step) {
    hasher.update(part);
  }
  assert_eq!(hasher.finalize(), ours, "CRC-32C streaming mismatch");

  // Combine at the midpoint
  let (a, b) = data.split_at(data.len() / 2);
  let combined = Crc32c::combine(castagnoli::crc32c(a, 0), castagnoli::crc32c(b, 0), b.len());
  assert_eq!(combined, ours, "CRC-32C combine mismatch");
});
