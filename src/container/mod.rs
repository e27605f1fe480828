// Binary patch container format.
//
// Layout (little-endian u32 integers):
//
//   magic "Simple Patch Fmt" (16) | source SHA-1 (20) | target SHA-1 (20)
//   | target size (4) | replacement count (4)
//   | { offset (4) | length (4) | data (length) } * count
//   | additions length (4) | additions
//
// # Modules
//
// - `header`: fixed 64-byte prefix and layout constants
// - `encoder`: Patch -> bytes
// - `decoder`: bytes -> Patch, with explicit truncation checks

pub mod decoder;
pub mod encoder;
pub mod header;

pub use decoder::{deserialize, read_from};
pub use encoder::{serialize, write_to};
pub use header::{FIXED_HEADER_LEN, FileHeader, MAGIC};
